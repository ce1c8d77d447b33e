//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the two external resources
//! the compass core consumes: the I2C sensor bus and the non-volatile
//! key-value store. All platform-specific code is isolated behind these
//! traits; the subsystem layer never touches hardware directly.

pub mod error;
pub mod traits;

// Mock implementations (host testing)
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{I2cError, PlatformError, Result, StorageError};
pub use traits::{I2cConfig, I2cInterface, KeyValueStorage};
