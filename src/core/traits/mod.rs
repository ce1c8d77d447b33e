//! Core traits for platform-agnostic functionality.
//!
//! [`TimeSource`] decouples all timer logic from the clock that drives it.
//! The compass subsystem never reads a hardware timer directly; it receives
//! millisecond timestamps from whatever `TimeSource` the host wires in.
//! [`MockTime`] is always available so every timing property can be tested
//! on the host deterministically.

pub mod time;

pub use time::{MockTime, TimeSource};

#[cfg(feature = "embassy")]
pub use time::EmbassyTime;
