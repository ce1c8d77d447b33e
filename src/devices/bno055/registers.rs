//! BNO055 register map (page 0)
//!
//! Register addresses and fixed values from the Bosch BNO055 datasheet
//! (BST-BNO055-DS000). Only the registers this driver touches are listed.

use bitflags::bitflags;

/// Default 7-bit I2C address (COM3 pin low)
pub const I2C_ADDR_A: u8 = 0x28;

/// Alternate 7-bit I2C address (COM3 pin high)
pub const I2C_ADDR_B: u8 = 0x29;

/// Chip identification register
pub const CHIP_ID: u8 = 0x00;

/// Expected CHIP_ID value
pub const BNO055_ID: u8 = 0xA0;

/// Register page select
pub const PAGE_ID: u8 = 0x07;

/// Euler angle block start (heading LSB); 6 bytes: heading, roll, pitch
pub const EULER_H_LSB: u8 = 0x1A;

/// Calibration status: sys[7:6] gyro[5:4] accel[3:2] mag[1:0]
pub const CALIB_STAT: u8 = 0x35;

/// Power-on self-test result
pub const ST_RESULT: u8 = 0x36;

/// Unit selection
pub const UNIT_SEL: u8 = 0x3B;

/// Operating mode
pub const OPR_MODE: u8 = 0x3D;

/// Power mode
pub const PWR_MODE: u8 = 0x3E;

/// System trigger (reset, clock select)
pub const SYS_TRIGGER: u8 = 0x3F;

/// Calibration offset block start (accel offset X LSB)
///
/// 22 contiguous bytes through MAG_RADIUS_MSB (0x6A).
pub const ACC_OFFSET_X_LSB: u8 = 0x55;

/// Euler registers are in 1/16 degree units
pub const EULER_LSB_PER_DEGREE: f32 = 16.0;

/// Operating mode values
pub mod opr_mode {
    /// Configuration mode: fusion halted, offset registers accessible
    pub const CONFIG: u8 = 0x00;
    /// 9-degrees-of-freedom fusion mode
    pub const NDOF: u8 = 0x0C;
}

/// Power mode values
pub mod pwr_mode {
    pub const NORMAL: u8 = 0x00;
}

/// SYS_TRIGGER bits
pub mod sys_trigger {
    /// Use the external 32.768 kHz crystal
    pub const CLK_SEL: u8 = 0x80;
    /// Reset the system
    pub const RST_SYS: u8 = 0x20;
}

bitflags! {
    /// ST_RESULT register: power-on self-test outcome, one bit per unit
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelfTestResult: u8 {
        const ACCEL = 0b0000_0001;
        const MAG   = 0b0000_0010;
        const GYRO  = 0b0000_0100;
        const MCU   = 0b0000_1000;
    }
}

impl SelfTestResult {
    /// All four self-test units passed
    pub fn all_passed(&self) -> bool {
        self.contains(Self::ACCEL | Self::MAG | Self::GYRO | Self::MCU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_test_all_passed() {
        assert!(SelfTestResult::from_bits_truncate(0x0F).all_passed());
        assert!(!SelfTestResult::from_bits_truncate(0x0D).all_passed());
        assert!(!SelfTestResult::from_bits_truncate(0x00).all_passed());
    }
}
