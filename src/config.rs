// Per-chip configuration (what a device tree or platform data block
// would carry). Board wiring lives in board::pins; these are the knobs
// the drivers validate at probe.

use core::fmt;

use crate::drivers::tvp5150::regs::{Route, RouteInput, RouteOutput};

/// Hard upper bound on tracked contacts (finger registers 0x7C..0x85).
pub const MAX_FINGERS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchConfig {
    /// 7-bit I2C address.
    pub address: u8,
    /// X axis resolution reported upstream.
    pub x_size: u16,
    /// Y axis resolution reported upstream.
    pub y_size: u16,
    /// Contacts the controller is told to track (register 0x8A).
    pub fingers: u8,
    /// Frame scan period in milliseconds (register 0x25).
    pub scan_period_ms: u8,
}

impl TouchConfig {
    pub const fn new() -> Self {
        Self {
            address: 0x48,
            x_size: 640,
            y_size: 480,
            fingers: 2,
            scan_period_ms: 10,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_size == 0 {
            return Err(ConfigError::MissingXSize);
        }
        if self.y_size == 0 {
            return Err(ConfigError::MissingYSize);
        }
        if self.fingers == 0 || self.fingers as usize > MAX_FINGERS {
            return Err(ConfigError::FingerCount(self.fingers));
        }
        Ok(())
    }
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// 7-bit I2C address (I2CSEL low).
    pub address: u8,
    /// Input/output routing applied at reset.
    pub route: Route,
    /// 0 quiet, 1 probe info, 2 adds a full register dump after probe.
    pub debug: u8,
}

impl DecoderConfig {
    pub const fn new() -> Self {
        Self {
            address: 0x5C,
            route: Route {
                input: RouteInput::Composite0,
                output: RouteOutput::Normal,
            },
            debug: 0,
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    MissingXSize,
    MissingYSize,
    FingerCount(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingXSize => write!(f, "x-size not set"),
            ConfigError::MissingYSize => write!(f, "y-size not set"),
            ConfigError::FingerCount(n) => {
                write!(f, "finger count {} outside 1..={}", n, MAX_FINGERS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TouchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_sizes_and_bad_finger_counts_are_rejected() {
        let cfg = TouchConfig { x_size: 0, ..TouchConfig::new() };
        assert_eq!(cfg.validate(), Err(ConfigError::MissingXSize));

        let cfg = TouchConfig { y_size: 0, ..TouchConfig::new() };
        assert_eq!(cfg.validate(), Err(ConfigError::MissingYSize));

        let cfg = TouchConfig { fingers: 11, ..TouchConfig::new() };
        assert_eq!(cfg.validate(), Err(ConfigError::FingerCount(11)));

        let cfg = TouchConfig { fingers: 0, ..TouchConfig::new() };
        assert_eq!(cfg.validate(), Err(ConfigError::FingerCount(0)));
    }
}
