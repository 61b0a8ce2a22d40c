//! GPIO |     Function      |      Notes
//! -----+-------------------+----------------------------------
//!  4   | I2C0 SDA          | Shared: touch controller + decoder, 2k2 pull-ups
//!  5   | I2C0 SCL          | Shared, 400 kHz
//!  6   | TOUCH IRQ         | Active LOW, falling edge per finger update
//!  7   | DECODER PDN       | Power down, active LOW
//! 10   | DECODER RESETB    | Reset, active LOW

// Pins are taken by name from `Peripherals` in `Board::init`; keep the
// table above in step with it.

/// Shared bus clock (SSD2533 + TVP5150 both run fast-mode).
pub const I2C_FREQ_KHZ: u32 = 400;
