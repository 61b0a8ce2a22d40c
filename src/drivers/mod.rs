// Chip drivers: board-independent, generic over embedded-hal I2C.
//
// Both chips hang off one I2C bus; board/ hands each driver its own
// shared-bus device handle. Pin wiring and reset GPIOs live in board/.

pub mod regmap;
pub mod ssd2533;
pub mod tvp5150;
