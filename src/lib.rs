// Touch panel + analog video capture front end (ESP32-C3, I2C)
//
// drivers/  chip-level SSD2533 and TVP5150 drivers
// touch     IRQ-driven scan worker and multitouch event translation
// video     capture-master facing vocabulary (CaptureSlave)
// attrs     text debug endpoints
// kernel/   job scheduler and embassy tasks for the firmware

#![cfg_attr(not(test), no_std)]

pub mod attrs;
#[cfg(feature = "board")]
pub mod board;
pub mod config;
pub mod drivers;
pub mod input;
pub mod kernel;
pub mod touch;
pub mod video;
