// Cooperative scheduling for the firmware
// Single core. Embassy tasks own the hardware waits and publish through
// statics; the main loop turns those into jobs and drains the scheduler.
//
// scheduler is board-independent and host tested. tasks needs the
// concrete board types.

pub mod scheduler;
#[cfg(feature = "board")]
pub mod tasks;

pub use scheduler::{Job, Priority, Scheduler};
