// Embassy spawned tasks: touch scanning and decoder housekeeping timers
//
// Tasks never touch the main loop's state. They publish through statics
// and the main loop turns what arrives into scheduler jobs.
//
//   • `touch_task`   owns the SSD2533 and its IRQ line, runs the scan
//                    worker and publishes frames through TOUCH_FRAMES.
//
//   • `status_task`  fires STANDARD_DUE once a second so the main loop
//                    re-reads the decoder lock, and DUMP_DUE every 30 s
//                    when register dumps are enabled.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker, Timer};
use esp_hal::gpio::Input;
use log::info;

use crate::board::TouchPanel;
use crate::touch::{self, TouchFrame};

// ═════════════════════════════════════════════════════════════════════════
// Touch task
// ═════════════════════════════════════════════════════════════════════════

/// At a 10 ms scan period this covers 80 ms of main-loop stall before
/// the worker starts waiting for room.
pub const TOUCH_CHANNEL_CAP: usize = 8;

/// Frames in scan order, from the touch worker to the main loop.
pub static TOUCH_FRAMES: Channel<CriticalSectionRawMutex, TouchFrame, TOUCH_CHANNEL_CAP> =
    Channel::new();

/// Stops the touch worker; the task then returns and drops the driver.
pub static TOUCH_STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::task]
pub async fn touch_task(ts: TouchPanel, irq: Input<'static>) {
    touch::run_worker(ts, irq, TOUCH_FRAMES.sender(), &TOUCH_STOP).await;
    info!("touch: {} released", touch::DEVICE_NAME);
}

// ═════════════════════════════════════════════════════════════════════════
// Decoder housekeeping
// ═════════════════════════════════════════════════════════════════════════

/// Fires every second: re-read the decoder's detected standard.
pub static STANDARD_DUE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Fires every 30 s while dumps are enabled: log the register report.
pub static DUMP_DUE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

const STANDARD_PERIOD: Duration = Duration::from_secs(1);
const DUMP_PERIOD: Duration = Duration::from_secs(30);

#[embassy_executor::task]
pub async fn status_task(dump: bool) -> ! {
    // let the decoder settle on its first lock after reset
    Timer::after(Duration::from_millis(500)).await;

    let mut std_ticker = Ticker::every(STANDARD_PERIOD);
    if !dump {
        loop {
            std_ticker.next().await;
            STANDARD_DUE.signal(());
        }
    }

    let mut dump_ticker = Ticker::every(DUMP_PERIOD);
    loop {
        use embassy_futures::select::{Either, select};

        match select(std_ticker.next(), dump_ticker.next()).await {
            Either::First(_) => STANDARD_DUE.signal(()),
            Either::Second(_) => DUMP_DUE.signal(()),
        }
    }
}
