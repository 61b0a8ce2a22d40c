// capture-panel firmware entry point and main loop
//
// Boot sequence: logger -> runtime -> board -> probe touch + decoder ->
// spawn tasks. Main loop: wait for a task signal -> queue jobs -> drain
// the scheduler -> repeat.
//
// Either chip may be missing; the loop runs with whatever probed. The
// decoder is driven here, the touch controller only from its task.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_futures::select::{Either3, select3};
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::timer::timg::TimerGroup;
use log::{error, info, warn};

use capture_panel::board::{Board, Decoder};
use capture_panel::config::{DecoderConfig, TouchConfig};
use capture_panel::drivers::ssd2533::Ssd2533;
use capture_panel::drivers::tvp5150::standard::Standard;
use capture_panel::drivers::tvp5150::{Error, LogLines, Tvp5150};
use capture_panel::input::LogSink;
use capture_panel::kernel::tasks::{
    DUMP_DUE, STANDARD_DUE, TOUCH_FRAMES, status_task, touch_task,
};
use capture_panel::kernel::{Job, Scheduler};
use capture_panel::touch::{self, TouchTracker};
use capture_panel::video::{BufType, CaptureSlave};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);
    esp_alloc::heap_allocator!(size: 32 * 1024);

    info!("booting...");

    let timg0 = TimerGroup::new(unsafe { peripherals.TIMG0.clone_unchecked() });
    let sw_int = SoftwareInterruptControl::new(unsafe { peripherals.SW_INTERRUPT.clone_unchecked() });
    esp_rtos::start(timg0.timer0, sw_int.software_interrupt0);
    info!("runtime started.");

    let mut board = match Board::init(peripherals) {
        Ok(board) => board,
        Err(e) => halt(e),
    };
    let mut delay = Delay::new();
    board.decoder.power_up(&mut delay);
    info!("hardware initialized.");

    let touch_cfg = TouchConfig::new();
    match Ssd2533::probe(board.touch.i2c, touch_cfg, &mut delay) {
        Ok(ts) => {
            let info = touch::device_info(&ts);
            info!(
                "touch: {} registered, x 0..={} y 0..={}",
                info.name, info.abs_x.max, info.abs_y.max
            );
            match touch_task(ts, board.touch.irq) {
                Ok(token) => spawner.spawn(token),
                Err(e) => warn!("touch: task spawn failed: {:?}", e),
            }
        }
        Err(e) => warn!("touch: probe failed: {}", e),
    }

    let dec_cfg = DecoderConfig::new();
    let mut decoder = match Tvp5150::probe(board.decoder.i2c, dec_cfg, &mut delay) {
        Ok(mut dec) => match start_decoder(&mut dec) {
            Ok(()) => Some(dec),
            Err(e) => {
                warn!("tvp5150: bring-up failed: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("tvp5150: probe failed: {}", e);
            None
        }
    };
    if decoder.is_none() {
        board.decoder.pdn.set_low();
    }

    match status_task(dec_cfg.debug > 1) {
        Ok(token) => spawner.spawn(token),
        Err(e) => warn!("status: task spawn failed: {:?}", e),
    }
    info!("kernel ready.");

    let mut sched = Scheduler::new();
    let mut tracker = TouchTracker::new();
    let mut sink = LogSink::default();
    let mut locked: Option<Standard> = None;

    loop {
        match select3(TOUCH_FRAMES.receive(), STANDARD_DUE.wait(), DUMP_DUE.wait()).await {
            Either3::First(frame) => {
                tracker.report(&frame, &mut sink);
                if let Err(e) = sched.push_unique(Job::ReportTouch) {
                    warn!("sched: {}", e);
                }
            }
            Either3::Second(()) => {
                if let Err(e) = sched.push_unique(Job::QueryStandard) {
                    warn!("sched: {}", e);
                }
            }
            Either3::Third(()) => sched.push_replacing(Job::DumpDecoder),
        }

        // drain all pending jobs by priority (high first, FIFO within tier)
        while let Some(job) = sched.pop() {
            match job {
                Job::ReportTouch => {
                    while let Ok(frame) = TOUCH_FRAMES.try_receive() {
                        tracker.report(&frame, &mut sink);
                    }
                }
                Job::QueryStandard => {
                    if let Some(dec) = decoder.as_mut() {
                        query_standard(dec, &mut locked);
                    }
                }
                Job::DumpDecoder => {
                    if let Some(dec) = decoder.as_mut() {
                        let mut log = LogLines::new();
                        if let Err(e) = dec.write_status(&mut log) {
                            warn!("tvp5150: status dump failed: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Capture-master style bring-up: power, identity, autoswitch.
fn start_decoder(dec: &mut Decoder) -> Result<(), <Decoder as CaptureSlave>::Error> {
    dec.dev_init()?;
    dec.s_power(true)?;
    dec.init()?;
    let ident = dec.g_chip_ident()?;
    info!(
        "tvp5150: chip ident {} rev 0x{:04x}",
        ident.ident, ident.revision
    );
    // no lock yet is normal at boot; the status task picks it up later
    match dec.g_fmt_cap(BufType::VideoCapture) {
        Ok(fmt) => info!("tvp5150: capture {}x{}", fmt.pix.width, fmt.pix.height),
        Err(Error::NoSignal) => info!("tvp5150: waiting for signal"),
        Err(e) => return Err(e),
    }
    Ok(())
}

fn query_standard(dec: &mut Decoder, locked: &mut Option<Standard>) {
    match dec.current_std() {
        Ok(now) if now != *locked => {
            match now {
                Some(std) => info!("tvp5150: locked to {}", std.name()),
                None => info!("tvp5150: no signal"),
            }
            *locked = now;
        }
        Ok(_) => {}
        Err(e) => warn!("tvp5150: status read failed: {}", e),
    }
}

fn halt(e: impl core::fmt::Debug) -> ! {
    error!("board init failed: {:?}", e);
    loop {
        core::hint::spin_loop();
    }
}
