// Touch pipeline: IRQ edge -> finger scan -> multitouch events
//
// The controller pulls its IRQ line low whenever the finger registers
// change. run_worker() is the only code that touches the controller
// after probe: it waits for the edge, scans, and hands the frame to
// whoever holds the receiving end of the channel. Scans never overlap
// because there is exactly one worker.
//
// TouchTracker turns frames into type-A multitouch events. It keeps the
// previous frame so that a finger that disappears gets one closing
// report (BTN_TOUCH=0 at its last position for slot 0, an empty MT_SYNC
// for every slot).

use core::fmt::Debug;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_sync::signal::Signal;
use embedded_hal::digital::Error as _;
use embedded_hal::i2c::I2c;
use embedded_hal_async::digital::Wait;
use log::{debug, warn};

use crate::drivers::ssd2533::Ssd2533;
use crate::input::{AbsAxis, InputDeviceInfo, InputEvent, InputSink, Key};

pub use crate::drivers::ssd2533::{Contact, TouchFrame};

pub const DEVICE_NAME: &str = "ssd2533_tsc";

/// Capabilities the panel registers with the input layer.
pub fn device_info<I2C: I2c>(ts: &Ssd2533<I2C>) -> InputDeviceInfo {
    InputDeviceInfo::for_touch(DEVICE_NAME, ts.config())
}

pub struct TouchTracker {
    prev: TouchFrame,
}

impl TouchTracker {
    pub const fn new() -> Self {
        Self {
            prev: TouchFrame::empty(0),
        }
    }

    pub fn report<S: InputSink>(&mut self, frame: &TouchFrame, sink: &mut S) {
        for (i, slot) in frame.slots().iter().enumerate() {
            match slot {
                Some(c) => {
                    if i == 0 {
                        sink.report(InputEvent::Key(Key::BtnTouch, true));
                        sink.report(InputEvent::Abs(AbsAxis::X, c.x as i32));
                        sink.report(InputEvent::Abs(AbsAxis::Y, c.y as i32));
                    }
                    sink.report(InputEvent::Abs(AbsAxis::MtPositionX, c.x as i32));
                    sink.report(InputEvent::Abs(AbsAxis::MtPositionY, c.y as i32));
                    sink.report(InputEvent::MtSync);
                }
                None => {
                    let Some(last) = self.prev.slots[i] else {
                        continue;
                    };
                    if i == 0 {
                        sink.report(InputEvent::Key(Key::BtnTouch, false));
                        sink.report(InputEvent::Abs(AbsAxis::X, last.x as i32));
                        sink.report(InputEvent::Abs(AbsAxis::Y, last.y as i32));
                    }
                    sink.report(InputEvent::MtSync);
                }
            }
        }
        sink.report(InputEvent::Sync);
        self.prev = *frame;
    }
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Deferred scan loop. Returns the driver once `stop` is signalled.
///
/// Bus errors during a scan are logged and the loop keeps going; the
/// next edge retries. Frames are sent in scan order and `send` waits
/// for room, so a slow consumer throttles scanning rather than losing
/// frames.
pub async fn run_worker<I2C, E, IRQ, M, const N: usize>(
    mut ts: Ssd2533<I2C>,
    mut irq: IRQ,
    frames: Sender<'_, M, TouchFrame, N>,
    stop: &Signal<M, ()>,
) -> Ssd2533<I2C>
where
    I2C: I2c<Error = E>,
    E: Debug,
    IRQ: Wait,
    M: RawMutex,
{
    loop {
        match select(irq.wait_for_falling_edge(), stop.wait()).await {
            Either::First(Ok(())) => {}
            Either::First(Err(e)) => {
                warn!("touch: irq wait failed: {:?}", e.kind());
                continue;
            }
            Either::Second(()) => {
                debug!("touch: worker stopped");
                return ts;
            }
        }

        match ts.scan() {
            Ok(frame) => frames.send(frame).await,
            Err(e) => warn!("touch: scan failed: {}", e),
        }
    }
}
