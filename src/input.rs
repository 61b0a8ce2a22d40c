//! Input event vocabulary
//!
//! Touch drivers describe themselves with an [`InputDeviceInfo`] and
//! push [`InputEvent`]s into an [`InputSink`]. The event shapes follow
//! the multi-touch "type A" protocol: per-contact `MtPosition*` values
//! closed by `MtSync`, the whole frame closed by `Sync`. Contact 0 is
//! additionally mirrored on the single-touch `BtnTouch`/`X`/`Y` axes for
//! consumers that only understand one pointer.

use core::fmt;

use log::debug;

use crate::config::TouchConfig;

pub const BUS_I2C: u16 = 0x18;
pub const VENDOR_ID: u16 = 0xABCD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    BtnTouch,
    Btn2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsAxis {
    X,
    Y,
    Pressure,
    MtPositionX,
    MtPositionY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key, bool),
    Abs(AbsAxis, i32),
    MtSync,
    Sync,
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEvent::Key(key, down) => write!(f, "{:?}={}", key, *down as u8),
            InputEvent::Abs(axis, v) => write!(f, "{:?}={}", axis, v),
            InputEvent::MtSync => write!(f, "MT_SYNC"),
            InputEvent::Sync => write!(f, "SYN"),
        }
    }
}

/// Consumer of input events (an input core, a UI, a log).
pub trait InputSink {
    fn report(&mut self, event: InputEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbsInfo {
    pub min: i32,
    pub max: i32,
    pub fuzz: i32,
    pub flat: i32,
}

impl AbsInfo {
    pub const fn range(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            fuzz: 0,
            flat: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputId {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

/// Identity and capabilities a touch device registers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDeviceInfo {
    pub name: &'static str,
    pub id: InputId,
    pub keys: &'static [Key],
    pub abs_x: AbsInfo,
    pub abs_y: AbsInfo,
    pub abs_pressure: AbsInfo,
}

impl InputDeviceInfo {
    pub fn for_touch(name: &'static str, cfg: &TouchConfig) -> Self {
        Self {
            name,
            id: InputId {
                bustype: BUS_I2C,
                vendor: VENDOR_ID,
                ..InputId::default()
            },
            keys: &[Key::BtnTouch, Key::Btn2],
            abs_x: AbsInfo::range(0, cfg.x_size as i32 - 1),
            abs_y: AbsInfo::range(0, cfg.y_size as i32 - 1),
            abs_pressure: AbsInfo::range(0, 0x0F),
        }
    }

    pub fn supports_key(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn abs(&self, axis: AbsAxis) -> AbsInfo {
        match axis {
            AbsAxis::X | AbsAxis::MtPositionX => self.abs_x,
            AbsAxis::Y | AbsAxis::MtPositionY => self.abs_y,
            AbsAxis::Pressure => self.abs_pressure,
        }
    }
}

/// Sink that only logs; used when nothing upstream consumes touches.
#[derive(Debug, Default)]
pub struct LogSink {
    pending: u32,
}

impl InputSink for LogSink {
    fn report(&mut self, event: InputEvent) {
        match event {
            InputEvent::Sync => {
                debug!("input: {} ({} events)", event, self.pending);
                self.pending = 0;
            }
            _ => {
                debug!("input: {}", event);
                self.pending += 1;
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_device_ranges_follow_panel_size() {
        let cfg = TouchConfig::new();
        let info = InputDeviceInfo::for_touch("ssd2533_tsc", &cfg);

        assert_eq!(info.id.bustype, BUS_I2C);
        assert_eq!(info.id.vendor, 0xABCD);
        assert_eq!(info.abs(AbsAxis::X), AbsInfo::range(0, 639));
        assert_eq!(info.abs(AbsAxis::MtPositionY), AbsInfo::range(0, 479));
        assert_eq!(info.abs(AbsAxis::Pressure).max, 15);
        assert!(info.supports_key(Key::BtnTouch));
    }

    #[test]
    fn log_sink_counts_events_per_frame() {
        let mut sink = LogSink::default();
        sink.report(InputEvent::Abs(AbsAxis::MtPositionX, 10));
        sink.report(InputEvent::MtSync);
        assert_eq!(sink.pending, 2);
        sink.report(InputEvent::Sync);
        assert_eq!(sink.pending, 0);
    }
}
