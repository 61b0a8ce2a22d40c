// SSD2533 capacitive touch controller (board-independent)
// Tested on a 21x28 (drive x sense) panel. The controller tracks up to
// ten contacts; each has a 4-byte status register starting at 0x7C.
// Registers are command-addressed: one write selects the register and
// carries 1-2 payload bytes, reads are write(reg) + read(n), big-endian.
//
// Probe sequence: wake/reset -> config table -> 500ms settle -> scan
// period -> clear event FIFO. After that every falling edge on the IRQ
// line means "finger registers changed"; scan() reads them back.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use super::regmap::{self, MAX_PAYLOAD, RegWrite};
use crate::config::{ConfigError, MAX_FINGERS, TouchConfig};

pub const DRIVE_LINES: usize = 21;
pub const SENSE_LINES: usize = 28;

/// X value the controller reports for an empty finger slot.
pub const NO_FINGER: u16 = 0xFFF;

const RESET_SETTLE_MS: u32 = 300;
const INIT_SETTLE_MS: u32 = 500;
const MATRIX_SCAN_MS: u32 = 100;

// SSD2533 command/register map
#[allow(dead_code)]
pub mod cmd {
    pub const NOP: u8 = 0x00;
    pub const DEVICE_ID: u8 = 0x02;
    pub const VERSION_ID: u8 = 0x03;
    pub const WAKE_UP: u8 = 0x04;
    pub const DRIVE_LINE_NUMBER: u8 = 0x06;
    pub const SENSE_LINE_NUMBER: u8 = 0x07;
    pub const DRIVE_LINE0: u8 = 0x08; // ..0x1E, one per drive line
    pub const WOP_MODE: u8 = 0x25; // frame scan period, ms
    pub const ROP_MODE: u8 = 0x26;
    pub const SCAN_FRAME: u8 = 0x2A;
    pub const MEDIAN_FILTER_SEL: u8 = 0x2C;
    pub const DRIVE_PULSE: u8 = 0x2E;
    pub const INT_GAIN: u8 = 0x2F;
    pub const START_INT: u8 = 0x30;
    pub const END_INT: u8 = 0x31;
    pub const MIN_AREA: u8 = 0x33;
    pub const MIN_LEVEL: u8 = 0x34;
    pub const MIN_WEIGHT: u8 = 0x35;
    pub const MAX_AREA: u8 = 0x36;
    pub const SEG_DEPTH: u8 = 0x37;
    pub const CG_METHOD: u8 = 0x39;
    pub const FILTER_SEL: u8 = 0x3D;
    pub const EVENT_MOVE_TOL: u8 = 0x53;
    pub const X_TRACKING_TOL: u8 = 0x54;
    pub const Y_TRACKING_TOL: u8 = 0x55;
    pub const MOV_AVG_FILTER: u8 = 0x56;
    pub const ORIENTATION: u8 = 0x65;
    pub const X_SCALING: u8 = 0x66;
    pub const Y_SCALING: u8 = 0x67;
    pub const X_OFFSET: u8 = 0x68;
    pub const Y_OFFSET: u8 = 0x69;
    pub const TOUCH_STATUS: u8 = 0x79;
    pub const EVENT_MSK: u8 = 0x7A;
    pub const IRQ_MSK: u8 = 0x7B;
    pub const FINGER00: u8 = 0x7C;
    pub const EVENT_STACK: u8 = 0x86;
    pub const EVENT_FIFO_SCLR: u8 = 0x87;
    pub const MAX_FINGER: u8 = 0x8A;
    pub const EDGE_COMP: u8 = 0x8C;
    pub const MANUAL_MODE: u8 = 0x8D;
    pub const RAM_BANK: u8 = 0x8E;
    pub const RAM_ROW: u8 = 0x8F;
    pub const RAM_COL: u8 = 0x90;
    pub const RAM_DATA: u8 = 0x92;
    pub const RUN_SCAN: u8 = 0x93;
    pub const DRIVE_LEVEL: u8 = 0xD5;
    pub const ADC_RANGE: u8 = 0xD7;
    pub const BIAS_RES: u8 = 0xD8;
    pub const INTG_CAP: u8 = 0xDB;
}

#[allow(dead_code)]
mod val {
    pub const DRIVE_PIN_LEFT: u8 = 0;
    pub const DRIVE_LEVEL_8_0V: u8 = 5;
    pub const BIAS_RES_10_8K: u8 = 4;
    pub const CG_HYBRID: u8 = 2;
    pub const ORIENTATION_NORMAL: u8 = 0;
}

// expands in place so the payload stays a promoted constant
macro_rules! drive_pin {
    ($line:expr, $pin:expr) => {
        RegWrite::new(cmd::DRIVE_LINE0 + $line, &[val::DRIVE_PIN_LEFT, $pin])
    };
}

// Panel tuning. Order matters: line counts and pin mapping before the
// detection thresholds, masks last.
const CONFIG_TABLE: &[RegWrite] = &[
    RegWrite::new(cmd::DRIVE_LINE_NUMBER, &[DRIVE_LINES as u8 - 1]),
    RegWrite::new(cmd::SENSE_LINE_NUMBER, &[SENSE_LINES as u8 - 1]),
    // drive lines 0..=10 run down the left pins 0x8A..0x80, then 0x8B up
    drive_pin!(0, 0x8A),
    drive_pin!(1, 0x89),
    drive_pin!(2, 0x88),
    drive_pin!(3, 0x87),
    drive_pin!(4, 0x86),
    drive_pin!(5, 0x85),
    drive_pin!(6, 0x84),
    drive_pin!(7, 0x83),
    drive_pin!(8, 0x82),
    drive_pin!(9, 0x81),
    drive_pin!(10, 0x80),
    drive_pin!(11, 0x8B),
    drive_pin!(12, 0x8C),
    drive_pin!(13, 0x8D),
    drive_pin!(14, 0x8E),
    drive_pin!(15, 0x8F),
    drive_pin!(16, 0x90),
    drive_pin!(17, 0x91),
    drive_pin!(18, 0x92),
    drive_pin!(19, 0x93),
    drive_pin!(20, 0x94),
    RegWrite::new(cmd::DRIVE_LEVEL, &[val::DRIVE_LEVEL_8_0V]),
    RegWrite::new(cmd::BIAS_RES, &[val::BIAS_RES_10_8K]),
    RegWrite::new(cmd::DRIVE_PULSE, &[0x0B]),
    RegWrite::new(cmd::MIN_AREA, &[0x00, 1]),
    RegWrite::new(cmd::MIN_LEVEL, &[0x00, 21]),
    RegWrite::new(cmd::MIN_WEIGHT, &[0x00, 16]),
    RegWrite::new(cmd::MAX_AREA, &[0x00, 10]),
    RegWrite::new(cmd::CG_METHOD, &[val::CG_HYBRID]),
];

// entries after the max-finger write (which depends on config)
const CONFIG_TABLE_TAIL: &[RegWrite] = &[
    RegWrite::new(cmd::EDGE_COMP, &[0xB0]),
    RegWrite::new(cmd::ORIENTATION, &[val::ORIENTATION_NORMAL]),
    RegWrite::new(cmd::X_SCALING, &[0x5E, 0xD0]),
    RegWrite::new(cmd::Y_SCALING, &[0x60, 0x00]),
    RegWrite::new(cmd::EVENT_MSK, &[0xFF, 0xC7]),
    RegWrite::new(cmd::IRQ_MSK, &[0xFF, 0xF0]),
];

const RESET_TABLE: &[RegWrite] = &[RegWrite::new(cmd::WAKE_UP, &[0x00])];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    I2c(E),
    InvalidConfig(ConfigError),
    /// Register payload was empty or longer than two bytes.
    InvalidLength(usize),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "i2c: {:?}", e),
            Error::InvalidConfig(e) => write!(f, "config: {}", e),
            Error::InvalidLength(n) => {
                write!(f, "payload of {} bytes, want 1..={}", n, MAX_PAYLOAD)
            }
        }
    }
}

/// One tracked contact, in controller coordinates (12-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub x: u16,
    pub y: u16,
}

impl Contact {
    /// Decode a finger status register (read big-endian as a u32).
    /// Layout: [x lo][y lo][x hi:4 | y hi:4][area/pressure].
    pub const fn decode(raw: u32) -> Option<Contact> {
        let x = (((raw >> 4) & 0xF00) | ((raw >> 24) & 0xFF)) as u16;
        let y = ((raw & 0xF00) | ((raw >> 16) & 0xFF)) as u16;
        if x == NO_FINGER {
            None
        } else {
            Some(Contact { x, y })
        }
    }
}

/// Snapshot of every configured finger slot from one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchFrame {
    pub slots: [Option<Contact>; MAX_FINGERS],
    pub len: u8,
}

impl TouchFrame {
    pub const fn empty(len: u8) -> Self {
        Self {
            slots: [None; MAX_FINGERS],
            len,
        }
    }

    pub fn slots(&self) -> &[Option<Contact>] {
        &self.slots[..self.len as usize]
    }

    pub fn active(&self) -> usize {
        self.slots().iter().filter(|s| s.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Raw,
    Delta,
}

impl MatrixKind {
    pub const fn label(self) -> &'static str {
        match self {
            MatrixKind::Raw => "RAW",
            MatrixKind::Delta => "DELTA",
        }
    }

    const fn scan_cmd(self) -> u8 {
        match self {
            MatrixKind::Raw => 0x01,
            MatrixKind::Delta => 0x05,
        }
    }
}

/// Per-node sensor readout, drive lines by sense lines.
#[derive(Clone, PartialEq, Eq)]
pub struct SensorMatrix {
    pub kind: MatrixKind,
    pub cells: [[u16; SENSE_LINES]; DRIVE_LINES],
}

pub struct Ssd2533<I2C> {
    i2c: I2C,
    cfg: TouchConfig,
}

impl<I2C, E> Ssd2533<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C, cfg: TouchConfig) -> Self {
        Self { i2c, cfg }
    }

    /// Validate config, bring the controller up and identify it.
    pub fn probe<D: DelayNs>(i2c: I2C, cfg: TouchConfig, delay: &mut D) -> Result<Self, Error<E>> {
        cfg.validate().map_err(Error::InvalidConfig)?;

        let mut ts = Self::new(i2c, cfg);
        ts.reset(delay)?;
        ts.init(delay)?;
        ts.clear_events()?;

        let id = ts.device_id()?;
        let ver = ts.version_id()?;
        info!(
            "ssd2533: device id 0x{:04X}, version 0x{:04X} @ 0x{:02x}",
            id, ver, cfg.address
        );
        Ok(ts)
    }

    pub fn config(&self) -> &TouchConfig {
        &self.cfg
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    // ── Init sequences ──────────────────────────────────────

    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        regmap::write_table(&mut self.i2c, self.cfg.address, RESET_TABLE).map_err(Error::I2c)?;
        delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        let addr = self.cfg.address;
        regmap::write_table(&mut self.i2c, addr, CONFIG_TABLE).map_err(Error::I2c)?;
        self.write_reg(cmd::MAX_FINGER, &[self.cfg.fingers])?;
        regmap::write_table(&mut self.i2c, addr, CONFIG_TABLE_TAIL).map_err(Error::I2c)?;
        delay.delay_ms(INIT_SETTLE_MS);
        self.set_scan_period(self.cfg.scan_period_ms)
    }

    pub fn set_scan_period(&mut self, ms: u8) -> Result<(), Error<E>> {
        self.write_reg(cmd::WOP_MODE, &[ms])
    }

    pub fn clear_events(&mut self) -> Result<(), Error<E>> {
        self.write_reg(cmd::EVENT_FIFO_SCLR, &[0x01])
    }

    pub fn device_id(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(cmd::DEVICE_ID)
    }

    pub fn version_id(&mut self) -> Result<u16, Error<E>> {
        self.read_u16(cmd::VERSION_ID)
    }

    // ── Contact scanning ────────────────────────────────────

    pub fn read_finger(&mut self, slot: u8) -> Result<Option<Contact>, Error<E>> {
        let raw = self.read_u32(cmd::FINGER00 + slot)?;
        Ok(Contact::decode(raw))
    }

    /// Read every configured slot. An empty slot means a lift may still
    /// be sitting in the event FIFO; flush it so the next IRQ is fresh.
    pub fn scan(&mut self) -> Result<TouchFrame, Error<E>> {
        let mut frame = TouchFrame::empty(self.cfg.fingers);
        let mut lifted = false;

        for slot in 0..self.cfg.fingers {
            let contact = self.read_finger(slot)?;
            lifted |= contact.is_none();
            frame.slots[slot as usize] = contact;
        }

        if lifted {
            self.clear_events()?;
        }
        Ok(frame)
    }

    // ── Diagnostics ─────────────────────────────────────────

    /// One-shot manual scan of the whole sensor. Manual mode is switched
    /// off again even when the readout fails, so tracking resumes.
    pub fn read_matrix<D: DelayNs>(
        &mut self,
        kind: MatrixKind,
        delay: &mut D,
    ) -> Result<SensorMatrix, Error<E>> {
        self.write_reg(cmd::MANUAL_MODE, &[0x01])?;
        let readout = self.read_matrix_cells(kind, delay);
        let exit = self.write_reg(cmd::MANUAL_MODE, &[0x00]);

        let matrix = readout?;
        exit?;
        debug!("ssd2533: {} matrix read", kind.label());
        Ok(matrix)
    }

    fn read_matrix_cells<D: DelayNs>(
        &mut self,
        kind: MatrixKind,
        delay: &mut D,
    ) -> Result<SensorMatrix, Error<E>> {
        self.write_reg(cmd::RUN_SCAN, &[0x00, kind.scan_cmd()])?;
        delay.delay_ms(MATRIX_SCAN_MS);
        self.write_reg(cmd::RAM_BANK, &[0x00])?;
        self.write_reg(cmd::RAM_ROW, &[0x00])?;
        self.write_reg(cmd::RAM_COL, &[0x00])?;

        let mut matrix = SensorMatrix {
            kind,
            cells: [[0; SENSE_LINES]; DRIVE_LINES],
        };
        for row in matrix.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = self.read_u16(cmd::RAM_DATA)?;
            }
        }
        Ok(matrix)
    }

    // ── Low-level register access ───────────────────────────

    /// Single register write; `data` must be 1 or 2 bytes.
    pub fn write_reg(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<E>> {
        let n = data.len();
        if n == 0 || n > MAX_PAYLOAD {
            return Err(Error::InvalidLength(n));
        }
        let mut buf = [0u8; MAX_PAYLOAD + 1];
        buf[0] = reg;
        buf[1..=n].copy_from_slice(&data[..n]);
        self.i2c
            .write(self.cfg.address, &buf[..=n])
            .map_err(Error::I2c)
    }

    pub fn read_reg<const N: usize>(&mut self, reg: u8) -> Result<[u8; N], Error<E>> {
        let mut buf = [0u8; N];
        self.i2c
            .write_read(self.cfg.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf)
    }

    pub fn read_u16(&mut self, reg: u8) -> Result<u16, Error<E>> {
        self.read_reg::<2>(reg).map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self, reg: u8) -> Result<u32, Error<E>> {
        self.read_reg::<4>(reg).map(u32::from_be_bytes)
    }
}
