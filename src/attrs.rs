// Debug attributes: small text show/store endpoints for poking the chips
// from a console. Each show formats into any `fmt::Write`; each store
// parses one command line.
//
//   RAWdata / DELTAdata  (touch, read-only)  sensor matrix dump
//   reg                  (decoder)           "all" | "<reg>" | "<reg> <val>", hex
//   input                (decoder)           "0" composite 0, "1" composite 1

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::drivers::ssd2533::{self, DRIVE_LINES, MatrixKind, SENSE_LINES, SensorMatrix, Ssd2533};
use crate::drivers::tvp5150::regs::{Route, RouteInput};
use crate::drivers::tvp5150::{self, LogLines, Tvp5150};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrError<E> {
    Device(E),
    /// Command did not parse.
    Invalid,
    Fmt,
}

impl<E> From<fmt::Error> for AttrError<E> {
    fn from(_: fmt::Error) -> Self {
        AttrError::Fmt
    }
}

impl<E: fmt::Display> fmt::Display for AttrError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrError::Device(e) => write!(f, "{}", e),
            AttrError::Invalid => write!(f, "invalid argument"),
            AttrError::Fmt => write!(f, "output buffer full"),
        }
    }
}

// ── Touch matrix ────────────────────────────────────────────────

pub const RAW_DATA: &str = "RAWdata";
pub const DELTA_DATA: &str = "DELTAdata";

pub fn matrix_kind(attr: &str) -> Option<MatrixKind> {
    match attr {
        RAW_DATA => Some(MatrixKind::Raw),
        DELTA_DATA => Some(MatrixKind::Delta),
        _ => None,
    }
}

pub fn show_matrix<I2C, E, D, W>(
    ts: &mut Ssd2533<I2C>,
    kind: MatrixKind,
    delay: &mut D,
    out: &mut W,
) -> Result<(), AttrError<ssd2533::Error<E>>>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    W: Write,
{
    let matrix = ts.read_matrix(kind, delay).map_err(AttrError::Device)?;
    write_matrix(&matrix, out)?;
    Ok(())
}

pub fn write_matrix<W: Write>(m: &SensorMatrix, out: &mut W) -> fmt::Result {
    writeln!(
        out,
        "SSD2533 {} Data {}x{} (DRVxSEN):",
        m.kind.label(),
        DRIVE_LINES,
        SENSE_LINES
    )?;
    for row in m.cells.iter() {
        out.write_str("      ")?;
        for cell in row {
            write!(out, "{:04X} ", cell)?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

// ── Decoder registers ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegCommand {
    /// Dump every register to the log.
    All,
    Select(u8),
    Write(u8, u8),
}

fn parse_hex(s: &str) -> Option<u8> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(digits, 16).ok()
}

impl RegCommand {
    pub fn parse(input: &str) -> Option<RegCommand> {
        if input.starts_with("all") {
            return Some(RegCommand::All);
        }
        let mut words = input.split_whitespace();
        let reg = parse_hex(words.next()?)?;
        match words.next() {
            None => Some(RegCommand::Select(reg)),
            Some(v) => Some(RegCommand::Write(reg, parse_hex(v)?)),
        }
    }
}

pub struct RegAttr;

impl RegAttr {
    pub const NAME: &'static str = "reg";

    /// `0xRR=0xVV` for the selected register, read live.
    pub fn show<I2C, E, W>(
        dec: &mut Tvp5150<I2C>,
        out: &mut W,
    ) -> Result<(), AttrError<tvp5150::Error<E>>>
    where
        I2C: I2c<Error = E>,
        W: Write,
    {
        let reg = dec.debug_reg();
        let val = dec.read(reg).map_err(AttrError::Device)?;
        writeln!(out, "0x{:02x}=0x{:02x}", reg, val)?;
        Ok(())
    }

    pub fn store<I2C, E>(
        dec: &mut Tvp5150<I2C>,
        input: &str,
    ) -> Result<RegCommand, AttrError<tvp5150::Error<E>>>
    where
        I2C: I2c<Error = E>,
    {
        let cmd = RegCommand::parse(input).ok_or(AttrError::Invalid)?;
        match cmd {
            RegCommand::All => {
                let mut log = LogLines::new();
                dec.write_status(&mut log).map_err(AttrError::Device)?;
            }
            RegCommand::Select(reg) => dec.select_debug_reg(reg),
            RegCommand::Write(reg, val) => {
                dec.select_debug_reg(reg);
                dec.write(reg, val).map_err(AttrError::Device)?;
            }
        }
        Ok(cmd)
    }
}

// ── Decoder input ───────────────────────────────────────────────

pub struct InputAttr;

impl InputAttr {
    pub const NAME: &'static str = "input";

    pub fn show<I2C, E, W>(dec: &Tvp5150<I2C>, out: &mut W) -> Result<(), AttrError<tvp5150::Error<E>>>
    where
        I2C: I2c<Error = E>,
        W: Write,
    {
        writeln!(out, "{}", dec.route().input.raw())?;
        Ok(())
    }

    /// Only the first character counts.
    pub fn store<I2C, E>(dec: &mut Tvp5150<I2C>, input: &str) -> Result<(), AttrError<tvp5150::Error<E>>>
    where
        I2C: I2c<Error = E>,
    {
        let route = match input.as_bytes().first() {
            Some(b'0') => Route::composite(RouteInput::Composite0),
            Some(b'1') => Route::composite(RouteInput::Composite1),
            _ => return Err(AttrError::Invalid),
        };
        dec.set_route(route).map_err(AttrError::Device)
    }
}

#[cfg(test)]
mod tests {
    use std::string::String;

    use super::*;
    use crate::config::{DecoderConfig, TouchConfig};
    use crate::drivers::regmap::fake::{FakeBus, NoDelay};
    use crate::drivers::ssd2533::cmd;
    use crate::drivers::tvp5150::regs;

    #[test]
    fn matrix_dump_layout() {
        let mut bus = FakeBus::new(0x48);
        let data: std::vec::Vec<u8> = (0..(DRIVE_LINES * SENSE_LINES) as u16)
            .flat_map(|v| (v + 0xA0).to_be_bytes())
            .collect();
        bus.push_stream(cmd::RAM_DATA, &data);
        let mut ts = Ssd2533::new(bus, TouchConfig::new());

        let mut out = String::new();
        show_matrix(&mut ts, MatrixKind::Raw, &mut NoDelay, &mut out).unwrap();

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("SSD2533 RAW Data 21x28 (DRVxSEN):"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("      00A0 00A1 00A2 "));
        assert_eq!(first.len(), 6 + SENSE_LINES * 5);
        assert_eq!(lines.count(), DRIVE_LINES - 1);
        assert!(out.ends_with("02EB \n"));
    }

    #[test]
    fn attribute_names_select_matrix_kind() {
        assert_eq!(matrix_kind("RAWdata"), Some(MatrixKind::Raw));
        assert_eq!(matrix_kind("DELTAdata"), Some(MatrixKind::Delta));
        assert_eq!(matrix_kind("reg"), None);
    }

    #[test]
    fn reg_commands_parse_like_scanf_hex() {
        assert_eq!(RegCommand::parse("all\n"), Some(RegCommand::All));
        assert_eq!(RegCommand::parse("28\n"), Some(RegCommand::Select(0x28)));
        assert_eq!(RegCommand::parse("0x09 7f"), Some(RegCommand::Write(0x09, 0x7f)));
        assert_eq!(RegCommand::parse(""), None);
        assert_eq!(RegCommand::parse("zz"), None);
        assert_eq!(RegCommand::parse("09 zz"), None);
        assert_eq!(RegCommand::parse("100"), None);
    }

    #[test]
    fn reg_attr_selects_writes_and_shows() {
        let mut bus = FakeBus::new(0x5C);
        bus.set(regs::BRIGHT_CTL, &[0x80]);
        let mut dec = Tvp5150::new(bus, DecoderConfig::new());

        RegAttr::store(&mut dec, "9").unwrap();
        let mut out = String::new();
        RegAttr::show(&mut dec, &mut out).unwrap();
        assert_eq!(out, "0x09=0x80\n");

        RegAttr::store(&mut dec, "0c 40").unwrap();
        out.clear();
        RegAttr::show(&mut dec, &mut out).unwrap();
        assert_eq!(out, "0x0c=0x40\n");

        assert_eq!(RegAttr::store(&mut dec, "nope"), Err(AttrError::Invalid));
        assert_eq!(RegAttr::store(&mut dec, "all"), Ok(RegCommand::All));
    }

    #[test]
    fn input_attr_switches_composite_inputs() {
        let mut dec = Tvp5150::new(FakeBus::new(0x5C), DecoderConfig::new());

        InputAttr::store(&mut dec, "1\n").unwrap();
        assert_eq!(dec.route().input, RouteInput::Composite1);
        assert!(dec.bus_mut().wrote(&[regs::VD_IN_SRC_SEL_1, 0x02]));

        let mut out = String::new();
        InputAttr::show(&dec, &mut out).unwrap();
        assert_eq!(out, "1\n");

        InputAttr::store(&mut dec, "0").unwrap();
        assert_eq!(dec.route().input, RouteInput::Composite0);
        assert_eq!(InputAttr::store(&mut dec, "2"), Err(AttrError::Invalid));
        assert_eq!(InputAttr::store(&mut dec, ""), Err(AttrError::Invalid));
    }
}
