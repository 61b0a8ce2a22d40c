// Human-readable register report, one named register (or range) per line.
// Used by the "reg" debug attribute ("all") and after probe at debug > 1.

use core::fmt::{self, Write};

use embedded_hal::i2c::I2c;
use log::info;

use super::regs::*;
use super::{Error, Tvp5150};

enum Line {
    /// `label = 0xNN`
    Reg(&'static str, u8),
    /// `label = 0xHHLL`
    Wide(&'static str, u8, u8),
    /// `label = NN NN ..`
    List(&'static str, &'static [u8]),
    /// `label reg 0xSS = NN NN ..`, wrapped every `per_line` values
    Range(&'static str, u8, u8, usize),
    ChromaGain,
    Bt656Timing,
    DeviceId,
    RomVersion,
}

const REPORT: &[Line] = &[
    Line::Reg("Video input source selection #1", VD_IN_SRC_SEL_1),
    Line::Reg("Analog channel controls", ANAL_CHL_CTL),
    Line::Reg("Operation mode controls", OP_MODE_CTL),
    Line::Reg("Miscellaneous controls", MISC_CTL),
    Line::Reg("Autoswitch mask", AUTOSW_MSK),
    Line::Reg("Color killer threshold control", COLOR_KIL_THSH_CTL),
    Line::List(
        "Luminance processing controls #1 #2 and #3",
        &[LUMA_PROC_CTL_1, LUMA_PROC_CTL_2, LUMA_PROC_CTL_3],
    ),
    Line::Reg("Brightness control", BRIGHT_CTL),
    Line::Reg("Color saturation control", SATURATION_CTL),
    Line::Reg("Hue control", HUE_CTL),
    Line::Reg("Contrast control", CONTRAST_CTL),
    Line::Reg("Outputs and data rates select", DATA_RATE_SEL),
    Line::Reg("Configuration shared pins", CONF_SHARED_PIN),
    Line::Wide("Active video cropping start", ACT_VD_CROP_ST_MSB, ACT_VD_CROP_ST_LSB),
    Line::Wide("Active video cropping stop ", ACT_VD_CROP_STP_MSB, ACT_VD_CROP_STP_LSB),
    Line::Reg("Genlock/RTC", GENLOCK),
    Line::Reg("Horizontal sync start", HORIZ_SYNC_START),
    Line::Reg("Vertical blanking start", VERT_BLANKING_START),
    Line::Reg("Vertical blanking stop", VERT_BLANKING_STOP),
    Line::List(
        "Chrominance processing control #1 and #2",
        &[CHROMA_PROC_CTL_1, CHROMA_PROC_CTL_2],
    ),
    Line::Reg("Interrupt reset register B", INT_RESET_REG_B),
    Line::Reg("Interrupt enable register B", INT_ENABLE_REG_B),
    Line::Reg("Interrupt configuration register B", INTT_CONFIG_REG_B),
    Line::Reg("Video standard", VIDEO_STD),
    Line::ChromaGain,
    Line::Reg("Macrovision on counter", MACROVISION_ON_CTR),
    Line::Reg("Macrovision off counter", MACROVISION_OFF_CTR),
    Line::Bt656Timing,
    Line::DeviceId,
    Line::RomVersion,
    Line::Wide("Vertical line count", VERT_LN_COUNT_MSB, VERT_LN_COUNT_LSB),
    Line::Reg("Interrupt status register B", INT_STATUS_REG_B),
    Line::Reg("Interrupt active register B", INT_ACTIVE_REG_B),
    Line::List(
        "Status regs #1 to #5",
        &[STATUS_REG_1, STATUS_REG_2, STATUS_REG_3, STATUS_REG_4, STATUS_REG_5],
    ),
    Line::Range("Teletext filter 1", TELETEXT_FIL1_INI, TELETEXT_FIL1_END, 8),
    Line::Range("Teletext filter 2", TELETEXT_FIL2_INI, TELETEXT_FIL2_END, 8),
    Line::Reg("Teletext filter enable", TELETEXT_FIL_ENA),
    Line::Reg("Interrupt status register A", INT_STATUS_REG_A),
    Line::Reg("Interrupt enable register A", INT_ENABLE_REG_A),
    Line::Reg("Interrupt configuration", INT_CONF),
    Line::Reg("VDP status register", VDP_STATUS_REG),
    Line::Reg("FIFO word count", FIFO_WORD_COUNT),
    Line::Reg("FIFO interrupt threshold", FIFO_INT_THRESHOLD),
    Line::Reg("FIFO reset", FIFO_RESET),
    Line::Reg("Line number interrupt", LINE_NUMBER_INT),
    Line::Wide("Pixel alignment register", PIX_ALIGN_REG_HIGH, PIX_ALIGN_REG_LOW),
    Line::Reg("FIFO output control", FIFO_OUT_CTRL),
    Line::Reg("Full field enable", FULL_FIELD_ENA),
    Line::Reg("Full field mode register", FULL_FIELD_MODE_REG),
    Line::Range("CC   data", CC_DATA_INI, CC_DATA_END, 8),
    Line::Range("WSS  data", WSS_DATA_INI, WSS_DATA_END, 8),
    Line::Range("VPS  data", VPS_DATA_INI, VPS_DATA_END, 8),
    Line::Range("VITC data", VITC_DATA_INI, VITC_DATA_END, 10),
    Line::Range("Line mode", LINE_MODE_INI, LINE_MODE_END, 8),
];

impl<I2C, E> Tvp5150<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Read back every documented register and format it into `out`.
    pub fn write_status<W: Write>(&mut self, out: &mut W) -> Result<(), Error<E>> {
        for line in REPORT {
            self.write_line(line, out)?;
        }
        Ok(())
    }

    fn write_line<W: Write>(&mut self, line: &Line, out: &mut W) -> Result<(), Error<E>> {
        match *line {
            Line::Reg(label, reg) => {
                let v = self.read(reg)?;
                writeln!(out, "{} = 0x{:02x}", label, v)?;
            }
            Line::Wide(label, hi, lo) => {
                let (h, l) = (self.read(hi)?, self.read(lo)?);
                writeln!(out, "{} = 0x{:02x}{:02x}", label, h, l)?;
            }
            Line::List(label, regs) => {
                write!(out, "{} =", label)?;
                for &reg in regs {
                    let v = self.read(reg)?;
                    write!(out, " {:02x}", v)?;
                }
                writeln!(out)?;
            }
            Line::Range(label, first, last, per_line) => {
                for (i, reg) in (first..=last).enumerate() {
                    if i % per_line == 0 {
                        if i > 0 {
                            writeln!(out)?;
                        }
                        write!(out, "{} reg 0x{:02x} =", label, reg)?;
                    }
                    let v = self.read(reg)?;
                    write!(out, " {:02x}", v)?;
                }
                writeln!(out)?;
            }
            Line::ChromaGain => {
                let (cb, cr) = (self.read(CB_GAIN_FACT)?, self.read(CR_GAIN_FACTOR)?);
                writeln!(out, "Chroma gain factor: Cb=0x{:02x} Cr=0x{:02x}", cb, cr)?;
            }
            Line::Bt656Timing => {
                let rev = if self.read(REV_SELECT)? & 1 != 0 { 3 } else { 4 };
                writeln!(out, "ITU-R BT.656.{} timing (TVP5150AM1 only)", rev)?;
            }
            Line::DeviceId => {
                let (h, l) = (self.read(MSB_DEV_ID)?, self.read(LSB_DEV_ID)?);
                writeln!(out, "Device ID = {:02x}{:02x}", h, l)?;
            }
            Line::RomVersion => {
                let (maj, min) = (self.read(ROM_MAJOR_VER)?, self.read(ROM_MINOR_VER)?);
                writeln!(out, "ROM version = (hex) {:02x}.{:02x}", maj, min)?;
            }
        }
        Ok(())
    }
}

/// `fmt::Write` sink that emits each completed line through `info!`.
/// Lines longer than the buffer are split.
pub struct LogLines {
    buf: [u8; 96],
    len: usize,
}

impl LogLines {
    pub const fn new() -> Self {
        Self {
            buf: [0; 96],
            len: 0,
        }
    }

    fn flush(&mut self) {
        if self.len > 0 {
            let line = core::str::from_utf8(&self.buf[..self.len]).unwrap_or("<non-utf8>");
            info!("tvp5150: {}", line);
            self.len = 0;
        }
    }
}

impl Default for LogLines {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for LogLines {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &b in s.as_bytes() {
            if b == b'\n' {
                self.flush();
                continue;
            }
            if self.len == self.buf.len() {
                self.flush();
            }
            self.buf[self.len] = b;
            self.len += 1;
        }
        Ok(())
    }
}

impl Drop for LogLines {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecoderConfig;
    use crate::drivers::regmap::fake::FakeBus;

    fn decoder() -> Tvp5150<FakeBus> {
        let mut bus = FakeBus::new(0x5C);
        bus.set(MSB_DEV_ID, &[0x51, 0x50, 0x04, 0x00]);
        bus.set(BRIGHT_CTL, &[0x80]);
        bus.set(CB_GAIN_FACT, &[0x12, 0x34]);
        bus.set(REV_SELECT, &[0x00]);
        bus.set(CC_DATA_INI, &[1, 2, 3, 4]);
        Tvp5150::new(bus, DecoderConfig::new())
    }

    #[test]
    fn report_names_registers_and_ranges() {
        let mut dec = decoder();
        let mut out = std::string::String::new();
        dec.write_status(&mut out).unwrap();

        assert!(out.starts_with("Video input source selection #1 = 0x00\n"));
        assert!(out.contains("Brightness control = 0x80\n"));
        assert!(out.contains("Chroma gain factor: Cb=0x12 Cr=0x34\n"));
        assert!(out.contains("ITU-R BT.656.4 timing"));
        assert!(out.contains("Device ID = 5150\n"));
        assert!(out.contains("ROM version = (hex) 04.00\n"));
        assert!(out.contains("CC   data reg 0x90 = 01 02 03 04\n"));
        // 44 line-mode registers at 8 per line -> 6 rows
        assert_eq!(out.matches("Line mode reg 0x").count(), 6);
        assert!(out.contains("Line mode reg 0xf8 = 00 00 00 00\n"));
        // VITC wraps at 10: 9 registers fit on one row
        assert_eq!(out.matches("VITC data reg").count(), 1);
    }

    #[test]
    fn bus_error_aborts_the_report() {
        let mut dec = decoder();
        dec.bus_mut().fail_after = Some(3);
        let mut out = std::string::String::new();

        assert!(matches!(dec.write_status(&mut out), Err(Error::I2c(_))));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn log_lines_splits_on_newline_and_overflow() {
        let mut log = LogLines::new();
        writeln!(log, "short").unwrap();
        assert_eq!(log.len, 0);
        for _ in 0..100 {
            log.write_char('x').unwrap();
        }
        assert_eq!(log.len, 4);
    }
}
