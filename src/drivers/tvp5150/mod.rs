// TVP5150 analog video decoder (board-independent)
// Covers TVP5150A, TVP5150AM1 and TVP5151. The chip autodetects the
// incoming standard; the driver reads the result back from STATUS_REG_5
// whenever a format or frame period is asked for, so a cable swap is
// picked up without any explicit re-probe.
//
// Output is fixed: 8-bit BT.656 with embedded syncs, UYVY 4:2:2,
// 27 MHz pixel clock from the decoder's own crystal.

pub mod regs;
pub mod standard;
pub mod status;

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use self::regs::{Route, RouteInput, RouteOutput};
use self::standard::{H_MAX, STANDARDS, Standard, StdEntry, V_MAX_525_60};
use super::regmap;
use crate::config::DecoderConfig;
use crate::video::{
    Bt656Mode, Bt656Parm, BufType, CaptureParm, CaptureSlave, ChipIdent, ChipMatch, Colorspace,
    ControlId, CtrlType, Field, FmtDesc, Format, FourCc, Fract, FrameInterval, FrameSize, IfParm,
    PixFormat, QueryCtrl, Routing, StdId, StreamParm,
};

pub use self::status::LogLines;

pub const IDENT_TVP5150: u32 = 5150;
pub const CHIP_NAME: &str = "adv_tvp5150_decoder";
pub const PIXEL_CLOCK_HZ: u32 = 27_000_000;

const PROBE_SETTLE_MS: u32 = 1;

pub const FORMATS: &[FmtDesc] = &[FmtDesc {
    index: 0,
    buf_type: BufType::VideoCapture,
    flags: 0,
    description: "8-bit UYVY 4:2:2 Format",
    pixelformat: FourCc::UYVY,
}];

pub const CONTROLS: &[QueryCtrl] = &[
    QueryCtrl {
        id: ControlId::Brightness,
        ctrl_type: CtrlType::Integer,
        name: "Brightness",
        minimum: 0,
        maximum: 255,
        step: 1,
        default_value: 128,
        flags: 0,
    },
    QueryCtrl {
        id: ControlId::Contrast,
        ctrl_type: CtrlType::Integer,
        name: "Contrast",
        minimum: 0,
        maximum: 255,
        step: 1,
        default_value: 128,
        flags: 0,
    },
    QueryCtrl {
        id: ControlId::Saturation,
        ctrl_type: CtrlType::Integer,
        name: "Saturation",
        minimum: 0,
        maximum: 255,
        step: 1,
        default_value: 128,
        flags: 0,
    },
    QueryCtrl {
        id: ControlId::Hue,
        ctrl_type: CtrlType::Integer,
        name: "Hue",
        minimum: -128,
        maximum: 127,
        step: 1,
        default_value: 0,
        flags: 0,
    },
];

const fn control_reg(id: ControlId) -> u8 {
    match id {
        ControlId::Brightness => regs::BRIGHT_CTL,
        ControlId::Contrast => regs::CONTRAST_CTL,
        ControlId::Saturation => regs::SATURATION_CTL,
        ControlId::Hue => regs::HUE_CTL,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    I2c(E),
    /// Unsupported index, buffer type, control, standard or value.
    Invalid,
    /// Autoswitch has not locked to any known standard.
    NoSignal,
    Fmt,
}

impl<E> From<fmt::Error> for Error<E> {
    fn from(_: fmt::Error) -> Self {
        Error::Fmt
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "i2c: {:?}", e),
            Error::Invalid => write!(f, "invalid argument"),
            Error::NoSignal => write!(f, "no video standard detected"),
            Error::Fmt => write!(f, "format error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Tvp5150a,
    Tvp5150am1,
    Tvp5151,
    Unknown,
}

impl Chip {
    pub const fn identify(dev_id: u16, rom_ver: u16) -> Chip {
        match (dev_id, rom_ver) {
            (0x5150, 0x0321) => Chip::Tvp5150a,
            (0x5150, 0x0400) => Chip::Tvp5150am1,
            (0x5151, 0x0100) => Chip::Tvp5151,
            _ => Chip::Unknown,
        }
    }
}

const fn default_pix() -> PixFormat {
    PixFormat {
        width: H_MAX,
        height: V_MAX_525_60,
        pixelformat: FourCc::UYVY,
        field: Field::Interlaced,
        bytesperline: H_MAX * 2,
        sizeimage: H_MAX * 2 * V_MAX_525_60,
        colorspace: Colorspace::Smpte170m,
        priv_: 1,
    }
}

pub struct Tvp5150<I2C> {
    i2c: I2C,
    cfg: DecoderConfig,
    dev_id: u16,
    rom_ver: u16,
    std_id: StdId,
    current: Option<Standard>,
    route: Route,
    enabled: bool,
    powered: bool,
    pix: PixFormat,
    debug_reg: u8,
}

impl<I2C, E> Tvp5150<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Wrap the bus without touching the chip.
    pub fn new(i2c: I2C, cfg: DecoderConfig) -> Self {
        Self {
            i2c,
            route: cfg.route,
            cfg,
            dev_id: 0,
            rom_ver: 0,
            std_id: StdId::ALL,
            current: Some(Standard::NtscMj),
            enabled: true,
            powered: true,
            pix: default_pix(),
            debug_reg: 0,
        }
    }

    /// Identify the chip, program defaults and select the configured input.
    /// Power/reset GPIO sequencing is the board's job and must be done first.
    pub fn probe<D: DelayNs>(i2c: I2C, cfg: DecoderConfig, delay: &mut D) -> Result<Self, Error<E>> {
        delay.delay_ms(PROBE_SETTLE_MS);

        let mut dec = Self::new(i2c, cfg);
        let chip = dec.detect_version()?;
        dec.std_id = StdId::ALL;
        dec.enabled = true;
        dec.reset()?;

        if cfg.debug > 1 {
            let mut log = LogLines::new();
            dec.write_status(&mut log)?;
        }
        debug!("tvp5150: probed {:?}", chip);
        Ok(dec)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    // ── Register access ─────────────────────────────────────

    pub fn read(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.cfg.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        debug!("tvp5150: read 0x{:02x} = 0x{:02x}", reg, buf[0]);
        Ok(buf[0])
    }

    pub fn write(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        debug!("tvp5150: writing 0x{:02x} 0x{:02x}", reg, value);
        self.i2c
            .write(self.cfg.address, &[reg, value])
            .map_err(Error::I2c)
    }

    // ── Chip setup ──────────────────────────────────────────

    fn detect_version(&mut self) -> Result<Chip, Error<E>> {
        let mut id = [0u8; 4];
        for (i, b) in id.iter_mut().enumerate() {
            *b = self.read(regs::MSB_DEV_ID + i as u8)?;
        }
        self.dev_id = u16::from_be_bytes([id[0], id[1]]);
        self.rom_ver = u16::from_be_bytes([id[2], id[3]]);

        info!(
            "tvp5150: tvp{:04x} ({}.{}) chip found @ 0x{:02x}",
            self.dev_id, id[2], id[3], self.cfg.address
        );

        let chip = Chip::identify(self.dev_id, self.rom_ver);
        match chip {
            Chip::Tvp5150a => info!("tvp5150: tvp5150a detected"),
            Chip::Tvp5150am1 => {
                info!("tvp5150: tvp5150am1 detected");
                // ITU-R BT.656.4 timing
                self.write(regs::REV_SELECT, 0)?;
            }
            Chip::Tvp5151 => info!("tvp5150: tvp5151 detected"),
            Chip::Unknown => info!("tvp5150: unknown tvp{:04x} chip detected", self.dev_id),
        }
        Ok(chip)
    }

    /// Defaults, input selection, then the streaming setup.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        let addr = self.cfg.address;
        regmap::write_table(&mut self.i2c, addr, regs::INIT_DEFAULT).map_err(Error::I2c)?;
        self.select_mux()?;
        regmap::write_table(&mut self.i2c, addr, regs::INIT_ENABLE).map_err(Error::I2c)
    }

    pub fn select_mux(&mut self) -> Result<(), Error<E>> {
        let opmode = 0;
        let mut input = 0;
        if self.route.output == RouteOutput::BlackScreen || !self.enabled {
            input = regs::SRC_BLACK;
        }
        match self.route.input {
            RouteInput::Composite1 => input |= regs::SRC_AIP1B,
            RouteInput::Composite0 => {}
            RouteInput::SVideo => input |= regs::SRC_SVIDEO,
        }

        debug!(
            "tvp5150: route input={} output={} => input=0x{:02x} opmode={}",
            self.route.input.raw(),
            self.route.output.raw(),
            input,
            opmode
        );
        self.write(regs::OP_MODE_CTL, opmode)?;
        self.write(regs::VD_IN_SRC_SEL_1, input)?;

        // S-Video drives YCbCr out and parks GPCL; composite the reverse
        let misc = self.read(regs::MISC_CTL)?;
        let misc = if self.route.input == RouteInput::SVideo {
            (misc & !regs::MISC_GPCL_OE) | regs::MISC_YCBCR_OE
        } else {
            (misc & !regs::MISC_YCBCR_OE) | regs::MISC_GPCL_OE
        };
        self.write(regs::MISC_CTL, misc)
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn set_route(&mut self, route: Route) -> Result<(), Error<E>> {
        self.route = route;
        self.select_mux()
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.enabled = enabled;
        self.select_mux()
    }

    // ── Standard detection ──────────────────────────────────

    pub fn current_std(&mut self) -> Result<Option<Standard>, Error<E>> {
        let status = self.read(regs::STATUS_REG_5)?;
        Ok(Standard::from_status(status))
    }

    /// Read the locked standard and remember it; no lock is `NoSignal`.
    fn detect(&mut self) -> Result<&'static StdEntry, Error<E>> {
        let std = self.current_std()?.ok_or(Error::NoSignal)?;
        self.current = Some(std);
        Ok(std.entry())
    }

    pub fn standard(&self) -> Option<Standard> {
        self.current
    }

    pub fn std_id(&self) -> StdId {
        self.std_id
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn dev_id(&self) -> u16 {
        self.dev_id
    }

    pub fn rom_ver(&self) -> u16 {
        self.rom_ver
    }

    pub fn chip(&self) -> Chip {
        Chip::identify(self.dev_id, self.rom_ver)
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.cfg
    }

    pub fn debug_reg(&self) -> u8 {
        self.debug_reg
    }

    pub fn select_debug_reg(&mut self, reg: u8) {
        self.debug_reg = reg;
    }

    fn check_capture(buf_type: BufType) -> Result<(), Error<E>> {
        if buf_type == BufType::VideoCapture {
            Ok(())
        } else {
            Err(Error::Invalid)
        }
    }

    fn control(id: u32) -> Result<&'static QueryCtrl, Error<E>> {
        let id = ControlId::from_raw(id).ok_or(Error::Invalid)?;
        CONTROLS.iter().find(|c| c.id == id).ok_or(Error::Invalid)
    }
}

impl<I2C, E> CaptureSlave for Tvp5150<I2C>
where
    I2C: I2c<Error = E>,
{
    type Error = Error<E>;

    fn dev_init(&mut self) -> Result<(), Error<E>> {
        debug!("tvp5150: dev_init");
        Ok(())
    }

    fn init(&mut self) -> Result<(), Error<E>> {
        debug!("tvp5150: init");
        Ok(())
    }

    fn s_power(&mut self, on: bool) -> Result<(), Error<E>> {
        debug!("tvp5150: s_power {}", on);
        self.powered = on;
        Ok(())
    }

    fn g_ifparm(&mut self) -> Result<IfParm, Error<E>> {
        Ok(IfParm::Bt656(Bt656Parm {
            mode: Bt656Mode::Bt8Bit,
            frame_start_on_rising_vs: false,
            bt_sync_correct: true,
            swap: false,
            latch_clk_inv: false,
            nobt_hs_inv: true,
            nobt_vs_inv: false,
            interlace: true,
            clock_min: 0,
            clock_max: 0,
            clock_curr: PIXEL_CLOCK_HZ,
        }))
    }

    fn enum_fmt_cap(&mut self, index: u32, buf_type: BufType) -> Result<FmtDesc, Error<E>> {
        let desc = FORMATS.get(index as usize).ok_or(Error::Invalid)?;
        Self::check_capture(buf_type)?;
        debug!("tvp5150: enum fmt {} ({})", desc.index, desc.description);
        Ok(*desc)
    }

    fn try_fmt_cap(&mut self, fmt: &mut Format) -> Result<(), Error<E>> {
        fmt.buf_type = BufType::VideoCapture;
        let entry = self.detect()?;

        let pix = &mut fmt.pix;
        pix.width = entry.width;
        pix.height = entry.height;
        let desc = FORMATS
            .iter()
            .find(|d| d.pixelformat == pix.pixelformat)
            .unwrap_or(&FORMATS[0]);
        pix.pixelformat = desc.pixelformat;
        pix.field = Field::Interlaced;
        pix.colorspace = Colorspace::Smpte170m;
        pix.priv_ = 1;
        pix.bytesperline = pix.width * 2;
        pix.sizeimage = pix.bytesperline * pix.height;

        debug!(
            "tvp5150: try fmt {} {}x{} bpl {}",
            desc.description, pix.width, pix.height, pix.bytesperline
        );
        Ok(())
    }

    fn s_fmt_cap(&mut self, fmt: &mut Format) -> Result<(), Error<E>> {
        Self::check_capture(fmt.buf_type)?;
        self.try_fmt_cap(fmt)?;
        self.pix = fmt.pix;
        Ok(())
    }

    fn g_fmt_cap(&mut self, buf_type: BufType) -> Result<Format, Error<E>> {
        Self::check_capture(buf_type)?;
        let entry = self.detect()?;
        self.pix.width = entry.width;
        self.pix.height = entry.height;
        self.pix.bytesperline = self.pix.width * 2;
        self.pix.sizeimage = self.pix.bytesperline * self.pix.height;
        Ok(Format {
            buf_type,
            pix: self.pix,
        })
    }

    fn g_parm(&mut self, buf_type: BufType) -> Result<StreamParm, Error<E>> {
        Self::check_capture(buf_type)?;
        let entry = self.detect()?;
        Ok(StreamParm {
            buf_type,
            capture: CaptureParm {
                capability: 0,
                timeperframe: entry.info.frameperiod,
            },
        })
    }

    fn s_parm(&mut self, parm: &mut StreamParm) -> Result<(), Error<E>> {
        Self::check_capture(parm.buf_type)?;
        // frame rate follows the input; report what it actually is
        let entry = self.detect()?;
        parm.capture.timeperframe = entry.info.frameperiod;
        Ok(())
    }

    fn queryctrl(&mut self, id: u32) -> Result<QueryCtrl, Error<E>> {
        Self::control(id).copied()
    }

    fn g_ctrl(&mut self, id: u32) -> Result<i32, Error<E>> {
        let ctrl = Self::control(id)?;
        let raw = self.read(control_reg(ctrl.id))?;
        Ok(match ctrl.id {
            ControlId::Hue => raw as i8 as i32,
            _ => raw as i32,
        })
    }

    fn s_ctrl(&mut self, id: u32, value: i32) -> Result<(), Error<E>> {
        let ctrl = Self::control(id)?;
        if !ctrl.contains(value) {
            return Err(Error::Invalid);
        }
        // hue is two's complement, the others plain 0..=255
        self.write(control_reg(ctrl.id), value as u8)
    }

    fn querystd(&mut self) -> Result<StdId, Error<E>> {
        let entry = self.detect()?;
        debug!("tvp5150: current std {}", entry.info.name);
        Ok(entry.info.id)
    }

    fn s_std(&mut self, id: StdId) -> Result<(), Error<E>> {
        if id == self.std_id {
            return Ok(());
        }
        if id == StdId::ALL {
            self.write(regs::VIDEO_STD, regs::video_std::AUTO_SWITCH)?;
            self.std_id = id;
            debug!("tvp5150: standard set to autoswitch");
            return Ok(());
        }

        let std = Standard::matching(id).ok_or(Error::Invalid)?;
        self.write(regs::VIDEO_STD, std.entry().video_std)?;
        self.std_id = id;
        self.current = Some(std);
        debug!("tvp5150: standard set to {}", std.name());
        Ok(())
    }

    fn enum_framesizes(&mut self, index: u32, _pixelformat: FourCc) -> Result<FrameSize, Error<E>> {
        if index >= 1 {
            return Err(Error::Invalid);
        }
        Ok(FrameSize::Discrete {
            width: self.pix.width,
            height: self.pix.height,
        })
    }

    fn enum_frameintervals(
        &mut self,
        index: u32,
        _pixelformat: FourCc,
        width: u32,
        height: u32,
    ) -> Result<FrameInterval, Error<E>> {
        if index != 0 || width != self.pix.width || height != self.pix.height {
            return Err(Error::Invalid);
        }
        let fps = if self.std_id.intersects(StdId::STD_525_60) {
            30
        } else {
            25
        };
        Ok(FrameInterval::Discrete(Fract::new(1, fps)))
    }

    fn g_chip_ident(&mut self) -> Result<ChipIdent, Error<E>> {
        Ok(ChipIdent {
            match_type: ChipMatch::I2cDriver,
            name: CHIP_NAME,
            ident: IDENT_TVP5150,
            revision: self.rom_ver as u32,
        })
    }

    fn s_routing(&mut self, routing: Routing) -> Result<(), Error<E>> {
        let route = Route::try_from(routing).map_err(|_| Error::Invalid)?;
        self.set_route(route)
    }
}

/// Entries the autoswitch can report, for callers listing standards.
pub fn standards() -> &'static [StdEntry] {
    &STANDARDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::regmap::fake::{FakeBus, NoDelay};

    const ADDR: u8 = 0x5C;

    fn bus(dev: [u8; 4]) -> FakeBus {
        let mut bus = FakeBus::new(ADDR);
        bus.set(regs::MSB_DEV_ID, &dev);
        bus
    }

    fn probed(status5: u8) -> Tvp5150<FakeBus> {
        let mut bus = bus([0x51, 0x50, 0x04, 0x00]);
        bus.set(regs::STATUS_REG_5, &[status5]);
        Tvp5150::probe(bus, DecoderConfig::new(), &mut NoDelay).unwrap()
    }

    fn capture_format(pixelformat: FourCc) -> Format {
        Format {
            buf_type: BufType::VideoCapture,
            pix: PixFormat {
                width: 0,
                height: 0,
                pixelformat,
                field: Field::Any,
                bytesperline: 0,
                sizeimage: 0,
                colorspace: Colorspace::Default,
                priv_: 0,
            },
        }
    }

    #[test]
    fn chip_identity_table() {
        assert_eq!(Chip::identify(0x5150, 0x0321), Chip::Tvp5150a);
        assert_eq!(Chip::identify(0x5150, 0x0400), Chip::Tvp5150am1);
        assert_eq!(Chip::identify(0x5151, 0x0100), Chip::Tvp5151);
        assert_eq!(Chip::identify(0x5151, 0x0321), Chip::Unknown);
    }

    #[test]
    fn probe_am1_selects_bt656_4_and_programs_tables_in_order() {
        let dec = probed(0x01);
        assert_eq!(dec.chip(), Chip::Tvp5150am1);
        assert_eq!(dec.std_id(), StdId::ALL);

        let bus = dec.release();
        let rev = bus.position(&[regs::REV_SELECT, 0]).unwrap();
        let defaults = bus.position(&[regs::ANAL_CHL_CTL, 0x15]).unwrap();
        let full_field = bus.position(&[regs::FULL_FIELD_MODE_REG, 0x7f]).unwrap();
        let src = bus.position(&[regs::VD_IN_SRC_SEL_1, 0x00]).unwrap();
        let enable = bus.position(&[regs::CONF_SHARED_PIN, 0x02]).unwrap();
        assert!(rev < defaults && defaults < full_field);
        assert!(full_field < enable);
        // the defaults table also writes VD_IN_SRC_SEL_1=0 first
        assert!(src < full_field);
        assert!(bus.wrote(&[regs::CHROMA_PROC_CTL_2, 0x04]));
    }

    #[test]
    fn probe_tvp5150a_skips_rev_select() {
        let dec = Tvp5150::probe(bus([0x51, 0x50, 0x03, 0x21]), DecoderConfig::new(), &mut NoDelay)
            .unwrap();
        assert_eq!(dec.chip(), Chip::Tvp5150a);
        assert!(!dec.release().wrote(&[regs::REV_SELECT, 0]));
    }

    #[test]
    fn probe_propagates_bus_errors() {
        let mut bus = bus([0; 4]);
        bus.fail_after = Some(2);
        assert!(matches!(
            Tvp5150::probe(bus, DecoderConfig::new(), &mut NoDelay),
            Err(Error::I2c(_))
        ));
    }

    #[test]
    fn mux_selection_per_route() {
        let mut dec = Tvp5150::new(bus([0; 4]), DecoderConfig::new());
        dec.bus_mut().set(regs::MISC_CTL, &[0x0d]);

        dec.set_route(Route::composite(RouteInput::Composite1)).unwrap();
        assert_eq!(dec.bus_mut().regs[regs::VD_IN_SRC_SEL_1 as usize], 0x02);
        assert_eq!(dec.bus_mut().regs[regs::MISC_CTL as usize], 0x4d);

        dec.set_route(Route::composite(RouteInput::SVideo)).unwrap();
        assert_eq!(dec.bus_mut().regs[regs::VD_IN_SRC_SEL_1 as usize], 0x01);
        assert_eq!(dec.bus_mut().regs[regs::MISC_CTL as usize], 0x1d);

        dec.set_route(Route {
            input: RouteInput::Composite0,
            output: RouteOutput::BlackScreen,
        })
        .unwrap();
        assert_eq!(dec.bus_mut().regs[regs::VD_IN_SRC_SEL_1 as usize], 0x08);
        assert_eq!(dec.bus_mut().regs[regs::MISC_CTL as usize], 0x4d);

        dec.set_route(Route::composite(RouteInput::Composite1)).unwrap();
        dec.set_enabled(false).unwrap();
        assert_eq!(dec.bus_mut().regs[regs::VD_IN_SRC_SEL_1 as usize], 0x0a);
    }

    #[test]
    fn formats_follow_detected_standard() {
        let mut dec = probed(0x03);
        let mut fmt = capture_format(FourCc::YUYV);
        dec.try_fmt_cap(&mut fmt).unwrap();

        assert_eq!(fmt.pix.width, 720);
        assert_eq!(fmt.pix.height, 625);
        assert_eq!(fmt.pix.pixelformat, FourCc::UYVY);
        assert_eq!(fmt.pix.field, Field::Interlaced);
        assert_eq!(fmt.pix.bytesperline, 1440);
        assert_eq!(fmt.pix.sizeimage, 1440 * 625);
        assert_eq!(fmt.pix.priv_, 1);
        assert_eq!(dec.standard(), Some(Standard::PalBdghin));

        // try does not store
        assert_eq!(dec.enum_framesizes(0, FourCc::UYVY), Ok(FrameSize::Discrete { width: 720, height: 525 }));
        dec.s_fmt_cap(&mut fmt).unwrap();
        assert_eq!(dec.enum_framesizes(0, FourCc::UYVY), Ok(FrameSize::Discrete { width: 720, height: 625 }));
        assert_eq!(dec.enum_framesizes(1, FourCc::UYVY), Err(Error::Invalid));
    }

    #[test]
    fn no_lock_is_reported_as_no_signal() {
        let mut dec = probed(0x00);
        let mut fmt = capture_format(FourCc::UYVY);
        assert_eq!(dec.try_fmt_cap(&mut fmt), Err(Error::NoSignal));
        assert_eq!(dec.querystd(), Err(Error::NoSignal));
        assert_eq!(dec.g_parm(BufType::VideoCapture), Err(Error::NoSignal));
    }

    #[test]
    fn non_capture_buffers_are_rejected() {
        let mut dec = probed(0x01);
        assert_eq!(dec.g_fmt_cap(BufType::VideoOutput), Err(Error::Invalid));
        assert_eq!(dec.g_parm(BufType::VideoOverlay), Err(Error::Invalid));
        assert_eq!(dec.enum_fmt_cap(0, BufType::VideoOutput), Err(Error::Invalid));
        let mut fmt = capture_format(FourCc::UYVY);
        fmt.buf_type = BufType::VideoOutput;
        assert_eq!(dec.s_fmt_cap(&mut fmt), Err(Error::Invalid));
    }

    #[test]
    fn enum_fmt_lists_uyvy_only() {
        let mut dec = probed(0x01);
        let desc = dec.enum_fmt_cap(0, BufType::VideoCapture).unwrap();
        assert_eq!(desc.description, "8-bit UYVY 4:2:2 Format");
        assert_eq!(desc.pixelformat, FourCc::UYVY);
        assert_eq!(dec.enum_fmt_cap(1, BufType::VideoCapture), Err(Error::Invalid));
    }

    #[test]
    fn frame_period_tracks_input() {
        let mut dec = probed(0x01);
        let parm = dec.g_parm(BufType::VideoCapture).unwrap();
        assert_eq!(parm.capture.timeperframe, Fract::new(1001, 30000));
        assert_eq!(parm.capture.capability, 0);

        dec.bus_mut().set(regs::STATUS_REG_5, &[0x0b]);
        let mut parm = StreamParm {
            buf_type: BufType::VideoCapture,
            capture: CaptureParm {
                capability: 0,
                timeperframe: Fract::new(1, 60),
            },
        };
        dec.s_parm(&mut parm).unwrap();
        assert_eq!(parm.capture.timeperframe, Fract::new(1, 25));
        assert_eq!(dec.querystd(), Ok(StdId::SECAM));
    }

    #[test]
    fn g_fmt_refreshes_size_from_standard() {
        let mut dec = probed(0x0b);
        let fmt = dec.g_fmt_cap(BufType::VideoCapture).unwrap();
        assert_eq!((fmt.pix.width, fmt.pix.height), (720, 625));
        assert_eq!(fmt.pix.sizeimage, 1440 * 625);
    }

    #[test]
    fn controls_map_to_registers_with_signed_hue() {
        let mut dec = probed(0x01);
        let hue = ControlId::Hue.raw();

        let q = dec.queryctrl(hue).unwrap();
        assert_eq!((q.minimum, q.maximum, q.default_value), (-128, 127, 0));
        assert_eq!(dec.queryctrl(0), Err(Error::Invalid));

        dec.s_ctrl(hue, -2).unwrap();
        assert!(dec.bus_mut().wrote(&[regs::HUE_CTL, 0xfe]));
        assert_eq!(dec.g_ctrl(hue), Ok(-2));

        dec.s_ctrl(ControlId::Brightness.raw(), 200).unwrap();
        assert_eq!(dec.g_ctrl(ControlId::Brightness.raw()), Ok(200));

        assert_eq!(dec.s_ctrl(ControlId::Contrast.raw(), 256), Err(Error::Invalid));
        assert_eq!(dec.s_ctrl(hue, 128), Err(Error::Invalid));
        assert_eq!(dec.g_ctrl(ControlId::Hue.raw() + 1), Err(Error::Invalid));
    }

    #[test]
    fn forcing_a_standard_writes_video_std() {
        let mut dec = probed(0x01);
        dec.bus_mut().writes.clear();

        // already autoswitching
        dec.s_std(StdId::ALL).unwrap();
        assert!(dec.bus_mut().writes.is_empty());

        dec.s_std(StdId::PAL_M).unwrap();
        assert!(dec.bus_mut().wrote(&[regs::VIDEO_STD, 0x06]));
        assert_eq!(dec.standard(), Some(Standard::PalM));
        assert_eq!(
            dec.enum_frameintervals(0, FourCc::UYVY, 720, 525),
            Ok(FrameInterval::Discrete(Fract::new(1, 30)))
        );

        dec.s_std(StdId::SECAM_B).unwrap();
        assert!(dec.bus_mut().wrote(&[regs::VIDEO_STD, 0x0c]));
        assert_eq!(
            dec.enum_frameintervals(0, FourCc::UYVY, 720, 525),
            Ok(FrameInterval::Discrete(Fract::new(1, 25)))
        );
        assert_eq!(dec.enum_frameintervals(0, FourCc::UYVY, 720, 480), Err(Error::Invalid));
        assert_eq!(dec.enum_frameintervals(1, FourCc::UYVY, 720, 525), Err(Error::Invalid));

        dec.s_std(StdId::ALL).unwrap();
        assert!(dec.bus_mut().wrote(&[regs::VIDEO_STD, 0x00]));

        assert_eq!(dec.s_std(StdId::PAL_K), Err(Error::Invalid));
    }

    #[test]
    fn routing_and_identity() {
        let mut dec = probed(0x01);
        dec.s_routing(Routing { input: 1, output: 0 }).unwrap();
        assert_eq!(dec.route().input, RouteInput::Composite1);
        assert_eq!(dec.s_routing(Routing { input: 9, output: 0 }), Err(Error::Invalid));

        let id = dec.g_chip_ident().unwrap();
        assert_eq!(id.name, "adv_tvp5150_decoder");
        assert_eq!(id.ident, 5150);
        assert_eq!(id.match_type, ChipMatch::I2cDriver);

        let IfParm::Bt656(p) = dec.g_ifparm().unwrap();
        assert_eq!(p.mode, Bt656Mode::Bt8Bit);
        assert!(p.nobt_hs_inv && p.bt_sync_correct && p.interlace);
        assert!(!p.latch_clk_inv && !p.nobt_vs_inv);
        assert_eq!(p.clock_curr, 27_000_000);

        dec.s_power(false).unwrap();
        assert!(!dec.is_powered());
    }
}
