//! Video capture vocabulary
//!
//! Plain-data mirror of the capture-master/decoder-slave interface:
//! pixel formats, analog standards, BT.656 bus parameters, controls.
//! A decoder implements [`CaptureSlave`]; a capture master drives it
//! through those methods and never touches decoder registers itself.

use core::fmt;
use core::ops::{BitAnd, BitOr};

// ── Buffers and formats ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufType {
    VideoCapture,
    VideoOutput,
    VideoOverlay,
}

/// Little-endian packed four-character code.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FourCc(pub u32);

impl FourCc {
    pub const UYVY: FourCc = FourCc::new(b"UYVY");
    pub const YUYV: FourCc = FourCc::new(b"YUYV");

    pub const fn new(code: &[u8; 4]) -> Self {
        FourCc(u32::from_le_bytes(*code))
    }

    pub const fn bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.bytes() {
            let c = if b.is_ascii_graphic() { b as char } else { '.' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Any,
    None,
    Top,
    Bottom,
    Interlaced,
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colorspace {
    Default,
    Smpte170m,
    Rec709,
    Srgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixFormat {
    pub width: u32,
    pub height: u32,
    pub pixelformat: FourCc,
    pub field: Field,
    pub bytesperline: u32,
    pub sizeimage: u32,
    pub colorspace: Colorspace,
    /// Driver-private; decoders set 1 to mark a TV input.
    pub priv_: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    pub buf_type: BufType,
    pub pix: PixFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtDesc {
    pub index: u32,
    pub buf_type: BufType,
    pub flags: u32,
    pub description: &'static str,
    pub pixelformat: FourCc,
}

// ── Timing ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fract {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fract {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureParm {
    pub capability: u32,
    pub timeperframe: Fract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamParm {
    pub buf_type: BufType,
    pub capture: CaptureParm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSize {
    Discrete { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameInterval {
    Discrete(Fract),
}

// ── Analog standards ────────────────────────────────────────────

/// Set of analog TV standards, one bit per variant.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct StdId(pub u64);

impl StdId {
    pub const UNKNOWN: StdId = StdId(0);

    pub const PAL_B: StdId = StdId(0x0000_0001);
    pub const PAL_B1: StdId = StdId(0x0000_0002);
    pub const PAL_G: StdId = StdId(0x0000_0004);
    pub const PAL_H: StdId = StdId(0x0000_0008);
    pub const PAL_I: StdId = StdId(0x0000_0010);
    pub const PAL_D: StdId = StdId(0x0000_0020);
    pub const PAL_D1: StdId = StdId(0x0000_0040);
    pub const PAL_K: StdId = StdId(0x0000_0080);
    pub const PAL_M: StdId = StdId(0x0000_0100);
    pub const PAL_N: StdId = StdId(0x0000_0200);
    pub const PAL_NC: StdId = StdId(0x0000_0400);
    pub const PAL_60: StdId = StdId(0x0000_0800);
    pub const NTSC_M: StdId = StdId(0x0000_1000);
    pub const NTSC_M_JP: StdId = StdId(0x0000_2000);
    pub const NTSC_443: StdId = StdId(0x0000_4000);
    pub const NTSC_M_KR: StdId = StdId(0x0000_8000);
    pub const SECAM_B: StdId = StdId(0x0001_0000);
    pub const SECAM_D: StdId = StdId(0x0002_0000);
    pub const SECAM_G: StdId = StdId(0x0004_0000);
    pub const SECAM_H: StdId = StdId(0x0008_0000);
    pub const SECAM_K: StdId = StdId(0x0010_0000);
    pub const SECAM_K1: StdId = StdId(0x0020_0000);
    pub const SECAM_L: StdId = StdId(0x0040_0000);
    pub const SECAM_LC: StdId = StdId(0x0080_0000);

    pub const PAL_BG: StdId = StdId(Self::PAL_B.0 | Self::PAL_B1.0 | Self::PAL_G.0);
    pub const PAL_DK: StdId = StdId(Self::PAL_D.0 | Self::PAL_D1.0 | Self::PAL_K.0);
    pub const PAL: StdId = StdId(Self::PAL_BG.0 | Self::PAL_DK.0 | Self::PAL_H.0 | Self::PAL_I.0);
    pub const NTSC: StdId = StdId(Self::NTSC_M.0 | Self::NTSC_M_JP.0 | Self::NTSC_M_KR.0);
    pub const SECAM_DK: StdId = StdId(Self::SECAM_D.0 | Self::SECAM_K.0 | Self::SECAM_K1.0);
    pub const SECAM: StdId = StdId(
        Self::SECAM_B.0
            | Self::SECAM_G.0
            | Self::SECAM_H.0
            | Self::SECAM_DK.0
            | Self::SECAM_L.0
            | Self::SECAM_LC.0,
    );

    pub const STD_525_60: StdId =
        StdId(Self::PAL_M.0 | Self::PAL_60.0 | Self::NTSC.0 | Self::NTSC_443.0);
    pub const STD_625_50: StdId =
        StdId(Self::PAL.0 | Self::PAL_N.0 | Self::PAL_NC.0 | Self::SECAM.0);
    pub const ALL: StdId = StdId(Self::STD_525_60.0 | Self::STD_625_50.0);

    pub const fn intersects(self, other: StdId) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for StdId {
    type Output = StdId;
    fn bitor(self, rhs: StdId) -> StdId {
        StdId(self.0 | rhs.0)
    }
}

impl BitAnd for StdId {
    type Output = StdId;
    fn bitand(self, rhs: StdId) -> StdId {
        StdId(self.0 & rhs.0)
    }
}

impl fmt::Debug for StdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StdId({:#010x})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardInfo {
    pub index: u32,
    pub id: StdId,
    pub name: &'static str,
    pub frameperiod: Fract,
    pub framelines: u32,
}

// ── Bus interface ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bt656Mode {
    Bt8Bit,
    Bt10Bit,
    NoBt8Bit,
    NoBt10Bit,
}

/// BT.656 parallel bus parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bt656Parm {
    pub mode: Bt656Mode,
    pub frame_start_on_rising_vs: bool,
    pub bt_sync_correct: bool,
    pub swap: bool,
    pub latch_clk_inv: bool,
    pub nobt_hs_inv: bool,
    pub nobt_vs_inv: bool,
    pub interlace: bool,
    pub clock_min: u32,
    pub clock_max: u32,
    pub clock_curr: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfParm {
    Bt656(Bt656Parm),
}

// ── Controls ────────────────────────────────────────────────────

pub const CID_BASE: u32 = 0x0098_0900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Brightness,
    Contrast,
    Saturation,
    Hue,
}

impl ControlId {
    pub const fn raw(self) -> u32 {
        match self {
            ControlId::Brightness => CID_BASE,
            ControlId::Contrast => CID_BASE + 1,
            ControlId::Saturation => CID_BASE + 2,
            ControlId::Hue => CID_BASE + 3,
        }
    }

    pub const fn from_raw(id: u32) -> Option<ControlId> {
        match id.wrapping_sub(CID_BASE) {
            0 => Some(ControlId::Brightness),
            1 => Some(ControlId::Contrast),
            2 => Some(ControlId::Saturation),
            3 => Some(ControlId::Hue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlType {
    Integer,
    Boolean,
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCtrl {
    pub id: ControlId,
    pub ctrl_type: CtrlType,
    pub name: &'static str,
    pub minimum: i32,
    pub maximum: i32,
    pub step: i32,
    pub default_value: i32,
    pub flags: u32,
}

impl QueryCtrl {
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.minimum && value <= self.maximum
    }
}

// ── Identity and routing ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipMatch {
    I2cDriver,
    I2cAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipIdent {
    pub match_type: ChipMatch,
    pub name: &'static str,
    pub ident: u32,
    pub revision: u32,
}

/// Raw chip-level routing as the capture master passes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routing {
    pub input: u32,
    pub output: u32,
}

// ── Slave interface ─────────────────────────────────────────────

/// Operations a capture master may invoke on a decoder.
///
/// Methods that take a `BufType` only support `VideoCapture`; anything
/// else is an invalid-argument error.
pub trait CaptureSlave {
    type Error;

    fn dev_init(&mut self) -> Result<(), Self::Error>;
    fn init(&mut self) -> Result<(), Self::Error>;
    fn s_power(&mut self, on: bool) -> Result<(), Self::Error>;
    fn g_ifparm(&mut self) -> Result<IfParm, Self::Error>;

    fn enum_fmt_cap(&mut self, index: u32, buf_type: BufType) -> Result<FmtDesc, Self::Error>;
    /// Adjust `fmt` to what the decoder would produce. Nothing is stored.
    fn try_fmt_cap(&mut self, fmt: &mut Format) -> Result<(), Self::Error>;
    fn s_fmt_cap(&mut self, fmt: &mut Format) -> Result<(), Self::Error>;
    fn g_fmt_cap(&mut self, buf_type: BufType) -> Result<Format, Self::Error>;

    fn g_parm(&mut self, buf_type: BufType) -> Result<StreamParm, Self::Error>;
    fn s_parm(&mut self, parm: &mut StreamParm) -> Result<(), Self::Error>;

    fn queryctrl(&mut self, id: u32) -> Result<QueryCtrl, Self::Error>;
    fn g_ctrl(&mut self, id: u32) -> Result<i32, Self::Error>;
    fn s_ctrl(&mut self, id: u32, value: i32) -> Result<(), Self::Error>;

    fn querystd(&mut self) -> Result<StdId, Self::Error>;
    fn s_std(&mut self, id: StdId) -> Result<(), Self::Error>;

    fn enum_framesizes(&mut self, index: u32, pixelformat: FourCc)
    -> Result<FrameSize, Self::Error>;
    fn enum_frameintervals(
        &mut self,
        index: u32,
        pixelformat: FourCc,
        width: u32,
        height: u32,
    ) -> Result<FrameInterval, Self::Error>;

    fn g_chip_ident(&mut self) -> Result<ChipIdent, Self::Error>;
    fn s_routing(&mut self, routing: Routing) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_packs_little_endian() {
        assert_eq!(FourCc::UYVY.0, 0x5956_5955);
        assert_eq!(FourCc::UYVY.bytes(), *b"UYVY");
    }

    #[test]
    fn standard_groups_partition_all() {
        assert!(StdId::NTSC.intersects(StdId::STD_525_60));
        assert!(!StdId::NTSC.intersects(StdId::STD_625_50));
        assert!(StdId::SECAM_L.intersects(StdId::STD_625_50));
        assert!((StdId::STD_525_60 & StdId::STD_625_50).is_empty());
        assert_eq!(StdId::ALL, StdId::STD_525_60 | StdId::STD_625_50);
        assert_eq!(StdId::NTSC.0, 0xB000);
    }

    #[test]
    fn control_ids_round_trip_through_raw() {
        for id in [
            ControlId::Brightness,
            ControlId::Contrast,
            ControlId::Saturation,
            ControlId::Hue,
        ] {
            assert_eq!(ControlId::from_raw(id.raw()), Some(id));
        }
        assert_eq!(ControlId::from_raw(CID_BASE + 4), None);
        assert_eq!(ControlId::from_raw(0), None);
    }
}
