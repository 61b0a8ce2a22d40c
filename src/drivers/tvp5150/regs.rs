// TVP5150 register map, standard codes and init tables
// Register addresses are single bytes; every access is one SMBus-style
// byte read or write.

use crate::drivers::regmap::RegWrite;
use crate::video::Routing;

pub const VD_IN_SRC_SEL_1: u8 = 0x00;
pub const ANAL_CHL_CTL: u8 = 0x01;
pub const OP_MODE_CTL: u8 = 0x02;
pub const MISC_CTL: u8 = 0x03;
pub const AUTOSW_MSK: u8 = 0x04;
pub const COLOR_KIL_THSH_CTL: u8 = 0x06;
pub const LUMA_PROC_CTL_1: u8 = 0x07;
pub const LUMA_PROC_CTL_2: u8 = 0x08;
pub const BRIGHT_CTL: u8 = 0x09;
pub const SATURATION_CTL: u8 = 0x0a;
pub const HUE_CTL: u8 = 0x0b;
pub const CONTRAST_CTL: u8 = 0x0c;
pub const DATA_RATE_SEL: u8 = 0x0d;
pub const LUMA_PROC_CTL_3: u8 = 0x0e;
pub const CONF_SHARED_PIN: u8 = 0x0f;
pub const ACT_VD_CROP_ST_MSB: u8 = 0x11;
pub const ACT_VD_CROP_ST_LSB: u8 = 0x12;
pub const ACT_VD_CROP_STP_MSB: u8 = 0x13;
pub const ACT_VD_CROP_STP_LSB: u8 = 0x14;
pub const GENLOCK: u8 = 0x15;
pub const HORIZ_SYNC_START: u8 = 0x16;
pub const VERT_BLANKING_START: u8 = 0x18;
pub const VERT_BLANKING_STOP: u8 = 0x19;
pub const CHROMA_PROC_CTL_1: u8 = 0x1a;
pub const CHROMA_PROC_CTL_2: u8 = 0x1b;
pub const INT_RESET_REG_B: u8 = 0x1c;
pub const INT_ENABLE_REG_B: u8 = 0x1d;
pub const INTT_CONFIG_REG_B: u8 = 0x1e;
pub const VIDEO_STD: u8 = 0x28;
pub const CB_GAIN_FACT: u8 = 0x2c;
pub const CR_GAIN_FACTOR: u8 = 0x2d;
pub const MACROVISION_ON_CTR: u8 = 0x2e;
pub const MACROVISION_OFF_CTR: u8 = 0x2f;
pub const REV_SELECT: u8 = 0x30;
pub const MSB_DEV_ID: u8 = 0x80;
pub const LSB_DEV_ID: u8 = 0x81;
pub const ROM_MAJOR_VER: u8 = 0x82;
pub const ROM_MINOR_VER: u8 = 0x83;
pub const VERT_LN_COUNT_MSB: u8 = 0x84;
pub const VERT_LN_COUNT_LSB: u8 = 0x85;
pub const INT_STATUS_REG_B: u8 = 0x86;
pub const INT_ACTIVE_REG_B: u8 = 0x87;
pub const STATUS_REG_1: u8 = 0x88;
pub const STATUS_REG_2: u8 = 0x89;
pub const STATUS_REG_3: u8 = 0x8a;
pub const STATUS_REG_4: u8 = 0x8b;
pub const STATUS_REG_5: u8 = 0x8c;

pub const CC_DATA_INI: u8 = 0x90;
pub const CC_DATA_END: u8 = 0x93;
pub const WSS_DATA_INI: u8 = 0x94;
pub const WSS_DATA_END: u8 = 0x99;
pub const VPS_DATA_INI: u8 = 0x9a;
pub const VPS_DATA_END: u8 = 0xa6;
pub const VITC_DATA_INI: u8 = 0xa7;
pub const VITC_DATA_END: u8 = 0xaf;
pub const TELETEXT_FIL1_INI: u8 = 0xb1;
pub const TELETEXT_FIL1_END: u8 = 0xb5;
pub const TELETEXT_FIL2_INI: u8 = 0xb6;
pub const TELETEXT_FIL2_END: u8 = 0xba;
pub const TELETEXT_FIL_ENA: u8 = 0xbb;
pub const INT_STATUS_REG_A: u8 = 0xc0;
pub const INT_ENABLE_REG_A: u8 = 0xc1;
pub const INT_CONF: u8 = 0xc2;
pub const VDP_STATUS_REG: u8 = 0xc6;
pub const FIFO_WORD_COUNT: u8 = 0xc7;
pub const FIFO_INT_THRESHOLD: u8 = 0xc8;
pub const FIFO_RESET: u8 = 0xc9;
pub const LINE_NUMBER_INT: u8 = 0xca;
pub const PIX_ALIGN_REG_LOW: u8 = 0xcb;
pub const PIX_ALIGN_REG_HIGH: u8 = 0xcc;
pub const FIFO_OUT_CTRL: u8 = 0xcd;
pub const FULL_FIELD_ENA: u8 = 0xcf;
pub const LINE_MODE_INI: u8 = 0xd0;
pub const LINE_MODE_END: u8 = 0xfb;
pub const FULL_FIELD_MODE_REG: u8 = 0xfc;

/// VIDEO_STD (0x28) values.
pub mod video_std {
    pub const AUTO_SWITCH: u8 = 0x00;
    pub const NTSC_MJ: u8 = 0x02;
    pub const PAL_BDGHIN: u8 = 0x04;
    pub const PAL_M: u8 = 0x06;
    pub const PAL_COMBINATION_N: u8 = 0x08;
    pub const NTSC_4_43: u8 = 0x0a;
    pub const SECAM: u8 = 0x0c;
}

/// Autoswitch result in the low nibble of STATUS_REG_5.
pub mod detected {
    pub const MASK: u8 = 0x0f;
    pub const NTSC_MJ: u8 = 0x01;
    pub const PAL_BDGHIN: u8 = 0x03;
    pub const PAL_M: u8 = 0x05;
    pub const PAL_COMBINATION_N: u8 = 0x07;
    pub const NTSC_4_43: u8 = 0x09;
    pub const SECAM: u8 = 0x0b;
}

// MISC_CTL bits toggled by input selection
pub const MISC_YCBCR_OE: u8 = 0x10;
pub const MISC_GPCL_OE: u8 = 0x40;
// VD_IN_SRC_SEL_1 bits
pub const SRC_SVIDEO: u8 = 0x01;
pub const SRC_AIP1B: u8 = 0x02;
pub const SRC_BLACK: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteInput {
    Composite0 = 0,
    Composite1 = 1,
    SVideo = 2,
}

impl RouteInput {
    pub const fn raw(self) -> u32 {
        self as u32
    }

    pub const fn from_raw(v: u32) -> Option<Self> {
        match v {
            0 => Some(RouteInput::Composite0),
            1 => Some(RouteInput::Composite1),
            2 => Some(RouteInput::SVideo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutput {
    Normal = 0,
    BlackScreen = 1,
}

impl RouteOutput {
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Only the black-screen bit is meaningful.
    pub const fn from_raw(v: u32) -> Self {
        if v & 1 != 0 {
            RouteOutput::BlackScreen
        } else {
            RouteOutput::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub input: RouteInput,
    pub output: RouteOutput,
}

impl Route {
    pub const fn composite(input: RouteInput) -> Self {
        Self {
            input,
            output: RouteOutput::Normal,
        }
    }

    pub const fn to_routing(self) -> Routing {
        Routing {
            input: self.input.raw(),
            output: self.output.raw(),
        }
    }
}

impl TryFrom<Routing> for Route {
    type Error = u32;

    /// Fails with the raw input number when it names no known input.
    fn try_from(r: Routing) -> Result<Self, u32> {
        let input = RouteInput::from_raw(r.input).ok_or(r.input)?;
        Ok(Route {
            input,
            output: RouteOutput::from_raw(r.output),
        })
    }
}

/// Datasheet defaults, written at reset before the input is selected.
pub const INIT_DEFAULT: &[RegWrite] = &[
    RegWrite::new(VD_IN_SRC_SEL_1, &[0x00]),
    RegWrite::new(ANAL_CHL_CTL, &[0x15]),
    RegWrite::new(OP_MODE_CTL, &[0x00]),
    RegWrite::new(MISC_CTL, &[0x01]),
    RegWrite::new(COLOR_KIL_THSH_CTL, &[0x10]),
    RegWrite::new(LUMA_PROC_CTL_1, &[0x60]),
    RegWrite::new(LUMA_PROC_CTL_2, &[0x00]),
    RegWrite::new(BRIGHT_CTL, &[0x80]),
    RegWrite::new(SATURATION_CTL, &[0x80]),
    RegWrite::new(HUE_CTL, &[0x00]),
    RegWrite::new(CONTRAST_CTL, &[0x80]),
    RegWrite::new(DATA_RATE_SEL, &[0x47]),
    RegWrite::new(LUMA_PROC_CTL_3, &[0x00]),
    RegWrite::new(CONF_SHARED_PIN, &[0x08]),
    RegWrite::new(ACT_VD_CROP_ST_MSB, &[0x00]),
    RegWrite::new(ACT_VD_CROP_ST_LSB, &[0x00]),
    RegWrite::new(ACT_VD_CROP_STP_MSB, &[0x00]),
    RegWrite::new(ACT_VD_CROP_STP_LSB, &[0x00]),
    RegWrite::new(GENLOCK, &[0x01]),
    RegWrite::new(HORIZ_SYNC_START, &[0x80]),
    RegWrite::new(VERT_BLANKING_START, &[0x00]),
    RegWrite::new(VERT_BLANKING_STOP, &[0x00]),
    RegWrite::new(CHROMA_PROC_CTL_1, &[0x0c]),
    RegWrite::new(CHROMA_PROC_CTL_2, &[0x14]),
    RegWrite::new(INT_RESET_REG_B, &[0x00]),
    RegWrite::new(INT_ENABLE_REG_B, &[0x00]),
    RegWrite::new(INTT_CONFIG_REG_B, &[0x00]),
    RegWrite::new(VIDEO_STD, &[0x00]),
    RegWrite::new(MACROVISION_ON_CTR, &[0x0f]),
    RegWrite::new(MACROVISION_OFF_CTR, &[0x01]),
    RegWrite::new(TELETEXT_FIL_ENA, &[0x00]),
    RegWrite::new(INT_STATUS_REG_A, &[0x00]),
    RegWrite::new(INT_ENABLE_REG_A, &[0x00]),
    RegWrite::new(INT_CONF, &[0x04]),
    RegWrite::new(FIFO_INT_THRESHOLD, &[0x80]),
    RegWrite::new(FIFO_RESET, &[0x00]),
    RegWrite::new(LINE_NUMBER_INT, &[0x00]),
    RegWrite::new(PIX_ALIGN_REG_LOW, &[0x4e]),
    RegWrite::new(PIX_ALIGN_REG_HIGH, &[0x00]),
    RegWrite::new(FIFO_OUT_CTRL, &[0x01]),
    RegWrite::new(FULL_FIELD_ENA, &[0x00]),
    RegWrite::new(LINE_MODE_INI, &[0x00]),
    RegWrite::new(FULL_FIELD_MODE_REG, &[0x7f]),
];

/// Streaming setup: AGC on, YCbCr out, autodetect every standard.
pub const INIT_ENABLE: &[RegWrite] = &[
    RegWrite::new(CONF_SHARED_PIN, &[0x02]),
    RegWrite::new(ANAL_CHL_CTL, &[0x15]),
    RegWrite::new(MISC_CTL, &[0x0d]),
    RegWrite::new(AUTOSW_MSK, &[0x00]),
    RegWrite::new(VIDEO_STD, &[video_std::AUTO_SWITCH]),
    RegWrite::new(DATA_RATE_SEL, &[0x47]),
    RegWrite::new(CHROMA_PROC_CTL_1, &[0x0c]),
    RegWrite::new(CHROMA_PROC_CTL_2, &[0x04]),
];
