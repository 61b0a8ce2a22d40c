// Analog standards the decoder can lock to, in autoswitch priority order.
// Heights are full frame line counts (525/625), not active lines.

use super::regs::{detected, video_std};
use crate::video::{Fract, StandardInfo, StdId};

pub const H_MAX: u32 = 720;
pub const V_MAX_525_60: u32 = 525;
pub const V_MAX_OTHERS: u32 = 625;

const PERIOD_525_60: Fract = Fract::new(1001, 30000);
const PERIOD_625_50: Fract = Fract::new(1, 25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standard {
    NtscMj,
    PalBdghin,
    PalM,
    PalNc,
    Ntsc443,
    Secam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdEntry {
    pub standard: Standard,
    pub width: u32,
    pub height: u32,
    /// Value forced into VIDEO_STD to select this standard.
    pub video_std: u8,
    /// Autoswitch code reported in STATUS_REG_5 when locked to it.
    pub detected: u8,
    pub info: StandardInfo,
}

pub static STANDARDS: [StdEntry; 6] = [
    StdEntry {
        standard: Standard::NtscMj,
        width: H_MAX,
        height: V_MAX_525_60,
        video_std: video_std::NTSC_MJ,
        detected: detected::NTSC_MJ,
        info: StandardInfo {
            index: 0,
            id: StdId::NTSC,
            name: "NTSC M/J",
            frameperiod: PERIOD_525_60,
            framelines: 525,
        },
    },
    StdEntry {
        standard: Standard::PalBdghin,
        width: H_MAX,
        height: V_MAX_OTHERS,
        video_std: video_std::PAL_BDGHIN,
        detected: detected::PAL_BDGHIN,
        info: StandardInfo {
            index: 1,
            id: StdId(
                StdId::PAL_BG.0
                    | StdId::PAL_D.0
                    | StdId::PAL_D1.0
                    | StdId::PAL_H.0
                    | StdId::PAL_I.0
                    | StdId::PAL_N.0,
            ),
            name: "PAL B/D/G/H/I/N",
            frameperiod: PERIOD_625_50,
            framelines: 625,
        },
    },
    StdEntry {
        standard: Standard::PalM,
        width: H_MAX,
        height: V_MAX_525_60,
        video_std: video_std::PAL_M,
        detected: detected::PAL_M,
        info: StandardInfo {
            index: 2,
            id: StdId::PAL_M,
            name: "PAL M",
            frameperiod: PERIOD_525_60,
            framelines: 525,
        },
    },
    StdEntry {
        standard: Standard::PalNc,
        width: H_MAX,
        height: V_MAX_OTHERS,
        video_std: video_std::PAL_COMBINATION_N,
        detected: detected::PAL_COMBINATION_N,
        info: StandardInfo {
            index: 3,
            id: StdId::PAL_NC,
            name: "PAL-Nc",
            frameperiod: PERIOD_625_50,
            framelines: 625,
        },
    },
    StdEntry {
        standard: Standard::Ntsc443,
        width: H_MAX,
        height: V_MAX_525_60,
        video_std: video_std::NTSC_4_43,
        detected: detected::NTSC_4_43,
        info: StandardInfo {
            index: 4,
            id: StdId::NTSC_443,
            name: "NTSC 4.43",
            frameperiod: PERIOD_525_60,
            framelines: 525,
        },
    },
    StdEntry {
        standard: Standard::Secam,
        width: H_MAX,
        height: V_MAX_OTHERS,
        video_std: video_std::SECAM,
        detected: detected::SECAM,
        info: StandardInfo {
            index: 5,
            id: StdId::SECAM,
            name: "SECAM",
            frameperiod: PERIOD_625_50,
            framelines: 625,
        },
    },
];

impl Standard {
    pub fn entry(self) -> &'static StdEntry {
        &STANDARDS[self as usize]
    }

    /// Decode the autoswitch nibble of STATUS_REG_5.
    pub fn from_status(status5: u8) -> Option<Standard> {
        let code = status5 & detected::MASK;
        STANDARDS
            .iter()
            .find(|e| e.detected == code)
            .map(|e| e.standard)
    }

    /// First table entry whose id set overlaps `id`.
    pub fn matching(id: StdId) -> Option<Standard> {
        STANDARDS
            .iter()
            .find(|e| e.info.id.intersects(id))
            .map(|e| e.standard)
    }

    pub fn name(self) -> &'static str {
        self.entry().info.name
    }
}
