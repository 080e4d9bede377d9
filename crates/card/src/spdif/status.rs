//! Live S/PDIF receiver status.
//!
//! Everything here reads the WM8804 on every call; nothing is cached.

use platform::wm8804::{
    INTSTAT, INTSTAT_INVALID, INTSTAT_TRANS_ERR, RXCHAN1, RXCHAN4, SPDSTAT, SPDSTAT_AUDIO_N,
    SPDSTAT_CPY_N, SPDSTAT_DEEMPH, SPDSTAT_PCM_N, SPDSTAT_REC_FREQ_MASK,
    SPDSTAT_REC_FREQ_SHIFT, SPDSTAT_UNLOCK,
};
use platform::SpdifTransceiver;

use super::Iec958Status;
use crate::error::{Error, Step, StepExt};

/// Single-bit receiver status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusFlag {
    /// Stream carries audio.
    Audio,
    /// Stream carries non-PCM data.
    NonPcm,
    /// Stream is copyright protected.
    Copyright,
    /// Pre-emphasis is signalled.
    DeEmphasis,
    /// Receiver is locked to the input.
    Lock,
    /// Invalid sample seen.
    Invalid,
    /// Transmission error seen.
    TransErr,
}

impl StatusFlag {
    /// All flags in control order.
    pub const ALL: [Self; 7] = [
        Self::Audio,
        Self::NonPcm,
        Self::Copyright,
        Self::DeEmphasis,
        Self::Lock,
        Self::Invalid,
        Self::TransErr,
    ];

    /// `(register, bit, invert)` the flag is decoded from.
    pub const fn source(self) -> (u8, u8, bool) {
        match self {
            Self::Audio => (SPDSTAT, SPDSTAT_AUDIO_N, true),
            Self::NonPcm => (SPDSTAT, SPDSTAT_PCM_N, false),
            Self::Copyright => (SPDSTAT, SPDSTAT_CPY_N, true),
            Self::DeEmphasis => (SPDSTAT, SPDSTAT_DEEMPH, false),
            Self::Lock => (SPDSTAT, SPDSTAT_UNLOCK, true),
            Self::Invalid => (INTSTAT, INTSTAT_INVALID, false),
            Self::TransErr => (INTSTAT, INTSTAT_TRANS_ERR, false),
        }
    }

    /// Control-name fragment.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Audio => "Audio",
            Self::NonPcm => "Non-PCM",
            Self::Copyright => "Copyright",
            Self::DeEmphasis => "De-Emphasis",
            Self::Lock => "Lock",
            Self::Invalid => "Invalid",
            Self::TransErr => "TransErr",
        }
    }

    /// Decode the flag from a raw register value.
    pub fn decode(self, raw: u8) -> bool {
        let (_, bit, invert) = self.source();
        let set = raw & 1u8.checked_shl(u32::from(bit)).unwrap_or(0) != 0;
        set != invert
    }

    /// Read the flag from the transceiver.
    pub fn read<T: SpdifTransceiver>(self, xcvr: &T) -> Result<bool, Error> {
        let (reg, _, _) = self.source();
        let raw = xcvr.read_register(reg).step(Step::ReadStatus)?;
        Ok(self.decode(raw))
    }
}

/// Recovered input sample-rate class (SPDSTAT\[5:4\]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveredFrequency {
    /// 176.4 or 192 kHz.
    Hz176k4Or192k,
    /// 88.2 or 96 kHz.
    Hz88k2Or96k,
    /// 44.1 or 48 kHz.
    Hz44k1Or48k,
    /// 32 kHz.
    Hz32k,
}

impl RecoveredFrequency {
    /// All classes in field-value order.
    pub const ALL: [Self; 4] = [
        Self::Hz176k4Or192k,
        Self::Hz88k2Or96k,
        Self::Hz44k1Or48k,
        Self::Hz32k,
    ];

    /// Decode from a raw SPDSTAT value.
    pub const fn from_spdstat(raw: u8) -> Self {
        match (raw >> SPDSTAT_REC_FREQ_SHIFT) & SPDSTAT_REC_FREQ_MASK {
            0 => Self::Hz176k4Or192k,
            1 => Self::Hz88k2Or96k,
            2 => Self::Hz44k1Or48k,
            _ => Self::Hz32k,
        }
    }

    /// Enumerated index (the field value).
    pub const fn index(self) -> usize {
        match self {
            Self::Hz176k4Or192k => 0,
            Self::Hz88k2Or96k => 1,
            Self::Hz44k1Or48k => 2,
            Self::Hz32k => 3,
        }
    }

    /// Display text.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hz176k4Or192k => "176.4/192 kHz",
            Self::Hz88k2Or96k => "88.2/96 kHz",
            Self::Hz44k1Or48k => "44.1/48 kHz",
            Self::Hz32k => "32 kHz",
        }
    }

    /// Display text of item `idx`, clamped to the last item.
    pub fn item_name(idx: usize) -> &'static str {
        Self::ALL
            .get(idx)
            .copied()
            .unwrap_or(Self::Hz32k)
            .name()
    }

    /// Read from the transceiver.
    pub fn read<T: SpdifTransceiver>(xcvr: &T) -> Result<Self, Error> {
        let raw = xcvr.read_register(SPDSTAT).step(Step::ReadStatus)?;
        Ok(Self::from_spdstat(raw))
    }
}

/// Read the received channel status from RXCHAN1..RXCHAN4.
pub fn read_capture<T: SpdifTransceiver>(xcvr: &T) -> Result<Iec958Status, Error> {
    let mut bytes = [0u8; 4];
    for (reg, byte) in (RXCHAN1..=RXCHAN4).zip(bytes.iter_mut()) {
        *byte = xcvr.read_register(reg).step(Step::ReadStatus)?;
    }
    Ok(Iec958Status(bytes).masked())
}
