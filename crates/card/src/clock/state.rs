//! Clock-domain state guarded by the controller lock.

use platform::StreamDirection;

use crate::config::CardConfig;

/// What currently drives FLL1.
///
/// The frequency is the FLL1 output (= SYSCLK) in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FllMode {
    /// Both FLL1 paths disabled.
    #[default]
    Off,
    /// Locked to MCLK1 (the 12 MHz master clock).
    Local(u32),
    /// Locked to the AIF2 bit clock recovered from the S/PDIF input.
    Referenced(u32),
}

impl FllMode {
    /// FLL1 output frequency, or `None` when off.
    pub const fn frequency(self) -> Option<u32> {
        match self {
            Self::Off => None,
            Self::Local(hz) | Self::Referenced(hz) => Some(hz),
        }
    }

    /// True when locked to the local master clock.
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Short name for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Local(_) => "local",
            Self::Referenced(_) => "referenced",
        }
    }
}

/// Set of stream directions that currently hold applied hardware parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamSet(u8);

impl StreamSet {
    /// No stream open.
    pub const EMPTY: Self = Self(0);

    /// Add a direction.
    pub fn insert(&mut self, direction: StreamDirection) {
        self.0 |= direction.bit();
    }

    /// Remove a direction.
    pub fn remove(&mut self, direction: StreamDirection) {
        self.0 &= !direction.bit();
    }

    /// True if `direction` holds parameters.
    pub const fn contains(self, direction: StreamDirection) -> bool {
        self.0 & direction.bit() != 0
    }

    /// True if no direction holds parameters.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Shared clock-domain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// Last negotiated sample rate.
    pub card_rate: u32,
    /// Rate advertised on the WM5102 AIF2 ↔ WM8804 link.
    pub codec_link_rate: u32,
    /// S/PDIF receive path powered and routed to the codec.
    pub sync_path_enabled: bool,
    /// FLL1 source and output.
    pub fll1: FllMode,
    /// Directions holding applied parameters.
    pub streams: StreamSet,
}

impl ClockState {
    /// Attach-time state: default rate, FLL1 off, no stream, sync path down.
    pub const fn new(config: &CardConfig) -> Self {
        Self {
            card_rate: config.default_rate_hz,
            codec_link_rate: config.default_rate_hz,
            sync_path_enabled: false,
            fll1: FllMode::Off,
            streams: StreamSet::EMPTY,
        }
    }
}
