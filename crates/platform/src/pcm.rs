//! PCM stream callbacks
//!
//! The audio framework calls a card's [`PcmOps`] as streams move through
//! their lifecycle: `startup` on open, `hw_params` once the format and rate
//! are negotiated, `hw_free` when the stream releases its parameters.
//! `hw_params` may be called several times for one open stream.

use crate::audio_types::{RateWindow, SampleRateHz, SampleWidth};

/// Stream direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamDirection {
    /// CPU → codec.
    Playback,
    /// Codec → CPU.
    Capture,
}

impl StreamDirection {
    /// Bit position of this direction in a direction set.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Playback => 1 << 0,
            Self::Capture => 1 << 1,
        }
    }

    /// Short lowercase name for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Playback => "playback",
            Self::Capture => "capture",
        }
    }
}

/// Negotiated hardware parameters of one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HwParams {
    /// Frame rate.
    pub rate: SampleRateHz,
    /// Sample width of the selected format.
    pub width: SampleWidth,
}

impl HwParams {
    /// Build parameters from a validated rate and width.
    pub const fn new(rate: SampleRateHz, width: SampleWidth) -> Self {
        Self { rate, width }
    }
}

/// Per-stream runtime the card may constrain during `startup`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PcmRuntime {
    rate: Option<RateWindow>,
}

impl PcmRuntime {
    /// Fresh runtime with no constraints.
    pub const fn new() -> Self {
        Self { rate: None }
    }

    /// Restrict the stream to rates inside `window` (inclusive).
    pub fn constrain_rate(&mut self, window: RateWindow) {
        self.rate = Some(window);
    }

    /// The rate constraint installed by the card, if any.
    pub fn rate_constraint(&self) -> Option<RateWindow> {
        self.rate
    }
}

/// Card-level PCM stream callbacks.
pub trait PcmOps {
    /// Error type
    type Error: core::fmt::Debug;

    /// Stream open.
    fn startup(
        &self,
        direction: StreamDirection,
        runtime: &mut PcmRuntime,
    ) -> Result<(), Self::Error>;

    /// Apply negotiated parameters.
    fn hw_params(&self, direction: StreamDirection, params: &HwParams) -> Result<(), Self::Error>;

    /// Release parameters applied by `hw_params`.
    fn hw_free(&self, direction: StreamDirection) -> Result<(), Self::Error>;
}
