//! Power-domain (bias level) callbacks
//!
//! Each power domain (the card itself and every codec component) walks the
//! bias ladder `Off → Standby → Prepare → On` and back. The framework calls
//! [`BiasOps::set_bias_level`] before a domain changes level and
//! [`BiasOps::set_bias_level_post`] after it has changed.

/// Bias level of a power domain, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiasLevel {
    /// Fully powered down.
    Off,
    /// Low-power idle, references up.
    Standby,
    /// Transitional level while powering up or down.
    Prepare,
    /// Fully on.
    On,
}

impl BiasLevel {
    /// Short lowercase name for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Standby => "standby",
            Self::Prepare => "prepare",
            Self::On => "on",
        }
    }
}

/// Power domains the framework reports bias changes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerDomain {
    /// The card-level domain.
    Card,
    /// The primary codec (WM5102) component.
    PrimaryCodec,
    /// The S/PDIF transceiver (WM8804) component.
    Transceiver,
}

/// Card-level bias callbacks.
pub trait BiasOps {
    /// Error type
    type Error: core::fmt::Debug;

    /// Called before `domain` moves from `current` to `target`.
    ///
    /// An `Err` is reported by the framework but does not stop the move: the
    /// power bookkeeping follows the power tree regardless.
    fn set_bias_level(
        &self,
        domain: PowerDomain,
        current: BiasLevel,
        target: BiasLevel,
    ) -> Result<(), Self::Error>;

    /// Called after `domain` reached `level`.
    ///
    /// The level has already been reached, so an `Err` is informational and
    /// the power sequence proceeds regardless. Implementations log clock
    /// teardown failures and return `Ok`.
    fn set_bias_level_post(&self, domain: PowerDomain, level: BiasLevel)
        -> Result<(), Self::Error>;
}
