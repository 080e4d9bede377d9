//! Card error type.

use core::fmt;

use platform::CodecError;

/// Hardware operation issued by the card, used to name the step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Disable the FLL1 main path.
    ClearFll1,
    /// Disable the FLL1 reference path.
    ClearFll1Refclk,
    /// Lock FLL1 to MCLK1.
    EnableLocal,
    /// Prime the FLL1 reference path from MCLK1.
    PrimeRefclk,
    /// Lock FLL1 to the recovered AIF2 bit clock.
    EnableReferenced,
    /// CPU I²S bit-clock ratio.
    BclkRatio,
    /// AIF1 TDM slot layout.
    TdmSlot,
    /// Transceiver PLL.
    TransceiverPll,
    /// Transceiver TX clock source.
    TransceiverTxClock,
    /// WM5102 SYSCLK rate.
    Sysclk,
    /// Gate WM5102 SYSCLK.
    SysclkOff,
    /// 32 kHz clock source.
    Clock32k,
    /// Transceiver MCLK divider.
    MclkDivider,
    /// Transceiver CLKOUT source.
    Clkout,
    /// AIF1 clock domain.
    Aif1ClockDomain,
    /// AIF2 clock domain.
    Aif2ClockDomain,
    /// Transceiver register read.
    ReadStatus,
    /// Transceiver channel-status write.
    WriteStatus,
}

impl Step {
    /// Stable name for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClearFll1 => "clear FLL1",
            Self::ClearFll1Refclk => "clear FLL1 REFCLK",
            Self::EnableLocal => "set FLL1 from MCLK1",
            Self::PrimeRefclk => "set FLL1 REFCLK from MCLK1",
            Self::EnableReferenced => "set FLL1 from AIF2BCLK",
            Self::BclkRatio => "set bclk ratio",
            Self::TdmSlot => "set TDM slots",
            Self::TransceiverPll => "set WM8804 PLL",
            Self::TransceiverTxClock => "set WM8804 TX clock",
            Self::Sysclk => "set SYSCLK",
            Self::SysclkOff => "set SYSCLK to zero",
            Self::Clock32k => "set 32k clock source",
            Self::MclkDivider => "set WM8804 MCLK divider",
            Self::Clkout => "set WM8804 CLKOUT",
            Self::Aif1ClockDomain => "set AIF1 clock domain",
            Self::Aif2ClockDomain => "set AIF2 clock domain",
            Self::ReadStatus => "read WM8804 register",
            Self::WriteStatus => "write WM8804 channel status",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A codec or interface call failed.
    #[error("{step} failed: {source}")]
    Hardware {
        /// Operation that failed.
        step: Step,
        /// Component error.
        source: CodecError,
    },
    /// The CPU I²S interface binding was not supplied.
    #[error("i2s-controller binding missing")]
    MissingInterface,
    /// Write to a read-only control.
    #[error("control is read-only")]
    ReadOnly,
    /// Control value does not match the control kind.
    #[error("value does not match control kind")]
    InvalidValue,
}

impl Error {
    /// The failed hardware step, if this is a hardware error.
    pub const fn step(&self) -> Option<Step> {
        match self {
            Self::Hardware { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Attach a [`Step`] to a component result.
pub(crate) trait StepExt<T> {
    fn step(self, step: Step) -> Result<T, Error>;
}

impl<T> StepExt<T> for Result<T, CodecError> {
    fn step(self, step: Step) -> Result<T, Error> {
        self.map_err(|source| Error::Hardware { step, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardware_error_names_step() {
        let err: Result<(), Error> = Err(CodecError::Bus).step(Step::ClearFll1Refclk);
        assert_eq!(err.unwrap_err().step(), Some(Step::ClearFll1Refclk));
    }

    #[test]
    fn display_includes_step_and_source() {
        let err = Error::Hardware {
            step: Step::EnableLocal,
            source: CodecError::Rejected(-22),
        };
        assert_eq!(
            err.to_string(),
            "set FLL1 from MCLK1 failed: configuration rejected by component (code -22)"
        );
    }
}
