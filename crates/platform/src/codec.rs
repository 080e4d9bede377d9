//! Codec component abstractions
//!
//! The card drives three hardware components it does not own:
//!
//! - the primary codec ([`FllCodec`], WM5102-class) with its FLL1 and SYSCLK,
//! - the S/PDIF transceiver ([`SpdifTransceiver`], WM8804-class),
//! - the CPU-side I²S interface ([`CpuDai`]).
//!
//! All methods take `&self`: the components serialise their own control-bus
//! traffic (regmap-style), so the card can call them from any callback path
//! while it holds its clock lock. Every operation can fail with a
//! [`CodecError`].

use crate::{wm5102, wm8804};

/// Failure reported by a codec component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// The control-bus transaction did not complete (NACK, arbitration loss, timeout).
    #[error("control bus transaction failed")]
    Bus,
    /// The component refused the configuration; carries the component's error code.
    #[error("configuration rejected by component (code {0})")]
    Rejected(i32),
    /// The component does not implement this operation.
    #[error("operation not supported")]
    Unsupported,
}

/// Direction of a clock pin relative to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDirection {
    /// The clock is an input to the codec.
    In,
}

/// Primary codec (WM5102-class) with an internal frequency-locked loop.
pub trait FllCodec {
    /// Configure one FLL path.
    ///
    /// `source = FllSource::None` with both frequencies at 0 disables the path.
    fn set_pll(
        &self,
        target: wm5102::FllTarget,
        source: wm5102::FllSource,
        fref: u32,
        fout: u32,
    ) -> Result<(), CodecError>;

    /// Select the source and rate of a codec-internal clock. A frequency of 0
    /// gates the clock.
    fn set_sysclk(
        &self,
        clock: wm5102::ClockId,
        source: wm5102::ClockSource,
        freq: u32,
        direction: ClockDirection,
    ) -> Result<(), CodecError>;

    /// Read-modify-write of a register field.
    fn update_bits(&self, reg: u32, mask: u32, value: u32) -> Result<(), CodecError>;

    /// Configure the time-division slot geometry of the AIF1 interface.
    fn set_tdm_slot(
        &self,
        tx_mask: u32,
        rx_mask: u32,
        slots: u32,
        slot_width: u32,
    ) -> Result<(), CodecError>;

    /// Assign one of the codec's audio interfaces to a clock domain.
    fn set_dai_sysclk(&self, dai: wm5102::Dai, clock: wm5102::ClockId) -> Result<(), CodecError>;
}

/// S/PDIF transceiver (WM8804-class).
pub trait SpdifTransceiver {
    /// Read one 8-bit register.
    fn read_register(&self, reg: u8) -> Result<u8, CodecError>;

    /// Read-modify-write of a register field.
    fn update_bits(&self, reg: u8, mask: u8, value: u8) -> Result<(), CodecError>;

    /// Program the transceiver PLL from `fref` to `fout`.
    fn set_pll(&self, fref: u32, fout: u32) -> Result<(), CodecError>;

    /// Route a clock source to the transmitter or the CLKOUT pin.
    fn set_sysclk(&self, source: wm8804::ClockSource, freq: u32) -> Result<(), CodecError>;

    /// Program one of the transceiver's clock dividers.
    fn set_clkdiv(&self, divider: wm8804::Divider, value: u8) -> Result<(), CodecError>;
}

/// CPU-side serial audio interface (the I²S controller the card is bound to).
pub trait CpuDai {
    /// Set the bit-clock to frame-clock ratio.
    fn set_bclk_ratio(&self, ratio: u32) -> Result<(), CodecError>;
}

impl<T: FllCodec + ?Sized> FllCodec for &T {
    fn set_pll(
        &self,
        target: wm5102::FllTarget,
        source: wm5102::FllSource,
        fref: u32,
        fout: u32,
    ) -> Result<(), CodecError> {
        (**self).set_pll(target, source, fref, fout)
    }

    fn set_sysclk(
        &self,
        clock: wm5102::ClockId,
        source: wm5102::ClockSource,
        freq: u32,
        direction: ClockDirection,
    ) -> Result<(), CodecError> {
        (**self).set_sysclk(clock, source, freq, direction)
    }

    fn update_bits(&self, reg: u32, mask: u32, value: u32) -> Result<(), CodecError> {
        (**self).update_bits(reg, mask, value)
    }

    fn set_tdm_slot(
        &self,
        tx_mask: u32,
        rx_mask: u32,
        slots: u32,
        slot_width: u32,
    ) -> Result<(), CodecError> {
        (**self).set_tdm_slot(tx_mask, rx_mask, slots, slot_width)
    }

    fn set_dai_sysclk(&self, dai: wm5102::Dai, clock: wm5102::ClockId) -> Result<(), CodecError> {
        (**self).set_dai_sysclk(dai, clock)
    }
}

impl<T: SpdifTransceiver + ?Sized> SpdifTransceiver for &T {
    fn read_register(&self, reg: u8) -> Result<u8, CodecError> {
        (**self).read_register(reg)
    }

    fn update_bits(&self, reg: u8, mask: u8, value: u8) -> Result<(), CodecError> {
        (**self).update_bits(reg, mask, value)
    }

    fn set_pll(&self, fref: u32, fout: u32) -> Result<(), CodecError> {
        (**self).set_pll(fref, fout)
    }

    fn set_sysclk(&self, source: wm8804::ClockSource, freq: u32) -> Result<(), CodecError> {
        (**self).set_sysclk(source, freq)
    }

    fn set_clkdiv(&self, divider: wm8804::Divider, value: u8) -> Result<(), CodecError> {
        (**self).set_clkdiv(divider, value)
    }
}

impl<T: CpuDai + ?Sized> CpuDai for &T {
    fn set_bclk_ratio(&self, ratio: u32) -> Result<(), CodecError> {
        (**self).set_bclk_ratio(ratio)
    }
}
