//! WM5102 (Arizona) clocking identifiers and register constants.
//!
//! Reference: Wolfson/Cirrus WM5102 datasheet Rev 4.2, §4.15 (clocking and
//! FLL), and the Arizona register map.
//!
//! # FLL1 paths
//!
//! FLL1 has two independently armed inputs:
//!
//! - the main path ([`FllTarget::Fll1`]) that synthesises the FLL output,
//! - the synchroniser/reference path ([`FllTarget::Fll1Refclk`]) used when the
//!   main path tracks a recovered clock.
//!
//! Both must be disabled before the FLL is re-targeted; the hardware silently
//! misbehaves if a local and a recovered source are armed at the same time.

/// Register: 32 kHz clock configuration.
pub const CLOCK_32K_1: u32 = 0x0100;
/// CLOCK_32K_1 field: 32 kHz clock source select, bits \[1:0\].
pub const CLK_32K_SRC_MASK: u32 = 0x0003;
/// CLK_32K_SRC value: derive the 32 kHz clock from SYSCLK (no 32 kHz input on the card).
pub const CLK_32K_SRC_SYSCLK: u32 = 0x0002;

/// Maximum SYSCLK for the 4 kHz rate family (48 kHz multiples): 49.152 MHz.
pub const MAX_SYSCLK_4K_FAMILY: u32 = 49_152_000;
/// Maximum SYSCLK for the 11.025 kHz rate family (44.1 kHz multiples): 45.1584 MHz.
pub const MAX_SYSCLK_11K_FAMILY: u32 = 45_158_400;

/// FLL path selector passed to [`crate::FllCodec::set_pll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FllTarget {
    /// FLL1 main path.
    Fll1,
    /// FLL1 reference (synchroniser) path.
    Fll1Refclk,
}

/// FLL reference input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FllSource {
    /// Path disabled.
    None,
    /// MCLK1 pin, fed by the transceiver CLKOUT (12 MHz oscillator).
    Mclk1,
    /// Bit clock of AIF2, recovered from the S/PDIF receive stream.
    Aif2Bclk,
}

/// Codec-internal clock selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockId {
    /// SYSCLK, the clock domain of the audio interfaces and DSP.
    Sysclk,
}

/// Source feeding a codec-internal clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// FLL1 output.
    Fll1,
}

/// WM5102 digital audio interfaces used by the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dai {
    /// AIF1, the I²S link to the CPU.
    Aif1,
    /// AIF2, the codec-to-codec link to the S/PDIF transceiver.
    Aif2,
}
