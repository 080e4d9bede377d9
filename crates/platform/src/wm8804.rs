//! WM8804 S/PDIF transceiver register map.
//!
//! Reference: Wolfson WM8804 datasheet Rev 4.3, register map (§12).
//!
//! All registers are 8 bits wide. The transmit channel-status block lives in
//! SPDTX1..SPDTX4, the received block in RXCHAN1..RXCHAN4. Only bits \[5:0\] of
//! the fourth byte are implemented; the top two bits read back as zero and
//! must be masked off whenever the block is compared.

/// 12 MHz crystal oscillator, also routed to CLKOUT as the WM5102 MCLK1.
pub const CLKOUT_HZ: u32 = 12_000_000;

/// Interrupt status (read clears).
pub const INTSTAT: u8 = 0x0B;
/// S/PDIF receiver status.
pub const SPDSTAT: u8 = 0x0C;
/// Received channel status, byte 1.
pub const RXCHAN1: u8 = 0x0D;
/// Received channel status, byte 4.
pub const RXCHAN4: u8 = 0x10;
/// Transmitted channel status, byte 1.
pub const SPDTX1: u8 = 0x12;
/// Transmitted channel status, byte 2.
pub const SPDTX2: u8 = 0x13;
/// Transmitted channel status, byte 3.
pub const SPDTX3: u8 = 0x14;
/// Transmitted channel status, byte 4.
pub const SPDTX4: u8 = 0x15;

/// SPDSTAT bit: audio (set when the stream is *not* audio).
pub const SPDSTAT_AUDIO_N: u8 = 0;
/// SPDSTAT bit: non-PCM data.
pub const SPDSTAT_PCM_N: u8 = 1;
/// SPDSTAT bit: copyright (set when *not* copyrighted).
pub const SPDSTAT_CPY_N: u8 = 2;
/// SPDSTAT bit: de-emphasis.
pub const SPDSTAT_DEEMPH: u8 = 3;
/// SPDSTAT field: recovered frequency, bits \[5:4\].
pub const SPDSTAT_REC_FREQ_SHIFT: u8 = 4;
/// SPDSTAT field mask (after shifting) for the recovered frequency.
pub const SPDSTAT_REC_FREQ_MASK: u8 = 0x03;
/// SPDSTAT bit: receiver unlocked.
pub const SPDSTAT_UNLOCK: u8 = 6;
/// INTSTAT bit: invalid sample.
pub const INTSTAT_INVALID: u8 = 1;
/// INTSTAT bit: transmission error.
pub const INTSTAT_TRANS_ERR: u8 = 3;

/// Clock source selector for [`crate::SpdifTransceiver::set_sysclk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Transmitter clocked from the internal PLL (`WM8804_TX_CLKSRC_PLL`).
    TxPll,
    /// CLKOUT pin driven from the crystal oscillator (`WM8804_CLKOUT_SRC_OSCCLK`).
    ClkoutOscillator,
}

/// Clock divider selector for [`crate::SpdifTransceiver::set_clkdiv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Divider {
    /// MCLK divider (`WM8804_MCLK_DIV`).
    Mclk,
}

/// MCLK divider value: MCLK = 256 × fs.
pub const MCLKDIV_256FS: u8 = 0;

/// Transceiver PLL output as a multiple of the sample rate.
pub const PLL_FS_RATIO: u32 = 256;

/// Lowest sample rate the transceiver PLL supports.
pub const MIN_RATE_HZ: u32 = 32_000;
