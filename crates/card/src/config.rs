//! Card configuration.
//!
//! Board constants live here as `const` items; [`CardConfig`] bundles the ones
//! a board variant may need to change, with [`Default`] describing the
//! reference card (WM5102 + WM8804 with a 12 MHz crystal on the transceiver).
//!
//! # Clock Tree
//!
//! ```text
//!   WM8804 XTAL (12 MHz) -> CLKOUT -> WM5102 MCLK1 -> FLL1 (local)    -> SYSCLK
//!   S/PDIF in -> WM8804 -> AIF2 BCLK (64 fs)       -> FLL1 (referenced) -> SYSCLK
//!
//!   SYSCLK = 49.152 MHz   for the 4 kHz family   (8k, 16k, 32k, 48k, 96k, 192k)
//!   SYSCLK = 45.1584 MHz  for the 11.025 kHz family (11.025k, 22.05k, 44.1k, ...)
//! ```

use platform::{wm5102, wm8804};

/// Master clock fed to WM5102 MCLK1 from the transceiver CLKOUT pin.
pub const MASTER_CLOCK_HZ: u32 = wm8804::CLKOUT_HZ;

/// Rate assumed before any stream has negotiated one.
pub const DEFAULT_RATE_HZ: u32 = 44_100;

/// Time FLL1 is given to lock after each reconfiguration (1–2 ms window).
pub const FLL_SETTLE_US: u32 = 1_500;

/// AIF2 bit clock as a multiple of the frame rate (2 × 32-bit slots).
pub const AIF2_BCLK_FS_RATIO: u32 = 64;

/// AIF1 TDM slot mask: two active slots, both directions.
pub const TDM_SLOT_MASK: u32 = 0x03;

/// AIF1 TDM slot count.
pub const TDM_SLOTS: u32 = 2;

/// Board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardConfig {
    /// Frequency of the MCLK1 reference.
    pub master_clock_hz: u32,
    /// Initial `card_rate` and codec-link rate.
    pub default_rate_hz: u32,
    /// Blocking delay after each FLL1 reconfiguration, in microseconds.
    pub settle_delay_us: u32,
    /// SYSCLK for rates that are multiples of 4 kHz.
    pub sysclk_4k_family_hz: u32,
    /// SYSCLK for the 11.025 kHz family.
    pub sysclk_11k_family_hz: u32,
}

impl CardConfig {
    /// Reference card configuration.
    pub const fn new() -> Self {
        Self {
            master_clock_hz: MASTER_CLOCK_HZ,
            default_rate_hz: DEFAULT_RATE_HZ,
            settle_delay_us: FLL_SETTLE_US,
            sysclk_4k_family_hz: wm5102::MAX_SYSCLK_4K_FAMILY,
            sysclk_11k_family_hz: wm5102::MAX_SYSCLK_11K_FAMILY,
        }
    }

    /// SYSCLK / FLL1 output frequency for `rate`.
    pub const fn sysclk_for(&self, rate: u32) -> u32 {
        if rate % 4_000 == 0 {
            self.sysclk_4k_family_hz
        } else {
            self.sysclk_11k_family_hz
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self::new()
    }
}
