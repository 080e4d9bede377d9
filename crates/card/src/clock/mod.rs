//! FLL1 clock domain
//!
//! WM5102 SYSCLK is produced by FLL1, which can lock to one of two physical
//! references:
//!
//! - **local**: MCLK1, the 12 MHz crystal output of the WM8804 (`CLKOUT`),
//! - **referenced**: the AIF2 bit clock, recovered by the WM8804 from the
//!   incoming S/PDIF stream (64 × fs). The FLL1 reference path is primed from
//!   MCLK1 at the same time so the synchroniser has a monitor clock.
//!
//! Arming both at once makes the FLL misbehave, so every switch goes through
//! "clear both paths, then enable exactly one". The FLL1 output frequency
//! depends only on the rate family (see [`select_family`]).

pub mod controller;
pub mod state;

pub use controller::ClockController;
pub(crate) use controller::Transition;
pub use state::{ClockState, FllMode, StreamSet};

use platform::wm5102::{MAX_SYSCLK_11K_FAMILY, MAX_SYSCLK_4K_FAMILY};

/// SYSCLK / FLL1 output for `rate` on the reference card:
/// 49.152 MHz when `rate` is a multiple of 4 kHz, 45.1584 MHz otherwise.
pub const fn select_family(rate: u32) -> u32 {
    if rate % 4_000 == 0 {
        MAX_SYSCLK_4K_FAMILY
    } else {
        MAX_SYSCLK_11K_FAMILY
    }
}
