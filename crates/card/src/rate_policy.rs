//! User-selected stream rate limits.
//!
//! Two enumerated selectors bound the rates a stream may negotiate:
//!
//! | index | Min Sample Rate | Max Sample Rate |
//! |-------|-----------------|-----------------|
//! | 0     | off             | off             |
//! | 1     | 32kHz           | 48kHz           |
//! | 2     | 44.1kHz         | 96kHz           |
//!
//! Out-of-range indices clamp to the last entry. The limits are applied as an
//! inclusive constraint when a stream opens; they never touch the clock lock.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use platform::RateWindow;

/// One selectable rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateOption {
    /// Rate in Hz, 0 = no limit.
    pub hz: u32,
    /// Display text.
    pub name: &'static str,
}

/// An enumerated rate selector's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateTable(&'static [RateOption]);

impl RateTable {
    /// Number of items.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; both tables have items.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Clamp `idx` to the last valid item.
    pub const fn clamp(&self, idx: usize) -> usize {
        let last = self.0.len().saturating_sub(1);
        if idx > last {
            last
        } else {
            idx
        }
    }

    /// Display text of item `idx` (clamped).
    pub fn item_name(&self, idx: usize) -> &'static str {
        self.0.get(self.clamp(idx)).map_or("", |o| o.name)
    }

    /// Rate of item `idx` (clamped), 0 = off.
    pub fn hz(&self, idx: usize) -> u32 {
        self.0.get(self.clamp(idx)).map_or(0, |o| o.hz)
    }
}

/// Lower-bound choices.
pub const MIN_RATES: RateTable = RateTable(&[
    RateOption { hz: 0, name: "off" },
    RateOption {
        hz: 32_000,
        name: "32kHz",
    },
    RateOption {
        hz: 44_100,
        name: "44.1kHz",
    },
]);

/// Upper-bound choices.
pub const MAX_RATES: RateTable = RateTable(&[
    RateOption { hz: 0, name: "off" },
    RateOption {
        hz: 48_000,
        name: "48kHz",
    },
    RateOption {
        hz: 96_000,
        name: "96kHz",
    },
]);

/// Attach-time lower bound: 32 kHz (the transceiver's lowest rate).
pub const DEFAULT_MIN_IDX: usize = 1;
/// Attach-time upper bound: off.
pub const DEFAULT_MAX_IDX: usize = 0;

/// Current min/max selection.
pub struct RatePolicy<M: RawMutex = CriticalSectionRawMutex> {
    min: Mutex<M, Cell<usize>>,
    max: Mutex<M, Cell<usize>>,
}

impl<M: RawMutex> RatePolicy<M> {
    /// Attach-time policy: min 32 kHz, max off.
    pub const fn new() -> Self {
        Self {
            min: Mutex::new(Cell::new(DEFAULT_MIN_IDX)),
            max: Mutex::new(Cell::new(DEFAULT_MAX_IDX)),
        }
    }

    /// Selected lower-bound index.
    pub fn min(&self) -> usize {
        self.min.lock(Cell::get)
    }

    /// Selected upper-bound index.
    pub fn max(&self) -> usize {
        self.max.lock(Cell::get)
    }

    /// Select a lower bound. Returns whether the selection changed.
    pub fn set_min(&self, idx: usize) -> bool {
        let idx = MIN_RATES.clamp(idx);
        self.min.lock(|cell| cell.replace(idx) != idx)
    }

    /// Select an upper bound. Returns whether the selection changed.
    pub fn set_max(&self, idx: usize) -> bool {
        let idx = MAX_RATES.clamp(idx);
        self.max.lock(|cell| cell.replace(idx) != idx)
    }

    /// Inclusive rate window for a stream opening now; `None` when both
    /// bounds are off.
    pub fn window(&self) -> Option<RateWindow> {
        let min = MIN_RATES.hz(self.min());
        let max = MAX_RATES.hz(self.max());
        if min == 0 && max == 0 {
            return None;
        }
        Some(RateWindow {
            min,
            max: if max == 0 { u32::MAX } else { max },
        })
    }
}

impl<M: RawMutex> Default for RatePolicy<M> {
    fn default() -> Self {
        Self::new()
    }
}
