//! Mock CPU I²S interface for host-side testing

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::{CodecError, CpuDai};

use super::next_seq;

/// Mock CPU DAI: remembers the last bit-clock ratio.
pub struct MockCpuDai {
    /// `(sequence stamp, ratio)` of the last accepted `set_bclk_ratio`.
    last: Mutex<CriticalSectionRawMutex, Cell<Option<(u32, u32)>>>,
    fail: Mutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl MockCpuDai {
    /// Create a mock that accepts every ratio.
    pub fn new() -> Self {
        Self {
            last: Mutex::new(Cell::new(None)),
            fail: Mutex::new(Cell::new(false)),
        }
    }

    /// Make `set_bclk_ratio` fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        self.fail.lock(|f| f.set(fail));
    }

    /// Last accepted bit-clock ratio.
    pub fn bclk_ratio(&self) -> Option<u32> {
        self.last.lock(|l| l.get().map(|(_, ratio)| ratio))
    }

    /// Global sequence stamp of the last accepted `set_bclk_ratio`.
    pub fn sequence(&self) -> Option<u32> {
        self.last.lock(|l| l.get().map(|(seq, _)| seq))
    }
}

impl Default for MockCpuDai {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuDai for MockCpuDai {
    fn set_bclk_ratio(&self, ratio: u32) -> Result<(), CodecError> {
        if self.fail.lock(Cell::get) {
            return Err(CodecError::Rejected(-22));
        }
        self.last.lock(|l| l.set(Some((next_seq(), ratio))));
        Ok(())
    }
}
