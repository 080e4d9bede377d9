//! S/PDIF (IEC 60958) channel status
//!
//! The card mirrors the four transmit channel-status bytes of the WM8804 in
//! a small cache so the playback control can be read without bus traffic,
//! and exposes the receiver's live status through [`status`].
//!
//! Only bits \[5:0\] of the fourth byte exist in the transceiver, so byte 3 is
//! masked with `0x3F` everywhere it is read, written or compared.

pub mod status;

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use platform::wm8804::{SPDTX1, SPDTX4};
use platform::SpdifTransceiver;

use crate::error::{Error, Step, StepExt};

pub use status::{RecoveredFrequency, StatusFlag};

/// Significant bits of each channel-status byte.
pub const STATUS_MASK: [u8; 4] = [0xFF, 0xFF, 0xFF, 0x3F];

/// Four channel-status bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Iec958Status(pub [u8; 4]);

impl Iec958Status {
    /// The mask view: `{0xFF, 0xFF, 0xFF, 0x3F}`.
    pub const MASK: Self = Self(STATUS_MASK);

    /// Copy with every byte reduced to its significant bits.
    #[must_use]
    pub fn masked(self) -> Self {
        let mut out = self.0;
        for (byte, mask) in out.iter_mut().zip(STATUS_MASK) {
            *byte &= mask;
        }
        Self(out)
    }
}

/// Cached transmit channel status.
pub struct SpdifCache<M: RawMutex = CriticalSectionRawMutex> {
    status: Mutex<M, Cell<Iec958Status>>,
}

impl<M: RawMutex> SpdifCache<M> {
    /// Empty cache (all zero).
    pub const fn new() -> Self {
        Self {
            status: Mutex::new(Cell::new(Iec958Status([0; 4]))),
        }
    }

    /// Cached bytes.
    pub fn get(&self) -> Iec958Status {
        self.status.lock(Cell::get)
    }

    /// Seed the cache from SPDTX1..SPDTX4.
    pub fn load<T: SpdifTransceiver>(&self, xcvr: &T) -> Result<(), Error> {
        let mut bytes = [0u8; 4];
        for (reg, byte) in (SPDTX1..=SPDTX4).zip(bytes.iter_mut()) {
            *byte = xcvr.read_register(reg).step(Step::ReadStatus)?;
        }
        let status = Iec958Status(bytes).masked();
        self.status.lock(|cell| cell.set(status));
        Ok(())
    }

    /// Store `new` and write each byte that differs (under the mask) to its
    /// SPDTX register. Returns whether anything changed.
    ///
    /// A failed write stops the update; bytes before it are kept in both the
    /// cache and the transceiver, the failing byte and those after it are not.
    pub fn set<T: SpdifTransceiver>(&self, xcvr: &T, new: Iec958Status) -> Result<bool, Error> {
        self.status.lock(|cell| {
            let mut current = cell.get();
            let mut changed = false;
            let mut result = Ok(());
            for (reg, ((cur, want), mask)) in (SPDTX1..=SPDTX4)
                .zip(current.0.iter_mut().zip(new.0).zip(STATUS_MASK))
            {
                let want = want & mask;
                if *cur & mask == want {
                    continue;
                }
                if let Err(e) = xcvr.update_bits(reg, mask, want).step(Step::WriteStatus) {
                    error!("Failed to write channel status register {}", reg);
                    result = Err(e);
                    break;
                }
                *cur = want;
                changed = true;
            }
            cell.set(current);
            result.map(|()| changed)
        })
    }
}

impl<M: RawMutex> Default for SpdifCache<M> {
    fn default() -> Self {
        Self::new()
    }
}
