//! Mock components for host-side testing
//!
//! Each mock implements one platform component trait without any hardware
//! dependency, records every call for assertion in tests, and can be told to
//! fail specific calls. All of them are `Sync` (state lives behind an
//! embassy-sync critical-section mutex), so one card can be driven from
//! several threads.
//!
//! Every recorded call is stamped from a single sequence counter, so the
//! relative order of calls across different mocks can be checked with
//! `sequence_of`.

use core::sync::atomic::{AtomicU32, Ordering};

mod cpu_dai;
mod delay;
mod wm5102;
mod wm8804;

pub use cpu_dai::MockCpuDai;
pub use delay::MockDelay;
pub use wm5102::{Call, MockWm5102};
pub use wm8804::{MockWm8804, XcvrCall};

/// Capacity of each mock's call log.
pub const CALL_LOG_CAPACITY: usize = 128;

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

fn next_seq() -> u32 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}
