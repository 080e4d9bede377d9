//! Recording delay for host-side testing

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;

/// Delay that returns immediately and accumulates the requested time.
pub struct MockDelay {
    total_ns: Mutex<CriticalSectionRawMutex, Cell<u64>>,
    count: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl MockDelay {
    /// Create a delay with nothing accumulated.
    pub fn new() -> Self {
        Self {
            total_ns: Mutex::new(Cell::new(0)),
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Sum of all requested delays, in microseconds.
    pub fn total_us(&self) -> u64 {
        self.total_ns.lock(Cell::get) / 1_000
    }

    /// Number of delay requests.
    pub fn count(&self) -> u32 {
        self.count.lock(Cell::get)
    }

    fn add(&self, ns: u64) {
        self.total_ns.lock(|t| t.set(t.get().saturating_add(ns)));
        self.count.lock(|c| c.set(c.get().saturating_add(1)));
    }
}

impl Default for MockDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for &MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.add(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.add(u64::from(us).saturating_mul(1_000));
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        (&*self).delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        (&*self).delay_us(us);
    }
}
