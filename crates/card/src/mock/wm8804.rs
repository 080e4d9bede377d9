//! Mock WM8804 for host-side testing
//!
//! Backed by a 64-byte register file so channel-status reads and masked
//! writes behave like the real part.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use platform::wm8804::{ClockSource, Divider};
use platform::{CodecError, SpdifTransceiver};

use super::{next_seq, CALL_LOG_CAPACITY};

const REGISTER_COUNT: usize = 0x40;

/// One recorded [`SpdifTransceiver`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XcvrCall {
    /// `read_register(reg)`
    ReadRegister(u8),
    /// `update_bits(reg, mask, value)`
    UpdateBits(u8, u8, u8),
    /// `set_pll(fref, fout)`
    SetPll(u32, u32),
    /// `set_sysclk(source, freq)`
    SetSysclk(ClockSource, u32),
    /// `set_clkdiv(divider, value)`
    SetClkdiv(Divider, u8),
}

struct State {
    regs: [u8; REGISTER_COUNT],
    log: Vec<(u32, XcvrCall), CALL_LOG_CAPACITY>,
    failing: Vec<XcvrCall, 8>,
}

/// Mock S/PDIF transceiver.
pub struct MockWm8804 {
    state: Mutex<CriticalSectionRawMutex, RefCell<State>>,
}

impl MockWm8804 {
    /// Create a mock with every register at zero.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(State {
                regs: [0; REGISTER_COUNT],
                log: Vec::new(),
                failing: Vec::new(),
            })),
        }
    }

    /// Preset a register without recording a call (models the receiver or
    /// power-on defaults).
    pub fn set_register(&self, reg: u8, value: u8) {
        self.state.lock(|s| {
            if let Some(r) = s.borrow_mut().regs.get_mut(usize::from(reg)) {
                *r = value;
            }
        });
    }

    /// Current register value without recording a call.
    pub fn register(&self, reg: u8) -> u8 {
        self.state
            .lock(|s| s.borrow().regs.get(usize::from(reg)).copied().unwrap_or(0))
    }

    /// Make every future occurrence of `call` fail with [`CodecError::Bus`].
    pub fn fail_on(&self, call: XcvrCall) {
        self.state.lock(|s| {
            let _ = s.borrow_mut().failing.push(call);
        });
    }

    /// Calls recorded so far, oldest first.
    pub fn calls(&self) -> Vec<XcvrCall, CALL_LOG_CAPACITY> {
        self.state
            .lock(|s| s.borrow().log.iter().map(|(_, call)| *call).collect())
    }

    /// Recorded writes only (`update_bits`).
    pub fn writes(&self) -> Vec<XcvrCall, CALL_LOG_CAPACITY> {
        self.state.lock(|s| {
            s.borrow()
                .log
                .iter()
                .map(|(_, call)| *call)
                .filter(|call| matches!(call, XcvrCall::UpdateBits(..)))
                .collect()
        })
    }

    /// Forget recorded calls (register file is kept).
    pub fn reset_calls(&self) {
        self.state.lock(|s| s.borrow_mut().log.clear());
    }

    /// Global sequence stamp of the first recorded occurrence of `call`.
    pub fn sequence_of(&self, call: &XcvrCall) -> Option<u32> {
        self.state.lock(|s| {
            s.borrow()
                .log
                .iter()
                .find(|(_, c)| c == call)
                .map(|(seq, _)| *seq)
        })
    }

    fn record(&self, call: XcvrCall) -> Result<(), CodecError> {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let _ = s.log.push((next_seq(), call));
            if s.failing.contains(&call) {
                Err(CodecError::Bus)
            } else {
                Ok(())
            }
        })
    }
}

impl Default for MockWm8804 {
    fn default() -> Self {
        Self::new()
    }
}

impl SpdifTransceiver for MockWm8804 {
    fn read_register(&self, reg: u8) -> Result<u8, CodecError> {
        self.record(XcvrCall::ReadRegister(reg))?;
        self.state.lock(|s| {
            s.borrow()
                .regs
                .get(usize::from(reg))
                .copied()
                .ok_or(CodecError::Rejected(-22))
        })
    }

    fn update_bits(&self, reg: u8, mask: u8, value: u8) -> Result<(), CodecError> {
        self.record(XcvrCall::UpdateBits(reg, mask, value))?;
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let r = s
                .regs
                .get_mut(usize::from(reg))
                .ok_or(CodecError::Rejected(-22))?;
            *r = (*r & !mask) | (value & mask);
            Ok(())
        })
    }

    fn set_pll(&self, fref: u32, fout: u32) -> Result<(), CodecError> {
        self.record(XcvrCall::SetPll(fref, fout))
    }

    fn set_sysclk(&self, source: ClockSource, freq: u32) -> Result<(), CodecError> {
        self.record(XcvrCall::SetSysclk(source, freq))
    }

    fn set_clkdiv(&self, divider: Divider, value: u8) -> Result<(), CodecError> {
        self.record(XcvrCall::SetClkdiv(divider, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_write_keeps_unmasked_bits() {
        let xcvr = MockWm8804::new();
        xcvr.set_register(0x15, 0xC0);
        xcvr.update_bits(0x15, 0x3F, 0xFF).unwrap();
        assert_eq!(xcvr.register(0x15), 0xFF);
        xcvr.update_bits(0x15, 0x3F, 0x00).unwrap();
        assert_eq!(xcvr.register(0x15), 0xC0);
    }

    #[test]
    fn test_out_of_range_register_is_rejected() {
        let xcvr = MockWm8804::new();
        assert_eq!(xcvr.read_register(0x7F), Err(CodecError::Rejected(-22)));
    }

    #[test]
    fn test_writes_filters_reads() {
        let xcvr = MockWm8804::new();
        xcvr.read_register(0x12).unwrap();
        xcvr.update_bits(0x12, 0xFF, 0x04).unwrap();
        assert_eq!(xcvr.writes().as_slice(), &[XcvrCall::UpdateBits(0x12, 0xFF, 0x04)]);
    }
}
