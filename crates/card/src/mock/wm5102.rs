//! Mock WM5102 for host-side testing

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use platform::wm5102::{ClockId, ClockSource, Dai, FllSource, FllTarget};
use platform::{ClockDirection, CodecError, FllCodec};

use super::{next_seq, CALL_LOG_CAPACITY};

/// One recorded [`FllCodec`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// `set_pll(target, source, fref, fout)`
    SetPll(FllTarget, FllSource, u32, u32),
    /// `set_sysclk(clock, source, freq, direction)`
    SetSysclk(ClockId, ClockSource, u32, ClockDirection),
    /// `update_bits(reg, mask, value)`
    UpdateBits(u32, u32, u32),
    /// `set_tdm_slot(tx_mask, rx_mask, slots, slot_width)`
    SetTdmSlot(u32, u32, u32, u32),
    /// `set_dai_sysclk(dai, clock)`
    SetDaiSysclk(Dai, ClockId),
}

#[derive(Default)]
struct State {
    log: Vec<(u32, Call), CALL_LOG_CAPACITY>,
    total: usize,
    failing: Vec<Call, 8>,
    fll1: Option<(FllSource, u32)>,
    fll1_refclk: Option<(FllSource, u32)>,
    sysclk_hz: u32,
}

/// Mock primary codec: records calls and models which FLL1 paths are armed.
pub struct MockWm5102 {
    state: Mutex<CriticalSectionRawMutex, RefCell<State>>,
}

impl MockWm5102 {
    /// Create a mock that accepts every call.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(State::default())),
        }
    }

    /// Make every future occurrence of `call` fail with [`CodecError::Bus`].
    pub fn fail_on(&self, call: Call) {
        self.state.lock(|s| {
            let _ = s.borrow_mut().failing.push(call);
        });
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        self.state.lock(|s| s.borrow_mut().failing.clear());
    }

    /// Calls recorded so far, oldest first.
    pub fn calls(&self) -> Vec<Call, CALL_LOG_CAPACITY> {
        self.state
            .lock(|s| s.borrow().log.iter().map(|(_, call)| *call).collect())
    }

    /// Forget recorded calls (armed-path model is kept).
    pub fn reset_calls(&self) {
        self.state.lock(|s| s.borrow_mut().log.clear());
    }

    /// Total calls made, including those past the log capacity.
    pub fn total_calls(&self) -> usize {
        self.state.lock(|s| s.borrow().total)
    }

    /// Global sequence stamp of the first recorded occurrence of `call`.
    pub fn sequence_of(&self, call: &Call) -> Option<u32> {
        self.state.lock(|s| {
            s.borrow()
                .log
                .iter()
                .find(|(_, c)| c == call)
                .map(|(seq, _)| *seq)
        })
    }

    /// Source and output of the FLL1 main path, `None` if disabled.
    pub fn fll1(&self) -> Option<(FllSource, u32)> {
        self.state.lock(|s| s.borrow().fll1)
    }

    /// Source and output of the FLL1 reference path, `None` if disabled.
    pub fn fll1_refclk(&self) -> Option<(FllSource, u32)> {
        self.state.lock(|s| s.borrow().fll1_refclk)
    }

    /// Current SYSCLK rate (0 = gated).
    pub fn sysclk_hz(&self) -> u32 {
        self.state.lock(|s| s.borrow().sysclk_hz)
    }

    fn record(&self, call: Call) -> Result<(), CodecError> {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.total = s.total.saturating_add(1);
            let _ = s.log.push((next_seq(), call));
            if s.failing.contains(&call) {
                return Err(CodecError::Bus);
            }
            match call {
                Call::SetPll(target, source, _, fout) => {
                    let armed = (source != FllSource::None).then_some((source, fout));
                    match target {
                        FllTarget::Fll1 => s.fll1 = armed,
                        FllTarget::Fll1Refclk => s.fll1_refclk = armed,
                    }
                }
                Call::SetSysclk(_, _, freq, _) => s.sysclk_hz = freq,
                _ => {}
            }
            Ok(())
        })
    }
}

impl Default for MockWm5102 {
    fn default() -> Self {
        Self::new()
    }
}

impl FllCodec for MockWm5102 {
    fn set_pll(
        &self,
        target: FllTarget,
        source: FllSource,
        fref: u32,
        fout: u32,
    ) -> Result<(), CodecError> {
        self.record(Call::SetPll(target, source, fref, fout))
    }

    fn set_sysclk(
        &self,
        clock: ClockId,
        source: ClockSource,
        freq: u32,
        direction: ClockDirection,
    ) -> Result<(), CodecError> {
        self.record(Call::SetSysclk(clock, source, freq, direction))
    }

    fn update_bits(&self, reg: u32, mask: u32, value: u32) -> Result<(), CodecError> {
        self.record(Call::UpdateBits(reg, mask, value))
    }

    fn set_tdm_slot(
        &self,
        tx_mask: u32,
        rx_mask: u32,
        slots: u32,
        slot_width: u32,
    ) -> Result<(), CodecError> {
        self.record(Call::SetTdmSlot(tx_mask, rx_mask, slots, slot_width))
    }

    fn set_dai_sysclk(&self, dai: Dai, clock: ClockId) -> Result<(), CodecError> {
        self.record(Call::SetDaiSysclk(dai, clock))
    }
}
