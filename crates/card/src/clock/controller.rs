//! FLL1 clock-domain controller.
//!
//! One blocking mutex guards the [`ClockState`] together with the settle
//! delay. Every entry point takes the lock for its whole transition,
//! hardware calls included, so transitions triggered from stream, bias and
//! widget callbacks are totally ordered.
//!
//! # Transition rules
//!
//! - FLL1 is only re-targeted from `Off`: any switch first clears both FLL1
//!   paths and only proceeds if both disables succeeded.
//! - A failed enable leaves the state at `Off`. The controller never records
//!   a mode the hardware did not acknowledge.
//! - `sync_path_enabled` never coexists with `FllMode::Local`.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use platform::wm5102::{ClockId, ClockSource, FllSource, FllTarget};
use platform::{ClockDirection, FllCodec, StreamDirection};

use super::state::{ClockState, FllMode};
use crate::config::{CardConfig, AIF2_BCLK_FS_RATIO};
use crate::error::{Error, Step, StepExt};

struct Inner<D> {
    state: ClockState,
    delay: D,
}

/// Owner of FLL1 and the SYSCLK gate of the primary codec.
pub struct ClockController<P, D, M: RawMutex = CriticalSectionRawMutex> {
    codec: P,
    config: CardConfig,
    inner: Mutex<M, RefCell<Inner<D>>>,
}

impl<P, D, M: RawMutex> ClockController<P, D, M> {
    /// The primary codec.
    pub fn codec(&self) -> &P {
        &self.codec
    }

    /// Board configuration.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ClockState {
        self.inner.lock(|inner| inner.borrow().state)
    }

    /// Drop the state and hand back the codec and the delay.
    pub(crate) fn into_parts(self) -> (P, D) {
        let Inner { delay, .. } = self.inner.into_inner().into_inner();
        (self.codec, delay)
    }
}

impl<P, D, M> ClockController<P, D, M>
where
    P: FllCodec,
    D: DelayNs,
    M: RawMutex,
{
    /// Create a controller in the attach-time state (FLL1 off).
    pub(crate) fn new(codec: P, delay: D, config: CardConfig) -> Self {
        Self {
            codec,
            inner: Mutex::new(RefCell::new(Inner {
                state: ClockState::new(&config),
                delay,
            })),
            config,
        }
    }

    /// Run `f` with the clock lock held.
    ///
    /// Must not be re-entered from inside `f`.
    pub(crate) fn transition<R>(&self, f: impl FnOnce(&mut Transition<'_, P, D>) -> R) -> R {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let Inner { state, delay } = &mut *inner;
            let mut t = Transition {
                codec: &self.codec,
                config: &self.config,
                state,
                delay,
            };
            f(&mut t)
        })
    }

    /// Disable both FLL1 paths.
    pub(crate) fn clear(&self) -> Result<(), Error> {
        self.transition(|t| t.clear())
    }

    /// Lock FLL1 to the local master clock for `rate`.
    #[cfg(test)]
    pub(crate) fn enable_local(&self, rate: u32) -> Result<(), Error> {
        self.transition(|t| t.enable_local(rate))
    }

    /// Lock FLL1 to the recovered S/PDIF clock for `rate`.
    #[cfg(test)]
    pub(crate) fn enable_referenced(&self, rate: u32) -> Result<(), Error> {
        self.transition(|t| t.enable_referenced(rate))
    }

    /// The S/PDIF receive path powered up: switch FLL1 to the recovered clock.
    ///
    /// On failure FLL1 is reported `Off` and the sync path stays down.
    pub fn sync_path_up(&self) -> Result<(), Error> {
        self.transition(|t| {
            let rate = t.state.card_rate;
            debug!(
                "spdif_rx: changing FLL1 to use Ref Clock clk: {} spdif: {}",
                t.config.sysclk_for(rate),
                rate.saturating_mul(AIF2_BCLK_FS_RATIO)
            );
            if let Err(e) = t.clear() {
                error!("spdif_rx: failed to clear FLLs");
                t.state.fll1 = FllMode::Off;
                return Err(e);
            }
            if let Err(e) = t.enable_referenced(rate) {
                error!("spdif_rx: failed to set FLLs");
                return Err(e);
            }
            t.state.sync_path_enabled = true;
            Ok(())
        })
    }

    /// The S/PDIF receive path powered down. FLL1 is left as is.
    pub fn sync_path_down(&self) {
        self.transition(|t| t.state.sync_path_enabled = false);
    }

    /// Codec domain entering prepare from below: make sure FLL1 runs from the
    /// local clock at the card rate, unless the sync path owns it.
    ///
    /// Both paths are cleared before locking, even from `Off`: a failed
    /// clear reports `Off` while a path may still be armed.
    pub fn prepare(&self) -> Result<(), Error> {
        self.transition(|t| {
            if t.state.sync_path_enabled {
                return Ok(());
            }
            let rate = t.state.card_rate;
            let clk = t.config.sysclk_for(rate);
            if t.state.fll1 == FllMode::Local(clk) {
                return Ok(());
            }
            debug!(
                "set_bias: changing FLL1 from {} {} to {}",
                t.state.fll1.as_str(),
                t.state.fll1.frequency().unwrap_or(0),
                clk
            );
            if let Err(e) = t.clear() {
                error!("set_bias: failed to clear FLLs");
                return Err(e);
            }
            t.enable_local(rate).inspect_err(|_| {
                error!("set_bias: Failed to set FLL1");
            })
        })
    }

    /// Codec domain reached standby: stop FLL1.
    ///
    /// A failed clear is reported but FLL1 is recorded `Off` regardless, so
    /// the next prepare clears again before re-locking.
    pub fn standby(&self) -> Result<(), Error> {
        self.transition(|t| {
            debug!(
                "set_bias_post: changing FLL1 from {} {} to off",
                t.state.fll1.as_str(),
                t.state.fll1.frequency().unwrap_or(0)
            );
            if let Err(e) = t.clear() {
                error!("set_bias_post: failed to clear FLLs");
                t.state.fll1 = FllMode::Off;
                return Err(e);
            }
            Ok(())
        })
    }

    /// A stream released its parameters. Gates SYSCLK when it was the last one.
    pub fn release(&self, direction: StreamDirection) -> Result<(), Error> {
        self.transition(|t| {
            let before = t.state.streams;
            t.state.streams.remove(direction);
            if !t.state.streams.is_empty() || before.is_empty() {
                return Ok(());
            }
            debug!("hw_free: Setting SYSCLK to Zero");
            t.codec
                .set_sysclk(ClockId::Sysclk, ClockSource::Fll1, 0, ClockDirection::In)
                .step(Step::SysclkOff)
                .inspect_err(|_| {
                    error!("hw_free: Failed to set SYSCLK to Zero");
                })
        })
    }
}

/// Exclusive access to the clock state and the primary codec, handed out by
/// [`ClockController::transition`].
pub(crate) struct Transition<'a, P, D> {
    codec: &'a P,
    config: &'a CardConfig,
    state: &'a mut ClockState,
    delay: &'a mut D,
}

impl<P: FllCodec, D: DelayNs> Transition<'_, P, D> {
    /// The primary codec.
    pub(crate) fn codec(&self) -> &P {
        self.codec
    }

    /// Board configuration.
    pub(crate) fn config(&self) -> &CardConfig {
        self.config
    }

    fn settle(&mut self) {
        self.delay.delay_us(self.config.settle_delay_us);
    }

    /// Disable the FLL1 main path, then the reference path.
    ///
    /// Both are always attempted; the first failure is returned. The state
    /// becomes `Off` only if both succeeded.
    pub(crate) fn clear(&mut self) -> Result<(), Error> {
        let main = self
            .codec
            .set_pll(FllTarget::Fll1, FllSource::None, 0, 0)
            .step(Step::ClearFll1);
        let refclk = self
            .codec
            .set_pll(FllTarget::Fll1Refclk, FllSource::None, 0, 0)
            .step(Step::ClearFll1Refclk);
        if main.is_err() {
            warn!("setting FLL1 to zero failed");
        }
        if refclk.is_err() {
            warn!("setting FLL1_REFCLK to zero failed");
        }
        main.and(refclk)?;
        self.state.fll1 = FllMode::Off;
        Ok(())
    }

    /// Lock FLL1 to MCLK1. The settle delay runs whether or not the codec
    /// accepted the configuration.
    pub(crate) fn enable_local(&mut self, rate: u32) -> Result<(), Error> {
        let clk = self.config.sysclk_for(rate);
        let result = self
            .codec
            .set_pll(
                FllTarget::Fll1,
                FllSource::Mclk1,
                self.config.master_clock_hz,
                clk,
            )
            .step(Step::EnableLocal);
        self.settle();
        match result {
            Ok(()) => {
                debug!("FLL1 locked to MCLK1 at {}", clk);
                self.state.fll1 = FllMode::Local(clk);
            }
            Err(_) => {
                error!("Failed to set FLL1 to {}", clk);
                self.state.fll1 = FllMode::Off;
            }
        }
        result
    }

    /// Prime the FLL1 reference path from MCLK1, then lock FLL1 to the AIF2
    /// bit clock (64 × `rate`).
    pub(crate) fn enable_referenced(&mut self, rate: u32) -> Result<(), Error> {
        let clk = self.config.sysclk_for(rate);
        let bclk = rate.saturating_mul(AIF2_BCLK_FS_RATIO);
        if let Err(e) = self
            .codec
            .set_pll(
                FllTarget::Fll1Refclk,
                FllSource::Mclk1,
                self.config.master_clock_hz,
                clk,
            )
            .step(Step::PrimeRefclk)
        {
            error!("Failed to set FLL1_REFCLK to {}", clk);
            self.state.fll1 = FllMode::Off;
            return Err(e);
        }
        let result = self
            .codec
            .set_pll(FllTarget::Fll1, FllSource::Aif2Bclk, bclk, clk)
            .step(Step::EnableReferenced);
        self.settle();
        match result {
            Ok(()) => {
                debug!("FLL1 locked to AIF2BCLK {} at {}", bclk, clk);
                self.state.fll1 = FllMode::Referenced(clk);
            }
            Err(_) => {
                error!("Failed to set FLL1 with Sync Clock {} to {}", bclk, clk);
                self.state.fll1 = FllMode::Off;
            }
        }
        result
    }

    /// Follow a rate change while FLL1 runs from the local clock: clear, then
    /// re-lock at the new family frequency. No-op in any other mode or when
    /// the family is unchanged.
    pub(crate) fn retarget_local(&mut self, rate: u32) -> Result<(), Error> {
        let clk = self.config.sysclk_for(rate);
        match self.state.fll1 {
            FllMode::Local(current) if current != clk => {
                debug!("hw_params: changing FLL1 from {} to {}", current, clk);
                if let Err(e) = self.clear() {
                    error!("hw_params: failed to clear FLLs");
                    return Err(e);
                }
                self.enable_local(rate).inspect_err(|_| {
                    error!("hw_params: failed to set FLL");
                })
            }
            _ => Ok(()),
        }
    }

    /// Record a successful parameter negotiation for `direction` at `rate`.
    pub(crate) fn commit_stream(&mut self, direction: StreamDirection, rate: u32) {
        self.state.card_rate = rate;
        self.state.codec_link_rate = rate;
        self.state.streams.insert(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockDelay, MockWm5102};

    type Controller<'a> = ClockController<&'a MockWm5102, &'a MockDelay>;

    fn controller<'a>(codec: &'a MockWm5102, delay: &'a MockDelay) -> Controller<'a> {
        ClockController::new(codec, delay, CardConfig::default())
    }

    #[test]
    fn clear_issues_main_then_refclk() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.clear().unwrap();
        assert_eq!(
            codec.calls().as_slice(),
            &[
                Call::SetPll(FllTarget::Fll1, FllSource::None, 0, 0),
                Call::SetPll(FllTarget::Fll1Refclk, FllSource::None, 0, 0),
            ]
        );
        assert_eq!(delay.total_us(), 0);
    }

    #[test]
    fn clear_attempts_refclk_after_main_failure() {
        let codec = MockWm5102::new();
        codec.fail_on(Call::SetPll(FllTarget::Fll1, FllSource::None, 0, 0));
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.enable_local(48_000).unwrap();
        let err = ctl.clear().unwrap_err();
        assert_eq!(err.step(), Some(Step::ClearFll1));
        assert_eq!(codec.calls().len(), 3);
        assert_eq!(ctl.state().fll1, FllMode::Local(49_152_000));
    }

    #[test]
    fn enable_local_settles_once() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.enable_local(44_100).unwrap();
        assert_eq!(ctl.state().fll1, FllMode::Local(45_158_400));
        assert_eq!(delay.total_us(), 1_500);
        assert_eq!(
            codec.calls().as_slice(),
            &[Call::SetPll(
                FllTarget::Fll1,
                FllSource::Mclk1,
                12_000_000,
                45_158_400
            )]
        );
    }

    #[test]
    fn failed_enable_reports_off() {
        let codec = MockWm5102::new();
        codec.fail_on(Call::SetPll(
            FllTarget::Fll1,
            FllSource::Mclk1,
            12_000_000,
            49_152_000,
        ));
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        let err = ctl.enable_local(96_000).unwrap_err();
        assert_eq!(err.step(), Some(Step::EnableLocal));
        assert_eq!(ctl.state().fll1, FllMode::Off);
        // settle delay still honoured after a rejected reconfiguration
        assert_eq!(delay.total_us(), 1_500);
    }

    #[test]
    fn referenced_primes_refclk_first() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.enable_referenced(48_000).unwrap();
        assert_eq!(
            codec.calls().as_slice(),
            &[
                Call::SetPll(
                    FllTarget::Fll1Refclk,
                    FllSource::Mclk1,
                    12_000_000,
                    49_152_000
                ),
                Call::SetPll(FllTarget::Fll1, FllSource::Aif2Bclk, 3_072_000, 49_152_000),
            ]
        );
        assert_eq!(ctl.state().fll1, FllMode::Referenced(49_152_000));
    }

    #[test]
    fn referenced_prime_failure_skips_main_path() {
        let codec = MockWm5102::new();
        codec.fail_on(Call::SetPll(
            FllTarget::Fll1Refclk,
            FllSource::Mclk1,
            12_000_000,
            45_158_400,
        ));
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        let err = ctl.enable_referenced(44_100).unwrap_err();
        assert_eq!(err.step(), Some(Step::PrimeRefclk));
        assert_eq!(codec.calls().len(), 1);
        assert_eq!(delay.total_us(), 0);
    }

    #[test]
    fn prepare_from_referenced_clears_first() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.sync_path_up().unwrap();
        ctl.sync_path_down();
        codec.reset_calls();
        ctl.prepare().unwrap();
        let calls = codec.calls();
        assert_eq!(
            calls.first(),
            Some(&Call::SetPll(FllTarget::Fll1, FllSource::None, 0, 0))
        );
        assert_eq!(ctl.state().fll1, FllMode::Local(45_158_400));
    }

    #[test]
    fn prepare_from_off_still_clears_first() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.prepare().unwrap();
        assert_eq!(
            codec.calls().as_slice(),
            &[
                Call::SetPll(FllTarget::Fll1, FllSource::None, 0, 0),
                Call::SetPll(FllTarget::Fll1Refclk, FllSource::None, 0, 0),
                Call::SetPll(FllTarget::Fll1, FllSource::Mclk1, 12_000_000, 45_158_400),
            ]
        );
    }

    #[test]
    fn prepare_aborts_when_clear_fails() {
        let codec = MockWm5102::new();
        codec.fail_on(Call::SetPll(FllTarget::Fll1Refclk, FllSource::None, 0, 0));
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        let err = ctl.prepare().unwrap_err();
        assert_eq!(err.step(), Some(Step::ClearFll1Refclk));
        assert_eq!(codec.fll1(), None);
        assert_eq!(ctl.state().fll1, FllMode::Off);
        assert_eq!(delay.total_us(), 0);
    }

    #[test]
    fn standby_clear_failure_reports_off() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.prepare().unwrap();
        codec.fail_on(Call::SetPll(FllTarget::Fll1, FllSource::None, 0, 0));
        let err = ctl.standby().unwrap_err();
        assert_eq!(err.step(), Some(Step::ClearFll1));
        assert_eq!(ctl.state().fll1, FllMode::Off);
    }

    #[test]
    fn sync_path_clear_failure_reports_off() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.prepare().unwrap();
        codec.fail_on(Call::SetPll(FllTarget::Fll1Refclk, FllSource::None, 0, 0));
        let err = ctl.sync_path_up().unwrap_err();
        assert_eq!(err.step(), Some(Step::ClearFll1Refclk));
        let state = ctl.state();
        assert_eq!(state.fll1, FllMode::Off);
        assert!(!state.sync_path_enabled);
        assert_eq!(codec.fll1_refclk(), None);
    }

    #[test]
    fn release_without_params_is_silent() {
        let codec = MockWm5102::new();
        let delay = MockDelay::new();
        let ctl = controller(&codec, &delay);
        ctl.release(StreamDirection::Playback).unwrap();
        assert!(codec.calls().is_empty());
    }
}
