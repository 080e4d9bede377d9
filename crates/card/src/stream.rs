//! PCM stream callbacks.
//!
//! `hw_params` runs entirely under the clock lock: interface formats first,
//! then the transceiver PLL, SYSCLK and, if the rate family changed while FLL1
//! runs locally, an FLL1 re-target.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use platform::wm5102::{ClockId, ClockSource};
use platform::{
    wm8804, ClockDirection, CpuDai, FllCodec, HwParams, PcmOps, PcmRuntime, SpdifTransceiver,
    StreamDirection,
};

use crate::card::Card;
use crate::config::{TDM_SLOTS, TDM_SLOT_MASK};
use crate::error::{Error, Step, StepExt};

impl<P, T, C, D, M> PcmOps for Card<P, T, C, D, M>
where
    P: FllCodec,
    T: SpdifTransceiver,
    C: CpuDai,
    D: DelayNs,
    M: RawMutex,
{
    type Error = Error;

    fn startup(&self, direction: StreamDirection, runtime: &mut PcmRuntime) -> Result<(), Error> {
        if let Some(window) = self.policy.window() {
            trace!(
                "startup {}: rate {}..={}",
                direction.as_str(),
                window.min,
                window.max
            );
            runtime.constrain_rate(window);
        }
        Ok(())
    }

    fn hw_params(&self, direction: StreamDirection, params: &HwParams) -> Result<(), Error> {
        let rate = params.rate.get();
        let width = params.width.bits();
        self.clock.transition(|t| -> Result<(), Error> {
            let clk = t.config().sysclk_for(rate);
            debug!(
                "hw_params {}: rate {} width {} sysclk {}",
                direction.as_str(),
                rate,
                width,
                clk
            );

            self.cpu
                .set_bclk_ratio(params.width.stereo_bclk_ratio())
                .step(Step::BclkRatio)
                .inspect_err(|_| {
                    error!("hw_params: failed to set bclk ratio");
                })?;
            t.codec()
                .set_tdm_slot(TDM_SLOT_MASK, TDM_SLOT_MASK, TDM_SLOTS, width)
                .step(Step::TdmSlot)
                .inspect_err(|_| {
                    error!("hw_params: failed to set TDM slots");
                })?;

            if rate >= wm8804::MIN_RATE_HZ {
                self.set_transceiver_pll(rate)?;
            }

            t.codec()
                .set_sysclk(ClockId::Sysclk, ClockSource::Fll1, clk, ClockDirection::In)
                .step(Step::Sysclk)
                .inspect_err(|_| {
                    error!("Failed to set WM5102 SYSCLK to {}", clk);
                })?;

            t.retarget_local(rate)?;
            t.commit_stream(direction, rate);
            Ok(())
        })
    }

    fn hw_free(&self, direction: StreamDirection) -> Result<(), Error> {
        trace!("hw_free {}", direction.as_str());
        self.clock.release(direction)
    }
}
