//! Card context and lifecycle
//!
//! [`Card`] owns every piece of card state and the handles to the three
//! hardware components. It is created by [`CardBuilder::attach`], then the
//! framework runs the per-link init hooks ([`Card::init_primary`],
//! [`Card::init_transceiver`]) followed by [`Card::late_probe`]. From then on
//! the stream, bias and widget callbacks may arrive from any context.
//!
//! # Dependency Injection
//!
//! ```rust,ignore
//! let card = CardBuilder::new(wm5102, wm8804, delay)
//!     .cpu_dai(i2s)
//!     .attach()?;
//! card.init_primary()?;
//! card.init_transceiver()?;
//! card.late_probe()?;
//! ```

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embedded_hal::delay::DelayNs;
use platform::wm5102::{self, ClockId, ClockSource, Dai};
use platform::wm8804::{self, Divider};
use platform::{
    ClockDirection, CpuDai, FllCodec, HwParams, SampleRateHz, SampleWidth, SpdifTransceiver,
};

use crate::clock::{ClockController, ClockState};
use crate::config::CardConfig;
use crate::error::{Error, Step, StepExt};
use crate::rate_policy::RatePolicy;
use crate::spdif::SpdifCache;

/// Collects the component handles for [`Card`].
pub struct CardBuilder<P, T, C, D, M: RawMutex = CriticalSectionRawMutex> {
    primary: P,
    transceiver: T,
    cpu: Option<C>,
    delay: D,
    config: CardConfig,
    _mutex: core::marker::PhantomData<M>,
}

impl<P, T, C, D> CardBuilder<P, T, C, D> {
    /// Start a card from its two codecs and the settle delay.
    pub fn new(primary: P, transceiver: T, delay: D) -> Self {
        Self {
            primary,
            transceiver,
            cpu: None,
            delay,
            config: CardConfig::default(),
            _mutex: core::marker::PhantomData,
        }
    }
}

impl<P, T, C, D, M: RawMutex> CardBuilder<P, T, C, D, M> {
    /// Bind the CPU I²S interface (required).
    #[must_use]
    pub fn cpu_dai(mut self, cpu: C) -> Self {
        self.cpu = Some(cpu);
        self
    }

    /// Override the board configuration.
    #[must_use]
    pub fn config(mut self, config: CardConfig) -> Self {
        self.config = config;
        self
    }

    /// Select the raw mutex guarding card state (e.g. `NoopRawMutex` when
    /// every callback runs in one execution context).
    ///
    /// The clock lock is held across codec bus transfers and the FLL settle
    /// delay. With the default `CriticalSectionRawMutex` that keeps
    /// interrupts masked for the whole transition, 1.5 ms or more on a
    /// rate change.
    pub fn raw_mutex<M2: RawMutex>(self) -> CardBuilder<P, T, C, D, M2> {
        CardBuilder {
            primary: self.primary,
            transceiver: self.transceiver,
            cpu: self.cpu,
            delay: self.delay,
            config: self.config,
            _mutex: core::marker::PhantomData,
        }
    }
}

impl<P, T, C, D, M> CardBuilder<P, T, C, D, M>
where
    P: FllCodec,
    T: SpdifTransceiver,
    C: CpuDai,
    D: DelayNs,
    M: RawMutex,
{
    /// Create the card state.
    ///
    /// # Errors
    ///
    /// [`Error::MissingInterface`] if no CPU I²S interface was bound.
    pub fn attach(self) -> Result<Card<P, T, C, D, M>, Error> {
        let Some(cpu) = self.cpu else {
            error!("i2s-controller missing");
            return Err(Error::MissingInterface);
        };
        info!(
            "attaching card: mclk {} Hz, default rate {} Hz",
            self.config.master_clock_hz,
            self.config.default_rate_hz
        );
        Ok(Card {
            clock: ClockController::new(self.primary, self.delay, self.config),
            transceiver: self.transceiver,
            cpu,
            policy: RatePolicy::new(),
            spdif: SpdifCache::new(),
        })
    }
}

/// Hardware handles returned by [`Card::detach`].
pub struct Parts<P, T, C, D> {
    /// Primary codec.
    pub primary: P,
    /// S/PDIF transceiver.
    pub transceiver: T,
    /// CPU I²S interface.
    pub cpu: C,
    /// Settle delay.
    pub delay: D,
}

/// The audio card.
///
/// `M` guards the clock domain, the rate policy and the channel-status
/// cache. The default `CriticalSectionRawMutex` is sound from any context
/// but masks interrupts while a clock transition talks to the codec and
/// waits out the settle delay. Where all callbacks come from one thread or
/// one executor, pick a non-masking mutex through
/// [`CardBuilder::raw_mutex`].
pub struct Card<P, T, C, D, M: RawMutex = CriticalSectionRawMutex> {
    pub(crate) clock: ClockController<P, D, M>,
    pub(crate) transceiver: T,
    pub(crate) cpu: C,
    pub(crate) policy: RatePolicy<M>,
    pub(crate) spdif: SpdifCache<M>,
}

impl<P, T, C, D, M> Card<P, T, C, D, M>
where
    P: FllCodec,
    T: SpdifTransceiver,
    C: CpuDai,
    D: DelayNs,
    M: RawMutex,
{
    /// Init hook of the WM5102 link.
    ///
    /// Derives the 32 kHz clock from SYSCLK, stops FLL1 (best effort) and
    /// gates SYSCLK.
    pub fn init_primary(&self) -> Result<(), Error> {
        let codec = self.clock.codec();
        // no 32 kHz input on this card
        if codec
            .update_bits(
                wm5102::CLOCK_32K_1,
                wm5102::CLK_32K_SRC_MASK,
                wm5102::CLK_32K_SRC_SYSCLK,
            )
            .step(Step::Clock32k)
            .is_err()
        {
            warn!("init_wm5102: failed to set 32k clock source");
        }
        if self.clock.clear().is_err() {
            warn!("init_wm5102: failed to clear FLLs");
        }
        codec
            .set_sysclk(ClockId::Sysclk, ClockSource::Fll1, 0, ClockDirection::In)
            .step(Step::SysclkOff)
            .inspect_err(|_| {
                error!("Failed to set SYSCLK to Zero");
            })
    }

    /// Init hook of the WM8804 link.
    ///
    /// Seeds the channel-status cache, selects 256 fs MCLK, routes the
    /// oscillator to CLKOUT and programs the PLL for the default rate.
    pub fn init_transceiver(&self) -> Result<(), Error> {
        if self.spdif.load(&self.transceiver).is_err() {
            warn!("init_wm8804: failed to read channel status");
        }
        self.transceiver
            .set_clkdiv(Divider::Mclk, wm8804::MCLKDIV_256FS)
            .step(Step::MclkDivider)
            .inspect_err(|_| {
                error!("init_wm8804: Failed to set MCLK_DIV to 256fs");
            })?;
        if self
            .transceiver
            .set_sysclk(wm8804::ClockSource::ClkoutOscillator, wm8804::CLKOUT_HZ)
            .step(Step::Clkout)
            .is_err()
        {
            error!("init_wm8804: Failed to set CLKOUT as OSC Frequency");
        }
        let rate = self.clock.config().default_rate_hz;
        self.set_transceiver_pll(rate).inspect_err(|_| {
            error!("init_wm8804: Failed to setup PLL for {}Hz", rate);
        })
    }

    /// Runs once every link is initialised: puts both WM5102 interfaces in
    /// the SYSCLK domain.
    pub fn late_probe(&self) -> Result<(), Error> {
        let [b0, b1, b2, b3] = self.spdif.get().0;
        debug!("iec958_bits: {} {} {} {}", b0, b1, b2, b3);
        let codec = self.clock.codec();
        codec
            .set_dai_sysclk(Dai::Aif1, ClockId::Sysclk)
            .step(Step::Aif1ClockDomain)
            .inspect_err(|_| {
                error!("Failed to set WM5102 codec dai clk domain");
            })?;
        codec
            .set_dai_sysclk(Dai::Aif2, ClockId::Sysclk)
            .step(Step::Aif2ClockDomain)
            .inspect_err(|_| {
                error!("Failed to set WM8804 codec dai clk domain");
            })
    }

    /// Program the transceiver PLL for `rate` (256 fs) and clock the
    /// transmitter from it.
    pub(crate) fn set_transceiver_pll(&self, rate: u32) -> Result<(), Error> {
        let mclk = rate.saturating_mul(wm8804::PLL_FS_RATIO);
        self.transceiver
            .set_pll(self.clock.config().master_clock_hz, mclk)
            .step(Step::TransceiverPll)
            .inspect_err(|_| {
                error!("Failed to set WM8804 PLL to {}", mclk);
            })?;
        self.transceiver
            .set_sysclk(wm8804::ClockSource::TxPll, mclk)
            .step(Step::TransceiverTxClock)
            .inspect_err(|_| {
                error!("Failed to set MCLK as PLL Output");
            })
    }
}

impl<P, T, C, D, M: RawMutex> Card<P, T, C, D, M> {
    /// Snapshot of the clock-domain state.
    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    /// The clock-domain controller.
    pub fn clock(&self) -> &ClockController<P, D, M> {
        &self.clock
    }

    /// Parameters of the WM5102 AIF2 ↔ WM8804 link: S24_LE at the rate of
    /// the last negotiated stream, the default rate before that.
    ///
    /// `None` only when the configured default rate is not a valid stream
    /// rate and no stream was negotiated yet.
    pub fn codec_link_params(&self) -> Option<HwParams> {
        let rate = SampleRateHz::new(self.clock.state().codec_link_rate).ok()?;
        Some(HwParams::new(rate, SampleWidth::S24))
    }

    /// The rate policy.
    pub fn rate_policy(&self) -> &RatePolicy<M> {
        &self.policy
    }

    /// The transmit channel-status cache.
    pub fn spdif(&self) -> &SpdifCache<M> {
        &self.spdif
    }

    /// The primary codec.
    pub fn primary(&self) -> &P {
        self.clock.codec()
    }

    /// The S/PDIF transceiver.
    pub fn transceiver(&self) -> &T {
        &self.transceiver
    }

    /// The CPU I²S interface.
    pub fn cpu_dai(&self) -> &C {
        &self.cpu
    }

    /// Tear the card down, dropping all card state and handing back the
    /// component handles.
    pub fn detach(self) -> Parts<P, T, C, D> {
        info!("detaching card");
        let (primary, delay) = self.clock.into_parts();
        Parts {
            primary,
            transceiver: self.transceiver,
            cpu: self.cpu,
            delay,
        }
    }
}
