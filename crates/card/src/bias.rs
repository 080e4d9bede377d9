//! Bias-level callbacks.
//!
//! Only the primary codec domain matters: entering prepare from below starts
//! FLL1 from the local clock, reaching standby stops it. A failed stop is
//! logged and never blocks the transition.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use platform::{BiasLevel, BiasOps, CpuDai, FllCodec, PowerDomain, SpdifTransceiver};

use crate::card::Card;
use crate::error::Error;

impl<P, T, C, D, M> BiasOps for Card<P, T, C, D, M>
where
    P: FllCodec,
    T: SpdifTransceiver,
    C: CpuDai,
    D: DelayNs,
    M: RawMutex,
{
    type Error = Error;

    fn set_bias_level(
        &self,
        domain: PowerDomain,
        current: BiasLevel,
        target: BiasLevel,
    ) -> Result<(), Error> {
        if domain != PowerDomain::PrimaryCodec {
            return Ok(());
        }
        trace!("set_bias: {} -> {}", current.as_str(), target.as_str());
        if target == BiasLevel::Prepare && current != BiasLevel::On {
            self.clock.prepare()
        } else {
            Ok(())
        }
    }

    fn set_bias_level_post(&self, domain: PowerDomain, level: BiasLevel) -> Result<(), Error> {
        if domain != PowerDomain::PrimaryCodec {
            return Ok(());
        }
        trace!("set_bias_post: {}", level.as_str());
        if level == BiasLevel::Standby && self.clock.standby().is_err() {
            warn!("set_bias_post: standby proceeds with FLL1 reported off");
        }
        Ok(())
    }
}
