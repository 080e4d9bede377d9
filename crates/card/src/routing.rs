//! Widget power events: the S/PDIF receive path selects the FLL1 reference.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use platform::{CpuDai, FllCodec, SpdifTransceiver, WidgetEvent, WidgetEventHandler};

use crate::card::Card;
use crate::error::Error;
use crate::topology::SPDIF_RX_WIDGET;

impl<P, T, C, D, M> WidgetEventHandler for Card<P, T, C, D, M>
where
    P: FllCodec,
    T: SpdifTransceiver,
    C: CpuDai,
    D: DelayNs,
    M: RawMutex,
{
    type Error = Error;

    fn widget_event(&self, widget: &str, event: WidgetEvent) -> Result<(), Error> {
        if widget != SPDIF_RX_WIDGET {
            return Ok(());
        }
        match event {
            WidgetEvent::PostPowerUp => {
                if self.clock.sync_path_up().is_err() {
                    warn!("spdif_rx: sync path up without a locked FLL1");
                }
                Ok(())
            }
            WidgetEvent::PostPowerDown => {
                debug!("spdif_rx: sync path down");
                self.clock.sync_path_down();
                Ok(())
            }
            WidgetEvent::PrePowerUp | WidgetEvent::PrePowerDown => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardBuilder;
    use crate::clock::FllMode;
    use crate::mock::{MockCpuDai, MockDelay, MockWm5102, MockWm8804};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn sync_path_follows_rx_widget() {
        let (codec, xcvr, cpu, delay) = (
            MockWm5102::new(),
            MockWm8804::new(),
            MockCpuDai::new(),
            MockDelay::new(),
        );
        let card = CardBuilder::new(&codec, &xcvr, &delay)
            .cpu_dai(&cpu)
            .raw_mutex::<NoopRawMutex>()
            .attach()
            .unwrap();

        card.widget_event("Dummy Output", WidgetEvent::PostPowerUp)
            .unwrap();
        card.widget_event(SPDIF_RX_WIDGET, WidgetEvent::PrePowerUp)
            .unwrap();
        assert_eq!(codec.total_calls(), 0);

        card.widget_event(SPDIF_RX_WIDGET, WidgetEvent::PostPowerUp)
            .unwrap();
        let state = card.clock_state();
        assert!(state.sync_path_enabled);
        assert_eq!(state.fll1, FllMode::Referenced(45_158_400));

        card.widget_event(SPDIF_RX_WIDGET, WidgetEvent::PostPowerDown)
            .unwrap();
        let state = card.clock_state();
        assert!(!state.sync_path_enabled);
        // FLL1 keeps the recovered reference until the next prepare
        assert_eq!(state.fll1, FllMode::Referenced(45_158_400));
    }
}
