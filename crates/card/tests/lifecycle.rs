//! Card attach, init hooks, late probe and detach.
// Integration test file: unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use card::mock::{Call, MockCpuDai, MockDelay, MockWm5102, MockWm8804, XcvrCall};
use card::{CardBuilder, CardConfig, Error, FllMode, Iec958Status, Step};
use embedded_hal_mock::eh1::delay::NoopDelay;
use platform::wm5102::{self, ClockId, ClockSource, Dai, FllSource, FllTarget};
use platform::wm8804::{self, Divider};
use platform::ClockDirection;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn attach_requires_cpu_interface() {
    let (codec, xcvr, delay) = (MockWm5102::new(), MockWm8804::new(), MockDelay::new());
    let result = CardBuilder::<_, _, &MockCpuDai, _>::new(&codec, &xcvr, &delay).attach();
    assert!(matches!(result, Err(Error::MissingInterface)));
    assert_eq!(codec.total_calls(), 0);
}

#[test]
fn attach_with_custom_config() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    let config = CardConfig {
        default_rate_hz: 48_000,
        ..CardConfig::default()
    };
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .config(config)
        .attach()
        .unwrap();
    assert_eq!(card.clock_state().card_rate, 48_000);
    assert_eq!(card.clock().config(), &config);
}

#[test]
fn primary_init_sequence() {
    init_logging();
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    card.init_primary().unwrap();
    assert_eq!(
        codec.calls().as_slice(),
        &[
            Call::UpdateBits(
                wm5102::CLOCK_32K_1,
                wm5102::CLK_32K_SRC_MASK,
                wm5102::CLK_32K_SRC_SYSCLK
            ),
            Call::SetPll(FllTarget::Fll1, FllSource::None, 0, 0),
            Call::SetPll(FllTarget::Fll1Refclk, FllSource::None, 0, 0),
            Call::SetSysclk(ClockId::Sysclk, ClockSource::Fll1, 0, ClockDirection::In),
        ]
    );
    assert_eq!(card.clock_state().fll1, FllMode::Off);
}

#[test]
fn primary_init_tolerates_clock_setup_failures() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    codec.fail_on(Call::UpdateBits(
        wm5102::CLOCK_32K_1,
        wm5102::CLK_32K_SRC_MASK,
        wm5102::CLK_32K_SRC_SYSCLK,
    ));
    codec.fail_on(Call::SetPll(FllTarget::Fll1, FllSource::None, 0, 0));
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    card.init_primary().unwrap();
    assert_eq!(codec.total_calls(), 4);
}

#[test]
fn primary_init_fails_when_sysclk_cannot_be_gated() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    codec.fail_on(Call::SetSysclk(
        ClockId::Sysclk,
        ClockSource::Fll1,
        0,
        ClockDirection::In,
    ));
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    let err = card.init_primary().unwrap_err();
    assert_eq!(err.step(), Some(Step::SysclkOff));
}

#[test]
fn transceiver_init_sequence() {
    init_logging();
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    xcvr.set_register(wm8804::SPDTX1, 0x04);
    xcvr.set_register(wm8804::SPDTX4, 0xF1);
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    card.init_transceiver().unwrap();

    assert_eq!(card.spdif().get(), Iec958Status([0x04, 0, 0, 0x31]));
    let calls = xcvr.calls();
    assert_eq!(
        &calls[4..],
        &[
            XcvrCall::SetClkdiv(Divider::Mclk, wm8804::MCLKDIV_256FS),
            XcvrCall::SetSysclk(wm8804::ClockSource::ClkoutOscillator, 12_000_000),
            XcvrCall::SetPll(12_000_000, 11_289_600),
            XcvrCall::SetSysclk(wm8804::ClockSource::TxPll, 11_289_600),
        ]
    );
}

#[test]
fn transceiver_init_stops_on_divider_failure() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    xcvr.fail_on(XcvrCall::SetClkdiv(Divider::Mclk, wm8804::MCLKDIV_256FS));
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    let err = card.init_transceiver().unwrap_err();
    assert_eq!(err.step(), Some(Step::MclkDivider));
    assert!(xcvr
        .calls()
        .iter()
        .all(|c| !matches!(c, XcvrCall::SetPll(..))));
}

#[test]
fn transceiver_init_survives_status_and_clkout_failures() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    xcvr.fail_on(XcvrCall::ReadRegister(wm8804::SPDTX2));
    xcvr.fail_on(XcvrCall::SetSysclk(
        wm8804::ClockSource::ClkoutOscillator,
        12_000_000,
    ));
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    card.init_transceiver().unwrap();
    assert_eq!(card.spdif().get(), Iec958Status::default());
}

#[test]
fn transceiver_init_returns_pll_failure() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    xcvr.fail_on(XcvrCall::SetPll(12_000_000, 11_289_600));
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    let err = card.init_transceiver().unwrap_err();
    assert_eq!(err.step(), Some(Step::TransceiverPll));
}

#[test]
fn late_probe_puts_both_interfaces_on_sysclk() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    card.late_probe().unwrap();
    assert_eq!(
        codec.calls().as_slice(),
        &[
            Call::SetDaiSysclk(Dai::Aif1, ClockId::Sysclk),
            Call::SetDaiSysclk(Dai::Aif2, ClockId::Sysclk),
        ]
    );
}

#[test]
fn late_probe_aif1_failure_is_fatal() {
    let (codec, xcvr, cpu) = (MockWm5102::new(), MockWm8804::new(), MockCpuDai::new());
    codec.fail_on(Call::SetDaiSysclk(Dai::Aif1, ClockId::Sysclk));
    let card = CardBuilder::new(&codec, &xcvr, NoopDelay::new())
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    let err = card.late_probe().unwrap_err();
    assert_eq!(err.step(), Some(Step::Aif1ClockDomain));
    assert_eq!(codec.total_calls(), 1);
}

#[test]
fn detach_hands_back_components() {
    let (codec, xcvr, cpu, delay) = (
        MockWm5102::new(),
        MockWm8804::new(),
        MockCpuDai::new(),
        MockDelay::new(),
    );
    let card = CardBuilder::new(&codec, &xcvr, &delay)
        .cpu_dai(&cpu)
        .attach()
        .unwrap();
    card.clock().prepare().unwrap();
    let parts = card.detach();
    assert!(std::ptr::eq(parts.primary, &codec));
    assert!(std::ptr::eq(parts.transceiver, &xcvr));
    assert!(std::ptr::eq(parts.cpu, &cpu));
    assert_eq!(parts.delay.total_us(), 1_500);
}
