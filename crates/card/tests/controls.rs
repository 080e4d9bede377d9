//! Mixer control surface: rate limits and IEC958 channel status.
// Integration test file: unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use card::mock::{MockCpuDai, MockDelay, MockWm5102, MockWm8804, XcvrCall};
use card::{
    Card, CardBuilder, ControlId, ControlKind, ControlValue, Error, Iec958Status, StatusFlag,
};
use platform::wm8804::{INTSTAT, RXCHAN1, RXCHAN4, SPDSTAT, SPDTX1, SPDTX4};
use platform::{PcmOps, PcmRuntime, RateWindow, StreamDirection};

type TestCard<'a> = Card<&'a MockWm5102, &'a MockWm8804, &'a MockCpuDai, &'a MockDelay>;

struct Rig {
    codec: MockWm5102,
    xcvr: MockWm8804,
    cpu: MockCpuDai,
    delay: MockDelay,
}

impl Rig {
    fn new() -> Self {
        Self {
            codec: MockWm5102::new(),
            xcvr: MockWm8804::new(),
            cpu: MockCpuDai::new(),
            delay: MockDelay::new(),
        }
    }

    fn card(&self) -> TestCard<'_> {
        CardBuilder::new(&self.codec, &self.xcvr, &self.delay)
            .cpu_dai(&self.cpu)
            .attach()
            .unwrap()
    }
}

fn get(card: &TestCard<'_>, name: &str) -> ControlValue {
    card.control_get(ControlId::from_name(name).unwrap())
        .unwrap()
}

#[test]
fn byte_three_is_masked_and_written_once() {
    let rig = Rig::new();
    let card = rig.card();
    let changed = card
        .control_put(
            ControlId::Iec958PlaybackDefault,
            ControlValue::Iec958(Iec958Status([0, 0, 0, 0xFF])),
        )
        .unwrap();
    assert!(changed);
    assert_eq!(
        rig.xcvr.writes().as_slice(),
        &[XcvrCall::UpdateBits(SPDTX4, 0x3F, 0x3F)]
    );
    assert_eq!(
        get(&card, "IEC958 Playback Default"),
        ControlValue::Iec958(Iec958Status([0, 0, 0, 0x3F]))
    );

    // rewriting the same value under the mask is a no-op
    let changed = card
        .control_put(
            ControlId::Iec958PlaybackDefault,
            ControlValue::Iec958(Iec958Status([0, 0, 0, 0x3F])),
        )
        .unwrap();
    assert!(!changed);
    assert_eq!(rig.xcvr.writes().len(), 1);
}

#[test]
fn playback_default_writes_each_changed_byte() {
    let rig = Rig::new();
    let card = rig.card();
    card.control_put(
        ControlId::Iec958PlaybackDefault,
        ControlValue::Iec958(Iec958Status([0x04, 0, 0x02, 0])),
    )
    .unwrap();
    assert_eq!(
        rig.xcvr.writes().as_slice(),
        &[
            XcvrCall::UpdateBits(SPDTX1, 0xFF, 0x04),
            XcvrCall::UpdateBits(SPDTX1 + 2, 0xFF, 0x02),
        ]
    );
    assert_eq!(rig.xcvr.register(SPDTX1), 0x04);
}

#[test]
fn mask_control_is_read_only() {
    let rig = Rig::new();
    let card = rig.card();
    assert_eq!(
        get(&card, "IEC958 Playback Mask"),
        ControlValue::Iec958(Iec958Status([0xFF, 0xFF, 0xFF, 0x3F]))
    );
    let err = card
        .control_put(
            ControlId::Iec958PlaybackMask,
            ControlValue::Iec958(Iec958Status::default()),
        )
        .unwrap_err();
    assert_eq!(err, Error::ReadOnly);
}

#[test]
fn capture_controls_read_live_registers() {
    let rig = Rig::new();
    let card = rig.card();
    rig.xcvr.set_register(RXCHAN1, 0x06);
    rig.xcvr.set_register(RXCHAN4, 0xC2);
    rig.xcvr.set_register(SPDSTAT, 0x20);
    rig.xcvr.set_register(INTSTAT, 0x02);

    assert_eq!(
        get(&card, "IEC958 Capture Default"),
        ControlValue::Iec958(Iec958Status([0x06, 0, 0, 0x02]))
    );
    assert_eq!(
        get(&card, "IEC958 Capture Recovered Frequency"),
        ControlValue::Enumerated(2)
    );
    assert_eq!(
        card.control_info(ControlId::RecoveredFrequency, 2).item_name,
        Some("44.1/48 kHz")
    );
    // SPDSTAT bit 6 clear: locked
    assert_eq!(get(&card, "IEC958 Capture Lock Flag"), ControlValue::Boolean(true));
    assert_eq!(get(&card, "IEC958 Capture Audio Flag"), ControlValue::Boolean(true));
    assert_eq!(get(&card, "IEC958 Capture Invalid Flag"), ControlValue::Boolean(true));
    assert_eq!(
        get(&card, "IEC958 Capture TransErr Flag"),
        ControlValue::Boolean(false)
    );

    rig.xcvr.set_register(SPDSTAT, 0x40);
    assert_eq!(
        card.control_get(ControlId::Flag(StatusFlag::Lock)).unwrap(),
        ControlValue::Boolean(false)
    );
    assert_eq!(
        get(&card, "IEC958 Capture Recovered Frequency"),
        ControlValue::Enumerated(0)
    );
}

#[test]
fn rate_limits_clamp_and_constrain_streams() {
    let rig = Rig::new();
    let card = rig.card();
    assert_eq!(get(&card, "Min Sample Rate"), ControlValue::Enumerated(1));
    assert_eq!(get(&card, "Max Sample Rate"), ControlValue::Enumerated(0));

    assert!(card
        .control_put(ControlId::MaxSampleRate, ControlValue::Enumerated(9))
        .unwrap());
    assert_eq!(get(&card, "Max Sample Rate"), ControlValue::Enumerated(2));
    assert!(card
        .control_put(ControlId::MinSampleRate, ControlValue::Enumerated(2))
        .unwrap());
    assert!(!card
        .control_put(ControlId::MinSampleRate, ControlValue::Enumerated(2))
        .unwrap());

    let mut rt = PcmRuntime::new();
    card.startup(StreamDirection::Playback, &mut rt).unwrap();
    assert_eq!(
        rt.rate_constraint(),
        Some(RateWindow {
            min: 44_100,
            max: 96_000
        })
    );
}

#[test]
fn enum_info_clamps_item_index() {
    let rig = Rig::new();
    let card = rig.card();
    let info = card.control_info(ControlId::MinSampleRate, 7);
    assert_eq!(info.kind, ControlKind::Enumerated { items: 3 });
    assert_eq!(info.count, 1);
    assert_eq!(info.item_name, Some("44.1kHz"));
    assert_eq!(
        card.control_info(ControlId::MaxSampleRate, 1).item_name,
        Some("48kHz")
    );
    assert_eq!(
        card.control_info(ControlId::Iec958PlaybackDefault, 0).kind,
        ControlKind::Iec958
    );
}

#[test]
fn hardware_status_controls_report_volatile() {
    let rig = Rig::new();
    let card = rig.card();
    assert!(card.control_info(ControlId::Flag(StatusFlag::Lock), 0).volatile);
    assert!(card.control_info(ControlId::RecoveredFrequency, 0).volatile);
    assert!(card.control_info(ControlId::Iec958CaptureDefault, 0).volatile);
    assert!(!card.control_info(ControlId::Iec958PlaybackDefault, 0).volatile);
    assert!(!card.control_info(ControlId::Iec958PlaybackMask, 0).volatile);
    assert!(!card.control_info(ControlId::MinSampleRate, 0).volatile);
}

#[test]
fn kind_mismatch_is_rejected() {
    let rig = Rig::new();
    let card = rig.card();
    assert_eq!(
        card.control_put(ControlId::MinSampleRate, ControlValue::Boolean(true)),
        Err(Error::InvalidValue)
    );
    assert_eq!(
        card.control_put(
            ControlId::Flag(StatusFlag::Lock),
            ControlValue::Boolean(true)
        ),
        Err(Error::ReadOnly)
    );
    assert!(rig.xcvr.writes().is_empty());
}

#[test]
fn status_read_failure_is_reported() {
    let rig = Rig::new();
    let card = rig.card();
    rig.xcvr.fail_on(XcvrCall::ReadRegister(SPDSTAT));
    let err = card
        .control_get(ControlId::Flag(StatusFlag::Copyright))
        .unwrap_err();
    assert_eq!(err.step(), Some(card::Step::ReadStatus));
    // the cached playback status needs no bus access
    assert!(card.control_get(ControlId::Iec958PlaybackDefault).is_ok());
}
