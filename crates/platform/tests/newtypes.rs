//! Type system enforcement tests for stream parameter newtypes.
//! These newtypes keep invalid rates and widths away from the clock paths.
// Integration test file: unwrap and arithmetic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_hz_rejects_zero() {
    use platform::audio_types::SampleRateHz;
    assert!(SampleRateHz::new(0).is_err());
}

#[test]
fn sample_rate_hz_rejects_below_minimum() {
    use platform::audio_types::SampleRateHz;
    assert!(SampleRateHz::new(7_999).is_err());
}

#[test]
fn sample_rate_hz_accepts_standard_rates() {
    use platform::audio_types::SampleRateHz;
    for hz in [8_000, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000, 88_200, 96_000, 176_400, 192_000] {
        assert!(SampleRateHz::new(hz).is_ok(), "{hz} Hz should be accepted");
    }
}

#[test]
fn sample_rate_hz_rejects_above_maximum() {
    use platform::audio_types::SampleRateHz;
    let err = SampleRateHz::new(384_000).unwrap_err();
    assert_eq!(err.value, 384_000);
    assert_eq!(err.max, SampleRateHz::MAX_HZ);
}

#[test]
fn sample_rate_hz_is_four_bytes() {
    use platform::audio_types::SampleRateHz;
    assert_eq!(core::mem::size_of::<SampleRateHz>(), 4);
}

// ── SampleWidth ──────────────────────────────────────────────────────────────

#[test]
fn sample_width_rejects_out_of_range() {
    use platform::audio_types::SampleWidth;
    assert!(SampleWidth::new(7).is_err());
    assert!(SampleWidth::new(33).is_err());
}

#[test]
fn sample_width_constants_match_new() {
    use platform::audio_types::SampleWidth;
    assert_eq!(SampleWidth::new(16).unwrap(), SampleWidth::S16);
    assert_eq!(SampleWidth::new(24).unwrap(), SampleWidth::S24);
    assert_eq!(SampleWidth::new(32).unwrap(), SampleWidth::S32);
}

#[test]
fn out_of_range_error_displays_bounds() {
    use platform::audio_types::SampleWidth;
    let err = SampleWidth::new(40).unwrap_err();
    assert_eq!(err.to_string(), "40 outside 8..=32");
}
