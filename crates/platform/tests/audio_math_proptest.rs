//! Property-based tests for stream parameter math.
//! Verifies invariants hold for ALL valid inputs, not just fixed examples.
// Integration test file: unwrap and arithmetic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::audio_types::{SampleRateHz, SampleWidth};

proptest::proptest! {
    /// SampleRateHz::new never panics for any u32 input.
    #[test]
    fn sample_rate_hz_new_never_panics(hz in 0u32..=u32::MAX) {
        // May return Err but must not panic
        let _ = SampleRateHz::new(hz);
    }

    /// SampleRateHz valid range [8000, 192000] always succeeds.
    #[test]
    fn sample_rate_hz_valid_range_always_ok(hz in 8000u32..=192_000u32) {
        assert!(SampleRateHz::new(hz).is_ok(),
            "SampleRateHz::new({}) should be Ok within [8000, 192000]", hz);
    }

    /// SampleRateHz out of range always fails.
    #[test]
    fn sample_rate_hz_out_of_range_always_err(hz in 192_001u32..=u32::MAX) {
        assert!(SampleRateHz::new(hz).is_err(),
            "SampleRateHz::new({}) should be Err above 192000", hz);
    }

    /// Bit-clock ratio is always twice the width and never exceeds 64.
    #[test]
    fn bclk_ratio_doubles_width(bits in 8u32..=32u32) {
        let w = SampleWidth::new(bits).unwrap();
        assert_eq!(w.stereo_bclk_ratio(), bits * 2);
        assert!(w.stereo_bclk_ratio() <= 64);
    }
}
