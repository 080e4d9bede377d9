//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions keep stream parameters honest:
//! - `SampleRateHz`: validates 8000–192000 Hz (WM5102 AIF range)
//! - `SampleWidth`: validates 8–32 bit samples, derives the I²S bit-clock ratio
//! - `RateWindow`: inclusive rate constraint applied at stream open

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("{value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the card's audio interfaces accept.
///
/// Valid range: 8000–192000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz.
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 192000 Hz.
    pub const MAX_HZ: u32 = 192_000;

    /// Create a `SampleRateHz`, returning an error if out of 8000–192000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 192000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if hz < Self::MIN_HZ || hz > Self::MAX_HZ {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

// ── SampleWidth ──────────────────────────────────────────────────────────────

/// Significant bits per sample on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleWidth(u32);

impl SampleWidth {
    /// 16-bit samples (S16_LE).
    pub const S16: Self = Self(16);
    /// 24-bit samples (S24_LE, the codec-to-codec link format).
    pub const S24: Self = Self(24);
    /// 32-bit samples (S32_LE).
    pub const S32: Self = Self(32);

    /// Narrowest accepted width.
    pub const MIN_BITS: u32 = 8;
    /// Widest accepted width.
    pub const MAX_BITS: u32 = 32;

    /// Create a `SampleWidth`, rejecting widths outside 8–32 bits.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `bits < 8` or `bits > 32`.
    pub fn new(bits: u32) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_BITS..=Self::MAX_BITS).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(OutOfRangeError {
                value: bits,
                min: Self::MIN_BITS,
                max: Self::MAX_BITS,
            })
        }
    }

    /// Return the width in bits.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Bit clocks per frame for a two-channel I²S frame (`2 × width`).
    #[must_use]
    pub fn stereo_bclk_ratio(self) -> u32 {
        // bits <= 32, cannot overflow
        self.0.saturating_mul(2)
    }
}

// ── RateWindow ───────────────────────────────────────────────────────────────

/// Inclusive sample-rate window imposed on a stream at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RateWindow {
    /// Lowest acceptable rate (0 = no lower bound).
    pub min: u32,
    /// Highest acceptable rate (`u32::MAX` = no upper bound).
    pub max: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_error_renders_bounds() {
        let err = SampleRateHz::new(7_999).unwrap_err();
        assert_eq!(err.min, 8_000);
        assert_eq!(err.max, 192_000);
    }

    #[test]
    fn bclk_ratio_is_twice_width() {
        assert_eq!(SampleWidth::S16.stereo_bclk_ratio(), 32);
        assert_eq!(SampleWidth::S24.stereo_bclk_ratio(), 48);
        assert_eq!(SampleWidth::S32.stereo_bclk_ratio(), 64);
    }
}
