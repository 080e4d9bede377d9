//! Card mixer controls
//!
//! | Control                              | Kind       | Access          |
//! |--------------------------------------|------------|-----------------|
//! | Min Sample Rate                      | enum (3)   | read/write      |
//! | Max Sample Rate                      | enum (3)   | read/write      |
//! | IEC958 Playback Default              | IEC958     | read/write      |
//! | IEC958 Capture Default               | IEC958     | read, volatile  |
//! | IEC958 Playback Mask                 | IEC958     | read            |
//! | IEC958 Capture Recovered Frequency   | enum (4)   | read, volatile  |
//! | IEC958 Capture *flag* Flag           | boolean    | read, volatile  |
//!
//! Volatile controls read the transceiver on every `get`. The playback
//! default is served from [`SpdifCache`](crate::spdif::SpdifCache).

use embassy_sync::blocking_mutex::raw::RawMutex;
use platform::SpdifTransceiver;

use crate::card::Card;
use crate::error::Error;
use crate::rate_policy::{MAX_RATES, MIN_RATES};
use crate::spdif::{status, Iec958Status, RecoveredFrequency, StatusFlag};

/// Identifies one card control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlId {
    /// Lower stream-rate limit.
    MinSampleRate,
    /// Upper stream-rate limit.
    MaxSampleRate,
    /// Transmitted channel status.
    Iec958PlaybackDefault,
    /// Received channel status.
    Iec958CaptureDefault,
    /// Writable bits of the channel status.
    Iec958PlaybackMask,
    /// Recovered input rate class.
    RecoveredFrequency,
    /// One receiver status flag.
    Flag(StatusFlag),
}

/// Value shape of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlKind {
    /// Enumerated selector with `items` entries.
    Enumerated {
        /// Number of items.
        items: usize,
    },
    /// Four IEC 60958 channel-status bytes.
    Iec958,
    /// Single switch.
    Boolean,
}

/// Access rights of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Read and write.
    ReadWrite,
    /// Read only, value is fixed.
    ReadOnly,
    /// Read only, value may change at any time.
    ReadOnlyVolatile,
}

impl Access {
    /// Whether `put` is allowed.
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }

    /// Whether the value must be re-read on every access.
    pub const fn is_volatile(self) -> bool {
        matches!(self, Self::ReadOnlyVolatile)
    }
}

impl ControlId {
    /// Every control, in registration order.
    pub const ALL: [Self; 13] = [
        Self::MinSampleRate,
        Self::MaxSampleRate,
        Self::Iec958PlaybackDefault,
        Self::Iec958CaptureDefault,
        Self::Iec958PlaybackMask,
        Self::RecoveredFrequency,
        Self::Flag(StatusFlag::Audio),
        Self::Flag(StatusFlag::NonPcm),
        Self::Flag(StatusFlag::Copyright),
        Self::Flag(StatusFlag::DeEmphasis),
        Self::Flag(StatusFlag::Lock),
        Self::Flag(StatusFlag::Invalid),
        Self::Flag(StatusFlag::TransErr),
    ];

    /// Control name as registered with the mixer.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MinSampleRate => "Min Sample Rate",
            Self::MaxSampleRate => "Max Sample Rate",
            Self::Iec958PlaybackDefault => "IEC958 Playback Default",
            Self::Iec958CaptureDefault => "IEC958 Capture Default",
            Self::Iec958PlaybackMask => "IEC958 Playback Mask",
            Self::RecoveredFrequency => "IEC958 Capture Recovered Frequency",
            Self::Flag(StatusFlag::Audio) => "IEC958 Capture Audio Flag",
            Self::Flag(StatusFlag::NonPcm) => "IEC958 Capture Non-PCM Flag",
            Self::Flag(StatusFlag::Copyright) => "IEC958 Capture Copyright Flag",
            Self::Flag(StatusFlag::DeEmphasis) => "IEC958 Capture De-Emphasis Flag",
            Self::Flag(StatusFlag::Lock) => "IEC958 Capture Lock Flag",
            Self::Flag(StatusFlag::Invalid) => "IEC958 Capture Invalid Flag",
            Self::Flag(StatusFlag::TransErr) => "IEC958 Capture TransErr Flag",
        }
    }

    /// Value shape.
    pub const fn kind(self) -> ControlKind {
        match self {
            Self::MinSampleRate => ControlKind::Enumerated {
                items: MIN_RATES.len(),
            },
            Self::MaxSampleRate => ControlKind::Enumerated {
                items: MAX_RATES.len(),
            },
            Self::RecoveredFrequency => ControlKind::Enumerated {
                items: RecoveredFrequency::ALL.len(),
            },
            Self::Iec958PlaybackDefault | Self::Iec958CaptureDefault | Self::Iec958PlaybackMask => {
                ControlKind::Iec958
            }
            Self::Flag(_) => ControlKind::Boolean,
        }
    }

    /// Access rights.
    pub const fn access(self) -> Access {
        match self {
            Self::MinSampleRate | Self::MaxSampleRate | Self::Iec958PlaybackDefault => {
                Access::ReadWrite
            }
            Self::Iec958PlaybackMask => Access::ReadOnly,
            Self::Iec958CaptureDefault | Self::RecoveredFrequency | Self::Flag(_) => {
                Access::ReadOnlyVolatile
            }
        }
    }

    /// Look a control up by its mixer name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Answer to an info query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlInfo {
    /// Value shape.
    pub kind: ControlKind,
    /// Number of values (always 1 on this card).
    pub count: u32,
    /// Text of the queried item, enumerated controls only.
    pub item_name: Option<&'static str>,
    /// The value tracks live hardware status and must not be cached.
    pub volatile: bool,
}

/// A control value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlValue {
    /// Selected item index.
    Enumerated(usize),
    /// Channel-status bytes.
    Iec958(Iec958Status),
    /// Switch state.
    Boolean(bool),
}

impl<P, T, C, D, M> Card<P, T, C, D, M>
where
    T: SpdifTransceiver,
    M: RawMutex,
{
    /// Describe `id`; for enumerated controls `item` selects the item text
    /// (clamped to the last item).
    pub fn control_info(&self, id: ControlId, item: usize) -> ControlInfo {
        let item_name = match id {
            ControlId::MinSampleRate => Some(MIN_RATES.item_name(item)),
            ControlId::MaxSampleRate => Some(MAX_RATES.item_name(item)),
            ControlId::RecoveredFrequency => Some(RecoveredFrequency::item_name(item)),
            _ => None,
        };
        ControlInfo {
            kind: id.kind(),
            count: 1,
            item_name,
            volatile: id.access().is_volatile(),
        }
    }

    /// Current value of `id`.
    pub fn control_get(&self, id: ControlId) -> Result<ControlValue, Error> {
        let xcvr = &self.transceiver;
        Ok(match id {
            ControlId::MinSampleRate => ControlValue::Enumerated(self.policy.min()),
            ControlId::MaxSampleRate => ControlValue::Enumerated(self.policy.max()),
            ControlId::Iec958PlaybackDefault => ControlValue::Iec958(self.spdif.get()),
            ControlId::Iec958CaptureDefault => ControlValue::Iec958(status::read_capture(xcvr)?),
            ControlId::Iec958PlaybackMask => ControlValue::Iec958(Iec958Status::MASK),
            ControlId::RecoveredFrequency => {
                ControlValue::Enumerated(RecoveredFrequency::read(xcvr)?.index())
            }
            ControlId::Flag(flag) => ControlValue::Boolean(flag.read(xcvr)?),
        })
    }

    /// Write `value` to `id`. Returns whether the control changed.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnly`] for read-only controls, [`Error::InvalidValue`]
    /// when `value` does not match the control kind, or the hardware error
    /// of a failed channel-status write.
    pub fn control_put(&self, id: ControlId, value: ControlValue) -> Result<bool, Error> {
        if !id.access().is_writable() {
            return Err(Error::ReadOnly);
        }
        match (id, value) {
            (ControlId::MinSampleRate, ControlValue::Enumerated(idx)) => {
                Ok(self.policy.set_min(idx))
            }
            (ControlId::MaxSampleRate, ControlValue::Enumerated(idx)) => {
                Ok(self.policy.set_max(idx))
            }
            (ControlId::Iec958PlaybackDefault, ControlValue::Iec958(bytes)) => {
                self.spdif.set(&self.transceiver, bytes)
            }
            _ => Err(Error::InvalidValue),
        }
    }
}
