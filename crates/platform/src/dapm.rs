//! Power-widget graph description
//!
//! A card contributes widgets (endpoints and processing nodes) and routes
//! (directed `source → sink` edges, optionally gated by a mux item) to the
//! framework's power graph. A widget is powered when it sits on a complete
//! path between an active source and an active sink; widgets that asked for
//! events get a [`WidgetEventHandler`] callback when that happens.

/// Widget event bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventMask(u8);

impl EventMask {
    /// No events.
    pub const NONE: Self = Self(0);
    /// Before the widget powers up.
    pub const PRE_PMU: Self = Self(1 << 0);
    /// After the widget powered up.
    pub const POST_PMU: Self = Self(1 << 1);
    /// Before the widget powers down.
    pub const PRE_PMD: Self = Self(1 << 2);
    /// After the widget powered down.
    pub const POST_PMD: Self = Self(1 << 3);

    /// Union of two masks.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True if `event` is part of the mask.
    pub const fn contains(self, event: WidgetEvent) -> bool {
        self.0 & event.mask().0 != 0
    }
}

/// Power event delivered to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetEvent {
    /// About to power up.
    PrePowerUp,
    /// Powered up.
    PostPowerUp,
    /// About to power down.
    PrePowerDown,
    /// Powered down.
    PostPowerDown,
}

impl WidgetEvent {
    /// The single-bit mask for this event.
    pub const fn mask(self) -> EventMask {
        match self {
            Self::PrePowerUp => EventMask::PRE_PMU,
            Self::PostPowerUp => EventMask::POST_PMU,
            Self::PrePowerDown => EventMask::PRE_PMD,
            Self::PostPowerDown => EventMask::POST_PMD,
        }
    }
}

/// Virtual enumerated control steering a mux widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxControl {
    /// Control name.
    pub name: &'static str,
    /// Item texts, in index order.
    pub items: &'static [&'static str],
}

/// Widget type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Microphone endpoint.
    Mic,
    /// Generic input endpoint.
    Input,
    /// Generic output endpoint.
    Output,
    /// Input selector.
    Mux(MuxControl),
    /// Gain stage, optionally with event callbacks.
    Pga {
        /// Events delivered to the card.
        events: EventMask,
    },
}

/// A node in the power graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    /// Unique widget name.
    pub name: &'static str,
    /// Widget type.
    pub kind: WidgetKind,
}

impl Widget {
    /// Microphone endpoint.
    pub const fn mic(name: &'static str) -> Self {
        Self {
            name,
            kind: WidgetKind::Mic,
        }
    }

    /// Input endpoint.
    pub const fn input(name: &'static str) -> Self {
        Self {
            name,
            kind: WidgetKind::Input,
        }
    }

    /// Output endpoint.
    pub const fn output(name: &'static str) -> Self {
        Self {
            name,
            kind: WidgetKind::Output,
        }
    }

    /// Mux steered by `control`.
    pub const fn mux(name: &'static str, control: MuxControl) -> Self {
        Self {
            name,
            kind: WidgetKind::Mux(control),
        }
    }

    /// Gain stage reporting `events`.
    pub const fn pga(name: &'static str, events: EventMask) -> Self {
        Self {
            name,
            kind: WidgetKind::Pga { events },
        }
    }

    /// Events this widget wants delivered.
    pub const fn events(&self) -> EventMask {
        match self.kind {
            WidgetKind::Pga { events } => events,
            _ => EventMask::NONE,
        }
    }
}

/// Directed edge `source → sink` in the power graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Downstream widget.
    pub sink: &'static str,
    /// Mux item that must be selected for the edge to conduct.
    pub control: Option<&'static str>,
    /// Upstream widget.
    pub source: &'static str,
}

impl Route {
    /// Unconditional edge.
    pub const fn new(sink: &'static str, source: &'static str) -> Self {
        Self {
            sink,
            control: None,
            source,
        }
    }

    /// Edge that conducts only while the sink mux selects `control`.
    pub const fn via(sink: &'static str, control: &'static str, source: &'static str) -> Self {
        Self {
            sink,
            control: Some(control),
            source,
        }
    }
}

/// Card-level widget event callback.
pub trait WidgetEventHandler {
    /// Error type
    type Error: core::fmt::Debug;

    /// Deliver `event` for the widget called `widget`.
    ///
    /// Post events arrive after the power change happened. An `Err` there is
    /// informational and the power sequence proceeds regardless.
    fn widget_event(&self, widget: &str, event: WidgetEvent) -> Result<(), Self::Error>;
}
