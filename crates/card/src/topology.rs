//! Card power-widget topology.
//!
//! Widget and route tables handed to the framework at attach. Names on the
//! codec side (`IN1L`, `MICBIAS1`, `AIF1RX1`, `AIFTX`, ...) are WM5102 widgets.
//!
//! `dummy SPDIFRX` sits on the path `dummy SPDIF in → dummy SPDIFRX → AIFTX`,
//! so it only powers up while the S/PDIF input is routed to the codec's
//! transmit interface. Its post-power events drive the FLL1 source switch.

use platform::{EventMask, MuxControl, Route, Widget};

/// Name of the widget whose power events select the FLL1 reference.
pub const SPDIF_RX_WIDGET: &str = "dummy SPDIFRX";

/// Items of the line-input micbias selector.
pub const LINEIN_MICBIAS_ITEMS: &[&str] = &["off", "on"];

/// Line-input micbias selector (virtual, no register behind it).
pub const LINEIN_MICBIAS_MUX: MuxControl = MuxControl {
    name: "Route",
    items: LINEIN_MICBIAS_ITEMS,
};

/// Card widgets.
pub const WIDGETS: &[Widget] = &[
    Widget::mic("DMIC"),
    Widget::mic("Headset Mic"),
    Widget::input("Line Input"),
    Widget::mic("Line Input with Micbias"),
    Widget::mux("Line Input Micbias", LINEIN_MICBIAS_MUX),
    Widget::input("dummy SPDIF in"),
    Widget::pga(
        SPDIF_RX_WIDGET,
        EventMask::POST_PMU.union(EventMask::POST_PMD),
    ),
    Widget::input("Dummy Input"),
    Widget::output("Dummy Output"),
];

/// Card routes.
pub const ROUTES: &[Route] = &[
    Route::new("IN1L", "Headset Mic"),
    Route::new("IN1R", "Headset Mic"),
    Route::new("Headset Mic", "MICBIAS1"),
    Route::new("IN2L", "DMIC"),
    Route::new("IN2R", "DMIC"),
    Route::new("DMIC", "MICBIAS2"),
    Route::new("IN3L", "Line Input Micbias"),
    Route::new("IN3R", "Line Input Micbias"),
    Route::via("Line Input Micbias", "off", "Line Input"),
    Route::via("Line Input Micbias", "on", "Line Input with Micbias"),
    // MICVDD must be up or the line input picks up noise
    Route::new("Line Input", "MICVDD"),
    Route::new("Line Input with Micbias", "MICBIAS3"),
    // S/PDIF receive detection
    Route::new(SPDIF_RX_WIDGET, "dummy SPDIF in"),
    Route::new("AIFTX", SPDIF_RX_WIDGET),
    // keep AIF1 powered when every mixer is off
    Route::new("Dummy Output", "AIF1RX1"),
    Route::new("Dummy Output", "AIF1RX2"),
    Route::new("AIF1TX1", "Dummy Input"),
    Route::new("AIF1TX2", "Dummy Input"),
];
