//! Hardware abstraction layer for the WM5102 + WM8804 audio card
//!
//! This crate provides trait-based abstractions for the components the card
//! driver talks to, and for the framework that calls the card, so the clock
//! logic can be developed and tested without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Audio framework (PCM, bias, power-widget callbacks)
//!         ↓
//! Card driver (card crate - clock domain controller)
//!         ↓
//! Platform HAL (this crate - trait abstractions + register maps)
//!         ↓
//! Codec drivers (WM5102 / WM8804 regmap, CPU I²S controller)
//! ```
//!
//! # Abstractions
//!
//! ## Components driven by the card
//! - [`FllCodec`] - primary codec with FLL1 and SYSCLK
//! - [`SpdifTransceiver`] - S/PDIF transceiver
//! - [`CpuDai`] - CPU-side I²S interface
//!
//! ## Callbacks the card implements
//! - [`PcmOps`] - stream open / parameters / free
//! - [`BiasOps`] - power-domain bias transitions
//! - [`WidgetEventHandler`] - power-widget events
//!
//! # Features
//!
//! - `defmt`: Enable defmt::Format derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // callers decide on hardware accessors
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio_types;
pub mod codec;
pub mod dapm;
pub mod pcm;
pub mod power;
pub mod wm5102;
pub mod wm8804;

// Re-export component traits
pub use codec::{ClockDirection, CodecError, CpuDai, FllCodec, SpdifTransceiver};

// Re-export framework callback types
pub use dapm::{EventMask, MuxControl, Route, Widget, WidgetEvent, WidgetEventHandler, WidgetKind};
pub use pcm::{HwParams, PcmOps, PcmRuntime, StreamDirection};
pub use power::{BiasLevel, BiasOps, PowerDomain};

// Re-export newtypes
pub use audio_types::{OutOfRangeError, RateWindow, SampleRateHz, SampleWidth};
