//! WM5102 + WM8804 audio card
//!
//! Machine driver for a card built from a WM5102 audio hub codec and a WM8804
//! S/PDIF transceiver sharing one clock tree. The transceiver's crystal output
//! feeds the codec's MCLK1; the codec's FLL1 turns either that clock or the
//! bit clock recovered from an S/PDIF input into SYSCLK.
//!
//! # Architecture
//!
//! ```text
//! audio framework (PcmOps / BiasOps / WidgetEventHandler / controls)
//!         ↓
//! Card (stream, bias, routing adapters, rate policy, S/PDIF cache)
//!         ↓
//! ClockController (FLL1 state under one blocking mutex)
//!         ↓
//! platform traits (FllCodec, SpdifTransceiver, CpuDai)
//! ```
//!
//! # Features
//!
//! - `tracing` (default): log through `tracing` on host builds
//! - `defmt`: log through `defmt` and derive `defmt::Format` on hardware builds
//! - `std`: build with the standard library outside of tests
//!
//! Host-side mocks for every component live in [`mock`].

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)] // all Results must be handled
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // every error names its failed step
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)] // register and widget names in doc comments
#![allow(clippy::new_without_default)]

#[macro_use]
mod fmt;

mod bias;
mod routing;
mod stream;

pub mod card;
pub mod clock;
pub mod config;
pub mod controls;
pub mod error;
pub mod mock;
pub mod rate_policy;
pub mod spdif;
pub mod topology;

pub use card::{Card, CardBuilder, Parts};
pub use clock::{select_family, ClockController, ClockState, FllMode, StreamSet};
pub use config::CardConfig;
pub use controls::{Access, ControlId, ControlInfo, ControlKind, ControlValue};
pub use error::{Error, Step};
pub use rate_policy::RatePolicy;
pub use spdif::{Iec958Status, RecoveredFrequency, SpdifCache, StatusFlag};
