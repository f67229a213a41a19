//! Shared core of the G-force trajectory panel.
//!
//! This crate contains the platform-agnostic trace logic used by the panel
//! host and the desktop simulator:
//!
//! - [`trace`]: Samples, the time-windowed trace and the pruning rule
//! - [`canvas`]: Control surface (add / clear / snapshot / prune pass) over a host-owned store
//! - [`render`]: Decay rendering onto any `DrawTarget<Color = Rgb565>`
//! - [`config`]: Canvas options and constants
//! - [`colors`]: RGB565 color constants
//! - [`styles`]: Pre-computed text styles
//! - [`widgets`]: Title and scale caption
//! - [`error`]: Validation errors
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` but needs `alloc`: a trace is an `alloc` vector whose
//! length is bounded by its time window alone. Captions still format into
//! `heapless` strings. Tests run with `std` for the test harness.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

extern crate alloc;

pub mod canvas;
pub mod colors;
pub mod config;
pub mod error;
pub mod render;
pub mod styles;
pub mod trace;
pub mod widgets;

// Re-export commonly used items
pub use canvas::{Clock, TraceCanvas, TraceStore};
pub use config::TraceConfig;
pub use error::TraceError;
pub use trace::{Millis, Sample, Trace};
