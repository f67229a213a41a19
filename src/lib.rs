//! Host side of the G-force trajectory panel.
//!
//! - [`scheduler`]: Display-sync frame requests and intervals with drop-cancel handles
//! - [`trajectory`]: Mounted view running the redraw loop and the prune interval
//! - [`panel`]: Vehicle panel wiring IMU messages to the trajectory
//! - [`host`]: Panel context, render state and the in-process host
//! - [`imu`]: IMU messages and the acceleration-to-surface mapping
//! - [`surface`]: Heap-backed RGB565 framebuffer
//! - [`clock`]: System and manual clocks
//! - [`metrics`]: Loop timing and ingest statistics
//! - [`demo`]: Synthetic IMU source
//!
//! The trace model, pruning and rendering live in `gforce_common`.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod clock;
pub mod config;
pub mod demo;
pub mod host;
pub mod imu;
pub mod logging;
pub mod metrics;
pub mod panel;
pub mod scheduler;
pub mod surface;
pub mod trajectory;

pub use clock::{ManualClock, SystemClock};
pub use config::PanelConfig;
pub use host::{LocalContext, Message, MessageEvent, PanelContext, RenderState};
pub use panel::{PanelPoints, VehiclePanel};
pub use scheduler::{Scheduler, Wakeup};
pub use surface::Framebuffer;
pub use trajectory::TrajectoryView;
