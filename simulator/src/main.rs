//! G-force panel simulator for desktop platforms.
//!
//! Runs the vehicle panel in an SDL window via embedded-graphics-simulator,
//! fed by the synthetic drive.
//!
//! | Key | Action |
//! |-----|--------|
//! | C | Clear the trace |
//! | D | Toggle the trace window between the configured value and 2000 ms |
//! | S | Detach / reattach the draw surface |
//! | Esc | Quit |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use std::thread;
use std::time::Instant;

use anyhow::ensure;
use clap::Parser;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use gforce_common::Clock;
use gforce_common::colors::BLACK;
use gforce_panel::config::{FRAME_TIME, PANEL_TRACE_DURATION_MS, PANEL_TRACE_SIZE};
use gforce_panel::demo::{DemoDrive, DemoFeed, MAX_RATE_HZ};
use gforce_panel::metrics::LoopMetrics;
use gforce_panel::{LocalContext, PanelConfig, RenderState, Scheduler, SystemClock, VehiclePanel, logging};
use log::info;

/// Window used by the D key.
const LONG_WINDOW_MS: u32 = 2000;

#[derive(Debug, Parser)]
#[command(version, about = "G-force trajectory panel simulator")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Edge length of the trajectory surface
    #[arg(long, default_value_t = PANEL_TRACE_SIZE)]
    size: u32,

    /// Trace window in milliseconds
    #[arg(long, default_value_t = PANEL_TRACE_DURATION_MS)]
    duration_ms: u32,

    /// IMU publish rate in Hz
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RATE_HZ)))]
    imu_hz: u32,

    /// Window pixel scale
    #[arg(long, default_value_t = 3)]
    scale: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    ensure!(cli.size > 0, "--size must be positive");

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(cli.size, cli.size));
    display.clear(BLACK).ok();
    let output_settings = OutputSettingsBuilder::new().scale(cli.scale.max(1)).build();
    let mut window = Window::new("G-Force Trajectory", &output_settings);

    let clock = SystemClock::new();
    let scheduler = Scheduler::new();
    let mut context = LocalContext::new();
    let config = PanelConfig::new(cli.size, cli.duration_ms);
    let mut feed = DemoFeed::new(DemoDrive::new(config.gravity), cli.imu_hz);
    let mut panel = VehiclePanel::init(config, display, clock, &scheduler, &mut context);

    // Surface held here while detached from the panel
    let mut parked: Option<SimulatorDisplay<Rgb565>> = None;
    let mut long_window = false;

    let mut metrics = LoopMetrics::new();
    let mut inbox = RenderState::default();
    let start = Instant::now();

    'running: loop {
        let frame_start = Instant::now();

        feed.publish_until(start.elapsed(), clock.now_ms(), &mut inbox);
        if context.begin_render() {
            let state = std::mem::take(&mut inbox);
            metrics.record_ingest(panel.on_render(&state, &mut context));
        }

        for wakeup in scheduler.due(clock.now_ms()).into_iter().chain(scheduler.vsync()) {
            panel.dispatch(wakeup);
        }
        let render_time = frame_start.elapsed();

        if let Some(shown) = panel.trajectory().surface().or(parked.as_ref()) {
            window.update(shown);
        }

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Escape => break 'running,
                        Keycode::C => panel.clear_points(),
                        Keycode::D => {
                            long_window = !long_window;
                            let duration_ms = if long_window { LONG_WINDOW_MS } else { cli.duration_ms };
                            info!("trace window: {duration_ms} ms");
                            panel.set_duration(duration_ms);
                        }
                        Keycode::S => match parked.take() {
                            Some(surface) => {
                                panel.trajectory_mut().attach_surface(surface);
                            }
                            None => parked = panel.trajectory_mut().detach_surface(),
                        },
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let sleep_time = FRAME_TIME.saturating_sub(frame_start.elapsed());
        if !sleep_time.is_zero() {
            thread::sleep(sleep_time);
        }

        metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
        metrics.maybe_report(panel.trajectory().stats(), panel.get_points().len());
    }

    metrics.report(panel.trajectory().stats(), panel.get_points().len());
    panel.teardown();
    ensure!(
        scheduler.pending() == 0,
        "{} scheduler registrations outlived the panel",
        scheduler.pending()
    );
    Ok(())
}
