//! Headless G-force panel.
//!
//! Mounts the vehicle panel on an in-memory framebuffer, feeds it a synthetic
//! drive at a fixed IMU rate and runs the display-sync loop at [`FRAME_TIME`].
//! Loop metrics are logged once per second.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use clap::Parser;
use gforce_common::Clock;
use gforce_common::colors::BLACK;
use gforce_panel::config::{FRAME_TIME, PANEL_TRACE_DURATION_MS, PANEL_TRACE_SIZE};
use gforce_panel::demo::{DemoDrive, DemoFeed, MAX_RATE_HZ};
use gforce_panel::metrics::LoopMetrics;
use gforce_panel::{
    Framebuffer,
    LocalContext,
    PanelConfig,
    RenderState,
    Scheduler,
    SystemClock,
    VehiclePanel,
    logging,
};
use log::info;

#[derive(Debug, Parser)]
#[command(version, about = "Run the G-force trajectory panel headless against a synthetic drive")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Seconds to run before tearing the panel down
    #[arg(long, default_value_t = 5.0)]
    seconds: f32,

    /// Edge length of the trajectory surface
    #[arg(long, default_value_t = PANEL_TRACE_SIZE)]
    size: u32,

    /// Trace window in milliseconds
    #[arg(long, default_value_t = PANEL_TRACE_DURATION_MS)]
    duration_ms: u32,

    /// IMU publish rate in Hz
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RATE_HZ)))]
    imu_hz: u32,
}

/// Wall-clock length of the run for `--seconds`.
fn run_length(seconds: f32) -> anyhow::Result<Duration> {
    ensure!(
        seconds.is_finite() && seconds >= 0.0,
        "--seconds must be a non-negative number, got {seconds}"
    );
    Duration::try_from_secs_f32(seconds).context("--seconds out of range")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    ensure!(cli.size > 0, "--size must be positive");
    let run_for = run_length(cli.seconds)?;

    let clock = SystemClock::new();
    let scheduler = Scheduler::new();
    let mut context = LocalContext::new();
    let config = PanelConfig::new(cli.size, cli.duration_ms);
    let mut feed = DemoFeed::new(DemoDrive::new(config.gravity), cli.imu_hz);
    let mut panel = VehiclePanel::init(config, Framebuffer::square(cli.size), clock, &scheduler, &mut context);

    let mut metrics = LoopMetrics::new();
    let mut inbox = RenderState::default();
    let start = Instant::now();

    while start.elapsed() < run_for {
        let frame_start = Instant::now();

        // Queue IMU messages published since the last frame
        feed.publish_until(start.elapsed(), clock.now_ms(), &mut inbox);

        // Deliver a render pass only once the previous one completed
        if context.begin_render() {
            let state = std::mem::take(&mut inbox);
            metrics.record_ingest(panel.on_render(&state, &mut context));
        }

        let render_start = Instant::now();
        let now = clock.now_ms();
        for wakeup in scheduler.due(now).into_iter().chain(scheduler.vsync()) {
            panel.dispatch(wakeup);
        }
        let render_time = render_start.elapsed();

        let sleep_time = FRAME_TIME.saturating_sub(frame_start.elapsed());
        if !sleep_time.is_zero() {
            thread::sleep(sleep_time);
        }

        metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
        metrics.maybe_report(panel.trajectory().stats(), panel.get_points().len());
    }

    metrics.report(panel.trajectory().stats(), panel.get_points().len());

    let surface = panel.teardown().context("trajectory surface was detached at teardown")?;
    info!("final frame: {} lit pixels", surface.count_not(BLACK));
    ensure!(
        scheduler.pending() == 0,
        "{} scheduler registrations outlived the panel",
        scheduler.pending()
    );
    Ok(())
}
