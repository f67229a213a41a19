//! Vehicle panel: IMU messages in, G-force trajectory out.
//!
//! The panel owns the authoritative trace ([`PanelPoints`]) and a mounted
//! [`TrajectoryView`]. Each render pass maps IMU accelerations to surface
//! coordinates, feeds them to the view and completes the pass with the host.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;
use gforce_common::widgets::draw_caption;
use gforce_common::{Clock, Sample, Trace, TraceConfig, TraceError, TraceStore};
use log::{debug, info, trace, warn};

use crate::config::{IMU_TOPIC, PanelConfig};
use crate::host::{Message, PanelContext, RenderState};
use crate::imu::ImuAdapter;
use crate::scheduler::{Scheduler, Wakeup};
use crate::trajectory::TrajectoryView;

// =============================================================================
// Trace Store
// =============================================================================

/// Host-owned trace with change bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct PanelPoints {
    points: Trace,
    revision: u64,
    added: u64,
    clears: u64,
}

impl PanelPoints {
    /// Store seeded with the in-range samples of `initial`.
    pub fn seeded(
        initial: &[Sample],
        config: &TraceConfig,
    ) -> Self {
        let points = gforce_common::trace::filtered(initial, |p| {
            let inside = config.contains(p.x, p.y);
            if !inside {
                warn!("dropping seed sample ({}, {}) outside the canvas", p.x, p.y);
            }
            inside
        });
        Self {
            points,
            ..Self::default()
        }
    }

    /// Incremented on every publish.
    #[inline]
    pub const fn revision(&self) -> u64 { self.revision }

    /// Samples accepted through `point_added`.
    #[inline]
    pub const fn added(&self) -> u64 { self.added }

    #[inline]
    pub const fn clears(&self) -> u64 { self.clears }
}

impl TraceStore for PanelPoints {
    fn points(&self) -> &[Sample] { &self.points }

    fn publish(
        &mut self,
        points: Trace,
    ) {
        self.points = points;
        self.revision += 1;
    }

    fn point_added(
        &mut self,
        sample: &Sample,
    ) {
        trace!("sample ({:.1}, {:.1}) at t={}", sample.x, sample.y, sample.timestamp);
        self.added += 1;
    }

    fn points_cleared(&mut self) {
        debug!("trace cleared");
        self.clears += 1;
    }
}

// =============================================================================
// Vehicle Panel
// =============================================================================

/// Outcome of one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub ignored: usize,
}

pub struct VehiclePanel<S, C> {
    points: PanelPoints,
    trajectory: TrajectoryView<S, C>,
    adapter: ImuAdapter,
}

impl<S, C> VehiclePanel<S, C>
where
    S: DrawTarget<Color = Rgb565>,
    C: Clock,
{
    /// Subscribe to the IMU topic and mount the trajectory on `surface`.
    pub fn init<X: PanelContext>(
        config: PanelConfig,
        surface: S,
        clock: C,
        scheduler: &Scheduler,
        context: &mut X,
    ) -> Self {
        context.subscribe(&[IMU_TOPIC]);
        let points = PanelPoints::seeded(&config.initial_points, &config.trace);
        let adapter = ImuAdapter::new(config.px_per_g, config.trace.center(), config.gravity);
        let trajectory = TrajectoryView::mount(config.trace, surface, clock, scheduler);
        info!(
            "vehicle panel ready: {}x{} surface, {} ms window, {} seed samples",
            config.trace.size,
            config.trace.size,
            config.trace.duration_ms,
            points.points().len()
        );

        Self {
            points,
            trajectory,
            adapter,
        }
    }

    /// Ingest one render pass and complete it with the host.
    pub fn on_render<X: PanelContext>(
        &mut self,
        state: &RenderState,
        context: &mut X,
    ) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for event in &state.current_frame {
            match &event.message {
                Message::Imu(imu) if event.topic == IMU_TOPIC => {
                    let (x, y) = self.adapter.to_canvas(imu);
                    match self.trajectory.add_point(&mut self.points, x, y) {
                        Ok(_) => summary.accepted += 1,
                        Err(_) => summary.rejected += 1,
                    }
                }
                _ => {
                    trace!("ignoring message on {}", event.topic);
                    summary.ignored += 1;
                }
            }
        }
        context.render_complete();
        summary
    }

    /// Route a scheduler wakeup. The caption is redrawn after every frame.
    pub fn dispatch(
        &mut self,
        wakeup: Wakeup,
    ) -> bool {
        if !self.trajectory.handle(wakeup, &mut self.points) {
            return false;
        }
        if let Wakeup::Frame(_) = wakeup {
            let size = self.trajectory.config().size;
            let px_per_g = self.adapter.px_per_g();
            if let Some(surface) = self.trajectory.surface_mut() {
                draw_caption(surface, size, px_per_g);
            }
        }
        true
    }

    // =========================================================================
    // Control Surface
    // =========================================================================

    pub fn add_point(
        &mut self,
        x: f32,
        y: f32,
    ) -> Result<Sample, TraceError> {
        self.trajectory.add_point(&mut self.points, x, y)
    }

    pub fn clear_points(&mut self) { self.trajectory.clear_points(&mut self.points); }

    pub fn get_points(&self) -> Trace { self.trajectory.get_points(&self.points) }

    pub fn set_duration(
        &mut self,
        duration_ms: u32,
    ) {
        self.trajectory.set_duration(duration_ms);
    }

    /// Highlight color of the newest sample, applied from the next frame.
    pub fn set_point_color(
        &mut self,
        color: Rgb565,
    ) {
        self.trajectory.set_point_color(color);
    }

    #[inline]
    pub const fn store(&self) -> &PanelPoints { &self.points }

    #[inline]
    pub const fn trajectory(&self) -> &TrajectoryView<S, C> { &self.trajectory }

    #[inline]
    pub const fn trajectory_mut(&mut self) -> &mut TrajectoryView<S, C> { &mut self.trajectory }

    /// Unmount the trajectory and return the surface.
    pub fn teardown(self) -> Option<S> {
        info!(
            "vehicle panel teardown: {} samples accepted, {} clears",
            self.points.added(),
            self.points.clears()
        );
        self.trajectory.unmount()
    }
}

#[cfg(test)]
mod tests {
    use gforce_common::colors::{BLACK, TRACE_ORANGE, TRACE_RED};

    use super::*;
    use crate::clock::ManualClock;
    use crate::host::{LocalContext, MessageEvent};
    use crate::imu::{Imu, Vector3};
    use crate::surface::Framebuffer;

    fn imu_event(
        ax: f64,
        ay: f64,
    ) -> MessageEvent {
        MessageEvent::new(IMU_TOPIC, 0, Message::Imu(Imu::from_acceleration(Vector3::new(ax, ay, 0.0))))
    }

    fn panel(
        clock: &ManualClock,
        scheduler: &Scheduler,
        context: &mut LocalContext,
    ) -> VehiclePanel<Framebuffer, ManualClock> {
        VehiclePanel::init(PanelConfig::default(), Framebuffer::square(200), clock.clone(), scheduler, context)
    }

    #[test]
    fn test_init_subscribes_to_imu() {
        let scheduler = Scheduler::new();
        let mut context = LocalContext::new();
        let _panel = panel(&ManualClock::default(), &scheduler, &mut context);
        assert_eq!(context.subscriptions(), [IMU_TOPIC]);
    }

    #[test]
    fn test_on_render_maps_and_completes() {
        let clock = ManualClock::starting_at(10);
        let scheduler = Scheduler::new();
        let mut context = LocalContext::new();
        let mut panel = panel(&clock, &scheduler, &mut context);

        let state = RenderState {
            current_frame: vec![
                imu_event(0.0, 9.8),
                imu_event(0.0, 98.0),
                MessageEvent::new("/vehicle/speed", 0, Message::Other),
            ],
        };
        assert!(context.begin_render());
        let summary = panel.on_render(&state, &mut context);

        assert_eq!(summary, IngestSummary { accepted: 1, rejected: 1, ignored: 1 });
        assert_eq!(context.renders_completed(), 1);
        assert!(!context.in_flight());

        let points = panel.get_points();
        assert_eq!(points.len(), 1);
        assert!((points[0].x - 125.0).abs() < 1e-4);
        assert_eq!(points[0].timestamp, 10);
    }

    #[test]
    fn test_empty_render_pass_still_completes() {
        let scheduler = Scheduler::new();
        let mut context = LocalContext::new();
        let mut panel = panel(&ManualClock::default(), &scheduler, &mut context);

        panel.on_render(&RenderState::default(), &mut context);
        assert_eq!(context.renders_completed(), 1);
        assert_eq!(panel.store().revision(), 0, "Nothing published without samples");
    }

    #[test]
    fn test_dispatch_draws_trace_and_caption() {
        let clock = ManualClock::default();
        let scheduler = Scheduler::new();
        let mut context = LocalContext::new();
        let mut panel = panel(&clock, &scheduler, &mut context);
        panel.add_point(150.0, 60.0).unwrap();

        for wakeup in scheduler.vsync() {
            assert!(panel.dispatch(wakeup));
        }

        let surface = panel.trajectory().surface().unwrap();
        assert_eq!(surface.pixel(150, 60), Some(TRACE_ORANGE));
        let caption_pixels = (0..12).flat_map(|y| (0..40).map(move |x| (x, y)));
        assert!(
            caption_pixels.filter_map(|(x, y)| surface.pixel(x, y)).any(|c| c != BLACK),
            "Title caption is drawn in the top-left corner"
        );
    }

    #[test]
    fn test_point_color_change_shows_on_next_frame() {
        let clock = ManualClock::default();
        let scheduler = Scheduler::new();
        let mut context = LocalContext::new();
        let mut panel = panel(&clock, &scheduler, &mut context);
        panel.add_point(150.0, 60.0).unwrap();

        for wakeup in scheduler.vsync() {
            panel.dispatch(wakeup);
        }
        assert_eq!(panel.trajectory().surface().unwrap().pixel(150, 60), Some(TRACE_ORANGE));

        panel.set_point_color(TRACE_RED);
        assert_eq!(panel.trajectory().config().point_color, TRACE_RED);
        for wakeup in scheduler.vsync() {
            panel.dispatch(wakeup);
        }

        let surface = panel.trajectory().surface().unwrap();
        assert_eq!(surface.pixel(150, 60), Some(TRACE_RED), "Newest sample drawn in the new color");
        assert_eq!(surface.count(TRACE_ORANGE), 0, "Old highlight color is gone");
    }

    #[test]
    fn test_seeded_store_drops_out_of_range() {
        let config = TraceConfig::new(100);
        let store = PanelPoints::seeded(&[Sample::new(1.0, 1.0, 0), Sample::new(-3.0, 1.0, 0)], &config);
        assert_eq!(store.points().len(), 1);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_clear_counts() {
        let scheduler = Scheduler::new();
        let mut context = LocalContext::new();
        let mut panel = panel(&ManualClock::default(), &scheduler, &mut context);
        panel.add_point(1.0, 1.0).unwrap();
        panel.clear_points();

        assert!(panel.get_points().is_empty());
        assert_eq!(panel.store().added(), 1);
        assert_eq!(panel.store().clears(), 1);
        assert_eq!(panel.store().revision(), 2);
    }

    #[test]
    fn test_teardown_releases_scheduler() {
        let scheduler = Scheduler::new();
        let mut context = LocalContext::new();
        let panel = panel(&ManualClock::default(), &scheduler, &mut context);
        assert_eq!(scheduler.pending(), 2);

        assert!(panel.teardown().is_some());
        assert_eq!(scheduler.pending(), 0);
    }
}
