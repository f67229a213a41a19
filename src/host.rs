//! Host seams: message delivery and the render handshake.
//!
//! The host delivers a [`RenderState`] per render pass. A panel must call
//! [`PanelContext::render_complete`] once per pass before the host delivers
//! the next one.

use gforce_common::Millis;
use log::{debug, warn};

use crate::imu::Imu;

/// Services the host exposes to a panel.
pub trait PanelContext {
    /// Ask for messages on `topics` in subsequent render passes.
    fn subscribe(
        &mut self,
        topics: &[&str],
    );

    /// Signal that the current render pass is done.
    fn render_complete(&mut self);
}

/// Decoded message payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Imu(Imu),
    /// A payload this panel does not understand.
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageEvent {
    pub topic: String,
    pub receive_time_ms: Millis,
    pub message: Message,
}

impl MessageEvent {
    pub fn new(
        topic: &str,
        receive_time_ms: Millis,
        message: Message,
    ) -> Self {
        Self {
            topic: topic.to_owned(),
            receive_time_ms,
            message,
        }
    }
}

/// Messages delivered for one render pass, in arrival order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    pub current_frame: Vec<MessageEvent>,
}

// =============================================================================
// Local Context
// =============================================================================

/// In-process host used by the headless runner and the simulator.
///
/// Records subscriptions and enforces the handshake: [`LocalContext::begin_render`]
/// refuses a new pass while the previous one has not completed.
#[derive(Debug, Default)]
pub struct LocalContext {
    subscriptions: Vec<String>,
    in_flight: bool,
    renders_completed: u64,
    renders_held: u64,
}

impl LocalContext {
    pub fn new() -> Self { Self::default() }

    pub fn subscriptions(&self) -> &[String] { &self.subscriptions }

    pub fn is_subscribed(
        &self,
        topic: &str,
    ) -> bool {
        self.subscriptions.iter().any(|t| t == topic)
    }

    /// Start a render pass. Returns `false` if the previous pass is still open.
    pub fn begin_render(&mut self) -> bool {
        if self.in_flight {
            self.renders_held += 1;
            return false;
        }
        self.in_flight = true;
        true
    }

    #[inline]
    pub const fn in_flight(&self) -> bool { self.in_flight }

    #[inline]
    pub const fn renders_completed(&self) -> u64 { self.renders_completed }

    /// Passes refused because the previous one was still open.
    #[inline]
    pub const fn renders_held(&self) -> u64 { self.renders_held }
}

impl PanelContext for LocalContext {
    fn subscribe(
        &mut self,
        topics: &[&str],
    ) {
        for topic in topics {
            if !self.is_subscribed(topic) {
                debug!("subscribed to {topic}");
                self.subscriptions.push((*topic).to_owned());
            }
        }
    }

    fn render_complete(&mut self) {
        if !self.in_flight {
            warn!("render_complete called with no render pass in flight");
        }
        self.in_flight = false;
        self.renders_completed += 1;
    }
}
