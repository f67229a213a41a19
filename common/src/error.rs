//! Errors reported by the trace control surface.

/// Failure of a trace operation. The trace is never partially updated.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TraceError {
    /// A coordinate fell outside `0..=size` on either axis.
    #[error("sample ({x}, {y}) is outside the canvas (0-{size}, 0-{size})")]
    OutOfRange { x: f32, y: f32, size: u32 },
}
