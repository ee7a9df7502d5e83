//! Render error types.

/// Errors raised by a drawing surface.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The backing pixel buffer could not be allocated.
    #[error("cannot allocate a {width}x{height} canvas")]
    Allocation { width: u32, height: u32 },

    /// `restore` was called without a matching `save`.
    #[error("transform restore without a matching save")]
    UnbalancedRestore,

    /// The canvas could not be copied out as an image.
    #[error("failed to snapshot canvas: {0}")]
    Snapshot(String),
}
