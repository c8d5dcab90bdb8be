// error.rs - Error types
//
// Nothing here is fatal to the host page. The renderer logs and contains
// RenderError; ConfigError only surfaces where a config is loaded.

/// Failures of the render loop.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    /// No drawing context was available when the loop was started.
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    /// The surface reports a zero-sized drawing area.
    #[error("surface has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A pixel buffer of this size would not fit in memory.
    #[error("surface {width}x{height} is too large")]
    SurfaceTooLarge { width: u32, height: u32 },

    /// `start` was called on a renderer that already left `Idle`.
    #[error("renderer already started")]
    AlreadyStarted,
}

/// Failures while loading a [`StarfieldConfig`](crate::StarfieldConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to parse JSON content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// Parsed, but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
