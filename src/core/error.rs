//! Error types for the world streamer

use thiserror::Error;

/// Main error type for the crate
///
/// Generation, caching and meshing cannot fail; errors only arise while
/// loading configuration or setting up the worker pool.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Streaming error: {0}")]
    Streaming(String),
}
