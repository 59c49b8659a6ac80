//! Streaming configuration

use serde::{Deserialize, Serialize};

/// Default view radius in chunks (Chebyshev)
pub const DEFAULT_VIEW_RADIUS: i32 = 5;

/// Default cap on chunk generations dispatched per tick
pub const DEFAULT_MAX_CHUNKS_PER_TICK: usize = 2;

/// How much of the world is kept materialized around the observer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunks farther than this from the observer's chunk are evicted
    pub view_radius: i32,
    pub max_chunks_per_tick: usize,
    /// Generation workers; `None` uses the available hardware parallelism
    pub worker_threads: Option<usize>,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            view_radius: DEFAULT_VIEW_RADIUS,
            max_chunks_per_tick: DEFAULT_MAX_CHUNKS_PER_TICK,
            worker_threads: None,
        }
    }
}

impl StreamingConfig {
    /// Number of worker threads to build the pool with
    pub fn resolved_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
