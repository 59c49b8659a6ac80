//! Chunk cache and per-tick world streaming

pub mod config;
pub mod priority;
pub mod cache;
pub mod streamer;

pub use config::StreamingConfig;
pub use priority::{ChunkPriority, ChunkPriorityQueue};
pub use cache::{CacheStats, ChunkCache, ChunkRecords, ChunkStatus};
pub use streamer::{StreamReport, WorldStreamer};
