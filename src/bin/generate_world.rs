//! World streaming driver: walks an observer across the world and reports
//! what the streamer did each tick.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --seed <SEED>          World seed (default: 12345)
//!   --radius <CHUNKS>      View radius in chunks (default: from config)
//!   --ticks <N>            Streaming ticks to run (default: 120)
//!   --speed <VOXELS>       Observer movement per tick along +X (default: 2.0)
//!   --per-tick <N>         Chunk generations per tick (default: from config)
//!   --config <PATH>        Load a JSON world config
//!   --dump-config <PATH>   Write the effective config as JSON and exit

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use glam::Vec3;

use voxstream::core::config::WorldConfig;
use voxstream::streaming::WorldStreamer;
use voxstream::voxel::chunk::CHUNK_SIZE;
use voxstream::voxel::voxel::VoxelKind;

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => match WorldConfig::load(&PathBuf::from(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.generation.seed = seed;
    }
    if let Some(radius) = parse_i32_arg(&args, "--radius") {
        config.streaming.view_radius = radius;
    }
    if let Some(per_tick) = parse_usize_arg(&args, "--per-tick") {
        config.streaming.max_chunks_per_tick = per_tick;
    }
    let ticks = parse_usize_arg(&args, "--ticks").unwrap_or(120);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(2.0);

    if let Some(path) = parse_str_arg(&args, "--dump-config") {
        return match config.validate().and_then(|_| config.save(&PathBuf::from(&path))) {
            Ok(()) => {
                println!("Wrote config to {}", path);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to write config {}: {}", path, e);
                ExitCode::FAILURE
            }
        };
    }

    let mut streamer = match WorldStreamer::new(&config) {
        Ok(streamer) => streamer,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Voxstream World Walk ===");
    println!("Seed:     {}", config.generation.seed);
    println!("Radius:   {} chunks", config.streaming.view_radius);
    println!("Per tick: {} chunks", config.streaming.max_chunks_per_tick);
    println!("Ticks:    {} at {} voxels/tick", ticks, speed);
    println!();

    let start = Instant::now();
    let mut generated = 0usize;
    let mut evicted = 0usize;
    let mut remeshed = 0usize;
    let mut slowest = Duration::ZERO;
    let mut observer = Vec3::new(CHUNK_SIZE as f32 * 0.5, 60.0, CHUNK_SIZE as f32 * 0.5);

    for tick in 0..ticks {
        let report = streamer.stream(observer);
        generated += report.dispatched.len();
        evicted += report.evicted.len();
        remeshed += report.remeshed;
        slowest = slowest.max(report.elapsed);

        if tick % 10 == 0 || tick + 1 == ticks {
            println!(
                "  tick {:>4} @ chunk ({:>3}, {:>3}): +{} gen, -{} evict, {} remesh, {} active, {:.1}ms",
                tick,
                report.center.x,
                report.center.z,
                report.dispatched.len(),
                report.evicted.len(),
                report.remeshed,
                report.active,
                report.elapsed.as_secs_f64() * 1000.0,
            );
        }
        observer.x += speed;
    }

    let elapsed = start.elapsed();
    let cache = streamer.cache();
    let stats = cache.stats();

    let mut faces = 0usize;
    let mut specials = 0usize;
    let mut plants = 0usize;
    let mut trees = 0usize;
    let mut water = 0usize;
    for coord in cache.active_coords() {
        cache.with_chunk(coord, |chunk| {
            if let Some(mesh) = chunk.mesh() {
                faces += mesh.face_count();
                specials += mesh.specials.len();
            }
            plants += chunk.plants.len();
            trees += chunk.trees.len();
            water += chunk.count_kind(VoxelKind::Water);
        });
    }

    println!();
    println!("Ticks:     {} in {:.2}s (slowest {:.1}ms)",
        ticks, elapsed.as_secs_f64(), slowest.as_secs_f64() * 1000.0);
    println!("Chunks:    {} generated, {} evicted, {} remeshes, {} active",
        generated, evicted, remeshed, stats.active);
    println!("Writes:    {} pending, {} logged", stats.pending_writes, stats.logged_writes);
    println!("Geometry:  {} faces, {} special elements", faces, specials);
    println!("Features:  {} plants, {} trees, {} water voxels", plants, trees, water);

    ExitCode::SUCCESS
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
