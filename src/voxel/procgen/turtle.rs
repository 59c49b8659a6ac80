//! Turtle interpretation of L-system instructions
//!
//! The turtle keeps an explicit stack of value-type frames instead of
//! recursing, and writes every voxel in world coordinates through a
//! [`VoxelSink`] so branches can cross chunk boundaries.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::{IVec3, Vec3};
use rand::Rng;

use super::lsystem::{Facing, Instruction};
use crate::voxel::edit::write::{in_world_height, VoxelSink, WriteMode};
use crate::voxel::voxel::{Voxel, VoxelKind};

/// Leaves stamped per `L`
pub const LEAF_SAMPLES: usize = 32;

/// Radius of the leaf ring
pub const LEAF_RADIUS: f32 = 2.0;

/// Deepest allowed `[` nesting; deeper pushes are ignored
const MAX_STACK_DEPTH: usize = 64;

/// Cursor state saved by `[` and restored by `]`
#[derive(Clone, Copy, Debug, PartialEq)]
struct Frame {
    position: Vec3,
    facing: Facing,
}

/// Counts of voxels a turtle run attempted to emit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurtleStats {
    pub wood: usize,
    pub leaves: usize,
    /// Writes dropped because they fell outside the world's height
    pub skipped: usize,
}

/// Interprets instructions starting from a world voxel position
pub struct Turtle {
    frame: Frame,
    stack: Vec<Frame>,
    /// Branch azimuth; only ever increases and is not part of the saved frame
    azimuth: f32,
    stats: TurtleStats,
}

impl Turtle {
    pub fn new(origin: IVec3) -> Self {
        Self {
            frame: Frame { position: origin.as_vec3(), facing: Facing::Up },
            stack: Vec::new(),
            azimuth: 0.0,
            stats: TurtleStats::default(),
        }
    }

    /// Run all instructions, drawing randomness only from `rng`
    pub fn run<R: Rng, S: VoxelSink + ?Sized>(
        mut self,
        instructions: &[Instruction],
        rng: &mut R,
        sink: &mut S,
    ) -> TurtleStats {
        for &instruction in instructions {
            match instruction {
                Instruction::Forward => {
                    self.frame.position += self.frame.facing.step().as_vec3();
                    self.emit(self.frame.position, VoxelKind::Wood, sink);
                }
                Instruction::Face(facing) => self.frame.facing = facing,
                Instruction::Push => {
                    if self.stack.len() < MAX_STACK_DEPTH {
                        self.stack.push(self.frame);
                    }
                }
                Instruction::Pop => {
                    if let Some(frame) = self.stack.pop() {
                        self.frame = frame;
                    }
                }
                Instruction::Arc(steps) => {
                    for _ in 0..steps {
                        self.azimuth += FRAC_PI_4 * (1.0 + rng.gen_range(0.0..0.2));
                        let step = Vec3::new(self.azimuth.cos(), 1.0, self.azimuth.sin());
                        self.frame.position += step;
                        self.emit(self.frame.position, VoxelKind::Wood, sink);
                    }
                }
                Instruction::Leaves => {
                    let center = self.frame.position;
                    for i in 0..LEAF_SAMPLES {
                        let theta = i as f32 / LEAF_SAMPLES as f32 * TAU;
                        let jitter = rng.gen_range(0..=1) as f32;
                        let offset = Vec3::new(
                            LEAF_RADIUS * theta.cos(),
                            jitter,
                            LEAF_RADIUS * theta.sin(),
                        );
                        self.emit(center + offset, VoxelKind::Leaves, sink);
                    }
                }
            }
        }
        self.stats
    }

    fn emit<S: VoxelSink + ?Sized>(&mut self, position: Vec3, kind: VoxelKind, sink: &mut S) {
        let cell = position.round().as_ivec3();
        if !in_world_height(cell.y) {
            self.stats.skipped += 1;
            return;
        }
        match kind {
            VoxelKind::Leaves => {
                self.stats.leaves += 1;
                sink.place(cell, Voxel::new(kind), WriteMode::Fill);
            }
            _ => {
                self.stats.wood += 1;
                sink.place(cell, Voxel::new(kind), WriteMode::Overwrite);
            }
        }
    }
}
