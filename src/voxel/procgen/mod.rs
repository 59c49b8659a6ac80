//! Procedural structure generation: L-system trees
//!
//! Grammar expansion lives in [`lsystem`], interpretation in [`turtle`].

pub mod lsystem;
pub mod turtle;

pub use lsystem::{Grammar, GrammarError, Instruction, TREE_ITERATIONS};
pub use turtle::{Turtle, TurtleStats};
