//! Procedural terrain: noise sources, height composition and biomes

pub mod noise;
pub use noise::{NoiseSet, NoiseSource, PerlinSource};

pub mod generator;
pub use generator::{ColumnSample, TerrainGenerator, TerrainParams};

pub mod biome;
pub use biome::{BiomeId, BiomeProperties, BiomeSample, BiomeSelector, BiomeTable, HeightProfile};
