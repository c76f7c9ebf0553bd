// Rail network maintenance and rail vehicle collision response for a voxel world

pub mod core;
pub mod engine;
pub mod game;
