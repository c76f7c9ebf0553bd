// Game systems: voxel world, rail maintenance, cart collisions
//
// - `world`: block registry and block storage
// - `rails`: keeps placed rails connected to their neighbors
// - `carts`: collision response between rail vehicles and characters
// - `simulation`: shared state and the event wiring between the systems

pub mod carts;
pub mod entities;
pub mod events;
pub mod rails;
pub mod settings;
pub mod simulation;
pub mod world;

pub use settings::{ImpulseSettings, RailSettings, IMPULSE_SETTINGS, RAIL_SETTINGS};
pub use simulation::{Game, Simulation};
