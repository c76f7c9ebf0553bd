// Core value types and math utilities

pub mod location;
pub mod math;

pub use location::{Location, Side, SideFlags};
