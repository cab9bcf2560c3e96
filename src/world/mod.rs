//! World module
//!
//! Contains the tile grid, reachability helpers, and procedural generation.

pub mod map;
pub mod tile;
pub mod flood;
pub mod generation;

pub use map::{Map, MapError};
pub use tile::{Side, Sprite, Tile, WallState};
pub use flood::{is_connected, paint_region, reachable_from};
