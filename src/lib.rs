//! Roommaze - procedural room-and-corridor mazes
//!
//! Scatters rectangular rooms over a tile grid, chains them from a start room
//! to an end room with corridors, and hangs dead-end rooms off that path.
//! Every tile tracks the wall state of its four edges, so the result can be
//! walked, flood filled, and written to disk tile by tile.

pub mod world;
pub mod save;

// Re-export commonly used types
pub use world::generation::{generate_maze, generate_seeded, Dungeon, GenConfig, GenError, MazeBuilder, Stage};
pub use world::map::Map;
pub use world::tile::{Side, Sprite, Tile, WallState};
