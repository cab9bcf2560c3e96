//! Saving and loading
//!
//! Maps are stored in a line-per-tile text format; the placed-room list can
//! additionally be exported as JSON.

pub mod map_file;
pub mod room_list;

pub use map_file::{load_map, read_map, save_map, write_map, MapFileError};
pub use room_list::{load_room_list, save_room_list, RoomList, RoomListError};
