//! Placed-room list export
//!
//! The room list is written as pretty JSON next to the map so other tools can
//! find the rooms without re-deriving them from walls.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::generation::{Dungeon, PlacedRoom};

/// Room list errors
#[derive(Debug, Error)]
pub enum RoomListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What goes into the JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomList {
    pub rows: i32,
    pub cols: i32,
    /// Seed the maze was generated from, if known
    pub seed: Option<u64>,
    pub rooms: Vec<PlacedRoom>,
}

impl RoomList {
    pub fn from_dungeon(dungeon: &Dungeon) -> Self {
        Self {
            rows: dungeon.map.rows,
            cols: dungeon.map.cols,
            seed: dungeon.seed,
            rooms: dungeon.rooms.clone(),
        }
    }
}

pub fn save_room_list(list: &RoomList, path: &Path) -> Result<(), RoomListError> {
    let json = serde_json::to_string_pretty(list)?;
    fs::write(path, json)?;
    log::info!("Room list ({} rooms) written to {}", list.rooms.len(), path.display());
    Ok(())
}

pub fn load_room_list(path: &Path) -> Result<RoomList, RoomListError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::{generate_seeded, GenConfig, RoomKind};

    #[test]
    fn test_room_list_written_as_json() {
        let config = GenConfig {
            mid_rooms: 2,
            dead_ends: 1,
            ..GenConfig::default()
        };
        let dungeon = generate_seeded(5, &config).unwrap();
        let list = RoomList::from_dungeon(&dungeon);

        let path = std::env::temp_dir().join(format!("roommaze-rooms-{}.json", std::process::id()));
        save_room_list(&list, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let loaded = load_room_list(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(text.contains("\"Start\""));
        assert_eq!(loaded, list);
        assert_eq!(loaded.seed, Some(5));
        assert_eq!(loaded.rooms.len(), 5);
        assert_eq!(loaded.rooms[0].kind, RoomKind::Start);
    }
}
