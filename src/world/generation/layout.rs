//! Working state of a maze under construction
//!
//! Alongside the map, the generator remembers which room (or corridor)
//! claimed each tile. Doors are only cut where a room boundary is crossed, so
//! the carver needs this; it is dropped once generation finishes.

use crate::world::{Map, MapError};

pub type RoomId = usize;

/// Who claimed a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Owner {
    #[default]
    Vacant,
    Room(RoomId),
    Corridor,
}

impl Owner {
    pub fn is_room(&self) -> bool {
        matches!(self, Owner::Room(_))
    }
}

/// A map plus per-tile ownership
#[derive(Debug, Clone)]
pub struct Layout {
    pub map: Map,
    owners: Vec<Owner>,
}

impl Layout {
    pub fn new(rows: i32, cols: i32) -> Result<Self, MapError> {
        let map = Map::new(rows, cols)?;
        let mut owners = Vec::new();
        owners
            .try_reserve_exact(map.tiles.len())
            .map_err(|_| MapError::Allocation { rows, cols })?;
        owners.resize(map.tiles.len(), Owner::Vacant);
        Ok(Self { map, owners })
    }

    pub fn owner(&self, x: i32, y: i32) -> Owner {
        if self.map.in_bounds(x, y) {
            self.owners[self.map.xy_to_idx(x, y)]
        } else {
            Owner::Vacant
        }
    }

    pub fn set_owner(&mut self, x: i32, y: i32, owner: Owner) {
        if self.map.in_bounds(x, y) {
            let idx = self.map.xy_to_idx(x, y);
            self.owners[idx] = owner;
        }
    }

    pub fn into_map(self) -> Map {
        self.map
    }
}
