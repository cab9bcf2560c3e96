//! Map data structure
//!
//! The 2D grid of tiles the generator carves into. Dimensions are fixed at
//! creation; tiles are never removed, only changed.

use super::tile::{Side, Tile, WallState};
use thiserror::Error;

/// Errors raised while building a map
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },

    #[error("failed to allocate a {rows}x{cols} map")]
    Allocation { rows: i32, cols: i32 },
}

/// A rectangular tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub rows: i32,
    pub cols: i32,
    pub tiles: Vec<Tile>,
}

impl Map {
    /// Create a map with every tile unoccupied
    pub fn new(rows: i32, cols: i32) -> Result<Self, MapError> {
        if rows <= 0 || cols <= 0 {
            return Err(MapError::InvalidDimensions { rows, cols });
        }

        let len = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or(MapError::Allocation { rows, cols })?;

        let mut tiles = Vec::new();
        tiles
            .try_reserve_exact(len)
            .map_err(|_| MapError::Allocation { rows, cols })?;
        tiles.resize(len, Tile::empty());

        Ok(Self { rows, cols, tiles })
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.cols + x) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_xy(&self, idx: usize) -> (i32, i32) {
        let idx = idx as i32;
        (idx % self.cols, idx / self.cols)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Clamp a point into the grid
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (x.clamp(0, self.cols - 1), y.clamp(0, self.rows - 1))
    }

    /// Get tile at position
    pub fn get_tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            Some(&self.tiles[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    /// Get mutable tile at position
    pub fn get_tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_some_and(|t| t.occupied)
    }

    /// Neighbor coordinates on the given side, if inside the grid
    pub fn neighbor(&self, x: i32, y: i32, side: Side) -> Option<(i32, i32)> {
        let (dx, dy) = side.offset();
        let (nx, ny) = (x + dx, y + dy);
        self.in_bounds(nx, ny).then_some((nx, ny))
    }

    /// Wall state of one side of a tile (`None` outside the grid)
    pub fn wall(&self, x: i32, y: i32, side: Side) -> WallState {
        self.get_tile(x, y).map_or(WallState::None, |t| t.wall(side))
    }

    /// Set the state of the edge on `side` of (x, y), on both tiles that
    /// share it. At the grid border only the tile's own side is written.
    pub fn set_edge(&mut self, x: i32, y: i32, side: Side, state: WallState) {
        let Some(tile) = self.get_tile_mut(x, y) else {
            return;
        };
        tile.set_wall(side, state);

        if let Some((nx, ny)) = self.neighbor(x, y, side) {
            if let Some(other) = self.get_tile_mut(nx, ny) {
                other.set_wall(side.opposite(), state);
            }
        }
    }

    /// Can a walker step from (x, y) through `side`?
    pub fn can_step(&self, x: i32, y: i32, side: Side) -> bool {
        let Some((nx, ny)) = self.neighbor(x, y, side) else {
            return false;
        };
        self.is_occupied(x, y)
            && self.is_occupied(nx, ny)
            && self.wall(x, y, side).is_passable()
            && self.wall(nx, ny, side.opposite()).is_passable()
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.occupied).count()
    }

    /// All edges between occupied neighbors whose two halves disagree
    pub fn asymmetric_edges(&self) -> Vec<((i32, i32), Side)> {
        let mut bad = Vec::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                if !self.is_occupied(x, y) {
                    continue;
                }
                for side in [Side::Right, Side::Down] {
                    if let Some((nx, ny)) = self.neighbor(x, y, side) {
                        if self.is_occupied(nx, ny)
                            && self.wall(x, y, side) != self.wall(nx, ny, side.opposite())
                        {
                            bad.push(((x, y), side));
                        }
                    }
                }
            }
        }
        bad
    }
}
