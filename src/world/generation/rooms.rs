//! Room sampling, validation and placement
//!
//! Rooms are sampled at random, checked against what is already on the map,
//! and stamped into the grid. Rejected candidates never touch the map.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{GenConfig, SamplingProfile};
use super::layout::{Layout, Owner, RoomId};
use crate::world::{Map, Side, WallState};

/// An axis-aligned rectangle of tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Last column covered by the room
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Last row covered by the room
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Same top-left corner, width and height swapped
    pub fn rotated(&self) -> Room {
        Room::new(self.x, self.y, self.height, self.width)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Role a room plays in the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    Start,
    End,
    /// Intermediate room on the main path
    Path,
    DeadEnd,
}

impl RoomKind {
    pub fn is_path(&self) -> bool {
        !matches!(self, RoomKind::DeadEnd)
    }
}

/// A room as it ended up on the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub id: RoomId,
    pub kind: RoomKind,
    pub room: Room,
    /// Position in the path sequence (path rooms only)
    pub order: Option<usize>,
    /// Placed over occupied tiles because the overlap budget ran out
    pub forced_overlap: bool,
    /// Placed partly off the grid because the bounds budget ran out
    pub forced_out_of_bounds: bool,
}

/// Draw a candidate room. Bounds are not considered here.
pub fn sample_room<R: Rng>(rng: &mut R, profile: &SamplingProfile, rows: i32, cols: i32) -> Room {
    let dims = profile.dims;
    let width = rng.gen_range(dims.min..=dims.max);

    let mut room = if rng.gen_bool(profile.square_chance) {
        Room::new(0, 0, width, width)
    } else {
        let height = rng.gen_range(dims.min..=dims.max);
        let room = Room::new(0, 0, width, height);
        if rng.gen_bool(0.5) {
            room.rotated()
        } else {
            room
        }
    };

    room.x = rng.gen_range(0..cols);
    room.y = rng.gen_range(0..rows);
    room
}

/// Does the room cover any occupied tile? Only the in-grid part is checked.
pub fn overlaps_occupied(map: &Map, room: &Room) -> bool {
    let x0 = room.x.max(0);
    let x1 = room.right().min(map.cols - 1);
    let y0 = room.y.max(0);
    let y1 = room.bottom().min(map.rows - 1);

    (y0..=y1).any(|y| (x0..=x1).any(|x| map.is_occupied(x, y)))
}

/// Does any part of the room fall outside the grid?
pub fn is_out_of_bounds(map: &Map, room: &Room) -> bool {
    room.x < 0 || room.y < 0 || room.x + room.width > map.cols || room.y + room.height > map.rows
}

/// Do two rooms share any tile?
pub fn rooms_overlap(a: &Room, b: &Room) -> bool {
    a.x <= b.right() && b.x <= a.right() && a.y <= b.bottom() && b.y <= a.bottom()
}

/// Result of sampling with retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub room: Room,
    pub overlaps: bool,
    pub out_of_bounds: bool,
}

/// Sample until a candidate passes both checks or the relevant retry budget
/// is spent. The last candidate is returned either way.
pub fn sample_with_retries<R: Rng>(
    rng: &mut R,
    map: &Map,
    profile: &SamplingProfile,
    config: &GenConfig,
) -> Candidate {
    let mut overlap_retries = 0;
    let mut bounds_retries = 0;

    loop {
        let room = sample_room(rng, profile, map.rows, map.cols);
        let overlaps = overlaps_occupied(map, &room);
        let out_of_bounds = is_out_of_bounds(map, &room);

        if overlaps && overlap_retries < config.overlap_retries {
            overlap_retries += 1;
            continue;
        }
        if out_of_bounds && bounds_retries < config.bounds_retries {
            bounds_retries += 1;
            continue;
        }

        if overlaps || out_of_bounds {
            log::warn!(
                "Retry budget spent, placing {:?} anyway (overlaps: {}, out of bounds: {})",
                room,
                overlaps,
                out_of_bounds
            );
        }

        return Candidate {
            room,
            overlaps,
            out_of_bounds,
        };
    }
}

/// Stamp a room into the map.
///
/// Free tiles are claimed and walled along the room's outer edge. Tiles that
/// are already occupied are left alone, unless `merge` is set, in which case
/// their walls facing into the room are removed so the two areas fuse.
pub fn place_room(layout: &mut Layout, room: &Room, id: RoomId, merge: bool) {
    for dy in 0..room.height {
        let y = room.y + dy;
        if y < 0 {
            continue;
        }
        if y >= layout.map.rows {
            break;
        }

        for dx in 0..room.width {
            let x = room.x + dx;
            if x < 0 {
                continue;
            }
            if x >= layout.map.cols {
                break;
            }

            let on_edge = |side: Side| match side {
                Side::Up => dy == 0,
                Side::Down => dy == room.height - 1,
                Side::Left => dx == 0,
                Side::Right => dx == room.width - 1,
            };

            if layout.map.is_occupied(x, y) {
                if merge {
                    for side in Side::ALL.into_iter().filter(|s| !on_edge(*s)) {
                        layout.map.set_edge(x, y, side, WallState::None);
                    }
                }
                continue;
            }

            if let Some(tile) = layout.map.get_tile_mut(x, y) {
                tile.occupied = true;
            }
            layout.set_owner(x, y, Owner::Room(id));

            for side in Side::ALL.into_iter().filter(|s| on_edge(*s)) {
                layout.map.set_edge(x, y, side, WallState::Wall);
            }
        }
    }
}

/// Closest pair of coordinates between two inclusive spans
fn nearest_on_axis(a0: i32, a1: i32, b0: i32, b1: i32) -> (i32, i32) {
    if a1 < b0 {
        (a1, b0)
    } else if b1 < a0 {
        (a0, b1)
    } else {
        let shared = a0.max(b0);
        (shared, shared)
    }
}

/// Points inside `a` and `b` that are closest to each other on each axis
pub fn nearest_points(a: &Room, b: &Room) -> ((i32, i32), (i32, i32)) {
    let (ax, bx) = nearest_on_axis(a.x, a.right(), b.x, b.right());
    let (ay, by) = nearest_on_axis(a.y, a.bottom(), b.y, b.bottom());
    ((ax, ay), (bx, by))
}

/// Gap between two rooms; rooms touching on one axis contribute zero on it
pub fn room_distance(a: &Room, b: &Room) -> i32 {
    let ((ax, ay), (bx, by)) = nearest_points(a, b);
    ((ax - bx).abs() - 1) + ((ay - by).abs() - 1)
}

/// Sort rooms by distance from `start`, keeping sampling order on ties
pub fn order_by_distance(rooms: &mut [PlacedRoom], start: &Room) {
    rooms.sort_by_key(|placed| room_distance(start, &placed.room));
}
