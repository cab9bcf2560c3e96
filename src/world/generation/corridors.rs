//! Corridor carving
//!
//! Corridors are carved in two straight legs between the nearest points of
//! two rooms: first along the axis with the larger separation, then along
//! the other one. Crossing a room boundary leaves a door; crossing into
//! another corridor, or over a door left by an earlier one, just opens the
//! way.

use super::layout::{Layout, Owner, RoomId};
use super::rooms::{nearest_points, room_distance, PlacedRoom, Room};
use crate::world::{Side, WallState};

/// Direction of a single corridor leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Carve a corridor from `from` to `to`.
///
/// Returns the number of tiles newly claimed as corridor.
pub fn carve_corridor(layout: &mut Layout, from: &Room, to: &Room) -> usize {
    let (src, dst) = nearest_points(from, to);
    let src = layout.map.clamp(src.0, src.1);
    let dst = layout.map.clamp(dst.0, dst.1);

    let dx = (dst.0 - src.0).abs();
    let dy = (dst.1 - src.1).abs();
    let legs = if dx >= dy {
        [Axis::Horizontal, Axis::Vertical]
    } else {
        [Axis::Vertical, Axis::Horizontal]
    };

    let mut carved = 0;
    let mut cursor = src;
    for axis in legs {
        let target = match axis {
            Axis::Horizontal => (dst.0, cursor.1),
            Axis::Vertical => (cursor.0, dst.1),
        };
        carved += sweep(layout, cursor, target);
        cursor = target;
    }

    log::trace!("Carved corridor {:?} -> {:?} ({} new tiles)", src, dst, carved);
    carved
}

/// Walk one tile at a time along a single axis, claiming tiles and opening
/// every edge crossed. `from` and `to` must share a row or a column.
fn sweep(layout: &mut Layout, from: (i32, i32), to: (i32, i32)) -> usize {
    let side = if to.0 > from.0 {
        Side::Right
    } else if to.0 < from.0 {
        Side::Left
    } else if to.1 > from.1 {
        Side::Down
    } else {
        Side::Up
    };
    let (step_x, step_y) = side.offset();

    let mut carved = usize::from(claim_tile(layout, from.0, from.1));
    let (mut x, mut y) = from;
    while (x, y) != to {
        let (nx, ny) = (x + step_x, y + step_y);
        if claim_tile(layout, nx, ny) {
            carved += 1;
        }
        open_edge(layout, x, y, side);
        x = nx;
        y = ny;
    }
    carved
}

/// Turn a free tile into an enclosed corridor cell. Occupied tiles are left
/// as they are. Returns true if the tile was free.
fn claim_tile(layout: &mut Layout, x: i32, y: i32) -> bool {
    match layout.map.get_tile_mut(x, y) {
        Some(tile) if !tile.occupied => tile.occupied = true,
        _ => return false,
    }
    layout.set_owner(x, y, Owner::Corridor);

    for side in Side::ALL {
        layout.map.set_edge(x, y, side, WallState::Wall);
    }
    true
}

/// Make the edge on `side` of (x, y) walkable. A wall on a room boundary
/// becomes a door; anything else, including a door, is cleared.
fn open_edge(layout: &mut Layout, x: i32, y: i32, side: Side) {
    let Some((nx, ny)) = layout.map.neighbor(x, y, side) else {
        return;
    };

    let crosses_room = layout.owner(x, y).is_room() || layout.owner(nx, ny).is_room();
    let state = match layout.map.wall(x, y, side) {
        WallState::Wall if crosses_room => WallState::Door,
        _ => WallState::None,
    };
    layout.map.set_edge(x, y, side, state);
}

/// Closest path room to `room`; the earliest in `path` wins ties
pub fn nearest_path_room<'a>(room: &Room, path: &'a [PlacedRoom]) -> Option<&'a PlacedRoom> {
    path.iter().min_by_key(|candidate| room_distance(room, &candidate.room))
}

/// Connect every dead-end room to its nearest path room.
///
/// `path` is the ordered path sequence. Returns the (dead end, path room)
/// pairs that were joined.
pub fn link_dead_ends(
    layout: &mut Layout,
    dead_ends: &[PlacedRoom],
    path: &[PlacedRoom],
) -> Vec<(RoomId, RoomId)> {
    let mut links = Vec::with_capacity(dead_ends.len());
    for dead_end in dead_ends {
        let Some(target) = nearest_path_room(&dead_end.room, path) else {
            continue;
        };
        carve_corridor(layout, &dead_end.room, &target.room);
        links.push((dead_end.id, target.id));
    }
    links
}
