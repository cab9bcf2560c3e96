//! Flood fill over walkable tiles
//!
//! Movement is 4-directional and blocked by any `Wall` on the shared edge.
//! Traversal uses an explicit stack so large maps cannot blow the call stack.

use super::tile::Side;
use super::Map;

/// Mark every tile reachable from `start`. Indexed like `map.tiles`.
pub fn reachable_from(map: &Map, start: (i32, i32)) -> Vec<bool> {
    let mut visited = vec![false; map.tiles.len()];
    let (sx, sy) = start;
    if !map.is_occupied(sx, sy) {
        return visited;
    }

    let mut stack = vec![(sx, sy)];
    visited[map.xy_to_idx(sx, sy)] = true;

    while let Some((x, y)) = stack.pop() {
        for side in Side::ALL {
            if !map.can_step(x, y, side) {
                continue;
            }
            if let Some((nx, ny)) = map.neighbor(x, y, side) {
                let idx = map.xy_to_idx(nx, ny);
                if !visited[idx] {
                    visited[idx] = true;
                    stack.push((nx, ny));
                }
            }
        }
    }

    visited
}

/// Is there a walkable path between two tiles?
pub fn is_connected(map: &Map, from: (i32, i32), to: (i32, i32)) -> bool {
    if !map.in_bounds(to.0, to.1) {
        return false;
    }
    reachable_from(map, from)[map.xy_to_idx(to.0, to.1)]
}

/// Set the background palette of the region reachable from `start`.
/// Returns the number of tiles painted.
pub fn paint_region(map: &mut Map, start: (i32, i32), palette: i16) -> usize {
    let region = reachable_from(map, start);
    let mut painted = 0;
    for (tile, _) in map.tiles.iter_mut().zip(&region).filter(|(_, hit)| **hit) {
        tile.bg_palette = palette;
        painted += 1;
    }
    painted
}
