//! Procedural maze generation
//!
//! A maze is built in fixed stages: the start and end rooms go down first,
//! intermediate path rooms are scattered, the path rooms are ordered by
//! distance from the start and chained together with corridors, and finally
//! dead-end rooms are hung off their nearest path room.

pub mod config;
pub mod corridors;
pub mod layout;
pub mod rooms;

pub use config::{ConfigError, DimRange, GenConfig, RoomSize, SamplingProfile};
pub use layout::{Layout, Owner, RoomId};
pub use rooms::{PlacedRoom, Room, RoomKind};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::world::tile::{palette, Sprite};
use crate::world::{Map, MapError};
use rooms::{order_by_distance, place_room, rooms_overlap, sample_with_retries};

/// Errors that abort generation
#[derive(Debug, Error)]
pub enum GenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("failed to allocate room list for {0} rooms")]
    Allocation(usize),
}

/// Generation stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    PlaceEndpoints,
    PlacePathRooms,
    OrderPathRooms,
    CarvePathChain,
    PlaceDeadEnds,
    CarveDeadEndLinks,
    StampMarkers,
    Done,
}

impl Stage {
    pub fn next(&self) -> Stage {
        match self {
            Stage::PlaceEndpoints => Stage::PlacePathRooms,
            Stage::PlacePathRooms => Stage::OrderPathRooms,
            Stage::OrderPathRooms => Stage::CarvePathChain,
            Stage::CarvePathChain => Stage::PlaceDeadEnds,
            Stage::PlaceDeadEnds => Stage::CarveDeadEndLinks,
            Stage::CarveDeadEndLinks => Stage::StampMarkers,
            Stage::StampMarkers => Stage::Done,
            Stage::Done => Stage::Done,
        }
    }
}

/// A finished maze
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub map: Map,
    /// Path rooms in visiting order, followed by dead ends in placement order
    pub rooms: Vec<PlacedRoom>,
    /// Seed the RNG was created from, when generation owned it
    pub seed: Option<u64>,
}

impl Dungeon {
    pub fn start_room(&self) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.kind == RoomKind::Start)
    }

    pub fn end_room(&self) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.kind == RoomKind::End)
    }

    /// Path rooms in visiting order
    pub fn path(&self) -> impl Iterator<Item = &PlacedRoom> {
        self.rooms.iter().filter(|r| r.kind.is_path())
    }

    pub fn dead_ends(&self) -> impl Iterator<Item = &PlacedRoom> {
        self.rooms.iter().filter(|r| r.kind == RoomKind::DeadEnd)
    }
}

/// Generate a maze in one go
pub fn generate_maze(rng: &mut StdRng, config: &GenConfig) -> Result<Dungeon, GenError> {
    MazeBuilder::new(rng, config)?.run()
}

/// Generate a maze from a fresh RNG seeded with `seed`. The same seed and
/// config always give the same maze.
pub fn generate_seeded(seed: u64, config: &GenConfig) -> Result<Dungeon, GenError> {
    log::debug!("Seeding generator with {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dungeon = generate_maze(&mut rng, config)?;
    dungeon.seed = Some(seed);
    Ok(dungeon)
}

/// Step-by-step maze generator
pub struct MazeBuilder<'a> {
    rng: &'a mut StdRng,
    config: &'a GenConfig,
    layout: Layout,
    stage: Stage,
    /// Path rooms; ordered once `OrderPathRooms` has run
    path: Vec<PlacedRoom>,
    dead_ends: Vec<PlacedRoom>,
}

impl<'a> MazeBuilder<'a> {
    pub fn new(rng: &'a mut StdRng, config: &'a GenConfig) -> Result<Self, GenError> {
        config.validate()?;

        let layout = Layout::new(config.rows, config.cols)?;

        let mut path = Vec::new();
        path.try_reserve_exact(config.mid_rooms + 2)
            .map_err(|_| GenError::Allocation(config.mid_rooms + 2))?;
        let mut dead_ends = Vec::new();
        dead_ends
            .try_reserve_exact(config.dead_ends)
            .map_err(|_| GenError::Allocation(config.dead_ends))?;

        Ok(Self {
            rng,
            config,
            layout,
            stage: Stage::PlaceEndpoints,
            path,
            dead_ends,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn map(&self) -> &Map {
        &self.layout.map
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn path_rooms(&self) -> &[PlacedRoom] {
        &self.path
    }

    pub fn dead_end_rooms(&self) -> &[PlacedRoom] {
        &self.dead_ends
    }

    /// Run the current stage and move to the next one
    pub fn step(&mut self) -> Stage {
        log::debug!("Running stage {:?}", self.stage);

        match self.stage {
            Stage::PlaceEndpoints => self.place_endpoints(),
            Stage::PlacePathRooms => self.place_path_rooms(),
            Stage::OrderPathRooms => self.order_path_rooms(),
            Stage::CarvePathChain => self.carve_path_chain(),
            Stage::PlaceDeadEnds => self.place_dead_ends(),
            Stage::CarveDeadEndLinks => self.carve_dead_end_links(),
            Stage::StampMarkers => self.stamp_markers(),
            Stage::Done => {}
        }

        self.stage = self.stage.next();
        self.stage
    }

    /// Run every remaining stage
    pub fn run(mut self) -> Result<Dungeon, GenError> {
        while self.stage != Stage::Done {
            self.step();
        }
        Ok(self.finish())
    }

    /// Hand over the map and room list as they are now
    pub fn finish(self) -> Dungeon {
        let mut rooms = self.path;
        rooms.extend(self.dead_ends);
        log::info!(
            "Generated {}x{} maze with {} rooms ({} tiles occupied)",
            self.layout.map.rows,
            self.layout.map.cols,
            rooms.len(),
            self.layout.map.occupied_count()
        );
        Dungeon {
            map: self.layout.into_map(),
            rooms,
            seed: None,
        }
    }

    fn place_endpoints(&mut self) {
        let (rows, cols) = (self.config.rows, self.config.cols);
        let start_size = self.config.start_room;
        let end_size = self.config.end_room;

        let mut start = Room::new(0, 0, start_size.cols, start_size.rows);
        let mut end = anchor_bottom_right(
            Room::new(0, 0, end_size.cols, end_size.rows),
            rows,
            cols,
        );

        // Turn the rooms until they stop overlapping, if they ever do
        if rooms_overlap(&start, &end) {
            start = rotate_within(start, rows, cols);
            if rooms_overlap(&start, &end) {
                start = rotate_within(start, rows, cols);
                end = anchor_bottom_right(rotate_within(end, rows, cols), rows, cols);
                if rooms_overlap(&start, &end) {
                    start = rotate_within(start, rows, cols);
                }
            }
        }

        let forced_overlap = rooms_overlap(&start, &end);
        if forced_overlap {
            log::warn!("Start room {:?} and end room {:?} overlap", start, end);
        }

        place_room(&mut self.layout, &start, 0, false);
        place_room(&mut self.layout, &end, 1, false);

        self.path.push(PlacedRoom {
            id: 0,
            kind: RoomKind::Start,
            room: start,
            order: None,
            forced_overlap: false,
            forced_out_of_bounds: false,
        });
        self.path.push(PlacedRoom {
            id: 1,
            kind: RoomKind::End,
            room: end,
            order: None,
            forced_overlap,
            forced_out_of_bounds: false,
        });
    }

    fn place_path_rooms(&mut self) {
        let profile = self.config.path_profile();
        for _ in 0..self.config.mid_rooms {
            let id = self.path.len();
            let placed = self.place_sampled(id, RoomKind::Path, &profile);
            self.path.push(placed);
        }
    }

    fn order_path_rooms(&mut self) {
        let Some(start) = self.path.first().map(|r| r.room) else {
            return;
        };
        order_by_distance(&mut self.path, &start);

        for (order, placed) in self.path.iter_mut().enumerate() {
            placed.order = Some(order);
        }
        log::debug!(
            "Path order: {:?}",
            self.path.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    fn carve_path_chain(&mut self) {
        for pair in self.path.windows(2) {
            corridors::carve_corridor(&mut self.layout, &pair[0].room, &pair[1].room);
        }
    }

    fn place_dead_ends(&mut self) {
        let profile = self.config.dead_end_profile();
        for _ in 0..self.config.dead_ends {
            let id = self.path.len() + self.dead_ends.len();
            let placed = self.place_sampled(id, RoomKind::DeadEnd, &profile);
            self.dead_ends.push(placed);
        }
    }

    fn carve_dead_end_links(&mut self) {
        let links = corridors::link_dead_ends(&mut self.layout, &self.dead_ends, &self.path);
        log::debug!("Dead end links: {:?}", links);
    }

    fn stamp_markers(&mut self) {
        for (order, placed) in self.path.iter().enumerate() {
            let sprite = match placed.kind {
                RoomKind::Start => Sprite::Glyph {
                    ch: b'S',
                    palette: palette::GREEN as u8,
                },
                RoomKind::End => Sprite::Glyph {
                    ch: b'E',
                    palette: palette::RED as u8,
                },
                _ => Sprite::Glyph {
                    ch: ordinal_glyph(order),
                    palette: palette::YELLOW as u8,
                },
            };

            let (x, y) = self.layout.map.clamp(placed.room.x, placed.room.y);
            if let Some(tile) = self.layout.map.get_tile_mut(x, y) {
                tile.sprite = sprite;
            }
        }
    }

    fn place_sampled(&mut self, id: RoomId, kind: RoomKind, profile: &SamplingProfile) -> PlacedRoom {
        let candidate = sample_with_retries(&mut *self.rng, &self.layout.map, profile, self.config);
        place_room(&mut self.layout, &candidate.room, id, self.config.merge_overlaps);

        PlacedRoom {
            id,
            kind,
            room: candidate.room,
            order: None,
            forced_overlap: candidate.overlaps,
            forced_out_of_bounds: candidate.out_of_bounds,
        }
    }
}

/// Move a room so its bottom-right corner sits on the grid's
fn anchor_bottom_right(room: Room, rows: i32, cols: i32) -> Room {
    Room::new(cols - room.width, rows - room.height, room.width, room.height)
}

/// Rotate a room unless the rotated room would not fit in the grid.
///
/// Endpoint layout differs from a plain in-place swap in three ways: a turn
/// that would stick out of the grid is skipped, the turned end room is
/// re-anchored to the bottom-right corner, and overlap between the two is a
/// whole-rectangle test, not a corners-only one.
fn rotate_within(room: Room, rows: i32, cols: i32) -> Room {
    if room.height <= cols && room.width <= rows {
        room.rotated()
    } else {
        room
    }
}

/// Marker for the n-th room on the path: 1-9, then a-z, then '+'
fn ordinal_glyph(order: usize) -> u8 {
    match order {
        1..=9 => b'0' + order as u8,
        10..=35 => b'a' + (order - 10) as u8,
        _ => b'+',
    }
}
