//! Whole-maze properties over many seeds and parameter sets

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use roommaze::save::{load_map, read_map, save_map, write_map, MapFileError};
use roommaze::world::generation::rooms::{sample_room, sample_with_retries};
use roommaze::world::generation::{generate_maze, Dungeon, GenConfig, MazeBuilder, PlacedRoom, Stage};
use roommaze::world::{is_connected, Map, Side, WallState};

// ── Helpers ──────────────────────────────────────────────

fn arb_config() -> impl Strategy<Value = GenConfig> {
    (8i32..40, 8i32..40, 0usize..8, 0usize..6, any::<bool>()).prop_map(
        |(rows, cols, mid_rooms, dead_ends, merge_overlaps)| GenConfig {
            rows,
            cols,
            mid_rooms,
            dead_ends,
            merge_overlaps,
            ..GenConfig::default()
        },
    )
}

/// Stacked rooms without merging can wall each other off
fn connectivity_expected(config: &GenConfig, rooms: &[PlacedRoom]) -> bool {
    config.merge_overlaps || rooms.iter().all(|r| !r.forced_overlap)
}

fn anchor(map: &Map, placed: &PlacedRoom) -> (i32, i32) {
    map.clamp(placed.room.x, placed.room.y)
}

/// Occupied tiles never have an open edge towards an empty tile
fn sealed(map: &Map) -> bool {
    (0..map.rows).all(|y| {
        (0..map.cols).all(|x| {
            !map.is_occupied(x, y)
                || Side::ALL.into_iter().all(|side| match map.neighbor(x, y, side) {
                    Some((nx, ny)) if !map.is_occupied(nx, ny) => map.wall(x, y, side) == WallState::Wall,
                    _ => true,
                })
        })
    })
}

fn generate(config: &GenConfig, seed: u64) -> Dungeon {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_maze(&mut rng, config).unwrap()
}

// ── Properties ───────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_walls_symmetric(config in arb_config(), seed in any::<u64>()) {
        let dungeon = generate(&config, seed);
        let broken = dungeon.map.asymmetric_edges();
        prop_assert!(broken.is_empty(), "asymmetric edges: {:?}", broken);
        prop_assert!(sealed(&dungeon.map));
    }

    #[test]
    fn prop_start_reaches_end(config in arb_config(), seed in any::<u64>()) {
        let dungeon = generate(&config, seed);
        if !connectivity_expected(&config, &dungeon.rooms) {
            return Ok(());
        }

        let start = anchor(&dungeon.map, dungeon.start_room().unwrap());
        let end = anchor(&dungeon.map, dungeon.end_room().unwrap());
        prop_assert!(is_connected(&dungeon.map, start, end), "seed {}", seed);
    }

    #[test]
    fn prop_path_neighbours_connected(config in arb_config(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut builder = MazeBuilder::new(&mut rng, &config).unwrap();
        while builder.stage() != Stage::PlaceDeadEnds {
            builder.step();
        }
        if !connectivity_expected(&config, builder.path_rooms()) {
            return Ok(());
        }

        let map = builder.map();
        for pair in builder.path_rooms().windows(2) {
            prop_assert!(
                is_connected(map, anchor(map, &pair[0]), anchor(map, &pair[1])),
                "rooms {} and {} not connected",
                pair[0].id,
                pair[1].id
            );
        }
    }

    #[test]
    fn prop_dead_ends_reach_start(config in arb_config(), seed in any::<u64>()) {
        let dungeon = generate(&config, seed);
        if !connectivity_expected(&config, &dungeon.rooms) {
            return Ok(());
        }

        let start = anchor(&dungeon.map, dungeon.start_room().unwrap());
        for dead_end in dungeon.dead_ends() {
            prop_assert!(is_connected(&dungeon.map, anchor(&dungeon.map, dead_end), start));
        }
    }

    #[test]
    fn prop_same_seed_same_maze(config in arb_config(), seed in any::<u64>()) {
        let a = generate(&config, seed);
        let b = generate(&config, seed);
        prop_assert_eq!(a.map, b.map);
        prop_assert_eq!(a.rooms, b.rooms);
    }

    #[test]
    fn prop_map_text_round_trip(config in arb_config(), seed in any::<u64>()) {
        let dungeon = generate(&config, seed);
        let mut buf = Vec::new();
        write_map(&dungeon.map, &mut buf).unwrap();
        let loaded = read_map(buf.as_slice()).unwrap();
        prop_assert_eq!(loaded, dungeon.map);
    }
}

// ── Scenarios ────────────────────────────────────────────

#[test]
fn test_zero_overlap_budget_keeps_first_candidate() {
    let config = GenConfig {
        overlap_retries: 0,
        bounds_retries: 0,
        ..GenConfig::default()
    };
    let mut map = Map::new(config.rows, config.cols).unwrap();
    for tile in &mut map.tiles {
        tile.occupied = true;
    }
    let profile = config.path_profile();

    let mut rng = StdRng::seed_from_u64(3);
    let candidate = sample_with_retries(&mut rng, &map, &profile, &config);
    let mut replay = StdRng::seed_from_u64(3);
    let first = sample_room(&mut replay, &profile, map.rows, map.cols);

    assert_eq!(candidate.room, first);
    assert!(candidate.overlaps);
}

#[test]
fn test_crowded_grid_forces_overlaps() {
    let config = GenConfig {
        rows: 16,
        cols: 16,
        mid_rooms: 30,
        overlap_retries: 0,
        ..GenConfig::default()
    };
    let dungeon = generate(&config, 11);

    assert_eq!(dungeon.path().count(), 32);
    assert!(dungeon.rooms.iter().any(|r| r.forced_overlap));
    assert!(dungeon.map.asymmetric_edges().is_empty());
}

#[test]
fn test_map_file_round_trip() {
    let config = GenConfig {
        mid_rooms: 5,
        dead_ends: 3,
        ..GenConfig::default()
    };
    let dungeon = generate(&config, 2024);

    let path = std::env::temp_dir().join(format!("roommaze-it-{}.txt", std::process::id()));
    save_map(&dungeon.map, &path).unwrap();
    let loaded = load_map(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, dungeon.map);
}

#[test]
fn test_short_tile_line_rejected() {
    let dungeon = generate(&GenConfig::default(), 8);
    let mut buf = Vec::new();
    write_map(&dungeon.map, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    // Cut the fifth tile down to its background palette
    let broken: Vec<String> = text
        .lines()
        .enumerate()
        .map(|(i, line)| match i {
            5 => line.split_whitespace().next().unwrap().to_string(),
            _ => line.to_string(),
        })
        .collect();
    let broken = broken.join("\n");

    assert!(matches!(
        read_map(broken.as_bytes()),
        Err(MapFileError::ShortTile { found: 1, .. })
    ));
}
