use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use roommaze::save::write_map;
use roommaze::world::generation::{generate_maze, GenConfig};

fn config_for(size: i32) -> GenConfig {
    GenConfig {
        rows: size,
        cols: size,
        mid_rooms: (size / 4) as usize,
        dead_ends: (size / 8) as usize,
        ..GenConfig::default()
    }
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_maze");
    for size in [32, 64, 128] {
        let config = config_for(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &config, |b, config| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                black_box(generate_maze(&mut rng, config).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let dungeon = generate_maze(&mut rng, &config_for(128)).unwrap();

    c.bench_function("write_map 128x128", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(dungeon.map.tiles.len() * 16);
            write_map(black_box(&dungeon.map), &mut buf).unwrap();
            buf
        })
    });
}

criterion_group!(benches, bench_generate, bench_write);
criterion_main!(benches);
