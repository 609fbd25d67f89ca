use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hollowvale::world::{compute_fov, update_visibility};
use hollowvale::{generate_dungeon, generate_interior, generate_town, BuildingCategory};

fn bench_generation(c: &mut Criterion) {
    c.bench_function("dungeon 80x50", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| generate_dungeon(black_box(80), black_box(50), &mut rng))
    });

    c.bench_function("town 64x40", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter(|| generate_town(black_box(64), black_box(40), &mut rng))
    });

    c.bench_function("inn interior", |b| {
        let mut rng = StdRng::seed_from_u64(3);
        b.iter(|| generate_interior(black_box(BuildingCategory::Inn), &mut rng))
    });
}

fn bench_fov(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let mut dungeon = generate_dungeon(80, 50, &mut rng);
    let start = dungeon.start;

    c.bench_function("fov radius 8", |b| {
        b.iter(|| compute_fov(&dungeon.grid, black_box(start), 8))
    });

    c.bench_function("fov update radius 12", |b| {
        b.iter(|| update_visibility(&mut dungeon.grid, black_box(start), 12))
    });
}

criterion_group!(benches, bench_generation, bench_fov);
criterion_main!(benches);
