use criterion::{black_box, criterion_group, criterion_main, Criterion};
use effect_core::{sample_frame, ParticlePool};
use effect_data::{ParticleSystem, SubEffect};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn eight_key_layer() -> SubEffect {
    let keys = 8;
    SubEffect {
        frame_count: keys,
        frame_times: vec![0.1; keys],
        frame_sizes: (0..keys).map(|i| [1.0 + i as f32 * 0.1; 3]).collect(),
        frame_angles: (0..keys).map(|i| [0.0, i as f32 * 15.0, 0.0]).collect(),
        frame_positions: (0..keys).map(|i| [i as f32 * 0.2, 0.0, 0.0]).collect(),
        frame_colors: (0..keys).map(|i| [1.0, 1.0, 1.0, 1.0 - i as f32 * 0.1]).collect(),
        frame_tex_names: (0..keys).map(|i| format!("fx{i}.tga")).collect(),
        frame_tex_time: 0.07,
        ..SubEffect::default()
    }
}

fn bench_sample_frame(c: &mut Criterion) {
    let sub = eight_key_layer();
    c.bench_function("sample_frame 8 keys", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t += 1.0 / 60.0;
            black_box(sample_frame(black_box(&sub), t, true))
        })
    });
}

fn bench_pool_tick(c: &mut Criterion) {
    let system = ParticleSystem {
        particle_count: 100,
        life: 2.0,
        step: 0.005,
        frame_colors: vec![[1.0, 1.0, 1.0, 1.0], [1.0, 0.0, 0.0, 0.0]],
        frame_sizes: vec![[1.0; 3], [0.0; 3]],
        ..ParticleSystem::default()
    };
    c.bench_function("pool tick at full occupancy", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = ParticlePool::new();
        // Warm up to a steady-state full pool.
        for _ in 0..300 {
            pool.tick(&system, 1.0 / 60.0, &mut rng);
        }
        b.iter(|| black_box(pool.tick(&system, 1.0 / 60.0, &mut rng)))
    });
}

criterion_group!(benches, bench_sample_frame, bench_pool_tick);
criterion_main!(benches);
