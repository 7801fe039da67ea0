use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use respawn::prelude::*;

#[derive(Debug, Default)]
struct Particle {
    position: [f32; 3],
    velocity: [f32; 3],
    ttl: f32,
}

impl Poolable for Particle {
    fn on_spawn(&mut self) {
        self.ttl = 1.0;
    }
    fn on_despawn(&mut self) {
        self.velocity = [0.0; 3];
    }
    fn place(&mut self, at: SpawnPoint) {
        self.position = at.position;
    }
}

fn spawn_despawn_cycle(c: &mut Criterion) {
    let pool = ObjectPool::new(PoolConfig::warmed(1024, 1024), Particle::default).unwrap();
    pool.warm_up(1024).unwrap();

    c.bench_function("spawn_despawn_warm", |b| {
        b.iter(|| {
            let item = pool.spawn().unwrap();
            black_box((item.borrow().ttl, item.borrow().velocity));
            pool.despawn(&item)
        });
    });

    c.bench_function("spawn_at_despawn_warm", |b| {
        let at = SpawnPoint::at([1.0, 2.0, 3.0]);
        b.iter(|| {
            let item = pool.spawn_at(black_box(at)).unwrap();
            black_box(item.borrow().position);
            pool.despawn(&item)
        });
    });
}

fn warm_up_cold(c: &mut Criterion) {
    c.bench_function("warm_up_64", |b| {
        b.iter(|| {
            let pool =
                ObjectPool::new(PoolConfig::warmed(64, 64), Particle::default).unwrap();
            black_box(pool.warm_up(64).unwrap())
        });
    });
}

fn registry_spawn(c: &mut Criterion) {
    let registry = PoolRegistry::new();
    registry
        .create_pool("Particle", Particle::default, PoolConfig::warmed(256, 256))
        .unwrap();
    let pool = registry.pool::<Particle>("Particle").unwrap();
    pool.warm_up(256).unwrap();

    c.bench_function("registry_spawn_despawn", |b| {
        b.iter(|| {
            let item = registry.spawn::<Particle>(black_box("Particle")).unwrap();
            registry.despawn(&item)
        });
    });
}

criterion_group!(benches, spawn_despawn_cycle, warm_up_cold, registry_spawn);
criterion_main!(benches);
