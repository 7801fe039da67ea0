//! Pool state invariants under direct spawn/despawn cycling.

use respawn::prelude::*;

#[derive(Debug, Default)]
struct Effect {
    spawns: u32,
    despawns: u32,
}

impl Poolable for Effect {
    fn on_spawn(&mut self) {
        self.spawns += 1;
    }
    fn on_despawn(&mut self) {
        self.despawns += 1;
    }
}

fn assert_consistent(pool: &ObjectPool<Effect>) {
    assert_eq!(pool.active_count() + pool.free_count(), pool.total_count());
    assert!(pool.total_count() <= pool.max_size());
}

#[test]
fn exhaustion_then_reuse_round_trip() {
    // initial_capacity=0, max_size=2: fill, deny, return, reuse.
    let pool = ObjectPool::new(PoolConfig::bounded(2), Effect::default).unwrap();

    let a = pool.spawn().expect("first spawn manufactures");
    assert_eq!(pool.total_count(), 1);
    assert_consistent(&pool);

    let b = pool.spawn().expect("second spawn manufactures");
    assert_eq!(pool.total_count(), 2);
    assert_consistent(&pool);

    assert!(pool.spawn().is_none(), "third spawn hits the ceiling");
    assert_consistent(&pool);

    assert!(pool.despawn(&a));
    assert_eq!(pool.free_count(), 1);
    assert_eq!(pool.active_count(), 1);
    assert_consistent(&pool);

    let c = pool.spawn().expect("free instance is served");
    assert!(c.ptr_eq(&a), "the returned instance is reused, not a new one");
    assert_eq!(pool.active_count(), 2);
    assert_eq!(pool.free_count(), 0);
    assert_consistent(&pool);

    drop(b);
    // Dropping a checked-out value does not return it; returns are explicit.
    assert_eq!(pool.active_count(), 2);
}

#[test]
fn identity_reuse_with_single_free_instance() {
    let pool = ObjectPool::new(PoolConfig::bounded(8), Effect::default).unwrap();
    let first = pool.spawn().unwrap();
    pool.despawn(&first);

    let second = pool.spawn().unwrap();
    assert!(second.ptr_eq(&first));
    assert_eq!(second.borrow().spawns, 2);
    assert_eq!(second.borrow().despawns, 1);
}

#[test]
fn double_despawn_increases_free_by_exactly_one() {
    let pool = ObjectPool::new(PoolConfig::bounded(4), Effect::default).unwrap();
    let item = pool.spawn().unwrap();

    assert!(pool.despawn(&item));
    assert!(!pool.despawn(&item));
    assert_eq!(pool.free_count(), 1);
    assert_eq!(item.borrow().despawns, 1, "on_despawn fired once, not twice");
    assert_consistent(&pool);
}

#[test]
fn handle_return_succeeds_exactly_once_per_spawn() {
    let pool = ObjectPool::new(PoolConfig::bounded(4), Effect::default).unwrap();
    let item = pool.spawn().unwrap();

    assert!(item.handle().try_return_to_pool());
    assert!(!item.handle().try_return_to_pool());
    assert_eq!(pool.free_count(), 1);

    // A fresh checkout rebinds the handle and arms it again.
    let again = pool.spawn().unwrap();
    assert!(again.ptr_eq(&item));
    assert!(again.handle().try_return_to_pool());
    assert!(!again.handle().try_return_to_pool());
    assert_consistent(&pool);
}

#[test]
fn warm_up_adds_exactly_the_clamped_count() {
    let pool = ObjectPool::new(PoolConfig::warmed(4, 6), Effect::default).unwrap();

    assert_eq!(pool.warm_up(4).unwrap(), 4);
    assert_eq!(pool.free_count(), 4);

    // Only two slots of headroom remain.
    assert_eq!(pool.warm_up(10).unwrap(), 2);
    assert_eq!(pool.total_count(), 6);
    assert_consistent(&pool);
}

#[test]
fn warmed_instances_never_ran_lifecycle_hooks() {
    let pool = ObjectPool::new(PoolConfig::warmed(2, 4), Effect::default).unwrap();
    pool.warm_up(2).unwrap();

    let item = pool.spawn().unwrap();
    assert_eq!(item.borrow().spawns, 1, "first hook run is the first checkout");
    assert_eq!(item.borrow().despawns, 0);
}

#[test]
fn clear_destroys_everything_tracked() {
    let pool = ObjectPool::new(PoolConfig::bounded(8), Effect::default).unwrap();
    let _a = pool.spawn().unwrap();
    let _b = pool.spawn().unwrap();
    pool.warm_up(3).unwrap();

    pool.clear();
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.free_count(), 0);
    assert_consistent(&pool);
}
