//! Registry-level behavior: bulk warm-up state machine, failure isolation,
//! and the handle-routed despawn surface.

#![cfg(feature = "async")]

use respawn::prelude::*;

#[derive(Debug, Default)]
struct Bullet {
    in_flight: bool,
}

impl Poolable for Bullet {
    fn on_spawn(&mut self) {
        self.in_flight = true;
    }
    fn on_despawn(&mut self) {
        self.in_flight = false;
    }
}

#[derive(Debug, Default)]
struct Enemy;
impl Poolable for Enemy {}

#[tokio::test(flavor = "current_thread")]
async fn warm_up_all_fills_every_pool_to_initial_capacity() {
    let registry = PoolRegistry::new();
    registry
        .create_pool("Bullet", Bullet::default, PoolConfig::warmed(5, 20))
        .unwrap();
    registry
        .create_pool("Enemy", Enemy::default, PoolConfig::warmed(3, 10))
        .unwrap();

    assert_eq!(registry.warm_up_state(), WarmUpState::NotStarted);
    registry.warm_up_all().await;
    assert_eq!(registry.warm_up_state(), WarmUpState::Complete);

    let bullets = registry.pool_info("Bullet").unwrap();
    assert_eq!(bullets.free, 5);
    assert_eq!(bullets.active, 0);

    let enemies = registry.pool_info("Enemy").unwrap();
    assert_eq!(enemies.free, 3);
    assert_eq!(enemies.active, 0);
}

#[tokio::test(flavor = "current_thread")]
async fn warm_up_async_on_one_pool_reaches_target() {
    let pool = ObjectPool::new(PoolConfig::warmed(5, 20), Bullet::default).unwrap();
    assert_eq!(pool.warm_up_async(5, 2).await.unwrap(), 5);
    assert_eq!(pool.free_count(), 5);
    assert_eq!(pool.active_count(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn warm_up_failure_is_isolated_and_completion_still_signalled() {
    let registry = PoolRegistry::new();
    registry
        .create_pool(
            "Broken",
            FallibleTemplate(|| -> PoolResult<Enemy> {
                Err(PoolError::manufacture("asset missing"))
            }),
            PoolConfig::warmed(4, 8),
        )
        .unwrap();
    registry
        .create_pool("Bullet", Bullet::default, PoolConfig::warmed(5, 20))
        .unwrap();

    registry.warm_up_all().await;

    // The broken pool failed, the healthy pool warmed, and the registry
    // still reached its terminal state.
    assert_eq!(registry.warm_up_state(), WarmUpState::Complete);
    assert_eq!(registry.pool_info("Broken").unwrap().free, 0);
    assert_eq!(registry.pool_info("Bullet").unwrap().free, 5);
}

#[tokio::test(flavor = "current_thread")]
async fn warm_up_all_is_terminal_once_complete() {
    let registry = PoolRegistry::new();
    registry
        .create_pool("Bullet", Bullet::default, PoolConfig::warmed(2, 4))
        .unwrap();

    registry.warm_up_all().await;
    assert_eq!(registry.pool_info("Bullet").unwrap().free, 2);

    // Drain the free list, then call again: no re-warm happens.
    let a = registry.spawn::<Bullet>("Bullet").unwrap();
    let b = registry.spawn::<Bullet>("Bullet").unwrap();
    registry.warm_up_all().await;
    assert_eq!(registry.warm_up_state(), WarmUpState::Complete);
    assert_eq!(registry.pool_info("Bullet").unwrap().free, 0);

    registry.despawn(&a);
    registry.despawn(&b);
}

#[tokio::test(flavor = "current_thread")]
async fn spawn_after_warm_up_reuses_warmed_instances() {
    let registry = PoolRegistry::new();
    registry
        .create_pool("Bullet", Bullet::default, PoolConfig::warmed(2, 4))
        .unwrap();
    registry.warm_up_all().await;

    let bullet = registry.spawn::<Bullet>("Bullet").unwrap();
    assert!(bullet.borrow().in_flight);
    let info = registry.pool_info("Bullet").unwrap();
    assert_eq!(info.active, 1);
    assert_eq!(info.free, 1);

    assert!(registry.despawn(&bullet));
    assert!(!bullet.borrow().in_flight);
}

#[test]
fn despawn_of_never_pooled_instance_changes_no_pool() {
    let registry = PoolRegistry::new();
    registry
        .create_pool("Bullet", Bullet::default, PoolConfig::bounded(4))
        .unwrap();
    registry
        .create_pool("Enemy", Enemy::default, PoolConfig::bounded(4))
        .unwrap();

    let stray = Pooled::detached(Bullet { in_flight: true });
    assert!(!registry.despawn(&stray));
    assert!(!stray.borrow().in_flight, "fallback path still deactivates");

    for key in registry.keys() {
        let info = registry.pool_info(&key).unwrap();
        assert_eq!((info.active, info.free), (0, 0));
    }
}

#[test]
fn despawn_routes_to_the_owning_pool_without_a_key() {
    let registry = PoolRegistry::new();
    registry
        .create_pool("Bullet", Bullet::default, PoolConfig::bounded(4))
        .unwrap();
    registry
        .create_pool("Enemy", Enemy::default, PoolConfig::bounded(4))
        .unwrap();

    let bullet = registry.spawn::<Bullet>("Bullet").unwrap();
    assert_eq!(bullet.handle().pool_key().as_deref(), Some("Bullet"));

    assert!(registry.despawn(&bullet));
    assert_eq!(registry.pool_info("Bullet").unwrap().free, 1);
    assert_eq!(registry.pool_info("Enemy").unwrap().free, 0);
}
