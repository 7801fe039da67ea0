//! Keyed multi-pool registry: one spawn/despawn/warm-up surface over
//! type-erased pools.
//!
//! Pools register under string keys; each entry is an [`ObjectPool<T>`]
//! behind a small object-safe facade and is recovered by `Any`-downcast,
//! never by runtime reflection over instances. The registry is a plain
//! value the host owns and passes around; there is no global state.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(feature = "async")]
use std::future::Future;
#[cfg(feature = "async")]
use std::pin::Pin;
#[cfg(feature = "async")]
use std::time::Duration;

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::pool::{ObjectPool, PoolInfo, Poolable, Pooled, SpawnPoint, Template};

#[cfg(feature = "async")]
type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Yield cadence for registry-driven warm-ups.
#[cfg(feature = "async")]
const WARM_UP_BATCH: usize = 8;

/// Progress of the registry's bulk warm-up.
///
/// `Complete` is reached exactly once, including on partial failure, so
/// dependents are never left waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarmUpState {
    /// `warm_up_all` has not run.
    #[default]
    NotStarted,
    /// `warm_up_all` is in progress.
    Warming,
    /// Every pool has been warmed, best-effort.
    Complete,
}

// ---------------------------------------------------------------------------
// ErasedPool
// ---------------------------------------------------------------------------

/// Object-safe facade over `ObjectPool<T>` for the keyed map.
trait ErasedPool: Any {
    fn as_any(&self) -> &dyn Any;
    fn info(&self) -> PoolInfo;
    fn initial_capacity(&self) -> usize;
    fn clear(&self);
    #[cfg(feature = "async")]
    fn warm_up(&self, count: usize) -> LocalBoxFuture<'_, PoolResult<usize>>;
}

impl<T: Poolable> ErasedPool for ObjectPool<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn info(&self) -> PoolInfo {
        ObjectPool::info(self)
    }

    fn initial_capacity(&self) -> usize {
        ObjectPool::initial_capacity(self)
    }

    fn clear(&self) {
        ObjectPool::clear(self);
    }

    #[cfg(feature = "async")]
    fn warm_up(&self, count: usize) -> LocalBoxFuture<'_, PoolResult<usize>> {
        Box::pin(self.warm_up_async(count, WARM_UP_BATCH))
    }
}

// ---------------------------------------------------------------------------
// PoolRegistry
// ---------------------------------------------------------------------------

/// Named collection of pools with one uniform surface for creation,
/// spawn/despawn, bulk warm-up, and diagnostics.
///
/// # Example
/// ```
/// use respawn::{PoolConfig, PoolRegistry};
/// use respawn::pool::Poolable;
///
/// #[derive(Default)]
/// struct Bullet;
/// impl Poolable for Bullet {}
///
/// let registry = PoolRegistry::new();
/// registry
///     .create_pool("Bullet", Bullet::default, PoolConfig::warmed(5, 20))
///     .unwrap();
///
/// let bullet = registry.spawn::<Bullet>("Bullet").unwrap();
/// assert!(registry.despawn(&bullet));
/// ```
#[derive(Default)]
pub struct PoolRegistry {
    pools: RefCell<HashMap<String, Rc<dyn ErasedPool>>>,
    warm_up: Cell<WarmUpState>,
}

impl PoolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pool under `key`.
    ///
    /// Rejected with no state change if the key is empty or already
    /// registered, or if the configuration is invalid. Re-registration is
    /// an error rather than a silent overwrite; hot-reload flows remove
    /// the old pool first.
    pub fn create_pool<T: Poolable>(
        &self,
        key: &str,
        template: impl Template<T>,
        config: PoolConfig,
    ) -> PoolResult<()> {
        if key.is_empty() {
            let err = PoolError::invalid_config("pool key must be non-empty");
            tracing::error!(%err, "pool registration rejected");
            return Err(err);
        }
        if self.pools.borrow().contains_key(key) {
            tracing::error!(pool = %key, "pool registration rejected; key already registered");
            return Err(PoolError::duplicate_key(key));
        }

        let pool = ObjectPool::new(config, template).inspect_err(|err| {
            tracing::error!(pool = %key, %err, "pool registration rejected");
        })?;
        pool.set_key(key);
        self.pools.borrow_mut().insert(key.to_string(), Rc::new(pool));
        tracing::debug!(
            pool = %key,
            initial_capacity = config.initial_capacity,
            max_size = config.max_size,
            "registered object pool"
        );
        Ok(())
    }

    /// Get a typed reference to the pool registered under `key`.
    pub fn pool<T: Poolable>(&self, key: &str) -> Option<ObjectPool<T>> {
        let pools = self.pools.borrow();
        let entry = pools.get(key)?;
        match entry.as_any().downcast_ref::<ObjectPool<T>>() {
            Some(pool) => Some(pool.clone()),
            None => {
                tracing::error!(pool = %key, "pool holds instances of a different type");
                None
            }
        }
    }

    /// Spawn from the pool registered under `key`.
    ///
    /// `None` on unknown key, instance-type mismatch, exhaustion, or
    /// template failure; each case is logged, none panics. The key is
    /// stamped into the instance's handle for diagnostics.
    pub fn spawn<T: Poolable>(&self, key: &str) -> Option<Pooled<T>> {
        self.lookup::<T>(key)?.spawn()
    }

    /// Positional variant of [`spawn`](Self::spawn).
    pub fn spawn_at<T: Poolable>(&self, key: &str, at: SpawnPoint) -> Option<Pooled<T>> {
        self.lookup::<T>(key)?.spawn_at(at)
    }

    /// Return an instance via its handle; no key required.
    ///
    /// Preferred despawn path: the handle routes back to whichever pool
    /// spawned the instance. An instance that was never pooled is given a
    /// pure `on_despawn` deactivation with no pool state mutation, and the
    /// call reports failure.
    pub fn despawn<T: Poolable>(&self, item: &Pooled<T>) -> bool {
        if item.handle().try_return_to_pool() {
            return true;
        }
        if !item.handle().was_pooled() {
            item.borrow_mut().on_despawn();
            tracing::debug!("despawn of never-pooled instance; deactivated without pool return");
        }
        false
    }

    /// Schedule a despawn through the pool registered under `key`.
    ///
    /// # Panics
    /// Panics if called outside a `tokio::task::LocalSet` context.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub fn despawn_delayed<T: Poolable>(&self, key: &str, item: &Pooled<T>, delay: Duration) {
        if let Some(pool) = self.lookup::<T>(key) {
            pool.despawn_delayed(item, delay);
        }
    }

    /// Key-less deferred despawn, routed through the instance's handle at
    /// expiry.
    ///
    /// The timer holds only a weak reference, so an instance destroyed by
    /// teardown is freed immediately and expiry is a silent no-op. The
    /// handle's own at-most-once guard covers an instance that was already
    /// returned before the delay elapsed.
    ///
    /// # Panics
    /// Panics if called outside a `tokio::task::LocalSet` context.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub fn despawn_delayed_unkeyed<T: Poolable>(&self, item: &Pooled<T>, delay: Duration) {
        let weak = item.downgrade();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Some(item) = weak.upgrade() {
                item.handle().try_return_to_pool();
            }
        });
    }

    /// Warm every registered pool to its configured `initial_capacity`.
    ///
    /// Best-effort: a failure in one pool's warm-up is caught and logged
    /// without aborting the others, and the state still reaches
    /// [`WarmUpState::Complete`] so dependents are never blocked. Once
    /// complete, later calls are no-ops.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn warm_up_all(&self) {
        match self.warm_up.get() {
            WarmUpState::Complete => {
                tracing::debug!("warm-up already complete");
                return;
            }
            WarmUpState::Warming => {
                tracing::debug!("warm-up already in progress");
                return;
            }
            WarmUpState::NotStarted => {}
        }
        self.warm_up.set(WarmUpState::Warming);

        // Snapshot the entries so no registry borrow is held across an
        // await; pools registered mid-warm-up are picked up by a later
        // explicit warm-up.
        let entries: Vec<(String, Rc<dyn ErasedPool>)> = self
            .pools
            .borrow()
            .iter()
            .map(|(key, pool)| (key.clone(), Rc::clone(pool)))
            .collect();

        for (key, pool) in entries {
            let target = pool.initial_capacity();
            match pool.warm_up(target).await {
                Ok(made) => {
                    tracing::debug!(pool = %key, made, "pool warm-up complete");
                }
                Err(err) => {
                    tracing::error!(
                        pool = %key, %err,
                        "pool warm-up failed; continuing with remaining pools"
                    );
                }
            }
        }

        self.warm_up.set(WarmUpState::Complete);
    }

    /// Current bulk warm-up progress.
    #[must_use]
    pub fn warm_up_state(&self) -> WarmUpState {
        self.warm_up.get()
    }

    /// Diagnostics triple for the pool registered under `key`.
    #[must_use]
    pub fn pool_info(&self, key: &str) -> Option<PoolInfo> {
        self.pools.borrow().get(key).map(|pool| pool.info())
    }

    /// All registered keys, sorted for stable diagnostics output.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.pools.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.borrow().len()
    }

    /// Whether no pools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.borrow().is_empty()
    }

    /// Tear down and unregister the pool under `key`.
    pub fn remove_pool(&self, key: &str) -> bool {
        // Release the map borrow before teardown: dropping pooled
        // instances runs user `Drop` code that may call back into the
        // registry.
        let removed = self.pools.borrow_mut().remove(key);
        match removed {
            Some(pool) => {
                pool.clear();
                tracing::debug!(pool = %key, "removed object pool");
                true
            }
            None => false,
        }
    }

    /// Tear down every pool and empty the registry.
    ///
    /// Used at shutdown or context transition; the warm-up state resets so
    /// a rebuilt registry can warm again.
    pub fn clear(&self) {
        // Drained before teardown for the same reason as `remove_pool`.
        let drained: Vec<(String, Rc<dyn ErasedPool>)> =
            self.pools.borrow_mut().drain().collect();
        for (key, pool) in drained {
            pool.clear();
            tracing::debug!(pool = %key, "removed object pool");
        }
        self.warm_up.set(WarmUpState::NotStarted);
    }

    fn lookup<T: Poolable>(&self, key: &str) -> Option<ObjectPool<T>> {
        if !self.pools.borrow().contains_key(key) {
            tracing::warn!(pool = %key, "no pool registered under key");
            return None;
        }
        self.pool::<T>(key)
    }
}
