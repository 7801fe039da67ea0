//! Core object pool implementation.
//!
//! Single-threaded pooling over `Rc`/`RefCell`: the pool owns every slot it
//! has ever manufactured, split between a free list and an active set. A
//! checked-out instance travels as a cloneable [`Pooled<T>`]; its embedded
//! [`Handle`] carries the return path so the instance can despawn itself
//! without a pool reference in scope.
//!
//! No `RefCell` borrow is held across a user hook except the instance's own
//! `RefCell<T>` while its lifecycle hooks run, which is why a hook must not
//! despawn its own instance.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

#[cfg(feature = "async")]
use std::time::Duration;

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};

use super::handle::Handle;
use super::hooks::{NoOpHooks, PoolHooks};
use super::poolable::{Poolable, SpawnPoint};
use super::template::Template;

/// Diagnostics triple for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolInfo {
    /// Instances currently checked out.
    pub active: usize,
    /// Instances currently available for reuse.
    pub free: usize,
    /// Hard ceiling, active plus free.
    pub max_size: usize,
}

/// Cumulative per-pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Successful spawns.
    pub spawned: u64,
    /// Spawns served from the free list rather than fresh manufacture.
    pub reused: u64,
    /// Instances manufactured from the template (spawn misses + warm-up).
    pub manufactured: u64,
    /// Spawn requests denied at the capacity ceiling.
    pub exhaustion_denials: u64,
    /// Instances returned to the free list.
    pub despawned: u64,
}

/// One pooled instance plus its embedded handle.
struct Slot<T> {
    value: RefCell<T>,
    handle: Handle,
}

impl<T> Slot<T> {
    fn new(value: T) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(value),
            handle: Handle::default(),
        })
    }
}

fn slot_id<T>(slot: &Rc<Slot<T>>) -> usize {
    Rc::as_ptr(slot) as usize
}

/// A checked-out (or detached) pooled instance.
///
/// Cloning is cheap and shares the same underlying instance; identity is
/// slot identity, not value equality. The pool keeps its own reference
/// while the instance is active, so dropping every `Pooled` clone of an
/// active instance does not return it; returns are explicit, via
/// [`ObjectPool::despawn`] or the handle.
pub struct Pooled<T> {
    slot: Rc<Slot<T>>,
}

impl<T> Clone for Pooled<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> std::fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pooled")
            .field("slot", &Rc::as_ptr(&self.slot))
            .finish()
    }
}

impl<T> Pooled<T> {
    /// Wrap a value that never came from a pool.
    ///
    /// The fallback path for callers that force an unpooled instance when
    /// a pool is exhausted; its handle is unbound and
    /// [`Handle::was_pooled`] stays `false`.
    pub fn detached(value: T) -> Self {
        Self {
            slot: Slot::new(value),
        }
    }

    /// Immutably borrow the instance.
    ///
    /// # Panics
    /// Panics if the instance is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.slot.value.borrow()
    }

    /// Mutably borrow the instance.
    ///
    /// # Panics
    /// Panics if the instance is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.slot.value.borrow_mut()
    }

    /// The self-return capability bound to this instance.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.slot.handle
    }

    /// Whether two values refer to the same pooled instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// Non-owning reference for deferred work; deferred tasks must not
    /// keep a torn-down instance alive.
    pub(crate) fn downgrade(&self) -> WeakPooled<T> {
        WeakPooled {
            slot: Rc::downgrade(&self.slot),
        }
    }
}

/// Non-owning counterpart of [`Pooled<T>`].
pub(crate) struct WeakPooled<T> {
    slot: Weak<Slot<T>>,
}

impl<T> WeakPooled<T> {
    /// `None` once the instance has been destroyed.
    pub(crate) fn upgrade(&self) -> Option<Pooled<T>> {
        self.slot.upgrade().map(|slot| Pooled { slot })
    }
}

struct PoolInner<T: Poolable> {
    template: Box<dyn Template<T>>,
    config: PoolConfig,
    /// Registry key, when owned by a registry. Diagnostics only.
    key: RefCell<Option<String>>,
    free: RefCell<Vec<Rc<Slot<T>>>>,
    active: RefCell<HashMap<usize, Rc<Slot<T>>>>,
    hooks: Box<dyn PoolHooks<T>>,
    stats: Cell<PoolStats>,
}

impl<T: Poolable> PoolInner<T> {
    fn label(&self) -> String {
        self.key
            .borrow()
            .clone()
            .unwrap_or_else(|| "<unkeyed>".to_string())
    }

    fn bump(&self, update: impl FnOnce(&mut PoolStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    fn total(&self) -> usize {
        self.free.borrow().len() + self.active.borrow().len()
    }

    /// Manufacture one inactive instance onto the free list.
    fn manufacture_free(&self) -> PoolResult<()> {
        let value = self.template.manufacture()?;
        self.hooks.on_create(&value);
        self.bump(|s| s.manufactured += 1);
        self.free.borrow_mut().push(Slot::new(value));
        Ok(())
    }

    /// Move an active slot back to the free list.
    ///
    /// The idempotence guard: an instance absent from the active set is
    /// left untouched, so a double return can never push it onto the free
    /// list twice.
    fn despawn_slot(inner: &Rc<Self>, slot: &Rc<Slot<T>>) -> bool {
        let removed = inner.active.borrow_mut().remove(&slot_id(slot));
        let Some(slot) = removed else {
            tracing::debug!(
                pool = %inner.label(),
                "despawn ignored; instance not in the active set"
            );
            return false;
        };

        slot.handle.clear_binding();
        slot.value.borrow_mut().on_despawn();
        inner.hooks.on_checkin(&slot.value.borrow());
        inner.free.borrow_mut().push(slot);
        inner.bump(|s| s.despawned += 1);
        true
    }
}

/// Pool of reusable instances manufactured from one template.
///
/// Cloning yields another lightweight reference to the same pool; all
/// methods take `&self`. The pool is single-threaded (`!Send`, `!Sync`) by
/// design.
///
/// # Example
/// ```
/// use respawn::pool::{ObjectPool, Poolable};
/// use respawn::PoolConfig;
///
/// #[derive(Default)]
/// struct Spark {
///     intensity: f32,
/// }
/// impl Poolable for Spark {}
///
/// let pool = ObjectPool::new(PoolConfig::bounded(8), Spark::default).unwrap();
/// let spark = pool.spawn().unwrap();
/// spark.borrow_mut().intensity = 0.5;
/// pool.despawn(&spark);
/// ```
pub struct ObjectPool<T: Poolable> {
    inner: Rc<PoolInner<T>>,
}

impl<T: Poolable> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Poolable> std::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("inner", &Rc::as_ptr(&self.inner))
            .finish()
    }
}

impl<T: Poolable> ObjectPool<T> {
    /// Create a pool from a configuration and a template.
    ///
    /// The configuration is validated up front; a rejected configuration
    /// creates no partial pool. Nothing is manufactured until a warm-up or
    /// a spawn miss.
    pub fn new(config: PoolConfig, template: impl Template<T>) -> PoolResult<Self> {
        Self::with_hooks(config, template, NoOpHooks)
    }

    /// Create a pool with host lifecycle hooks.
    pub fn with_hooks(
        config: PoolConfig,
        template: impl Template<T>,
        hooks: impl PoolHooks<T> + 'static,
    ) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(PoolInner {
                template: Box::new(template),
                key: RefCell::new(None),
                free: RefCell::new(Vec::with_capacity(config.initial_capacity)),
                active: RefCell::new(HashMap::new()),
                hooks: Box::new(hooks),
                stats: Cell::new(PoolStats::default()),
                config,
            }),
        })
    }

    pub(crate) fn set_key(&self, key: &str) {
        *self.inner.key.borrow_mut() = Some(key.to_string());
    }

    /// Manufacture up to `count` inactive instances ahead of demand.
    ///
    /// Clamped so the total never exceeds `max_size`; returns how many
    /// instances were actually added.
    pub fn warm_up(&self, count: usize) -> PoolResult<usize> {
        let mut made = 0;
        while made < count && self.inner.total() < self.inner.config.max_size {
            self.inner.manufacture_free()?;
            made += 1;
        }
        Ok(made)
    }

    /// Like [`warm_up`](Self::warm_up), yielding to the scheduler after
    /// every `per_batch` manufactured instances so a large warm-up never
    /// stalls a single tick.
    ///
    /// `per_batch` is clamped to at least 1.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn warm_up_async(&self, count: usize, per_batch: usize) -> PoolResult<usize> {
        let per_batch = per_batch.max(1);
        let mut made = 0;
        while made < count && self.inner.total() < self.inner.config.max_size {
            self.inner.manufacture_free()?;
            made += 1;
            if made % per_batch == 0 {
                tokio::task::yield_now().await;
            }
        }
        Ok(made)
    }

    /// Check out an instance, or explain why none was available.
    ///
    /// Serves the free list first, then manufactures while below
    /// `max_size`, then fails with [`PoolError::Exhausted`].
    pub fn try_spawn(&self) -> PoolResult<Pooled<T>> {
        self.checkout(None)
    }

    /// Positional variant of [`try_spawn`](Self::try_spawn).
    pub fn try_spawn_at(&self, at: SpawnPoint) -> PoolResult<Pooled<T>> {
        self.checkout(Some(at))
    }

    /// Check out an instance; `None` on exhaustion or template failure.
    ///
    /// Never panics: capacity exhaustion is an expected burst condition,
    /// logged as a warning, and the caller decides the fallback (skip,
    /// force an unpooled instance via [`Pooled::detached`], or queue).
    pub fn spawn(&self) -> Option<Pooled<T>> {
        self.report_spawn(self.try_spawn())
    }

    /// Check out an instance placed at `at`.
    ///
    /// Placement runs before `on_spawn`, so the hook observes the placed
    /// instance.
    pub fn spawn_at(&self, at: SpawnPoint) -> Option<Pooled<T>> {
        self.report_spawn(self.try_spawn_at(at))
    }

    /// Return an instance to the free list.
    ///
    /// No-op returning `false` if the instance is not currently in this
    /// pool's active set (already returned, never spawned here, or owned
    /// by another pool).
    pub fn despawn(&self, item: &Pooled<T>) -> bool {
        PoolInner::despawn_slot(&self.inner, &item.slot)
    }

    /// Schedule a despawn after `delay`.
    ///
    /// Fire-and-forget on the current thread's `LocalSet`; at expiry the
    /// instance's liveness is re-checked, so a manual despawn or a pool
    /// teardown in the meantime makes the deferred return a no-op.
    ///
    /// # Panics
    /// Panics if called outside a `tokio::task::LocalSet` context.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub fn despawn_delayed(&self, item: &Pooled<T>, delay: Duration) {
        let inner = Rc::downgrade(&self.inner);
        let slot = Rc::downgrade(&item.slot);
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let (Some(inner), Some(slot)) = (inner.upgrade(), slot.upgrade()) {
                PoolInner::despawn_slot(&inner, &slot);
            }
        });
    }

    /// Destroy every tracked instance, active and free.
    ///
    /// Teardown only, never part of normal spawn/despawn cycling.
    /// Outstanding [`Pooled`] values keep their instance alive until
    /// dropped, but their handles are detached and the pool forgets them.
    pub fn clear(&self) {
        let active: Vec<_> = self
            .inner
            .active
            .borrow_mut()
            .drain()
            .map(|(_, slot)| slot)
            .collect();
        let free: Vec<_> = self.inner.free.borrow_mut().drain(..).collect();

        for slot in active.iter().chain(free.iter()) {
            slot.handle.clear_binding();
            self.inner.hooks.on_destroy(&slot.value.borrow());
        }
    }

    /// Instances currently checked out.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.active.borrow().len()
    }

    /// Instances currently available for reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.inner.free.borrow().len()
    }

    /// Instances tracked in total, active plus free.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.inner.total()
    }

    /// Hard capacity ceiling.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.inner.config.max_size
    }

    /// Configured warm-up target.
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.inner.config.initial_capacity
    }

    /// Whether every slot is in use and none can be manufactured.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.active_count() == self.inner.config.max_size
    }

    /// Diagnostics triple `(active, free, max_size)`.
    #[must_use]
    pub fn info(&self) -> PoolInfo {
        PoolInfo {
            active: self.active_count(),
            free: self.free_count(),
            max_size: self.inner.config.max_size,
        }
    }

    /// Cumulative counters snapshot.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.inner.stats.get()
    }

    fn checkout(&self, at: Option<SpawnPoint>) -> PoolResult<Pooled<T>> {
        let popped = self.inner.free.borrow_mut().pop();
        let (slot, reused) = match popped {
            Some(slot) => (slot, true),
            None => {
                if self.inner.total() >= self.inner.config.max_size {
                    self.inner.bump(|s| s.exhaustion_denials += 1);
                    return Err(PoolError::exhausted(
                        &self.inner.label(),
                        self.inner.config.max_size,
                    ));
                }
                let value = self.inner.template.manufacture()?;
                self.inner.hooks.on_create(&value);
                self.inner.bump(|s| s.manufactured += 1);
                (Slot::new(value), false)
            }
        };

        let weak_inner = Rc::downgrade(&self.inner);
        let weak_slot = Rc::downgrade(&slot);
        slot.handle.bind(Box::new(move || {
            match (weak_inner.upgrade(), weak_slot.upgrade()) {
                (Some(inner), Some(slot)) => PoolInner::despawn_slot(&inner, &slot),
                // Pool or slot already torn down.
                _ => false,
            }
        }));
        if let Some(key) = self.inner.key.borrow().as_deref() {
            slot.handle.set_pool_key(key);
        }

        self.inner
            .active
            .borrow_mut()
            .insert(slot_id(&slot), Rc::clone(&slot));

        {
            let mut value = slot.value.borrow_mut();
            if let Some(at) = at {
                value.place(at);
            }
            value.on_spawn();
        }
        self.inner.hooks.on_checkout(&slot.value.borrow());
        self.inner.bump(|s| {
            s.spawned += 1;
            if reused {
                s.reused += 1;
            }
        });

        Ok(Pooled { slot })
    }

    fn report_spawn(&self, result: PoolResult<Pooled<T>>) -> Option<Pooled<T>> {
        match result {
            Ok(item) => Some(item),
            Err(err @ PoolError::Exhausted { .. }) => {
                tracing::warn!(pool = %self.inner.label(), %err, "spawn denied; pool exhausted");
                None
            }
            Err(err) => {
                tracing::error!(pool = %self.inner.label(), %err, "spawn failed");
                None
            }
        }
    }
}
