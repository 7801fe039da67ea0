//! Single-type object pooling: template, pool, handle, lifecycle contract.
//!
//! The unit of allocation policy is [`ObjectPool<T>`]: one template, one
//! free list, one active set, one capacity ceiling. Multi-pool keyed
//! access lives in [`crate::registry`].

mod handle;
mod hooks;
mod object_pool;
mod poolable;
mod template;

pub use handle::Handle;
pub use hooks::{NoOpHooks, PoolHooks};
pub use object_pool::{ObjectPool, PoolInfo, PoolStats, Pooled};
pub use poolable::{Poolable, SpawnPoint};
pub use template::{FallibleTemplate, Template};
