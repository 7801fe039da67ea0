//! # respawn
//!
//! Object pooling for latency-sensitive interactive loops.
//!
//! Frequently created and destroyed runtime objects (projectiles,
//! floating combat text, transient effects, enemies) are reused instead
//! of reallocated, so bursty demand never turns into allocation spikes
//! or frame hitches. The engine is single-threaded: the host drives it
//! from a cooperative per-tick loop, and the only suspension points are
//! staged warm-up and deferred despawn.
//!
//! ## Quick start
//!
//! ```
//! use respawn::prelude::*;
//!
//! #[derive(Default)]
//! struct Projectile {
//!     position: [f32; 3],
//! }
//!
//! impl Poolable for Projectile {
//!     fn place(&mut self, at: SpawnPoint) {
//!         self.position = at.position;
//!     }
//! }
//!
//! let registry = PoolRegistry::new();
//! registry
//!     .create_pool("Projectile", Projectile::default, PoolConfig::warmed(8, 64))
//!     .unwrap();
//!
//! let shot = registry
//!     .spawn_at::<Projectile>("Projectile", SpawnPoint::at([0.0, 1.0, 0.0]))
//!     .unwrap();
//!
//! // The instance can return itself; no pool reference needed.
//! assert!(shot.handle().try_return_to_pool());
//! ```
//!
//! ## Failure degradation
//!
//! Exhaustion is an expected burst condition, not a fault: `spawn` returns
//! `None` and logs a warning, and the caller decides whether to skip the
//! effect, force an unpooled instance, or queue. Construction-time
//! configuration mistakes are the only hard errors.
//!
//! ## Features
//!
//! - `async` (default): cooperative warm-up and deferred despawn on the
//!   tokio runtime (`LocalSet`; the engine's types are `!Send`).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod pool;
pub mod registry;

pub use crate::config::PoolConfig;
pub use crate::error::{PoolError, PoolResult};
pub use crate::registry::{PoolRegistry, WarmUpState};

pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::config::PoolConfig;
    pub use crate::error::{PoolError, PoolResult};
    pub use crate::pool::{
        FallibleTemplate, Handle, NoOpHooks, ObjectPool, PoolHooks, PoolInfo, PoolStats, Poolable,
        Pooled, SpawnPoint, Template,
    };
    pub use crate::registry::{PoolRegistry, WarmUpState};
}
