//! Lifecycle contract for pooled types.

/// Position and orientation applied to an instance spawned at a location.
///
/// Orientation is a quaternion in `[x, y, z, w]` order; the default is the
/// identity rotation at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    /// World position.
    pub position: [f32; 3],
    /// Orientation quaternion, `[x, y, z, w]`.
    pub orientation: [f32; 4],
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl SpawnPoint {
    /// Spawn point at `position` with identity orientation.
    #[must_use]
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Spawn point with explicit position and orientation.
    #[must_use]
    pub fn new(position: [f32; 3], orientation: [f32; 4]) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// Trait for objects that can be pooled.
///
/// Every method has a default no-op body, so any `'static` type can opt in
/// with an empty impl. Hooks run once per reuse cycle and must be safe to
/// call every cycle.
///
/// A hook must not trigger a despawn of the same instance from within
/// itself; the instance is mutably borrowed while its hooks run.
///
/// # Example
/// ```
/// use respawn::pool::{Poolable, SpawnPoint};
///
/// #[derive(Default)]
/// struct Projectile {
///     position: [f32; 3],
///     lifetime: f32,
/// }
///
/// impl Poolable for Projectile {
///     fn on_spawn(&mut self) {
///         self.lifetime = 0.0;
///     }
///
///     fn place(&mut self, at: SpawnPoint) {
///         self.position = at.position;
///     }
/// }
/// ```
pub trait Poolable: 'static {
    /// Called after the instance is checked out, before first use.
    fn on_spawn(&mut self) {}

    /// Called when the instance is returned, before it goes back on the
    /// free list.
    fn on_despawn(&mut self) {}

    /// Apply a spawn location. Only invoked by the positional spawn path.
    fn place(&mut self, _at: SpawnPoint) {}
}

// Standard library conveniences: reusable buffers drop their contents on
// return so stale state never leaks into the next checkout.

impl Poolable for String {
    fn on_despawn(&mut self) {
        self.clear();
    }
}

impl<T: 'static> Poolable for Vec<T> {
    fn on_despawn(&mut self) {
        self.clear();
    }
}
