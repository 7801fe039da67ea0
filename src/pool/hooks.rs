//! Observer seam between a pool and its host environment.
//!
//! The host hangs deactivation, re-parenting to a holding container, and
//! destruction off these hooks; the pool itself has no scene-graph
//! knowledge. Hook errors are the host's problem: hooks return nothing and
//! must not panic.

/// Callbacks fired at the edges of an instance's pool lifecycle.
///
/// All methods default to no-ops.
pub trait PoolHooks<T> {
    /// A new instance was manufactured from the template, inactive, not
    /// yet checked out.
    fn on_create(&self, _value: &T) {}

    /// An instance moved from the free list (or fresh manufacture) to the
    /// active set.
    fn on_checkout(&self, _value: &T) {}

    /// An instance was returned to the free list. By this point its
    /// `on_despawn` hook has run and its handle binding is detached.
    fn on_checkin(&self, _value: &T) {}

    /// An instance is being destroyed at teardown.
    fn on_destroy(&self, _value: &T) {}
}

/// Default hooks that do nothing.
pub struct NoOpHooks;

impl<T> PoolHooks<T> for NoOpHooks {}
