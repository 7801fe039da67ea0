//! Self-return capability bound to each checked-out instance.

use std::cell::{Cell, RefCell};
use std::fmt;

type ReturnFn = Box<dyn Fn() -> bool>;

/// Per-instance capability that lets an instance return itself to its pool
/// without knowing which pool or registry owns it.
///
/// The owning pool binds a return callback at spawn time and detaches it
/// again on return, so the callback fires at most once per outstanding
/// spawn. A re-entrancy flag rejects a nested invocation from inside the
/// return path itself.
#[derive(Default)]
pub struct Handle {
    binding: RefCell<Option<ReturnFn>>,
    returning: Cell<bool>,
    ever_bound: Cell<bool>,
    pool_key: RefCell<Option<String>>,
}

impl Handle {
    /// Invoke the bound return callback.
    ///
    /// Succeeds exactly once per outstanding spawn: the binding is taken
    /// before the callback runs, and a duplicate or re-entrant call
    /// returns `false`.
    pub fn try_return_to_pool(&self) -> bool {
        if self.returning.replace(true) {
            return false;
        }
        let binding = self.binding.borrow_mut().take();
        let returned = match binding {
            Some(ret) => ret(),
            None => false,
        };
        self.returning.set(false);
        returned
    }

    /// Detach the return callback without invoking it.
    ///
    /// Diagnostic / ownership-transfer use only: a cleared handle makes
    /// every later [`try_return_to_pool`](Self::try_return_to_pool) fail.
    pub fn clear_binding(&self) {
        self.binding.borrow_mut().take();
    }

    /// Whether a return callback is currently bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.borrow().is_some()
    }

    /// Whether this instance was ever checked out of a pool.
    ///
    /// Distinguishes "already returned" from "never pooled" on the
    /// registry's fallback despawn path.
    #[must_use]
    pub fn was_pooled(&self) -> bool {
        self.ever_bound.get()
    }

    /// Key of the registry pool this instance was spawned from, if any.
    #[must_use]
    pub fn pool_key(&self) -> Option<String> {
        self.pool_key.borrow().clone()
    }

    pub(crate) fn bind(&self, ret: ReturnFn) {
        self.ever_bound.set(true);
        *self.binding.borrow_mut() = Some(ret);
    }

    pub(crate) fn set_pool_key(&self, key: &str) {
        *self.pool_key.borrow_mut() = Some(key.to_string());
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("bound", &self.is_bound())
            .field("was_pooled", &self.was_pooled())
            .field("pool_key", &*self.pool_key.borrow())
            .finish()
    }
}
