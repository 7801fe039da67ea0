//! Manufacture seam: the immutable blueprint new instances come from.

use crate::error::PoolResult;

/// An immutable factory blueprint for one pooled type.
///
/// The pool never mutates its template and invokes it exactly once per
/// newly created instance, never on reuse. Any `Fn() -> T` closure is a
/// template:
///
/// ```
/// use respawn::pool::{ObjectPool, Poolable};
/// use respawn::PoolConfig;
///
/// struct Bullet;
/// impl Poolable for Bullet {}
///
/// let pool = ObjectPool::new(PoolConfig::bounded(16), || Bullet).unwrap();
/// ```
///
/// Manufacture that can fail (asset lookup, host instantiation) implements
/// the trait directly or goes through [`FallibleTemplate`].
pub trait Template<T>: 'static {
    /// Manufacture one new instance.
    fn manufacture(&self) -> PoolResult<T>;
}

impl<T, F> Template<T> for F
where
    F: Fn() -> T + 'static,
{
    fn manufacture(&self) -> PoolResult<T> {
        Ok(self())
    }
}

/// Adapter turning a `Fn() -> PoolResult<T>` closure into a [`Template`].
///
/// A plain closure cannot implement the trait fallibly (the infallible
/// blanket impl would overlap), so the fallible form is named.
pub struct FallibleTemplate<F>(pub F);

impl<T, F> Template<T> for FallibleTemplate<F>
where
    F: Fn() -> PoolResult<T> + 'static,
{
    fn manufacture(&self) -> PoolResult<T> {
        (self.0)()
    }
}
