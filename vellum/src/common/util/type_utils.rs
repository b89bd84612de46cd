use std::sync::Arc;

use parking_lot::RwLock;

/// Shared, lock-guarded value. Clones share the same underlying state.
pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}

pub trait ReadExecutor<T: ?Sized> {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

impl<T> ReadExecutor<T> for Atomic<T> {
    #[inline]
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let read_guard = self.read();
        f(&*read_guard)
    }
}

pub trait WriteExecutor<T: ?Sized> {
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> WriteExecutor<T> for Atomic<T> {
    #[inline]
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut write_guard = self.write();
        f(&mut *write_guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_read_with() {
        let shared = atomic(41);
        let value = shared.read_with(|v| *v + 1);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_atomic_write_with() {
        let shared = atomic(String::from("a"));
        shared.write_with(|v| v.push('b'));
        assert_eq!(shared.read_with(|v| v.clone()), "ab");
    }

    #[test]
    fn test_atomic_clones_share_state() {
        let shared = atomic(0);
        let other = shared.clone();
        other.write_with(|v| *v = 7);
        assert_eq!(shared.read_with(|v| *v), 7);
    }
}
