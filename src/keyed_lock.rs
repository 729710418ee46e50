use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes async critical sections per key (eg: per email address).
///
/// Entries only live while some task holds or waits for the key, so the table stays as
/// small as the number of keys currently in use.
#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held while the key is locked. Dropping it lets the next waiter in.
pub struct KeyGuard<'a> {
    // Declared first so the mutex is released before the entry is looked at
    _guard: OwnedMutexGuard<()>,
    _entry: KeyEntry<'a>,
}

/// A task's claim on a table entry, from the moment it starts waiting until it leaves.
///
/// Waiters that are cancelled before acquiring the key drop their entry too, so a
/// dropped `lock` future never leaves its key behind.
struct KeyEntry<'a> {
    locks: &'a KeyedLocks,
    key: String,
    lock: Arc<AsyncMutex<()>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> KeyGuard<'_> {
        let entry = self.enter(key);
        let guard = entry.lock.clone().lock_owned().await;

        KeyGuard {
            _guard: guard,
            _entry: entry,
        }
    }

    fn enter(&self, key: &str) -> KeyEntry<'_> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(key.to_string()).or_default().clone();

        KeyEntry {
            locks: self,
            key: key.to_string(),
            lock,
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for KeyEntry<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock().unwrap_or_else(PoisonError::into_inner);

        // One reference is owned by the table and one by this entry: nobody else holds or waits
        let is_idle = locks
            .get(&self.key)
            .map(|lock| Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) <= 2)
            .unwrap_or(false);

        if is_idle {
            locks.remove(&self.key);
        }
    }
}
