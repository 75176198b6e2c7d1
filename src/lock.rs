//! Poison-tolerant lock helpers.
//!
//! No lock in this crate is held across an await point or user code, so a
//! poisoned lock only means another thread panicked mid-mutation; the data is
//! still structurally valid and we keep going.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(crate) fn rw_read<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockReadGuard<'a, T> {
  match lock.read() {
    Ok(guard) => guard,
    Err(poisoned) => {
      warn!(op, lock_kind = "rwlock.read", "Recovered from poisoned lock");
      poisoned.into_inner()
    }
  }
}

pub(crate) fn rw_write<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockWriteGuard<'a, T> {
  match lock.write() {
    Ok(guard) => guard,
    Err(poisoned) => {
      warn!(op, lock_kind = "rwlock.write", "Recovered from poisoned lock");
      poisoned.into_inner()
    }
  }
}
