//! Normalized in-memory cache of everything fetched from the board service.
//!
//! This module provides:
//! - Wholesale slices for the user, boards, active board and lists
//! - Task and comment sequences keyed by their parent id
//! - Structural primitives only (replace, append, remove); no business logic
//! - Change events for reactive consumers

mod events;
mod storage;
mod traits;

pub use events::{CacheChange, CacheEvent};
pub use storage::{CacheState, EntityCache};
pub use traits::{remove_by_key, splice, Cacheable};
