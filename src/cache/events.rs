//! Change events emitted by the entity cache.

use chrono::{DateTime, Utc};

/// One applied mutation, delivered to every subscriber.
#[derive(Debug, Clone)]
pub struct CacheEvent {
  pub change: CacheChange,
  /// When the mutation was applied
  pub at: DateTime<Utc>,
}

impl CacheEvent {
  pub fn new(change: CacheChange) -> Self {
    Self {
      change,
      at: Utc::now(),
    }
  }
}

/// What changed in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheChange {
  // Wholesale replacements
  UserReplaced,
  BoardsReplaced { count: usize },
  ActiveBoardReplaced { id: String },
  ActiveBoardCleared,
  ListsReplaced { count: usize },

  // Keyed sequences
  TasksSet { list_id: String, count: usize },
  TasksForgotten { list_id: String },
  TaskAppended { list_id: String, id: String },
  CommentsSet { task_id: String, count: usize },
  CommentsForgotten { task_id: String },
  CommentAppended { task_id: String, id: String },

  // Removals
  BoardRemoved { id: String },
  ListRemoved { id: String },
  TaskRemoved { list_id: String, id: String },
  CommentRemoved { task_id: String, id: String },
}
