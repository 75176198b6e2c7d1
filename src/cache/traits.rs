//! Core traits for cached entities.

use crate::api::types::{Board, Comment, List, Task};

/// Trait for entities kept in the entity cache.
///
/// Sequences are matched by `cache_key` equality when replacing or removing.
pub trait Cacheable: Clone + Send + Sync {
  /// Unique identifier for this entity (the server-assigned id)
  fn cache_key(&self) -> &str;

  /// Entity type name used in logs and errors (e.g., "task", "board")
  fn entity_type() -> &'static str;
}

impl Cacheable for Board {
  fn cache_key(&self) -> &str {
    &self.id
  }

  fn entity_type() -> &'static str {
    "board"
  }
}

impl Cacheable for List {
  fn cache_key(&self) -> &str {
    &self.id
  }

  fn entity_type() -> &'static str {
    "list"
  }
}

impl Cacheable for Task {
  fn cache_key(&self) -> &str {
    &self.id
  }

  fn entity_type() -> &'static str {
    "task"
  }
}

impl Cacheable for Comment {
  fn cache_key(&self) -> &str {
    &self.id
  }

  fn entity_type() -> &'static str {
    "comment"
  }
}

/// Replace the entity with the same key in place.
///
/// Returns false (and leaves the sequence alone) when no entity matches.
pub fn splice<T: Cacheable>(items: &mut [T], updated: T) -> bool {
  match items
    .iter_mut()
    .find(|existing| existing.cache_key() == updated.cache_key())
  {
    Some(existing) => {
      *existing = updated;
      true
    }
    None => false,
  }
}

/// Drop every entity with the given key. Returns whether anything was removed.
pub fn remove_by_key<T: Cacheable>(items: &mut Vec<T>, key: &str) -> bool {
  let before = items.len();
  items.retain(|item| item.cache_key() != key);
  items.len() != before
}

#[cfg(test)]
mod tests {
  use super::*;

  fn list(id: &str, title: &str) -> List {
    List {
      id: id.to_string(),
      title: title.to_string(),
      board_id: "B1".to_string(),
    }
  }

  #[test]
  fn test_splice_keeps_position() {
    let mut lists = vec![list("L1", "Todo"), list("L2", "Doing"), list("L3", "Done")];
    assert!(splice(&mut lists, list("L2", "In progress")));
    let titles: Vec<_> = lists.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Todo", "In progress", "Done"]);
  }

  #[test]
  fn test_splice_missing_is_noop() {
    let mut lists = vec![list("L1", "Todo")];
    assert!(!splice(&mut lists, list("L9", "Other")));
    assert_eq!(lists, vec![list("L1", "Todo")]);
  }

  #[test]
  fn test_remove_by_key() {
    let mut lists = vec![list("L1", "Todo"), list("L2", "Doing")];
    assert!(remove_by_key(&mut lists, "L1"));
    assert!(!remove_by_key(&mut lists, "L1"));
    assert_eq!(lists, vec![list("L2", "Doing")]);
  }
}
