//! In-memory entity cache.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::trace;

use crate::api::types::{Board, Comment, List, Task, User};
use crate::error::CacheError;
use crate::lock::{rw_read, rw_write};

use super::events::{CacheChange, CacheEvent};
use super::traits::remove_by_key;

const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Everything the client currently knows about the remote service.
///
/// A key missing from `tasks` or `comments` means that parent was never
/// fetched; an empty vector means it was fetched and is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheState {
  pub user: Option<User>,
  pub boards: Vec<Board>,
  pub active_board: Option<Board>,
  pub lists: Vec<List>,
  /// Tasks keyed by list id, in server order
  pub tasks: HashMap<String, Vec<Task>>,
  /// Comments keyed by task id, in server order
  pub comments: HashMap<String, Vec<Comment>>,
}

/// Normalized store shared by all sync actions.
///
/// Only structural primitives live here; the decision of what to write belongs
/// to the sync layer. Each primitive takes the lock once, so a mutation is
/// atomic and visible to readers as soon as it returns. Every mutation that
/// changes state publishes a [`CacheEvent`] before returning.
///
/// Outside this crate the cache is read-only; writes go through the sync
/// actions.
///
/// ```compile_fail
/// let cache = taskboard_sync::EntityCache::default();
/// cache.set_tasks_for_list("L1", Vec::new());
/// ```
pub struct EntityCache {
  state: RwLock<CacheState>,
  events: broadcast::Sender<CacheEvent>,
}

impl Default for EntityCache {
  fn default() -> Self {
    Self::new(DEFAULT_EVENT_CAPACITY)
  }
}

impl EntityCache {
  pub fn new(event_capacity: usize) -> Self {
    let (events, _) = broadcast::channel(event_capacity.max(1));
    Self {
      state: RwLock::new(CacheState::default()),
      events,
    }
  }

  /// Receive every change applied from now on.
  pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
    self.events.subscribe()
  }

  fn emit(&self, change: CacheChange) {
    trace!(?change, "Cache changed");
    // No subscribers is fine
    let _ = self.events.send(CacheEvent::new(change));
  }

  // ==========================================================================
  // Wholesale replacement
  // ==========================================================================

  pub(crate) fn replace_user(&self, user: User) {
    rw_write(&self.state, "replace_user").user = Some(user);
    self.emit(CacheChange::UserReplaced);
  }

  pub(crate) fn replace_boards(&self, boards: Vec<Board>) {
    let count = boards.len();
    rw_write(&self.state, "replace_boards").boards = boards;
    self.emit(CacheChange::BoardsReplaced { count });
  }

  pub(crate) fn replace_active_board(&self, board: Board) {
    let id = board.id.clone();
    rw_write(&self.state, "replace_active_board").active_board = Some(board);
    self.emit(CacheChange::ActiveBoardReplaced { id });
  }

  pub(crate) fn clear_active_board(&self) {
    let previous = rw_write(&self.state, "clear_active_board").active_board.take();
    if previous.is_some() {
      self.emit(CacheChange::ActiveBoardCleared);
    }
  }

  pub(crate) fn replace_lists(&self, lists: Vec<List>) {
    let count = lists.len();
    rw_write(&self.state, "replace_lists").lists = lists;
    self.emit(CacheChange::ListsReplaced { count });
  }

  // ==========================================================================
  // Keyed sequences
  // ==========================================================================

  /// Insert or replace the task sequence for one list. Other lists are untouched.
  pub(crate) fn set_tasks_for_list(&self, list_id: &str, tasks: Vec<Task>) {
    let count = tasks.len();
    rw_write(&self.state, "set_tasks_for_list")
      .tasks
      .insert(list_id.to_string(), tasks);
    self.emit(CacheChange::TasksSet {
      list_id: list_id.to_string(),
      count,
    });
  }

  /// Insert or replace the comment sequence for one task.
  pub(crate) fn set_comments_for_task(&self, task_id: &str, comments: Vec<Comment>) {
    let count = comments.len();
    rw_write(&self.state, "set_comments_for_task")
      .comments
      .insert(task_id.to_string(), comments);
    self.emit(CacheChange::CommentsSet {
      task_id: task_id.to_string(),
      count,
    });
  }

  /// Mark a list's tasks as not loaded.
  pub(crate) fn forget_tasks_for_list(&self, list_id: &str) {
    let removed = rw_write(&self.state, "forget_tasks_for_list")
      .tasks
      .remove(list_id);
    if removed.is_some() {
      self.emit(CacheChange::TasksForgotten {
        list_id: list_id.to_string(),
      });
    }
  }

  /// Mark a task's comments as not loaded.
  pub(crate) fn forget_comments_for_task(&self, task_id: &str) {
    let removed = rw_write(&self.state, "forget_comments_for_task")
      .comments
      .remove(task_id);
    if removed.is_some() {
      self.emit(CacheChange::CommentsForgotten {
        task_id: task_id.to_string(),
      });
    }
  }

  /// Append a task to an already fetched list.
  ///
  /// Fails without touching the cache if `list_id` was never loaded.
  pub(crate) fn append_task(&self, list_id: &str, task: Task) -> Result<(), CacheError> {
    let id = task.id.clone();
    {
      let mut state = rw_write(&self.state, "append_task");
      let tasks = state
        .tasks
        .get_mut(list_id)
        .ok_or_else(|| CacheError::ParentNotLoaded {
          kind: "task",
          parent_kind: "list",
          parent_id: list_id.to_string(),
        })?;
      tasks.push(task);
    }
    self.emit(CacheChange::TaskAppended {
      list_id: list_id.to_string(),
      id,
    });
    Ok(())
  }

  /// Append a comment to an already fetched task.
  ///
  /// Fails without touching the cache if `task_id` was never loaded.
  pub(crate) fn append_comment(&self, task_id: &str, comment: Comment) -> Result<(), CacheError> {
    let id = comment.id.clone();
    {
      let mut state = rw_write(&self.state, "append_comment");
      let comments =
        state
          .comments
          .get_mut(task_id)
          .ok_or_else(|| CacheError::ParentNotLoaded {
            kind: "comment",
            parent_kind: "task",
            parent_id: task_id.to_string(),
          })?;
      comments.push(comment);
    }
    self.emit(CacheChange::CommentAppended {
      task_id: task_id.to_string(),
      id,
    });
    Ok(())
  }

  // ==========================================================================
  // Removal by id (no-op when absent)
  // ==========================================================================

  pub(crate) fn remove_board(&self, id: &str) {
    let removed = remove_by_key(&mut rw_write(&self.state, "remove_board").boards, id);
    if removed {
      self.emit(CacheChange::BoardRemoved { id: id.to_string() });
    }
  }

  pub(crate) fn remove_list(&self, id: &str) {
    let removed = remove_by_key(&mut rw_write(&self.state, "remove_list").lists, id);
    if removed {
      self.emit(CacheChange::ListRemoved { id: id.to_string() });
    }
  }

  pub(crate) fn remove_task(&self, list_id: &str, id: &str) {
    let removed = rw_write(&self.state, "remove_task")
      .tasks
      .get_mut(list_id)
      .map(|tasks| remove_by_key(tasks, id))
      .unwrap_or(false);
    if removed {
      self.emit(CacheChange::TaskRemoved {
        list_id: list_id.to_string(),
        id: id.to_string(),
      });
    }
  }

  pub(crate) fn remove_comment(&self, task_id: &str, id: &str) {
    let removed = rw_write(&self.state, "remove_comment")
      .comments
      .get_mut(task_id)
      .map(|comments| remove_by_key(comments, id))
      .unwrap_or(false);
    if removed {
      self.emit(CacheChange::CommentRemoved {
        task_id: task_id.to_string(),
        id: id.to_string(),
      });
    }
  }

  // ==========================================================================
  // Read access (owned copies)
  // ==========================================================================

  pub fn snapshot(&self) -> CacheState {
    rw_read(&self.state, "snapshot").clone()
  }

  pub fn user(&self) -> Option<User> {
    rw_read(&self.state, "user").user.clone()
  }

  pub fn boards(&self) -> Vec<Board> {
    rw_read(&self.state, "boards").boards.clone()
  }

  pub fn active_board(&self) -> Option<Board> {
    rw_read(&self.state, "active_board").active_board.clone()
  }

  pub fn lists(&self) -> Vec<List> {
    rw_read(&self.state, "lists").lists.clone()
  }

  /// `None` means the list was never fetched.
  pub fn tasks_for_list(&self, list_id: &str) -> Option<Vec<Task>> {
    rw_read(&self.state, "tasks_for_list").tasks.get(list_id).cloned()
  }

  /// `None` means the task's comments were never fetched.
  pub fn comments_for_task(&self, task_id: &str) -> Option<Vec<Comment>> {
    rw_read(&self.state, "comments_for_task")
      .comments
      .get(task_id)
      .cloned()
  }
}
