use tracing::{info, warn};

use crate::api::types::{List, NewList};
use crate::api::{paths, ApiGateway};
use crate::cache::splice;
use crate::confirm::Confirmation;
use crate::error::SyncResult;

use super::{log_read_failure, DeleteOutcome, SyncEngine};

impl<G: ApiGateway, C: Confirmation> SyncEngine<G, C> {
  /// Fetch the lists of a board.
  pub async fn get_lists_by_board_id(&self, board_id: &str) {
    match self.fetch::<Vec<List>>(&paths::board_lists(board_id)).await {
      Ok(lists) => self.cache.replace_lists(lists),
      Err(e) => log_read_failure("lists", board_id, &e),
    }
  }

  /// Create a list and append the server's copy to the cached lists.
  pub async fn create_list(&self, draft: &NewList) -> SyncResult<List> {
    let created: List = self.send_create(paths::LISTS, draft).await?;

    let mut lists = self.cache.lists();
    lists.push(created.clone());
    self.cache.replace_lists(lists);

    info!(list = %created.id, board = %created.board_id, "List created");
    Ok(created)
  }

  pub async fn edit_list(&self, list: &List) -> SyncResult<List> {
    let updated: List = self.send_update(&paths::list(&list.id), list).await?;

    let mut lists = self.cache.lists();
    if splice(&mut lists, updated.clone()) {
      self.cache.replace_lists(lists);
    } else {
      warn!(list = %updated.id, "Edited list is not in the cached lists");
    }

    info!(list = %updated.id, "List updated");
    self.confirm.notify("List updated");
    Ok(updated)
  }

  /// Delete a list after confirmation, dropping its tasks and their comments
  /// from the cache.
  pub async fn delete_list(&self, id: &str) -> SyncResult<DeleteOutcome> {
    if !self
      .confirmed("Delete this list and all of its tasks? This cannot be undone.")
      .await
    {
      return Ok(DeleteOutcome::Cancelled);
    }

    self.send_delete(&paths::list(id)).await?;

    self.forget_list_contents(id);
    self.cache.remove_list(id);

    info!(list = %id, "List deleted");
    Ok(DeleteOutcome::Deleted)
  }

  /// Return a list's tasks, and the comments of those tasks, to "not loaded".
  pub(super) fn forget_list_contents(&self, list_id: &str) {
    for task in self.cache.tasks_for_list(list_id).unwrap_or_default() {
      self.cache.forget_comments_for_task(&task.id);
    }
    self.cache.forget_tasks_for_list(list_id);
  }
}
