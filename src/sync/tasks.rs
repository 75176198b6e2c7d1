use tracing::{debug, info, warn};

use crate::api::types::{NewTask, Task};
use crate::api::{paths, ApiGateway};
use crate::cache::splice;
use crate::confirm::Confirmation;
use crate::error::SyncResult;

use super::{log_read_failure, DeleteOutcome, SyncEngine};

impl<G: ApiGateway, C: Confirmation> SyncEngine<G, C> {
  /// Fetch the tasks of one list. Other lists' tasks are untouched.
  pub async fn get_tasks_by_list_id(&self, list_id: &str) {
    match self.fetch::<Vec<Task>>(&paths::list_tasks(list_id)).await {
      Ok(tasks) => self.cache.set_tasks_for_list(list_id, tasks),
      Err(e) => log_read_failure("tasks", list_id, &e),
    }
  }

  /// Create a task and append the server's copy to its list.
  ///
  /// The list must have been fetched before; otherwise the task exists on the
  /// server but the call reports [`crate::error::CacheError::ParentNotLoaded`].
  pub async fn create_task(&self, draft: &NewTask) -> SyncResult<Task> {
    let created: Task = self.send_create(paths::TASKS, draft).await?;
    self.cache.append_task(&created.list_id, created.clone())?;
    info!(task = %created.id, list = %created.list_id, "Task created");
    Ok(created)
  }

  /// Update a task, possibly moving it to another list.
  ///
  /// `old_list_id` is the list the task belonged to before the edit. Splicing
  /// cannot move a task between list keys, so both the new and the old list
  /// are re-fetched afterwards.
  pub async fn edit_task(&self, task: &Task, old_list_id: &str) -> SyncResult<Task> {
    let updated: Task = self.send_update(&paths::task(&task.id), task).await?;

    let spliced = match self.cache.tasks_for_list(&updated.list_id) {
      Some(mut tasks) => splice(&mut tasks, updated.clone()).then_some(tasks),
      None => None,
    };
    match spliced {
      Some(tasks) => self.cache.set_tasks_for_list(&updated.list_id, tasks),
      None => warn!(
        task = %updated.id,
        list = %updated.list_id,
        "Edited task is not cached under its list"
      ),
    }

    info!(task = %updated.id, list = %updated.list_id, "Task updated");
    self.confirm.notify("Task updated");

    if updated.list_id == old_list_id {
      self.get_tasks_by_list_id(&updated.list_id).await;
    } else {
      debug!(from = %old_list_id, to = %updated.list_id, "Task moved, refreshing both lists");
      futures::join!(
        self.get_tasks_by_list_id(&updated.list_id),
        self.get_tasks_by_list_id(old_list_id)
      );
    }

    Ok(updated)
  }

  /// Delete a task after confirmation and drop its comments from the cache.
  pub async fn delete_task(&self, task: &Task) -> SyncResult<DeleteOutcome> {
    if !self
      .confirmed("Delete this task? This cannot be undone.")
      .await
    {
      return Ok(DeleteOutcome::Cancelled);
    }

    self.send_delete(&paths::task(&task.id)).await?;

    self.cache.remove_task(&task.list_id, &task.id);
    self.cache.forget_comments_for_task(&task.id);

    info!(task = %task.id, list = %task.list_id, "Task deleted");
    Ok(DeleteOutcome::Deleted)
  }
}
