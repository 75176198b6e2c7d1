use tracing::{info, warn};

use crate::api::types::{Comment, NewComment};
use crate::api::{paths, ApiGateway};
use crate::cache::splice;
use crate::confirm::Confirmation;
use crate::error::SyncResult;

use super::{log_read_failure, DeleteOutcome, SyncEngine};

impl<G: ApiGateway, C: Confirmation> SyncEngine<G, C> {
  pub async fn get_comments_by_task_id(&self, task_id: &str) {
    match self
      .fetch::<Vec<Comment>>(&paths::task_comments(task_id))
      .await
    {
      Ok(comments) => self.cache.set_comments_for_task(task_id, comments),
      Err(e) => log_read_failure("comments", task_id, &e),
    }
  }

  /// Create a comment and append it to its task's comments, which must have
  /// been fetched before.
  pub async fn create_comment(&self, draft: &NewComment) -> SyncResult<Comment> {
    let created: Comment = self.send_create(paths::COMMENTS, draft).await?;
    self
      .cache
      .append_comment(&created.task_id, created.clone())?;
    info!(comment = %created.id, task = %created.task_id, "Comment created");
    Ok(created)
  }

  pub async fn edit_comment(&self, comment: &Comment) -> SyncResult<Comment> {
    let updated: Comment = self
      .send_update(&paths::comment(&comment.id), comment)
      .await?;

    let spliced = match self.cache.comments_for_task(&updated.task_id) {
      Some(mut comments) => splice(&mut comments, updated.clone()).then_some(comments),
      None => None,
    };
    match spliced {
      Some(comments) => self.cache.set_comments_for_task(&updated.task_id, comments),
      None => warn!(
        comment = %updated.id,
        task = %updated.task_id,
        "Edited comment is not cached"
      ),
    }

    info!(comment = %updated.id, "Comment updated");
    self.confirm.notify("Comment updated");
    Ok(updated)
  }

  pub async fn delete_comment(&self, comment: &Comment) -> SyncResult<DeleteOutcome> {
    if !self.confirmed("Delete this comment?").await {
      return Ok(DeleteOutcome::Cancelled);
    }

    self.send_delete(&paths::comment(&comment.id)).await?;
    self.cache.remove_comment(&comment.task_id, &comment.id);

    info!(comment = %comment.id, task = %comment.task_id, "Comment deleted");
    Ok(DeleteOutcome::Deleted)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::CacheChange;
  use crate::error::{CacheError, SyncError};
  use crate::testing::engine;
  use serde_json::json;

  fn comment(id: &str, task_id: &str, body: &str) -> Comment {
    Comment {
      id: id.to_string(),
      body: body.to_string(),
      task_id: task_id.to_string(),
      creator_email: None,
    }
  }

  #[tokio::test]
  async fn test_get_comments_by_task_id() {
    let engine = engine(true);
    engine.gateway.on(
      "GET",
      "/tasks/TA/comments",
      json!([{"id": "C1", "body": "first", "taskId": "TA"}]),
    );

    engine.get_comments_by_task_id("TA").await;

    assert_eq!(
      engine.cache().comments_for_task("TA"),
      Some(vec![comment("C1", "TA", "first")])
    );
  }

  #[tokio::test]
  async fn test_create_comment_appends() {
    let engine = engine(true);
    engine
      .cache()
      .set_comments_for_task("TA", vec![comment("C1", "TA", "first")]);
    engine.gateway.on(
      "POST",
      "/comments",
      json!({"id": "C2", "body": "second", "taskId": "TA"}),
    );

    engine
      .create_comment(&NewComment {
        body: "second".to_string(),
        task_id: "TA".to_string(),
      })
      .await
      .unwrap();

    assert_eq!(
      engine.cache().comments_for_task("TA"),
      Some(vec![comment("C1", "TA", "first"), comment("C2", "TA", "second")])
    );
  }

  #[tokio::test]
  async fn test_edit_comment_splices_and_notifies() {
    let engine = engine(true);
    engine.cache().set_comments_for_task(
      "TA",
      vec![comment("C1", "TA", "first"), comment("C2", "TA", "second")],
    );
    engine.gateway.on(
      "PUT",
      "/comments/C1",
      json!({"id": "C1", "body": "edited", "taskId": "TA"}),
    );

    engine
      .edit_comment(&comment("C1", "TA", "edited"))
      .await
      .unwrap();

    assert_eq!(
      engine.cache().comments_for_task("TA"),
      Some(vec![comment("C1", "TA", "edited"), comment("C2", "TA", "second")])
    );
    assert_eq!(engine.confirm.notifications(), vec!["Comment updated"]);
  }

  #[tokio::test]
  async fn test_create_comment_on_unloaded_task_fails() {
    let engine = engine(true);
    engine.gateway.on(
      "POST",
      "/comments",
      json!({"id": "C1", "body": "hi", "taskId": "TA"}),
    );

    let err = engine
      .create_comment(&NewComment {
        body: "hi".to_string(),
        task_id: "TA".to_string(),
      })
      .await
      .unwrap_err();

    assert!(matches!(
      err,
      SyncError::Cache(CacheError::ParentNotLoaded { ref parent_id, .. }) if parent_id == "TA"
    ));
    assert_eq!(engine.cache().comments_for_task("TA"), None);
  }

  #[tokio::test]
  async fn test_edit_comment_not_cached_leaves_slice() {
    let engine = engine(true);
    engine
      .cache()
      .set_comments_for_task("TA", vec![comment("C1", "TA", "first")]);
    engine.gateway.on(
      "PUT",
      "/comments/C9",
      json!({"id": "C9", "body": "stray", "taskId": "TA"}),
    );
    let mut events = engine.cache().subscribe();

    engine
      .edit_comment(&comment("C9", "TA", "stray"))
      .await
      .unwrap();

    assert_eq!(
      engine.cache().comments_for_task("TA"),
      Some(vec![comment("C1", "TA", "first")])
    );
    assert!(events.try_recv().is_err());
    assert_eq!(engine.confirm.notifications(), vec!["Comment updated"]);
  }

  #[tokio::test]
  async fn test_edit_comment_on_unloaded_task_stays_unloaded() {
    let engine = engine(true);
    engine.gateway.on(
      "PUT",
      "/comments/C1",
      json!({"id": "C1", "body": "edited", "taskId": "TA"}),
    );

    engine
      .edit_comment(&comment("C1", "TA", "edited"))
      .await
      .unwrap();

    assert_eq!(engine.cache().comments_for_task("TA"), None);
  }

  #[tokio::test]
  async fn test_delete_comment_declined() {
    let engine = engine(false);
    engine
      .cache()
      .set_comments_for_task("TA", vec![comment("C1", "TA", "first")]);
    let before = engine.cache().snapshot();

    let outcome = engine
      .delete_comment(&comment("C1", "TA", "first"))
      .await
      .unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(engine.cache().snapshot(), before);
    assert!(engine.gateway.calls().is_empty());
    assert_eq!(engine.confirm.prompts(), vec!["Delete this comment?"]);
  }

  #[tokio::test]
  async fn test_delete_comment_confirmed() {
    let engine = engine(true);
    engine.cache().set_comments_for_task(
      "TA",
      vec![comment("C1", "TA", "first"), comment("C2", "TA", "second")],
    );
    engine.gateway.on("DELETE", "/comments/C1", json!(null));
    let mut events = engine.cache().subscribe();

    let outcome = engine
      .delete_comment(&comment("C1", "TA", "first"))
      .await
      .unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    let remaining = engine.cache().comments_for_task("TA").unwrap();
    assert!(remaining.iter().all(|c| c.id != "C1"));
    assert_eq!(engine.gateway.calls_to("DELETE", "/comments/C1"), 1);
    assert_eq!(engine.gateway.calls().len(), 1);
    assert_eq!(
      events.try_recv().unwrap().change,
      CacheChange::CommentRemoved {
        task_id: "TA".to_string(),
        id: "C1".to_string()
      }
    );
  }

  #[tokio::test]
  async fn test_delete_comment_failure_propagates() {
    let engine = engine(true);
    engine
      .cache()
      .set_comments_for_task("TA", vec![comment("C1", "TA", "first")]);
    engine.gateway.fail("DELETE", "/comments/C1", 500);

    assert!(engine
      .delete_comment(&comment("C1", "TA", "first"))
      .await
      .is_err());
    assert_eq!(engine.cache().comments_for_task("TA").unwrap().len(), 1);
  }
}
