use tracing::{info, warn};

use crate::api::types::{Board, NewBoard};
use crate::api::{paths, ApiGateway};
use crate::cache::splice;
use crate::confirm::Confirmation;
use crate::error::SyncResult;

use super::{log_read_failure, DeleteOutcome, SyncEngine};

impl<G: ApiGateway, C: Confirmation> SyncEngine<G, C> {
  /// Fetch all boards visible to the user.
  pub async fn get_boards(&self) {
    match self.fetch::<Vec<Board>>(paths::BOARDS).await {
      Ok(boards) => self.cache.replace_boards(boards),
      Err(e) => log_read_failure("boards", "", &e),
    }
  }

  /// Fetch one board and make it the active board.
  pub async fn get_active_board(&self, id: &str) {
    match self.fetch::<Board>(&paths::board(id)).await {
      Ok(board) => self.cache.replace_active_board(board),
      Err(e) => log_read_failure("active board", id, &e),
    }
  }

  /// Create a board, then re-fetch the whole collection.
  pub async fn add_board(&self, draft: &NewBoard) -> SyncResult<Board> {
    let created: Board = self.send_create(paths::BOARDS, draft).await?;
    info!(board = %created.id, "Board created");
    self.get_boards().await;
    Ok(created)
  }

  /// Update a board and splice the server's copy into the boards sequence.
  ///
  /// The active board is replaced too when it is the same board.
  pub async fn edit_board(&self, board: &Board) -> SyncResult<Board> {
    let updated: Board = self.send_update(&paths::board(&board.id), board).await?;

    let mut boards = self.cache.boards();
    if splice(&mut boards, updated.clone()) {
      self.cache.replace_boards(boards);
    } else {
      warn!(board = %updated.id, "Edited board is not in the cached boards");
    }

    if self
      .cache
      .active_board()
      .is_some_and(|active| active.id == updated.id)
    {
      self.cache.replace_active_board(updated.clone());
    }

    info!(board = %updated.id, "Board updated");
    self.confirm.notify("Board updated");
    Ok(updated)
  }

  /// Delete a board after confirmation, dropping its lists, their tasks and
  /// the comments of those tasks from the cache.
  pub async fn delete_board(&self, id: &str) -> SyncResult<DeleteOutcome> {
    if !self
      .confirmed("Delete this board and everything on it? This cannot be undone.")
      .await
    {
      return Ok(DeleteOutcome::Cancelled);
    }

    self.send_delete(&paths::board(id)).await?;

    self.cache.remove_board(id);
    for list in self.cache.lists().iter().filter(|l| l.board_id == id) {
      self.forget_list_contents(&list.id);
      self.cache.remove_list(&list.id);
    }
    if self.cache.active_board().is_some_and(|active| active.id == id) {
      self.cache.clear_active_board();
    }

    info!(board = %id, "Board deleted");
    Ok(DeleteOutcome::Deleted)
  }
}
