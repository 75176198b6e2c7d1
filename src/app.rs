use color_eyre::{eyre::eyre, Result};
use futures::future::join_all;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use taskboard_sync::api::types::{
  Board, Comment, List, NewBoard, NewComment, NewList, NewTask, Task,
};
use taskboard_sync::api::HttpGateway;
use taskboard_sync::cache::Cacheable;
use taskboard_sync::config::Config;
use taskboard_sync::confirm::Confirmation;
use taskboard_sync::{DeleteOutcome, EntityCache, SyncEngine};

use crate::Command;

/// One-shot command runner: performs a single action through the sync engine
/// and prints the cache slice it produced.
pub struct App<C: Confirmation> {
  engine: SyncEngine<HttpGateway, C>,
}

impl<C: Confirmation + 'static> App<C> {
  pub fn new(config: &Config, confirm: C) -> Result<Self> {
    let gateway = HttpGateway::new(&config.api)?;
    let cache = EntityCache::new(config.cache.event_capacity);
    let engine = SyncEngine::new(gateway, confirm, cache);

    if let Some(token) = Config::get_bearer_token() {
      engine.set_bearer(&bearer_value(&token));
    }

    Ok(Self { engine })
  }

  pub async fn run(&self, command: Command) -> Result<()> {
    self.trace_cache_events();

    match command {
      Command::Profile => {
        self.engine.get_profile().await;
        match self.engine.cache().user() {
          Some(user) => println!("{} {}", user.name, user.email.unwrap_or_default()),
          None => return Err(eyre!("Profile not available (see log for details)")),
        }
      }
      Command::Boards => {
        self.engine.get_boards().await;
        print_boards(&self.engine.cache().boards());
      }
      Command::Board { id } => self.show_board(&id).await?,
      Command::Tasks { list } => {
        self.engine.get_tasks_by_list_id(&list).await;
        print_tasks(&self.loaded_tasks(&list)?);
      }
      Command::Comments { task } => {
        self.engine.get_comments_by_task_id(&task).await;
        print_comments(&self.loaded_comments(&task)?);
      }

      Command::AddBoard { title, description } => {
        let board = self
          .engine
          .add_board(&NewBoard { title, description })
          .await?;
        println!("created board {}", board.id);
        print_boards(&self.engine.cache().boards());
      }
      Command::AddList { board, title } => {
        self.engine.get_lists_by_board_id(&board).await;
        self
          .engine
          .create_list(&NewList {
            title,
            board_id: board,
          })
          .await?;
        print_lists(&self.engine.cache().lists());
      }
      Command::AddTask { list, title } => {
        self.engine.get_tasks_by_list_id(&list).await;
        self
          .engine
          .create_task(&NewTask {
            title,
            list_id: list.clone(),
            board_id: None,
          })
          .await?;
        print_tasks(&self.loaded_tasks(&list)?);
      }
      Command::AddComment { task, body } => {
        self.engine.get_comments_by_task_id(&task).await;
        self
          .engine
          .create_comment(&NewComment {
            body,
            task_id: task.clone(),
          })
          .await?;
        print_comments(&self.loaded_comments(&task)?);
      }

      Command::RenameBoard { id, title } => {
        self.engine.get_boards().await;
        let board = find(self.engine.cache().boards(), &id)?;
        self.engine.edit_board(&Board { title, ..board }).await?;
        print_boards(&self.engine.cache().boards());
      }
      Command::RenameList { board, id, title } => {
        self.engine.get_lists_by_board_id(&board).await;
        let list = find(self.engine.cache().lists(), &id)?;
        self.engine.edit_list(&List { title, ..list }).await?;
        print_lists(&self.engine.cache().lists());
      }
      Command::MoveTask {
        id,
        from,
        to,
        title,
      } => {
        self.engine.get_tasks_by_list_id(&from).await;
        let task = find(self.loaded_tasks(&from)?, &id)?;
        let moved = Task {
          title: title.unwrap_or(task.title),
          list_id: to.clone(),
          ..task
        };
        self.engine.edit_task(&moved, &from).await?;
        println!("{}:", from);
        print_tasks(&self.engine.cache().tasks_for_list(&from).unwrap_or_default());
        println!("{}:", to);
        print_tasks(&self.engine.cache().tasks_for_list(&to).unwrap_or_default());
      }
      Command::EditComment { task, id, body } => {
        self.engine.get_comments_by_task_id(&task).await;
        let comment = find(self.loaded_comments(&task)?, &id)?;
        self
          .engine
          .edit_comment(&Comment { body, ..comment })
          .await?;
        print_comments(&self.loaded_comments(&task)?);
      }

      Command::DeleteBoard { id } => {
        report(self.engine.delete_board(&id).await?);
      }
      Command::DeleteList { board, id } => {
        self.engine.get_lists_by_board_id(&board).await;
        report(self.engine.delete_list(&id).await?);
        print_lists(&self.engine.cache().lists());
      }
      Command::DeleteTask { list, id } => {
        self.engine.get_tasks_by_list_id(&list).await;
        let task = find(self.loaded_tasks(&list)?, &id)?;
        report(self.engine.delete_task(&task).await?);
        print_tasks(&self.loaded_tasks(&list)?);
      }
      Command::DeleteComment { task, id } => {
        self.engine.get_comments_by_task_id(&task).await;
        let comment = find(self.loaded_comments(&task)?, &id)?;
        report(self.engine.delete_comment(&comment).await?);
        print_comments(&self.loaded_comments(&task)?);
      }
    }

    Ok(())
  }

  /// Active board, its lists, and the tasks of every list fetched concurrently.
  async fn show_board(&self, id: &str) -> Result<()> {
    futures::join!(
      self.engine.get_active_board(id),
      self.engine.get_lists_by_board_id(id)
    );

    let board = self
      .engine
      .cache()
      .active_board()
      .ok_or_else(|| eyre!("Board {} could not be loaded (see log for details)", id))?;
    let lists = self.engine.cache().lists();

    join_all(lists.iter().map(|l| self.engine.get_tasks_by_list_id(&l.id))).await;

    println!("{}  {}", board.id, board.title);
    if let Some(description) = &board.description {
      println!("  {}", description);
    }
    for list in &lists {
      println!();
      println!("[{}] {}", list.id, list.title);
      match self.engine.cache().tasks_for_list(&list.id) {
        Some(tasks) => print_tasks(&tasks),
        None => println!("  (tasks not loaded)"),
      }
    }
    Ok(())
  }

  fn loaded_tasks(&self, list_id: &str) -> Result<Vec<Task>> {
    self
      .engine
      .cache()
      .tasks_for_list(list_id)
      .ok_or_else(|| {
        eyre!(
          "Tasks for list {} could not be loaded (see log for details)",
          list_id
        )
      })
  }

  fn loaded_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
    self
      .engine
      .cache()
      .comments_for_task(task_id)
      .ok_or_else(|| {
        eyre!(
          "Comments for task {} could not be loaded (see log for details)",
          task_id
        )
      })
  }

  /// Mirror every cache change into the debug log.
  fn trace_cache_events(&self) {
    let mut rx = self.engine.cache().subscribe();
    tokio::spawn(async move {
      loop {
        match rx.recv().await {
          Ok(event) => debug!(change = ?event.change, at = %event.at, "Cache event"),
          Err(RecvError::Lagged(skipped)) => warn!(skipped, "Cache event logger lagged"),
          Err(RecvError::Closed) => break,
        }
      }
    });
  }
}

/// Accept either a raw token or a full `Bearer ...` header value.
fn bearer_value(token: &str) -> String {
  let token = token.trim();
  if token.to_lowercase().starts_with("bearer ") {
    token.to_string()
  } else {
    format!("Bearer {}", token)
  }
}

fn find<T: Cacheable>(items: Vec<T>, id: &str) -> Result<T> {
  items
    .into_iter()
    .find(|item| item.cache_key() == id)
    .ok_or_else(|| eyre!("No {} with id {}", T::entity_type(), id))
}

fn report(outcome: DeleteOutcome) {
  match outcome {
    DeleteOutcome::Deleted => println!("deleted"),
    DeleteOutcome::Cancelled => println!("cancelled"),
  }
}

fn print_boards(boards: &[Board]) {
  if boards.is_empty() {
    println!("(no boards)");
  }
  for board in boards {
    println!("{}  {}", board.id, board.title);
  }
}

fn print_lists(lists: &[List]) {
  if lists.is_empty() {
    println!("(no lists)");
  }
  for list in lists {
    println!("{}  {}", list.id, list.title);
  }
}

fn print_tasks(tasks: &[Task]) {
  if tasks.is_empty() {
    println!("  (no tasks)");
  }
  for task in tasks {
    println!("  {}  {}", task.id, task.title);
  }
}

fn print_comments(comments: &[Comment]) {
  if comments.is_empty() {
    println!("(no comments)");
  }
  for comment in comments {
    match &comment.creator_email {
      Some(author) => println!("{}  {}: {}", comment.id, author, comment.body),
      None => println!("{}  {}", comment.id, comment.body),
    }
  }
}
