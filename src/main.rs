mod app;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;

use taskboard_sync::config::Config;
use taskboard_sync::confirm::{AssumeYes, TerminalConfirmation};
use taskboard_sync::logging;

#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(about = "Command-line client for a boards / lists / tasks service")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/taskboard/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the service, overriding the config file
  #[arg(short, long)]
  url: Option<String>,

  /// Do not ask before deleting
  #[arg(short, long)]
  yes: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Show the signed-in user
  Profile,
  /// List all boards
  Boards,
  /// Show a board with its lists and their tasks
  Board { id: String },
  /// Show the tasks of a list
  Tasks { list: String },
  /// Show the comments of a task
  Comments { task: String },

  /// Create a board
  AddBoard {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
  },
  /// Create a list on a board
  AddList {
    #[arg(long)]
    board: String,
    #[arg(long)]
    title: String,
  },
  /// Create a task in a list
  AddTask {
    #[arg(long)]
    list: String,
    #[arg(long)]
    title: String,
  },
  /// Comment on a task
  AddComment {
    #[arg(long)]
    task: String,
    #[arg(long)]
    body: String,
  },

  /// Rename a board
  RenameBoard {
    id: String,
    #[arg(long)]
    title: String,
  },
  /// Rename a list
  RenameList {
    board: String,
    id: String,
    #[arg(long)]
    title: String,
  },
  /// Move a task to another list, optionally renaming it
  MoveTask {
    id: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long)]
    title: Option<String>,
  },
  /// Change the text of a comment
  EditComment {
    task: String,
    id: String,
    #[arg(long)]
    body: String,
  },

  /// Delete a board and everything on it
  DeleteBoard { id: String },
  /// Delete a list and its tasks
  DeleteList { board: String, id: String },
  /// Delete a task
  DeleteTask { list: String, id: String },
  /// Delete a comment
  DeleteComment { task: String, id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = Config::load_with_url(args.config.as_deref(), args.url.as_deref())?;

  let _log_guard = logging::init(&config.logging)?;

  if args.yes {
    app::App::new(&config, AssumeYes)?.run(args.command).await
  } else {
    app::App::new(&config, TerminalConfirmation)?.run(args.command).await
  }
}
