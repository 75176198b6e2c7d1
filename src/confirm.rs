//! Confirmation prompts and toast notifications.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

/// User-facing collaborator consulted before destructive actions and told
/// about successful edits.
#[async_trait]
pub trait Confirmation: Send + Sync {
  /// Ask the user to approve a destructive action.
  async fn confirm_destructive(&self, message: &str) -> bool;

  /// Fire-and-forget notification.
  fn notify(&self, message: &str);
}

/// Prompts on the terminal and prints notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmation;

#[async_trait]
impl Confirmation for TerminalConfirmation {
  async fn confirm_destructive(&self, message: &str) -> bool {
    let mut stderr = tokio::io::stderr();
    let prompt = format!("{} [y/N] ", message);
    if stderr.write_all(prompt.as_bytes()).await.is_err() {
      return false;
    }
    let _ = stderr.flush().await;

    let mut answer = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    match stdin.read_line(&mut answer).await {
      Ok(_) => is_yes(&answer),
      Err(e) => {
        warn!(error = %e, "Failed to read confirmation, treating as no");
        false
      }
    }
  }

  fn notify(&self, message: &str) {
    info!(message, "Notification");
    eprintln!("{}", message);
  }
}

/// Approves everything without asking (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

#[async_trait]
impl Confirmation for AssumeYes {
  async fn confirm_destructive(&self, message: &str) -> bool {
    info!(message, "Auto-confirmed");
    true
  }

  fn notify(&self, message: &str) {
    info!(message, "Notification");
    eprintln!("{}", message);
  }
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_yes() {
    assert!(is_yes("y\n"));
    assert!(is_yes(" YES "));
    assert!(!is_yes(""));
    assert!(!is_yes("n"));
    assert!(!is_yes("yep"));
  }

  #[tokio::test]
  async fn test_assume_yes_confirms() {
    assert!(AssumeYes.confirm_destructive("Delete board?").await);
  }
}
