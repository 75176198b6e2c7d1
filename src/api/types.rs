//! Entities exchanged with the board service.
//!
//! The service speaks camelCase JSON. Identifiers are opaque strings; some
//! deployments still emit `_id`, which is accepted on the way in.

use serde::{Deserialize, Serialize};

/// Authenticated user profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[serde(alias = "_id", default)]
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub picture: Option<String>,
}

/// Board summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
  #[serde(alias = "_id")]
  pub id: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub creator_email: Option<String>,
}

/// A column on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
  #[serde(alias = "_id")]
  pub id: String,
  pub title: String,
  pub board_id: String,
}

/// A card inside a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  #[serde(alias = "_id")]
  pub id: String,
  pub title: String,
  pub list_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub board_id: Option<String>,
}

/// A comment on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  #[serde(alias = "_id")]
  pub id: String,
  pub body: String,
  pub task_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub creator_email: Option<String>,
}

// ============================================================================
// Create payloads (no id until the server assigns one)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoard {
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewList {
  pub title: String,
  pub board_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
  pub title: String,
  pub list_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub board_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
  pub body: String,
  pub task_id: String,
}
