//! Boundary to the remote board service.
//!
//! The sync engine only ever talks to an [`ApiGateway`]; [`HttpGateway`] is
//! the production implementation.

mod client;
pub mod paths;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;

pub use client::HttpGateway;

/// CRUD verbs over resource paths such as `/boards/{id}/lists`.
///
/// Each call returns the decoded response body (`Value::Null` when the server
/// sends nothing back).
#[async_trait]
pub trait ApiGateway: Send + Sync {
  async fn get(&self, path: &str) -> Result<Value, GatewayError>;

  async fn post(&self, path: &str, body: Value) -> Result<Value, GatewayError>;

  async fn put(&self, path: &str, body: Value) -> Result<Value, GatewayError>;

  async fn delete(&self, path: &str) -> Result<Value, GatewayError>;

  /// Replace the default `Authorization` header sent with every request.
  /// `None` stops sending it.
  fn set_authorization(&self, value: Option<String>);
}
