//! Sync actions: network calls reconciled into the entity cache.
//!
//! Every action follows the same shape: zero or more gateway calls, then one
//! or more cache mutations, then optionally a notification.
//!
//! - Read flows log failures and leave the cache as it was.
//! - Create, edit and delete flows return [`SyncResult`] and leave the cache
//!   untouched on failure.
//! - Deletes ask the confirmation service first and do nothing when declined.

mod boards;
mod comments;
mod lists;
mod session;
mod tasks;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::api::ApiGateway;
use crate::cache::EntityCache;
use crate::confirm::Confirmation;
use crate::error::{SyncError, SyncResult};

/// Result of a delete flow that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  /// Confirmed, deleted remotely and removed from the cache
  Deleted,
  /// Declined by the user; nothing was sent
  Cancelled,
}

/// Orchestrates the gateway, the confirmation service and the entity cache.
///
/// Cheap to clone; clones share the same cache and collaborators, so actions
/// can be spawned as independent tasks. Nothing serializes concurrent actions:
/// the last cache write wins.
pub struct SyncEngine<G: ApiGateway, C: Confirmation> {
  gateway: Arc<G>,
  confirm: Arc<C>,
  cache: Arc<EntityCache>,
}

impl<G: ApiGateway, C: Confirmation> SyncEngine<G, C> {
  pub fn new(gateway: G, confirm: C, cache: EntityCache) -> Self {
    Self::from_shared(Arc::new(gateway), Arc::new(confirm), Arc::new(cache))
  }

  pub fn from_shared(gateway: Arc<G>, confirm: Arc<C>, cache: Arc<EntityCache>) -> Self {
    Self {
      gateway,
      confirm,
      cache,
    }
  }

  /// Read access to the cache (and its change subscription).
  pub fn cache(&self) -> &EntityCache {
    &self.cache
  }

  pub fn shared_cache(&self) -> Arc<EntityCache> {
    Arc::clone(&self.cache)
  }

  // ==========================================================================
  // Gateway helpers
  // ==========================================================================

  async fn fetch<T: DeserializeOwned>(&self, path: &str) -> SyncResult<T> {
    let value = self.gateway.get(path).await?;
    decode(path, value)
  }

  async fn send_create<B: Serialize, T: DeserializeOwned>(
    &self,
    path: &str,
    draft: &B,
  ) -> SyncResult<T> {
    let body = encode(path, draft)?;
    let value = self.gateway.post(path, body).await?;
    decode(path, value)
  }

  async fn send_update<T: Serialize + DeserializeOwned>(
    &self,
    path: &str,
    entity: &T,
  ) -> SyncResult<T> {
    let body = encode(path, entity)?;
    let value = self.gateway.put(path, body).await?;
    decode(path, value)
  }

  async fn send_delete(&self, path: &str) -> SyncResult<()> {
    self.gateway.delete(path).await?;
    Ok(())
  }

  async fn confirmed(&self, message: &str) -> bool {
    let approved = self.confirm.confirm_destructive(message).await;
    if !approved {
      debug!(message, "Destructive action declined");
    }
    approved
  }
}

impl<G: ApiGateway, C: Confirmation> Clone for SyncEngine<G, C> {
  fn clone(&self) -> Self {
    Self {
      gateway: Arc::clone(&self.gateway),
      confirm: Arc::clone(&self.confirm),
      cache: Arc::clone(&self.cache),
    }
  }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> SyncResult<T> {
  serde_json::from_value(value).map_err(|source| SyncError::Decode {
    path: path.to_string(),
    source,
  })
}

fn encode<T: Serialize>(path: &str, body: &T) -> SyncResult<Value> {
  serde_json::to_value(body).map_err(|source| SyncError::Encode {
    path: path.to_string(),
    source,
  })
}

/// Read-flow failure policy: trace it and keep the cache as it was.
fn log_read_failure(what: &'static str, key: &str, err: &SyncError) {
  error!(what, key, error = %err, "Cannot get {}", what);
}
