//! Error types shared by the gateway, the cache and the sync actions.

use thiserror::Error;

/// Failure talking to the remote service.
#[derive(Debug, Error)]
pub enum GatewayError {
  /// Connection, TLS, timeout or body decoding failure inside the HTTP client
  #[error("request to {path} failed: {source}")]
  Transport {
    path: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status
  #[error("{method} {path} returned {status}")]
  Status {
    method: &'static str,
    path: String,
    status: u16,
  },

  /// The body was not valid JSON
  #[error("response from {path} is not JSON: {source}")]
  Body {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  /// The resource path could not be joined onto the base URL
  #[error("invalid resource path {path}: {source}")]
  InvalidPath {
    path: String,
    #[source]
    source: url::ParseError,
  },
}

/// Precondition violations reported by the entity cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
  #[error("cannot append {kind}: {parent_kind} {parent_id} was never loaded")]
  ParentNotLoaded {
    kind: &'static str,
    parent_kind: &'static str,
    parent_id: String,
  },
}

/// Error returned by create, edit and delete actions.
#[derive(Debug, Error)]
pub enum SyncError {
  #[error(transparent)]
  Gateway(#[from] GatewayError),

  #[error("unexpected response body from {path}: {source}")]
  Decode {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("cannot encode request body for {path}: {source}")]
  Encode {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error(transparent)]
  Cache(#[from] CacheError),
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
