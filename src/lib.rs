//! Client-side sync engine for a boards / lists / tasks / comments service.
//!
//! [`sync::SyncEngine`] runs the actions: it talks to the service through an
//! [`api::ApiGateway`], asks a [`confirm::Confirmation`] before deleting, and
//! reconciles every response into the shared [`cache::EntityCache`], which UI
//! code reads and subscribes to.

pub mod api;
pub mod cache;
pub mod config;
pub mod confirm;
pub mod error;
pub mod logging;
pub mod sync;

mod lock;

#[cfg(test)]
mod testing;

pub use cache::{CacheChange, CacheEvent, CacheState, EntityCache};
pub use error::{CacheError, GatewayError, SyncError, SyncResult};
pub use sync::{DeleteOutcome, SyncEngine};
