//! In-memory collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::api::ApiGateway;
use crate::cache::EntityCache;
use crate::confirm::Confirmation;
use crate::error::GatewayError;
use crate::sync::SyncEngine;

pub type TestEngine = SyncEngine<FakeGateway, ScriptedConfirmation>;

/// Engine over a fresh cache, a silent gateway and a fixed confirmation answer.
pub fn engine(confirm: bool) -> TestEngine {
  SyncEngine::new(
    FakeGateway::new(),
    ScriptedConfirmation::answering(confirm),
    EntityCache::default(),
  )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
  pub method: &'static str,
  pub path: String,
  pub body: Option<Value>,
}

type Scripted = Result<Value, u16>;

/// Gateway answering from scripted responses and recording every call.
///
/// Responses for a method+path are consumed in order; the last one repeats.
/// Anything unscripted answers 404.
#[derive(Default)]
pub struct FakeGateway {
  responses: Mutex<HashMap<(&'static str, String), VecDeque<Scripted>>>,
  calls: Mutex<Vec<Call>>,
  authorization: Mutex<Option<String>>,
}

impl FakeGateway {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn on(&self, method: &'static str, path: &str, body: impl Serialize) -> &Self {
    let value = serde_json::to_value(body).unwrap();
    self.push(method, path, Ok(value));
    self
  }

  pub fn fail(&self, method: &'static str, path: &str, status: u16) -> &Self {
    self.push(method, path, Err(status));
    self
  }

  fn push(&self, method: &'static str, path: &str, response: Scripted) {
    self
      .responses
      .lock()
      .unwrap()
      .entry((method, path.to_string()))
      .or_default()
      .push_back(response);
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn calls_to(&self, method: &'static str, path: &str) -> usize {
    self
      .calls()
      .iter()
      .filter(|c| c.method == method && c.path == path)
      .count()
  }

  pub fn authorization(&self) -> Option<String> {
    self.authorization.lock().unwrap().clone()
  }

  fn answer(
    &self,
    method: &'static str,
    path: &str,
    body: Option<Value>,
  ) -> Result<Value, GatewayError> {
    self.calls.lock().unwrap().push(Call {
      method,
      path: path.to_string(),
      body,
    });

    let mut responses = self.responses.lock().unwrap();
    let scripted = responses
      .get_mut(&(method, path.to_string()))
      .and_then(|queue| {
        if queue.len() > 1 {
          queue.pop_front()
        } else {
          queue.front().cloned()
        }
      })
      .unwrap_or(Err(404));

    scripted.map_err(|status| GatewayError::Status {
      method,
      path: path.to_string(),
      status,
    })
  }
}

#[async_trait]
impl ApiGateway for FakeGateway {
  async fn get(&self, path: &str) -> Result<Value, GatewayError> {
    self.answer("GET", path, None)
  }

  async fn post(&self, path: &str, body: Value) -> Result<Value, GatewayError> {
    self.answer("POST", path, Some(body))
  }

  async fn put(&self, path: &str, body: Value) -> Result<Value, GatewayError> {
    self.answer("PUT", path, Some(body))
  }

  async fn delete(&self, path: &str) -> Result<Value, GatewayError> {
    self.answer("DELETE", path, None)
  }

  fn set_authorization(&self, value: Option<String>) {
    *self.authorization.lock().unwrap() = value;
  }
}

/// Confirmation service with a fixed answer that records what it was asked.
pub struct ScriptedConfirmation {
  answer: bool,
  prompts: Mutex<Vec<String>>,
  notifications: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
  pub fn answering(answer: bool) -> Self {
    Self {
      answer,
      prompts: Mutex::new(Vec::new()),
      notifications: Mutex::new(Vec::new()),
    }
  }

  pub fn prompts(&self) -> Vec<String> {
    self.prompts.lock().unwrap().clone()
  }

  pub fn notifications(&self) -> Vec<String> {
    self.notifications.lock().unwrap().clone()
  }
}

#[async_trait]
impl Confirmation for ScriptedConfirmation {
  async fn confirm_destructive(&self, message: &str) -> bool {
    self.prompts.lock().unwrap().push(message.to_string());
    self.answer
  }

  fn notify(&self, message: &str) {
    self.notifications.lock().unwrap().push(message.to_string());
  }
}
