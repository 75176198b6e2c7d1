use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::GatewayError;
use crate::lock::{rw_read, rw_write};

use super::ApiGateway;

/// reqwest-backed gateway to the board service
pub struct HttpGateway {
  client: reqwest::Client,
  base_url: String,
  authorization: RwLock<Option<String>>,
}

impl HttpGateway {
  pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|source| GatewayError::Transport {
        path: config.url.clone(),
        source,
      })?;

    // Validate early so a typo in the config fails before the first action
    let base_url = config.url.trim_end_matches('/').to_string();
    Url::parse(&base_url).map_err(|source| GatewayError::InvalidPath {
      path: base_url.clone(),
      source,
    })?;

    Ok(Self {
      client,
      base_url,
      authorization: RwLock::new(None),
    })
  }

  /// Resolve a resource path against the base URL, keeping any base path
  /// prefix such as `/api`.
  fn url_for(&self, path: &str) -> Result<Url, GatewayError> {
    let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|source| GatewayError::InvalidPath {
      path: path.to_string(),
      source,
    })
  }

  async fn send(
    &self,
    method: Method,
    path: &str,
    body: Option<Value>,
  ) -> Result<Value, GatewayError> {
    let url = self.url_for(path)?;
    debug!(%method, %url, "Sending request");

    let mut request = self.client.request(method.clone(), url);
    if let Some(auth) = rw_read(&self.authorization, "gateway.send").clone() {
      request = request.header(AUTHORIZATION, auth);
    }
    if let Some(body) = body {
      request = request.json(&body);
    }

    let response = request
      .send()
      .await
      .map_err(|source| GatewayError::Transport {
        path: path.to_string(),
        source,
      })?;

    Self::read_body(method, path, response).await
  }

  async fn read_body(
    method: Method,
    path: &str,
    response: Response,
  ) -> Result<Value, GatewayError> {
    let status = response.status();
    if !status.is_success() {
      return Err(GatewayError::Status {
        method: method_name(&method),
        path: path.to_string(),
        status: status.as_u16(),
      });
    }

    let bytes = response
      .bytes()
      .await
      .map_err(|source| GatewayError::Transport {
        path: path.to_string(),
        source,
      })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes).map_err(|source| GatewayError::Body {
      path: path.to_string(),
      source,
    })
  }
}

fn method_name(method: &Method) -> &'static str {
  match *method {
    Method::GET => "GET",
    Method::POST => "POST",
    Method::PUT => "PUT",
    Method::DELETE => "DELETE",
    _ => "REQUEST",
  }
}

#[async_trait]
impl ApiGateway for HttpGateway {
  async fn get(&self, path: &str) -> Result<Value, GatewayError> {
    self.send(Method::GET, path, None).await
  }

  async fn post(&self, path: &str, body: Value) -> Result<Value, GatewayError> {
    self.send(Method::POST, path, Some(body)).await
  }

  async fn put(&self, path: &str, body: Value) -> Result<Value, GatewayError> {
    self.send(Method::PUT, path, Some(body)).await
  }

  async fn delete(&self, path: &str) -> Result<Value, GatewayError> {
    self.send(Method::DELETE, path, None).await
  }

  fn set_authorization(&self, value: Option<String>) {
    *rw_write(&self.authorization, "gateway.set_authorization") = value;
  }
}
