use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the board service, e.g. https://boards.example.com/api
  pub url: String,
  /// Per-request timeout
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl ApiConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

fn default_timeout_secs() -> u64 {
  30
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// How many change events a slow subscriber may lag behind before it
  /// starts missing them
  #[serde(default = "default_event_capacity")]
  pub event_capacity: usize,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      event_capacity: default_event_capacity(),
    }
  }
}

fn default_event_capacity() -> usize {
  256
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
  /// EnvFilter directive; TASKBOARD_LOG takes precedence
  #[serde(default = "default_log_filter")]
  pub filter: String,
  /// Write to a rolling file under the data dir instead of stderr
  #[serde(default = "default_true")]
  pub file: bool,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      filter: default_log_filter(),
      file: true,
    }
  }
}

fn default_log_filter() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./taskboard.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/taskboard/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/taskboard/config.yaml \
         or pass --url."
      )),
    }
  }

  /// Load configuration with a command-line base URL taking precedence.
  ///
  /// A bare `url` is enough when no config file exists; a file that exists
  /// but fails to read or parse is still an error.
  pub fn load_with_url(explicit_path: Option<&Path>, url: Option<&str>) -> Result<Self> {
    if explicit_path.is_some() {
      return Self::load(explicit_path).map(|config| config.with_url(url));
    }
    Self::resolve(Self::find_config_file().as_deref(), url)
  }

  fn resolve(found: Option<&Path>, url: Option<&str>) -> Result<Self> {
    match (found, url) {
      (Some(path), _) => Self::load_from_path(path).map(|config| config.with_url(url)),
      (None, Some(url)) => Ok(Self::from_url(url)),
      (None, None) => Self::load(None),
    }
  }

  fn with_url(mut self, url: Option<&str>) -> Self {
    if let Some(url) = url {
      self.api.url = url.to_string();
    }
    self
  }

  /// Build a configuration from a bare base URL, used when `--url` is given
  /// and no file exists.
  pub fn from_url(url: &str) -> Self {
    Self {
      api: ApiConfig {
        url: url.to_string(),
        timeout_secs: default_timeout_secs(),
      },
      cache: CacheConfig::default(),
      logging: LoggingConfig::default(),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("taskboard.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("taskboard").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// Get the bearer token from environment variables.
  ///
  /// Checks TASKBOARD_TOKEN first, then TASKBOARD_BEARER. A missing token is
  /// not an error; requests then go out unauthenticated.
  pub fn get_bearer_token() -> Option<String> {
    std::env::var("TASKBOARD_TOKEN")
      .or_else(|_| std::env::var("TASKBOARD_BEARER"))
      .ok()
      .filter(|t| !t.trim().is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_minimal_config_uses_defaults() {
    let config = Config::parse("api:\n  url: https://boards.example.com/api\n").unwrap();
    assert_eq!(config.api.url, "https://boards.example.com/api");
    assert_eq!(config.api.timeout(), Duration::from_secs(30));
    assert_eq!(config.cache.event_capacity, 256);
    assert_eq!(config.logging.filter, "info");
    assert!(config.logging.file);
  }

  #[test]
  fn test_full_config() {
    let yaml = r#"
api:
  url: http://localhost:3000/api
  timeout_secs: 5
cache:
  event_capacity: 16
logging:
  filter: taskboard_sync=debug
  file: false
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.cache.event_capacity, 16);
    assert_eq!(config.logging.filter, "taskboard_sync=debug");
    assert!(!config.logging.file);
  }

  #[test]
  fn test_missing_api_section_is_an_error() {
    assert!(Config::parse("cache:\n  event_capacity: 4\n").is_err());
  }

  fn write_config(name: &str, contents: &str) -> PathBuf {
    let file = format!("taskboard-{}-{}.yaml", name, std::process::id());
    let path = std::env::temp_dir().join(file);
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn test_url_alone_is_enough_without_a_file() {
    let config = Config::resolve(None, Some("http://localhost:3000/api")).unwrap();
    assert_eq!(config.api.url, "http://localhost:3000/api");
    assert_eq!(config.api.timeout_secs, 30);
  }

  #[test]
  fn test_url_overrides_file() {
    let path = write_config(
      "override",
      "api:\n  url: https://boards.example.com/api\n  timeout_secs: 5\n",
    );

    let config = Config::resolve(Some(&path), Some("http://localhost:3000/api")).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.api.url, "http://localhost:3000/api");
    assert_eq!(config.api.timeout_secs, 5);
  }

  #[test]
  fn test_broken_file_is_reported_even_with_url() {
    let path = write_config("broken", "api: [not, a, mapping\n");

    let err = Config::resolve(Some(&path), Some("http://localhost:3000/api")).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(err.to_string().contains("Failed to parse config file"));
  }

  #[test]
  fn test_explicit_missing_path_is_an_error() {
    let err = Config::load(Some(Path::new("/nonexistent/taskboard.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }
}
