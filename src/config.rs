// src/config.rs
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::errors::{EvalError, Result};
use crate::models::ResultView;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/evaluate";

/// Application configuration: defaults, then an optional TOML file, then environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Evaluation endpoint the form submits to.
    pub endpoint: String,
    pub host: String,
    pub port: u16,
    /// Which response contract the form renders.
    pub result_view: ResultView,
    /// No timeout when unset; a hung backend keeps the form loading.
    pub request_timeout_secs: Option<u64>,
    /// Adds `"use_knowledge": true` to the request body.
    pub use_knowledge: bool,
    /// Meta refresh interval of the page while a request is in flight.
    pub refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            result_view: ResultView::Structured,
            request_timeout_secs: None,
            use_knowledge: false,
            refresh_secs: 1,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the environment.
    /// `EVALFORM_CONFIG` names an optional TOML file applied before the other variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("EVALFORM_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(endpoint) = lookup("EVALUATE_ENDPOINT") {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(host) = lookup("EVALFORM_HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("EVALFORM_PORT") {
            config.port = parse_var("EVALFORM_PORT", &port)?;
        }
        if let Some(view) = lookup("EVALFORM_RESULT_VIEW") {
            config.result_view = view.parse()?;
        }
        if let Some(secs) = lookup("EVALUATE_TIMEOUT_SECS") {
            config.request_timeout_secs = Some(parse_var("EVALUATE_TIMEOUT_SECS", &secs)?);
        }
        if let Some(flag) = lookup("EVALUATE_USE_KNOWLEDGE") {
            config.use_knowledge = parse_var("EVALUATE_USE_KNOWLEDGE", &flag)?;
        }
        if let Some(secs) = lookup("EVALFORM_REFRESH_SECS") {
            config.refresh_secs = parse_var("EVALFORM_REFRESH_SECS", &secs)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(EvalError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(EvalError::Config("request timeout must be at least one second".to_string()));
        }
        if self.refresh_secs == 0 {
            return Err(EvalError::Config("refresh interval must be at least one second".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EvalError::Config(format!("{} has an invalid value: '{}'", key, value)))
}
