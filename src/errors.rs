// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    /// The evaluation endpoint answered with a non-2xx status. The body is never read.
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    /// Network failure; the message carries the whole cause chain.
    #[error("{}", with_causes(.0))]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to render page: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown form field '{0}'")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;

/// `err` followed by each underlying cause not already spelled out in the text so far.
fn with_causes(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
