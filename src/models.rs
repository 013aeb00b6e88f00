// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{EvalError, Result};

/// One of the four inputs on the evaluation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Prompt,
    Model1,
    Model2,
    Model3,
}

impl Field {
    /// Form order, top to bottom.
    pub const ALL: [Field; 4] = [Field::Prompt, Field::Model1, Field::Model2, Field::Model3];

    /// Name used for the form control and the JSON request key.
    pub fn name(self) -> &'static str {
        match self {
            Field::Prompt => "prompt",
            Field::Model1 => "model1",
            Field::Model2 => "model2",
            Field::Model3 => "model3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Prompt => "Prompt",
            Field::Model1 => "Model 1",
            Field::Model2 => "Model 2",
            Field::Model3 => "Model 3",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Prompt => "Enter your prompt here...",
            Field::Model1 => "Enter model 1 content...",
            Field::Model2 => "Enter model 2 content...",
            Field::Model3 => "Enter model 3 content...",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Field {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| EvalError::UnknownField(s.to_string()))
    }
}

/// The four free-text values typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub prompt: String,
    pub model1: String,
    pub model2: String,
    pub model3: String,
}

impl FormInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Prompt => &self.prompt,
            Field::Model1 => &self.model1,
            Field::Model2 => &self.model2,
            Field::Model3 => &self.model3,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Prompt => &mut self.prompt,
            Field::Model1 => &mut self.model1,
            Field::Model2 => &mut self.model2,
            Field::Model3 => &mut self.model3,
        };
        *slot = value;
    }

    /// Fields that would fail the `required` check, in form order.
    /// Whitespace-only values count as empty.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

/// Body POSTed to the evaluation endpoint.
#[derive(Debug, Serialize)]
pub struct EvaluateRequest<'a> {
    pub prompt: &'a str,
    pub model1: &'a str,
    pub model2: &'a str,
    pub model3: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub use_knowledge: bool,
}

impl<'a> EvaluateRequest<'a> {
    pub fn new(input: &'a FormInput, use_knowledge: bool) -> Self {
        Self {
            prompt: &input.prompt,
            model1: &input.model1,
            model2: &input.model2,
            model3: &input.model3,
            use_knowledge,
        }
    }
}

/// How a successful response body is interpreted and shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultView {
    /// `analysis` rendered as markdown plus a metadata table.
    #[default]
    Structured,
    /// The whole body pretty-printed as JSON.
    Raw,
}

impl FromStr for ResultView {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured" => Ok(ResultView::Structured),
            "raw" => Ok(ResultView::Raw),
            other => Err(EvalError::Config(format!(
                "result view must be 'structured' or 'raw', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub prompt_length: u64,
    pub model1_length: u64,
    pub model2_length: u64,
    pub model3_length: u64,
    pub knowledge_used: bool,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl Metadata {
    /// Labelled rows in display order. `Session ID` only appears when the backend sent one.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Prompt Length", self.prompt_length.to_string()),
            ("Model 1 Length", self.model1_length.to_string()),
            ("Model 2 Length", self.model2_length.to_string()),
            ("Model 3 Length", self.model3_length.to_string()),
            (
                "Knowledge Used",
                if self.knowledge_used { "Yes" } else { "No" }.to_string(),
            ),
        ];
        if let Some(session_id) = &self.session_id {
            rows.push(("Session ID", session_id.clone()));
        }
        rows
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    pub analysis: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Payload returned by a successful evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluationResult {
    Raw(serde_json::Value),
    Structured(StructuredResult),
}

impl EvaluationResult {
    /// Interprets an already-parsed body according to the configured view.
    pub fn from_value(value: serde_json::Value, view: ResultView) -> Result<Self> {
        match view {
            ResultView::Raw => Ok(EvaluationResult::Raw(value)),
            ResultView::Structured => Ok(EvaluationResult::Structured(serde_json::from_value(value)?)),
        }
    }
}
