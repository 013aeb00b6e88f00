// src/evaluator/http.rs

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Instant;

use crate::config::AppConfig;
use crate::errors::{EvalError, Result};
use crate::evaluator::Evaluator;
use crate::models::{EvaluateRequest, EvaluationResult, FormInput, ResultView};

/// Submits the form to the evaluation endpoint over HTTP.
#[derive(Clone)]
pub struct HttpEvaluator {
    client: Client,
    endpoint: String,
    result_view: ResultView,
    use_knowledge: bool,
}

impl HttpEvaluator {
    /// Creates a new `HttpEvaluator` with an existing client.
    pub fn new(client: Client, endpoint: impl Into<String>, result_view: ResultView) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            result_view,
            use_knowledge: false,
        }
    }

    /// Builds a client honouring the configured timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let evaluator = Self::new(builder.build()?, config.endpoint.clone(), config.result_view)
            .with_knowledge(config.use_knowledge);
        Ok(evaluator)
    }

    pub fn with_knowledge(mut self, use_knowledge: bool) -> Self {
        self.use_knowledge = use_knowledge;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn result_view(&self) -> ResultView {
        self.result_view
    }
}

impl Evaluator for HttpEvaluator {
    /// POSTs the four fields as JSON. A non-2xx status fails without reading the body.
    async fn evaluate(&self, input: &FormInput) -> Result<EvaluationResult> {
        log::info!("Submitting evaluation to {}", self.endpoint);

        let body = EvaluateRequest::new(input, self.use_knowledge);
        let start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;
        log::info!("Evaluation response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            return Err(EvalError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        EvaluationResult::from_value(value, self.result_view)
    }
}
