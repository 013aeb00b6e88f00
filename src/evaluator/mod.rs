// src/evaluator/mod.rs

use crate::errors::Result;
use crate::models::{EvaluationResult, FormInput};

pub mod http;

pub use http::HttpEvaluator;

/// Something that can score the four form inputs.
///
/// The form controller only ever sees this trait; the production implementation
/// POSTs to the evaluation endpoint.
pub trait Evaluator: Send + Sync {
    /// Submits one snapshot of the form.
    ///
    /// # Returns
    /// The interpreted response body, or the error that ends the submission.
    fn evaluate(&self, input: &FormInput) -> impl std::future::Future<Output = Result<EvaluationResult>> + Send;
}
