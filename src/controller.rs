// src/controller.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::Result;
use crate::evaluator::Evaluator;
use crate::models::{EvaluationResult, Field, FormInput};

/// Lifecycle of the most recent submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        submission: Uuid,
        started_at: DateTime<Utc>,
    },
    Succeeded(EvaluationResult),
    Failed(String),
}

impl RequestState {
    pub fn tag(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading { .. } => "loading",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }
}

/// Events dispatched to the controller.
#[derive(Debug)]
pub enum Msg {
    /// User typed into one of the four inputs.
    FieldEdited { field: Field, value: String },
    /// User pressed the submit control.
    SubmitRequested,
    /// The evaluation task for `submission` completed.
    EvaluationFinished {
        submission: Uuid,
        outcome: Result<EvaluationResult>,
    },
}

/// Why a submission was not started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingFields(Vec<Field>),
    InFlight,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MissingFields(fields) => {
                let labels: Vec<&str> = fields.iter().map(|field| field.label()).collect();
                write!(f, "Please fill in: {}", labels.join(", "))
            }
            Rejection::InFlight => write!(f, "An evaluation is already running"),
        }
    }
}

/// Work the caller must carry out after a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Run the evaluation for this snapshot and report back with `Msg::EvaluationFinished`.
    Evaluate { submission: Uuid, input: FormInput },
    Rejected(Rejection),
}

/// Owns the form values and the request lifecycle. Every change goes through [`FormController::update`].
#[derive(Debug, Default)]
pub struct FormController {
    input: FormInput,
    state: RequestState,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, msg: Msg) -> Effect {
        match msg {
            Msg::FieldEdited { field, value } => {
                self.update_field(field, value);
                Effect::None
            }
            Msg::SubmitRequested => self.submit(),
            Msg::EvaluationFinished { submission, outcome } => {
                self.finish(submission, outcome);
                Effect::None
            }
        }
    }

    pub fn update_field(&mut self, field: Field, value: String) {
        self.input.set(field, value);
    }

    /// Moves to Loading and hands back the snapshot to evaluate.
    /// Nothing changes when a field is empty or a request is already running.
    pub fn submit(&mut self) -> Effect {
        if self.is_loading() {
            log::warn!("Submission ignored: an evaluation is already in flight");
            return Effect::Rejected(Rejection::InFlight);
        }

        let missing = self.input.missing_fields();
        if !missing.is_empty() {
            log::warn!("Submission blocked, required fields empty: {:?}", missing);
            return Effect::Rejected(Rejection::MissingFields(missing));
        }

        let submission = Uuid::new_v4();
        log::debug!("{} -> loading (submission {})", self.state.tag(), submission);
        self.state = RequestState::Loading {
            submission,
            started_at: Utc::now(),
        };

        Effect::Evaluate {
            submission,
            input: self.input.clone(),
        }
    }

    /// Records the outcome of `submission`. Stale completions are dropped.
    pub fn finish(&mut self, submission: Uuid, outcome: Result<EvaluationResult>) {
        let started_at = match &self.state {
            RequestState::Loading { submission: current, started_at } if *current == submission => *started_at,
            _ => {
                log::warn!("Dropping result for stale submission {}", submission);
                return;
            }
        };
        let elapsed_ms = (Utc::now() - started_at).num_milliseconds();

        self.state = match outcome {
            Ok(result) => {
                log::info!("Evaluation {} succeeded after {}ms", submission, elapsed_ms);
                RequestState::Succeeded(result)
            }
            Err(e) => {
                log::error!("Evaluation {} failed after {}ms: {}", submission, elapsed_ms, e);
                RequestState::Failed(e.to_string())
            }
        };
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match &self.state {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<Uuid> {
        match self.state {
            RequestState::Loading { submission, .. } => Some(submission),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            input: self.input.clone(),
            state: self.state.tag(),
            submission: self.in_flight(),
            error: self.error().map(str::to_string),
            result: self.result().cloned(),
        }
    }
}

/// Serializable view of the controller served by the JSON API.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub input: FormInput,
    pub state: &'static str,
    pub submission: Option<Uuid>,
    pub error: Option<String>,
    pub result: Option<EvaluationResult>,
}

/// Runs one evaluation and posts the outcome back to the shared controller.
/// The lock is only taken after the request resolves.
pub async fn evaluate_and_report<E: Evaluator>(
    controller: Arc<Mutex<FormController>>,
    evaluator: Arc<E>,
    submission: Uuid,
    input: FormInput,
) {
    let outcome = evaluator.evaluate(&input).await;
    controller
        .lock()
        .await
        .update(Msg::EvaluationFinished { submission, outcome });
}
