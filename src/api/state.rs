// src/api/state.rs
use crate::config::AppConfig;
use crate::controller::{evaluate_and_report, Effect, FormController, Msg};
use crate::errors::Result;
use crate::evaluator::HttpEvaluator;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub controller: Arc<Mutex<FormController>>,
    pub evaluator: Arc<HttpEvaluator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let evaluator = HttpEvaluator::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            controller: Arc::new(Mutex::new(FormController::new())),
            evaluator: Arc::new(evaluator),
        })
    }

    /// Feeds `msgs` to the controller in order, spawning an evaluation task for every
    /// submission that was accepted. Returns the effect of the last message.
    pub async fn dispatch<I>(&self, msgs: I) -> Effect
    where
        I: IntoIterator<Item = Msg>,
    {
        let mut last = Effect::None;
        let mut controller = self.controller.lock().await;
        for msg in msgs {
            last = controller.update(msg);
            if let Effect::Evaluate { submission, input } = &last {
                actix_web::rt::spawn(evaluate_and_report(
                    self.controller.clone(),
                    self.evaluator.clone(),
                    *submission,
                    input.clone(),
                ));
            }
        }
        last
    }
}
