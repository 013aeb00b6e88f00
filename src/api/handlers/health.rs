// src/api/handlers/health.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::api::AppState;

/// Liveness plus the evaluation contract this instance was started with.
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "evalform",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoint": state.config.endpoint,
        "result_view": state.config.result_view,
    })))
}
