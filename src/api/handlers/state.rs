// src/api/handlers/state.rs
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::controller::{Effect, Msg, Rejection};
use crate::models::Field;

#[derive(Deserialize)]
pub struct FieldUpdate {
    pub value: String,
}

pub async fn get_state(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot = state.controller.lock().await.snapshot();
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn update_field(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<FieldUpdate>,
) -> Result<HttpResponse> {
    let field: Field = match path.into_inner().parse() {
        Ok(field) => field,
        Err(e) => return Ok(HttpResponse::NotFound().json(json!({ "error": e.to_string() }))),
    };

    state
        .dispatch([Msg::FieldEdited {
            field,
            value: req.into_inner().value,
        }])
        .await;

    let snapshot = state.controller.lock().await.snapshot();
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn submit(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.dispatch([Msg::SubmitRequested]).await {
        Effect::Rejected(Rejection::MissingFields(missing)) => {
            let message = Rejection::MissingFields(missing.clone()).to_string();
            Ok(HttpResponse::UnprocessableEntity().json(json!({
                "error": message,
                "missing": missing,
            })))
        }
        Effect::Rejected(rejection @ Rejection::InFlight) => {
            Ok(HttpResponse::Conflict().json(json!({ "error": rejection.to_string() })))
        }
        _ => {
            let snapshot = state.controller.lock().await.snapshot();
            Ok(HttpResponse::Accepted().json(snapshot))
        }
    }
}
