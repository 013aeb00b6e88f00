// src/api/handlers/form.rs
use actix_web::http::{header, StatusCode};
use actix_web::{error, web, HttpResponse, Result};
use askama::Template;

use crate::api::AppState;
use crate::controller::{Effect, Msg, Rejection};
use crate::models::{Field, FormInput};
use crate::render::{self, FormPage};

pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    let controller = state.controller.lock().await;
    let html = render::render(&controller, state.config.refresh_secs)
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

/// Browser form post: apply all four values, then submit.
pub async fn submit_form(
    state: web::Data<AppState>,
    form: web::Form<FormInput>,
) -> Result<HttpResponse> {
    let input = form.into_inner();
    let edits = Field::ALL.into_iter().map(|field| Msg::FieldEdited {
        field,
        value: input.get(field).to_string(),
    });

    match state.dispatch(edits.chain([Msg::SubmitRequested])).await {
        Effect::Rejected(rejection) => {
            let status = match rejection {
                Rejection::MissingFields(_) => StatusCode::UNPROCESSABLE_ENTITY,
                Rejection::InFlight => StatusCode::CONFLICT,
            };
            let controller = state.controller.lock().await;
            let html = FormPage::new(&controller, state.config.refresh_secs)
                .with_notice(rejection.to_string())
                .render()
                .map_err(error::ErrorInternalServerError)?;
            Ok(HttpResponse::build(status).content_type("text/html; charset=utf-8").body(html))
        }
        _ => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .finish()),
    }
}
