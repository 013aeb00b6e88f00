// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/", web::post().to(handlers::submit_form))
        .route("/static/{path:.*}", web::get().to(handlers::static_asset))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
                .route("/state", web::get().to(handlers::get_state))
                .route("/fields/{name}", web::put().to(handlers::update_field))
                .route("/submit", web::post().to(handlers::submit))
        );
}
