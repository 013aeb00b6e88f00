// src/main.rs
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use evalform::api::{configure_routes, AppState};
use evalform::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Could not load .env file: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let bind = (app_config.host.clone(), app_config.port);
    log::info!(
        "Submitting to {} ({:?} results)",
        app_config.endpoint,
        app_config.result_view
    );

    let state = AppState::new(app_config)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    println!("📊 Form available at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
