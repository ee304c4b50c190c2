use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use question_forge::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config).await.map_err(|err| {
        log::error!("Failed to initialise application state: {}", err);
        std::io::Error::other(err.to_string())
    })?;

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = if state.config.allows_any_origin() {
            Cors::permissive()
        } else {
            Cors::default()
                .allowed_origin(&state.config.cors_allowed_origin)
                .allowed_methods(vec!["GET", "POST", "DELETE"])
                .allow_any_header()
                .max_age(3600)
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
