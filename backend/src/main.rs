mod classifier;
mod config;
mod error;
mod routes;
mod storage;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use classifier::model::Classifier;
use classifier::profiles::CategoryProfiles;
use config::ServerConfig;
use routes::{configure_routes, UploadLimits};
use storage::upload_store::UploadStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let profiles = CategoryProfiles::load(&config.category_profiles).map_err(|e| {
        log::error!("Failed to load category profiles at startup: {}", e);
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Category profiles failed to load: {}", e),
        )
    })?;
    let classifier = Classifier::new(profiles);
    log::info!(
        "Loaded {} category profiles from {}",
        classifier.category_count(),
        config.category_profiles.display()
    );

    let store = UploadStore::open(&config.upload_folder).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Upload folder {} unusable: {}", config.upload_folder.display(), e),
        )
    })?;
    log::info!("Saving uploads to {}", store.root().display());

    let classifier = web::Data::new(classifier);
    let store = web::Data::new(store);
    let limits = web::Data::new(UploadLimits {
        max_bytes: config.max_content_length,
    });
    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(classifier.clone())
            .app_data(store.clone())
            .app_data(limits.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
