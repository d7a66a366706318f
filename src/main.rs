use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info, warn};

use khetsathi::{configure, not_found, AppState, Config, MongoStore};

#[actix_rt::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,actix_web=debug"))
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("{e}");
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Attempting to connect to MongoDB...");
    let store = MongoStore::connect(&config.mongo_uri, &config.mongo_db)
        .await
        .map_err(|e| {
            error!("Invalid MongoDB configuration: {e}");
            io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
        })?;
    match store.ensure_indexes().await {
        Ok(()) => info!("MongoDB connected successfully"),
        Err(e) if e.is_unreachable() => {
            warn!("MongoDB unreachable, indexes will be created on the first write: {e}")
        }
        Err(e) => {
            error!("Could not create MongoDB indexes: {e}");
            return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
        }
    }

    let bind = (config.host.clone(), config.port);
    let cors_origins = config.cors_origins.clone();
    let static_dir = config.static_dir.clone();
    let serve_static = static_dir.is_dir();
    if !serve_static {
        info!("{} not found, static assets disabled", static_dir.display());
    }
    let state = web::Data::new(AppState::new(Arc::new(store), config));

    info!("Server running on {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials();

        let mut app = App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure);
        if serve_static {
            app = app.service(Files::new("/assets", static_dir.clone()));
        }
        app.default_service(web::to(not_found))
    })
    .bind(bind)?
    .run()
    .await
}
