use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use cardmatch::config::{PolicyKind, Settings};
use cardmatch::core::{Catalog, Engine};
use cardmatch::routes::{self, AppState};
use cardmatch::services::{JournalWriter, Lobby, PostgresClient, SessionPolicy};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging (LOG_LEVEL / LOG_FORMAT win over the config file)
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Cardmatch service...");

    // Load question catalog
    let catalog = match &settings.catalog.path {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) => {
                info!("Catalog loaded from {} ({} prompts)", path, catalog.total_prompts());
                catalog
            }
            Err(e) => {
                error!("Failed to load catalog from {}: {}", path, e);
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
            }
        },
        None => Catalog::default(),
    };
    let catalog = Arc::new(catalog);

    // Select session policy
    let store = match settings.session.policy {
        PolicyKind::Memory => None,
        PolicyKind::Durable => {
            let Some(database) = settings.database.as_ref() else {
                error!("Durable session policy requires a [database] section");
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "database settings missing"));
            };
            let client = PostgresClient::from_settings(
                &database.url,
                database.max_connections,
                database.min_connections,
                database.acquire_timeout_secs,
                database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
            })?;
            info!("PostgreSQL client initialized");
            Some(Arc::new(client))
        }
    };
    let policy = match &store {
        Some(client) => SessionPolicy::Durable(JournalWriter::spawn(client.clone())),
        None => SessionPolicy::InMemory,
    };

    // Start the lobby actor
    let (lobby, lobby_handle) = Lobby::new(Engine::new(catalog.clone()), policy);
    tokio::spawn(lobby.run());

    let app_state = AppState {
        lobby: lobby_handle,
        catalog,
        store,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
