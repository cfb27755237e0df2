// Route exports
pub mod status;
pub mod ws;

use actix_web::web;
use std::sync::Arc;
use crate::core::Catalog;
use crate::services::{LobbyHandle, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub lobby: LobbyHandle,
    pub catalog: Arc<Catalog>,
    /// Present only under the durable session policy
    pub store: Option<Arc<PostgresClient>>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/ws", web::get().to(ws::ws_handler))
        .route("/api/status", web::get().to(status::get_status))
        .service(
            web::scope("/api/v1")
                .configure(status::configure),
        );
}
