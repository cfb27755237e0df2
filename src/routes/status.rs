use actix_web::{web, HttpResponse, Responder};
use crate::models::{ErrorResponse, HealthResponse};
use crate::routes::AppState;

/// Configure read-only status routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/catalog", web::get().to(get_catalog));
}

/// Health check endpoint
///
/// GET /api/v1/health
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let lobby_healthy = state.lobby.status().await.is_ok();
    let store_healthy = match &state.store {
        Some(store) => store.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if lobby_healthy && store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Waiting pool size and active session count
///
/// GET /api/status
///
/// Response body:
/// ```json
/// { "waitingPlayers": 3, "activeSessions": 5 }
/// ```
pub async fn get_status(state: web::Data<AppState>) -> impl Responder {
    match state.lobby.status().await {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(e) => {
            tracing::error!("Failed to query lobby status: {}", e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "Lobby unavailable".to_string(),
                message: e.to_string(),
                status_code: Some(503),
            })
        }
    }
}

/// Question catalog used for prompt suggestions
///
/// GET /api/v1/catalog
async fn get_catalog(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.as_ref())
}
