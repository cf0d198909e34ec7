//! Health and metrics endpoints

use actix_web::{HttpResponse, get, web};
use carlettos_persistence::PersistenceService;
use serde::Serialize;
use tracing::warn;

use crate::{metrics, model::AppState, model::response::Result};

const LOG_TARGET: &str = "carlettos_server::api";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub storage_mode: String,
    pub status: String,
}

/// Answers 200 while the storage backend responds, 503 otherwise
#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> HttpResponse {
    let persistence = data.persistence();
    let storage_mode = persistence.storage_mode().to_string();

    match persistence.health_check().await {
        Ok(()) => {
            metrics::set_storage_health(true);
            Result::<HealthStatus>::http_success(HealthStatus {
                storage_mode,
                status: "UP".to_string(),
            })
        }
        Err(e) => {
            warn!(target: LOG_TARGET, error = %e, "storage health check failed");
            metrics::set_storage_health(false);
            Result::<HealthStatus>::http_response(
                503,
                crate::error::DATA_ACCESS_ERROR.code,
                e.to_string(),
                HealthStatus {
                    storage_mode,
                    status: "DOWN".to_string(),
                },
            )
        }
    }
}

#[get("/metrics")]
pub async fn prometheus_metrics(data: web::Data<AppState>) -> HttpResponse {
    match &data.metrics {
        Some(handle) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(handle.render()),
        None => HttpResponse::NotFound().finish(),
    }
}
