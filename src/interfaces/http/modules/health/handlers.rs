//! Liveness endpoint
//!
//! `/health` is unauthenticated and reports 503 as soon as the profile
//! store stops answering.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: StoreHealth,
}

/// Result of a round trip to the profile store
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    pub reachable: bool,
    /// Round-trip time of the ping, absent when it failed
    pub latency_ms: Option<u64>,
}

async fn ping_store(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let sent = Instant::now();
    let ping = Statement::from_string(db.get_database_backend(), "SELECT 1");
    db.execute(ping).await?;
    Ok(sent.elapsed().as_millis() as u64)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let store = match ping_store(&state.db).await {
        Ok(latency) => StoreHealth {
            reachable: true,
            latency_ms: Some(latency),
        },
        Err(e) => {
            warn!(error = %e, "Health check could not reach the store");
            StoreHealth {
                reachable: false,
                latency_ms: None,
            }
        }
    };

    let code = if store.reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if store.reachable { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        store,
    };

    (code, Json(body))
}
