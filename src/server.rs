//! HTTP front end for the nearest-flight lookup.
//!
//! `GET /?longitude=..&latitude=..&altitude=..` answers with a single
//! plain-text line describing the closest aircraft. Shared state is read-only:
//! the locator (holding the session token) and the metadata tables.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::{info, warn};

use crate::error::LocateError;
use crate::location::ObserverQuery;
use crate::locator::NearestFlightLocator;
use crate::metadata::{MetadataResolver, NO_AIRCRAFT_FOUND};

pub struct AppState {
    pub locator: NearestFlightLocator,
    pub metadata: MetadataResolver,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(closest_flight).fallback(method_not_allowed))
        .with_state(state)
}

/// GET / — describe the aircraft closest to the observer.
async fn closest_flight(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ObserverQuery>,
) -> impl IntoResponse {
    info!(
        "GET received for ({}, {}, {} ft)",
        query.longitude, query.latitude, query.altitude
    );

    if !query.is_finite() {
        warn!("Rejecting non-finite observer position");
        return (
            StatusCode::BAD_REQUEST,
            "longitude, latitude and altitude must be finite numbers".to_string(),
        );
    }

    match state.locator.locate(&query).await {
        Ok(closest) => (StatusCode::OK, state.metadata.describe(closest.as_ref())),
        Err(LocateError::Format(e)) => {
            warn!("Unusable feed payload: {}", e);
            (StatusCode::OK, NO_AIRCRAFT_FOUND.to_string())
        }
        Err(LocateError::Upstream(e)) => {
            warn!("Flight feed unavailable: {}", e);
            (StatusCode::BAD_GATEWAY, format!("Flight feed unavailable: {}", e))
        }
    }
}

async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Incorrect method")
}

/// Binds `addr` and serves until the process exits.
pub async fn serve(state: Arc<AppState>, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server started on http://{}", addr);
    axum::serve(listener, build_router(state)).await
}
