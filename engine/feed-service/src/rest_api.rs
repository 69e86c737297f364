//! REST API endpoints
//!
//! Both routes only read the snapshot store; refreshing is the scheduler's job.

use serde::Serialize;
use sports_feed::SnapshotStore;
use std::sync::Arc;
use warp::Filter;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness only; does not reflect whether the last refresh succeeded.
pub async fn get_health() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&HealthResponse { status: "ok" }))
}

/// Current normalized snapshot, or `{}` before the first publish
pub async fn get_data(store: Arc<SnapshotStore>) -> Result<impl warp::Reply, warp::Rejection> {
    match store.latest() {
        Some(state) => {
            tracing::debug!("Serving snapshot refreshed at {}", state.refreshed_at);
            Ok(warp::reply::json(&state.normalized))
        }
        None => Ok(warp::reply::json(&serde_json::json!({}))),
    }
}

/// Create all routes
pub fn create_routes(
    store: Arc<SnapshotStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let health = warp::path("health").and(warp::path::end()).and(warp::get()).and_then(get_health);

    let data = warp::path("data")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter)
        .and_then(get_data);

    health.or(data).with(warp::trace::request())
}
