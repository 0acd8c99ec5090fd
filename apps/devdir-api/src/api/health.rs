//! Readiness endpoint: confirms the storage backend answers before the
//! instance is put in rotation. Liveness comes from the shared
//! `health_router`.

use axum::{Router, extract::State, response::IntoResponse, response::Response, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_developers::DeveloperRepository;
use std::sync::Arc;

async fn ready<D: DeveloperRepository + 'static>(State(repo): State<Arc<D>>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "storage",
        Box::pin(async move {
            repo.list_all()
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }),
    )];

    match run_health_checks(checks).await {
        Ok(ok) => ok.into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn ready_router<D: DeveloperRepository + 'static>(repo: Arc<D>) -> Router {
    Router::new().route("/ready", get(ready::<D>)).with_state(repo)
}
