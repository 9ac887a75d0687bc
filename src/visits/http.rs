use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::infra::store::CounterStore;

use super::service::CounterService;

#[derive(Serialize)]
pub(crate) struct VisitCountDto {
    pub value: i64,
}

struct Container<S> {
    service: CounterService<S>,
}
impl<S: CounterStore> Container<S> {
    fn new(store: S) -> Arc<Self> {
        Arc::new(Container {
            service: CounterService::new(store),
        })
    }
}
type AppState<S> = Arc<Container<S>>;

pub(crate) const RECORD_PATH: &str = "/visits";
pub(crate) const COUNT_PATH: &str = "/visits-count";

// Both routes accept any method; no request data crosses the trust boundary.
pub(crate) fn router<S>(store: &S) -> Router
where
    S: CounterStore + Clone + 'static,
{
    Router::new()
        .route(RECORD_PATH, any(record_visit::<S>))
        .route(COUNT_PATH, any(get_visit_count::<S>))
        .with_state(Container::new(store.clone()))
}

async fn record_visit<S: CounterStore + 'static>(State(state): State<AppState<S>>) -> Response {
    if let Err(err) = state.service.record_visit(super::KEY).await {
        error!(error = %err, "failed to record visit");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    StatusCode::OK.into_response()
}

async fn get_visit_count<S: CounterStore + 'static>(State(state): State<AppState<S>>) -> Response {
    match state.service.read_visits(super::KEY).await {
        Ok(value) => (StatusCode::OK, Json(VisitCountDto { value })).into_response(),
        Err(err) => {
            error!(error = %err, "failed to read visit count");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
