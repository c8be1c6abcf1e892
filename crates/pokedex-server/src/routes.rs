//! HTTP routes
//!
//! Maps pipeline outcomes onto status codes. Only a successful lookup carries
//! a body; `404` and `500` are sent empty. A request that outlives the inbound
//! timeout is answered like any other upstream failure, with an empty `500`.

use axum::error_handling::HandleErrorLayer;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{BoxError, Json, Router};
use pokedex_core::{PipelineResult, Pokedex};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

use crate::logging::make_request_span;

const BANNER: &str = "Pokedex API: try GET /pokemon/{name} or GET /pokemon/translated/{name}\n";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pokedex: Arc<Pokedex>,
}

/// Build the application router
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/pokemon/:name", get(get_pokemon))
        .route("/pokemon/translated/:name", get(get_translated_pokemon))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_request_span)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                )
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CatchPanicLayer::custom(internal_error)),
        )
        .with_state(state)
}

async fn index() -> &'static str {
    BANNER
}

async fn health_check() -> &'static str {
    "Healthy"
}

async fn get_pokemon(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    into_response(state.pokedex.describe(&name).await)
}

async fn get_translated_pokemon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    into_response(state.pokedex.describe_translated(&name).await)
}

fn into_response(result: PipelineResult) -> Response {
    match result {
        PipelineResult::Ok(info) => (StatusCode::OK, Json(info)).into_response(),
        PipelineResult::NotFound => StatusCode::NOT_FOUND.into_response(),
        PipelineResult::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn handle_middleware_error(error: BoxError) -> StatusCode {
    if error.is::<Elapsed>() {
        tracing::error!("Request exceeded the inbound timeout");
    } else {
        tracing::error!(error = %error, "Request failed in middleware");
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail = %detail, "Request handler panicked");

    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
