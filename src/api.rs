use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::counter;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::service::ComparisonService;

const INDEX_HTML: &str = include_str!("../templates/index.html");
const STATIC_DIR: &str = "static";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ComparisonService>,
}

impl AppState {
    pub fn new(service: ComparisonService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/api/search", get(search))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// First `product` value in the query string. Repeated keys are tolerated;
/// later values are ignored.
fn first_product(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .find(|(k, _)| k == "product")
        .map(|(_, v)| v)
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, msg: String) -> Response {
    (status, Json(ErrorBody { error: msg })).into_response()
}

async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let Some(product) = first_product(pairs).filter(|p| !p.is_empty()) else {
        counter!("price_scout_search_requests_total", "outcome" => "bad_request").increment(1);
        return error_response(
            StatusCode::BAD_REQUEST,
            "No search query provided.".to_string(),
        );
    };

    match state.service.compare(&product).await {
        Some(results) => {
            counter!("price_scout_search_requests_total", "outcome" => "ok").increment(1);
            Json(results).into_response()
        }
        None => {
            counter!("price_scout_search_requests_total", "outcome" => "not_found").increment(1);
            info!(product = %product, "search produced no live prices");
            error_response(
                StatusCode::NOT_FOUND,
                format!(
                    "No live price data found for '{product}'. Please try a different product."
                ),
            )
        }
    }
}
