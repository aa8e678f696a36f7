//! API Routes
//!
//! - `/api/summarize-document` - Document summarization (alias:
//!   `/functions/v1/summarize-document`)
//! - `/api/health` - Health check

pub mod health;
pub mod summarize;

use axum::Router;
use tower_http::trace::TraceLayer;
use crate::middleware::apply_cors;
use crate::models::AppState;
use tracing::info;

/// Create the main application router
///
/// Every route answers CORS pre-flight requests for any origin.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let api_router = Router::new()
        .merge(summarize::router(state.clone()))
        .merge(health::router(state))
        .layer(TraceLayer::new_for_http());

    apply_cors(api_router)
}
