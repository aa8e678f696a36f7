// Docsum - Stateless document summarization relay

pub mod config;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod documents; // Intake limits, prompt profiles, reply normalization
pub mod routes;
pub mod middleware;
pub mod client;    // Client-side submission adapter
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
