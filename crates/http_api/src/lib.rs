mod errors;
mod handlers;
mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use errors::HttpError;
pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route("/data", get(handlers::data))
        .route("/info", get(handlers::info))
        .route("/tickets", post(handlers::create_ticket))
        .route("/tickets/:id", delete(handlers::delete_ticket))
        .route("/employees", put(handlers::replace_employees))
        .route("/totals", get(handlers::totals))
        .route("/reports/:kind", get(handlers::report))
        .route("/reports/:kind/export", get(handlers::export_report));

    // The browser client is served from a different origin.
    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
