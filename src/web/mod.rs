//! HTTP front end: monthly and daily forms, artifact downloads, uploads and
//! rendered charts.

mod handlers;

use crate::fetcher::PageSource;
use crate::present::OutputLayout;
use crate::synop::Synop;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Shared, read-only state of the web front end.
pub struct AppState<S> {
    pub synop: Synop<S>,
    pub layout: OutputLayout,
}

/// Builds the router. Every handler shares `state` without locking; reports
/// written for the same key overwrite each other.
pub fn build_app<S: PageSource + 'static>(synop: Synop<S>, layout: OutputLayout) -> Router {
    let state = Arc::new(AppState { synop, layout });

    Router::new()
        .route(
            "/",
            get(handlers::monthly_form).post(handlers::monthly_submit::<S>),
        )
        .route(
            "/daily",
            get(handlers::daily_form).post(handlers::daily_submit::<S>),
        )
        .route(
            "/download/:file_type/:station/:year/:month",
            get(handlers::download_monthly::<S>),
        )
        .route(
            "/download/:file_type/:station/:date",
            get(handlers::download_daily::<S>),
        )
        .route("/upload", post(handlers::upload::<S>))
        .route("/static/:name", get(handlers::static_file::<S>))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
