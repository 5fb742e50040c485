// src/server/mod.rs
// =============================================================================
// The search web interface.
//
// Routes:
// - GET  /        -> search form
// - POST /search  -> results for form field `q`
// - anything else -> 404 page
//
// A failure while answering one request becomes a generic error page with
// a non-200 status; the details go to the log, never to the client.
// =============================================================================

mod pages;

use crate::error::CrawlError;
use crate::index::SearchRanker;
use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    ranker: SearchRanker,
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Error)]
enum ServerError {
    #[error("search failed: {0}")]
    Search(#[from] CrawlError),

    #[error("search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => {
                warn!(error = %self, "rejected request");
                StatusCode::BAD_REQUEST
            }
            _ => {
                error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Html(pages::error_page())).into_response()
    }
}

pub fn router(ranker: SearchRanker) -> Router {
    Router::new()
        // method mismatches get the 404 page too, not axum's 405
        .route("/", get(search_form).fallback(not_found))
        .route("/search", post(search).fallback(not_found))
        .fallback(not_found)
        .with_state(AppState { ranker })
}

pub async fn serve(addr: SocketAddr, ranker: SearchRanker) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("search server listening on http://{}", listener.local_addr()?);
    println!("🔎 Search running at http://{}", listener.local_addr()?);

    axum::serve(listener, router(ranker))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn search_form() -> Html<String> {
    Html(pages::search_form())
}

async fn search(
    State(state): State<AppState>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> Result<Html<String>, ServerError> {
    let Form(form) = form.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let ranker = state.ranker.clone();
    let query = form.q.clone();
    // the store is SQLite behind a mutex: keep it off the async threads
    let hits = tokio::task::spawn_blocking(move || ranker.search(&query)).await??;

    Ok(Html(pages::results(&form.q, &hits)))
}

async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(pages::not_found()))
}
