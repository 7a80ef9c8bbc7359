//! `GET /api/bookings?date=DD/MM/YYYY` over any [`SlotSource`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::client::SlotSource;
use crate::date::parse_request_date;

const MISSING_DATE: &str = "date required (DD/MM/YYYY)";

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    date: Option<String>,
}

/// Router serving `/api/bookings` from `source`, callable from any origin.
pub fn router<S>(source: Arc<S>) -> Router
where
    S: SlotSource + Send + Sync + 'static,
{
    Router::new()
        .route("/api/bookings", get(bookings::<S>))
        .layer(CorsLayer::permissive())
        .with_state(source)
}

/// Serve `router` on `addr` until the process ends.
pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving bookings");
    axum::serve(listener, router).await
}

async fn bookings<S>(State(source): State<Arc<S>>, Query(query): Query<BookingsQuery>) -> Response
where
    S: SlotSource + Send + Sync + 'static,
{
    let Some(date) = query.date.filter(|d| !d.trim().is_empty()) else {
        return error(StatusCode::BAD_REQUEST, MISSING_DATE);
    };
    let date = match parse_request_date(&date) {
        Ok(date) => date,
        Err(e) => return error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    match source.fetch(date).await {
        Ok(slots) => (StatusCode::OK, Json(slots)).into_response(),
        Err(e) => {
            warn!(%date, error = %e, "failed to fetch availability");
            error(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
