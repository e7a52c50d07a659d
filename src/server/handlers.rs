use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;

use crate::dashboard::StateView;
use crate::render::{self, Layout};
use crate::weather::codes::{known_codes, WeatherDescription};

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET / ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PageQuery {
    pub width: Option<String>,
}

pub(super) fn parse_width(raw: Option<&str>) -> Result<Option<u32>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(w) => w
            .parse::<u32>()
            .map(Some)
            .map_err(|_| api_error(StatusCode::BAD_REQUEST, format!("Invalid width '{}'", w))),
    }
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Html<String>, ApiError> {
    let layout = Layout::for_width(parse_width(params.width.as_deref())?);
    let snapshot = state.controller.snapshot();
    Ok(Html(render::page(&snapshot, layout, Instant::now())))
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── JSON API ────────────────────────────────────────────────────

pub async fn dashboard_state(State(state): State<Arc<AppState>>) -> Json<StateView> {
    Json(state.controller.view())
}

pub async fn weather_codes() -> Json<Vec<WeatherDescription>> {
    Json(known_codes())
}

pub async fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Not found")
}
