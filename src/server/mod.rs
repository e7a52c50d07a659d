mod handlers;
mod state;
mod static_files;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use state::AppState;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::dashboard::RefreshController;

pub fn build_router(controller: Arc<RefreshController>) -> Router {
    let state = Arc::new(AppState { controller });

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .route("/api/state", get(handlers::dashboard_state))
        .route("/api/weather-codes", get(handlers::weather_codes))
        .fallback(handlers::not_found)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the dashboard until `shutdown` resolves.
pub async fn start(
    host: &str,
    port: u16,
    controller: Arc<RefreshController>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(controller);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Cuaca.Live listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ControllerSettings;
    use crate::location::{
        Coordinates, GeoCapability, GeolocationResolver, PlaceDefaults, PlaceResolver,
        PositionOptions, FALLBACK_COORDINATES,
    };
    use crate::weather::{ForecastReport, ForecastSource, WeatherError};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    struct Offline;

    impl ForecastSource for Offline {
        fn fetch(&self, _coords: Coordinates) -> Result<ForecastReport, WeatherError> {
            Err(WeatherError::Network("offline".into()))
        }
    }

    fn router() -> (Router, Arc<RefreshController>) {
        let controller = Arc::new(RefreshController::new(
            Arc::new(Offline),
            PlaceResolver::new(Vec::new(), PlaceDefaults::default()),
            GeolocationResolver::new(
                GeoCapability::Absent,
                PositionOptions::default(),
                Vec::new(),
                FALLBACK_COORDINATES,
            ),
            ControllerSettings::default(),
        ));
        (build_router(controller.clone()), controller)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_loading_page() {
        let (app, _) = router();
        let (status, headers, body) = get(app, "/?width=1280").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert!(body.contains(r#"data-layout="desktop""#));
        assert!(body.contains(r#"data-phase="loading""#));
    }

    #[tokio::test]
    async fn test_index_without_width_is_mobile() {
        let (app, _) = router();
        let (_, _, body) = get(app, "/").await;
        assert!(body.contains(r#"data-layout="mobile""#));
    }

    #[tokio::test]
    async fn test_bad_width_is_json_error() {
        let (app, _) = router();
        let (status, _, body) = get(app, "/?width=wide").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], 400);
        assert!(json["error"].as_str().unwrap().contains("wide"));
    }

    #[tokio::test]
    async fn test_state_after_failed_first_load() {
        let (app, controller) = router();
        controller.first_load().await;
        let (status, _, body) = get(app, "/api/state").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["phase"]["state"], "failed");
        assert_eq!(json["gps_status"], "unavailable");
        assert_eq!(json["coordinates"]["latitude"], -7.7956);
        assert!(json["snapshot"].is_null());
    }

    #[tokio::test]
    async fn test_weather_codes() {
        let (app, _) = router();
        let (_, _, body) = get(app, "/api/weather-codes").await;
        let json: Value = serde_json::from_str(&body).unwrap();
        let codes = json.as_array().unwrap();
        assert_eq!(codes.len(), 18);
        assert_eq!(codes[0]["code"], 0);
        assert_eq!(codes[0]["label"], "Clear sky");
    }

    #[tokio::test]
    async fn test_static_assets() {
        let (app, _) = router();
        let (status, headers, body) = get(app.clone(), "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/css");
        assert!(body.contains(".desk"));

        let (_, headers, body) = get(app, "/app.js").await;
        assert_eq!(headers[header::CONTENT_TYPE], "application/javascript");
        assert!(body.contains("/api/state"));
        assert!(body.contains("e.touches.length > 1"));
        assert!(body.contains("'gesturestart', block"));
        assert!(body.contains("'gesturechange', block"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (app, _) = router();
        let (status, _, body) = get(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], 404);
    }
}
