use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

/// Adds liveness, readiness and metrics endpoints next to the `/api` routes.
pub(crate) fn with_operational_routes(api: Router) -> Router {
    api.route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use bh_investment::lifecycle::Backend;
    use bh_investment::store::MemoryStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flag_is_set() {
        let app_state = state(false);
        let flag = app_state.readiness.clone();
        let app = with_operational_routes(Router::new()).layer(Extension(app_state));

        let before = app.clone().oneshot(get("/ready")).await.expect("responds");
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        flag.store(true, Ordering::Release);
        let after = app.oneshot(get("/ready")).await.expect("responds");
        assert_eq!(after.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn operational_routes_sit_beside_api_routes() {
        let backend = Backend::init(MemoryStore::new()).await.expect("init");
        let app = with_operational_routes(backend.router()).layer(Extension(state(true)));

        let health = app.clone().oneshot(get("/health")).await.expect("responds");
        assert_eq!(health.status(), StatusCode::OK);

        let banner = app.clone().oneshot(get("/api/")).await.expect("responds");
        assert_eq!(banner.status(), StatusCode::OK);

        let metrics = app.oneshot(get("/metrics")).await.expect("responds");
        assert_eq!(metrics.status(), StatusCode::OK);
        assert_eq!(
            metrics.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
