use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ds_qualifier::assessment::{assessment_router, AssessmentService, SnapshotStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_assessment_routes<S>(service: Arc<AssessmentService<S>>) -> axum::Router
where
    S: SnapshotStore + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
    use crate::infra::InMemorySnapshotStore;
    use axum::body::Body;
    use axum::http::Request;
    use ds_qualifier::assessment::{Assessor, PlainTextRenderer, SESSION_HEADER};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let service = Arc::new(AssessmentService::new(
            Arc::new(Assessor::standard()),
            Arc::new(InMemorySnapshotStore::default()),
            Arc::new(PlainTextRenderer),
        ));
        with_assessment_routes(service).layer(Extension(state))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(true)
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&axum::http::HeaderValue::from_static(
                "text/plain; version=0.0.4"
            ))
        );
    }

    #[tokio::test]
    async fn submission_then_latest_share_the_session_slot() {
        let app = app(true);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/assessments")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header(SESSION_HEADER, "desk-3")
                    .body(Body::from("profile=energy&os1=1&os2=1&as1=unknown"))
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let submitted = json_body(response).await;

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/assessments/latest")
                    .header(SESSION_HEADER, "desk-3")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let latest = json_body(response).await;
        assert_eq!(latest.get("result"), Some(&submitted));
        assert_eq!(latest.pointer("/submission/profile"), Some(&json!("energy")));

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/assessments/latest")
                    .header(SESSION_HEADER, "desk-4")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::get("/api/v1/assessments/latest")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn anonymous_clients_do_not_share_a_slot() {
        let app = app(true);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/assessments")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("profile=healthcare&ds1=1"))
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let issued = response
            .headers()
            .get(SESSION_HEADER)
            .cloned()
            .expect("session issued");

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/assessments")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("profile=energy"))
                    .expect("request"),
            )
            .await
            .expect("route executes");
        let other = response
            .headers()
            .get(SESSION_HEADER)
            .cloned()
            .expect("session issued");
        assert_ne!(issued, other);

        let response = app
            .oneshot(
                Request::get("/api/v1/assessments/latest")
                    .header(SESSION_HEADER, other)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        let latest = json_body(response).await;
        assert_eq!(latest.pointer("/submission/profile"), Some(&json!("energy")));
    }
}
