use std::sync::Arc;

use axum::{
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use chrono::Local;
use serde::Serialize;
use serde_json::json;

use super::catalog::Domain;
use super::profiles::Profile;
use super::responses::Submission;
use super::service::{AssessmentService, AssessmentServiceError};
use super::snapshot::{SessionId, SnapshotStore};

/// Request header naming the session whose snapshot slot is used.
pub const SESSION_HEADER: &str = "x-assessment-session";

#[derive(Debug, Serialize)]
struct QuestionCatalogView<'a> {
    max_score: u32,
    question_count: usize,
    domains: &'a [Domain],
}

#[derive(Debug, Serialize)]
struct ProfileListView<'a> {
    default_profile: &'a str,
    profiles: &'a [Profile],
}

/// Router builder exposing the questionnaire, scoring, and export endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: SnapshotStore + 'static,
{
    Router::new()
        .route("/api/v1/questions", get(questions_handler::<S>))
        .route("/api/v1/profiles", get(profiles_handler::<S>))
        .route("/api/v1/assessments", post(submit_handler::<S>))
        .route("/api/v1/assessments/latest", get(latest_handler::<S>))
        .route("/api/v1/assessments/export", get(export_handler::<S>))
        .route("/api/v1/assessments/session", delete(end_session_handler::<S>))
        .with_state(service)
}

/// Session named by [`SESSION_HEADER`]; `None` when the header is missing or blank.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| SessionId(value.to_string()))
}

fn require_session(headers: &HeaderMap) -> Result<SessionId, Response> {
    session_from_headers(headers).ok_or_else(|| {
        let payload = json!({ "error": format!("missing {SESSION_HEADER} header") });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    })
}

pub(crate) async fn questions_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let catalog = service.assessor().questions();
    let view = QuestionCatalogView {
        max_score: catalog.max_score(),
        question_count: catalog.question_count(),
        domains: catalog.domains(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn profiles_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let profiles = service.assessor().profiles();
    let view = ProfileListView {
        default_profile: &profiles.balanced().key,
        profiles: profiles.profiles(),
    };
    (StatusCode::OK, Json(view)).into_response()
}

/// Accepts either a web form post or a JSON object of field values.
///
/// A request without a session header is given a freshly generated session.
/// The session used is always echoed in the [`SESSION_HEADER`] response header.
pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    request: Request,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let session = session_from_headers(request.headers()).unwrap_or_else(SessionId::generate);
    let submission = match read_submission(request).await {
        Ok(submission) => submission,
        Err(rejection) => return rejection,
    };

    let Ok(session_value) = HeaderValue::from_str(session.as_str()) else {
        let payload = json!({ "error": "session id is not a valid header value" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    match service.submit(&session, submission) {
        Ok(result) => (
            StatusCode::OK,
            [(SESSION_HEADER, session_value)],
            Json(result),
        )
            .into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn latest_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let session = match require_session(&headers) {
        Ok(session) => session,
        Err(rejection) => return rejection,
    };
    match service.latest(&session) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let session = match require_session(&headers) {
        Ok(session) => session,
        Err(rejection) => return rejection,
    };
    let document = match service.export(&session, Local::now().naive_local()) {
        Ok(document) => document,
        Err(err) => return service_error_response(err),
    };

    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    let Ok(disposition) = HeaderValue::from_str(&disposition) else {
        let payload = json!({ "error": "export file name is not a valid header value" });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(document.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.body,
    )
        .into_response()
}

pub(crate) async fn end_session_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let session = match require_session(&headers) {
        Ok(session) => session,
        Err(rejection) => return rejection,
    };
    match service.end_session(&session) {
        Ok(cleared) => {
            let payload = json!({ "session": session.0, "cleared": cleared });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

async fn read_submission(request: Request) -> Result<Submission, Response> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        Json::<Submission>::from_request(request, &())
            .await
            .map(|Json(submission)| submission)
            .map_err(IntoResponse::into_response)
    } else {
        Form::<Submission>::from_request(request, &())
            .await
            .map(|Form(submission)| submission)
            .map_err(IntoResponse::into_response)
    }
}

fn service_error_response(err: AssessmentServiceError) -> Response {
    let status = match err {
        AssessmentServiceError::NoSubmission => StatusCode::NOT_FOUND,
        AssessmentServiceError::Snapshot(_) => StatusCode::SERVICE_UNAVAILABLE,
        AssessmentServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
