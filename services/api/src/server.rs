use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySnapshotStore};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ds_qualifier::assessment::{AssessmentService, Assessor, PlainTextRenderer};
use ds_qualifier::config::AppConfig;
use ds_qualifier::error::AppError;
use ds_qualifier::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let assessor = Arc::new(Assessor::load(&config.catalog)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySnapshotStore::from_config(&config.sessions));
    let assessment_service = Arc::new(AssessmentService::new(
        assessor,
        store,
        Arc::new(PlainTextRenderer),
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "readiness assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
