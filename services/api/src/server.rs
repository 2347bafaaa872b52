use crate::cli::ServeArgs;
use crate::demo::sample_profiles;
use crate::infra::{AppState, InMemoryProfileRepository, StaticCatalogue};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use express_entry::config::AppConfig;
use express_entry::error::AppError;
use express_entry::express_entry::AssessmentService;
use express_entry::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalogue = StaticCatalogue::load(config.pnp_catalogue_path.as_deref())?;
    let profiles = InMemoryProfileRepository::seeded(sample_profiles(Utc::now().date_naive()));
    let service = Arc::new(AssessmentService::new(
        Arc::new(profiles),
        Arc::new(catalogue),
        config.rules.clone(),
    ));

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "express entry assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
