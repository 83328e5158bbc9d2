use crate::cli::ServeArgs;
use crate::infra::{
    seed_identities, AppState, InMemoryComplaintRepository, InMemoryIdentityResolver,
    InMemoryUserDirectory,
};
use crate::routes::with_complaint_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use complaint_desk::complaints::ComplaintApi;
use complaint_desk::config::AppConfig;
use complaint_desk::error::AppError;
use complaint_desk::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryComplaintRepository::default());
    let directory = Arc::new(InMemoryUserDirectory::default());
    let identities = Arc::new(InMemoryIdentityResolver::default());
    seed_identities(&config.auth, &directory, &identities);
    let api = Arc::new(ComplaintApi::new(repository, directory, identities));

    let app = with_complaint_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "complaint desk API ready");

    axum::serve(listener, app).await?;
    Ok(())
}
