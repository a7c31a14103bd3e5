use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use invoice_workflow::config::AppConfig;
use invoice_workflow::error::AppError;
use invoice_workflow::telemetry;
use invoice_workflow::workflows::approval::{
    ApprovalWorkflowService, LoggingNotifier, RuleCatalog,
};
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
    let catalog = Arc::new(RuleCatalog::standard());
    info!(rules = catalog.len(), "initialized workflow rules");

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: catalog.clone(),
    };

    let service = Arc::new(
        ApprovalWorkflowService::new(catalog, Arc::new(LoggingNotifier))
            .with_explain(config.workflow.explain_evaluations),
    );

    let app = with_operational_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "invoice approval workflow ready");

    axum::serve(listener, app).await?;
    Ok(())
}
