use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryAlertPublisher, InMemorySessionStore};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vaxguide::config::AppConfig;
use vaxguide::error::AppError;
use vaxguide::intake::IntakeService;
use vaxguide::locations::GooglePlacesGateway;
use vaxguide::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let api_key = config.locations.require_api_key()?.to_string();
    let catalog = load_catalog(&config)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sessions = Arc::new(InMemorySessionStore::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let locations = Arc::new(GooglePlacesGateway::new(
        api_key,
        config.locations.search_radius_m,
    ));
    let intake_service = Arc::new(IntakeService::new(catalog, sessions, alerts, locations));

    let app = with_intake_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "vaccine intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
