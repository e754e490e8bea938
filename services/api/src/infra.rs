use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use vaxguide::catalog::VaccineCatalog;
use vaxguide::config::AppConfig;
use vaxguide::error::AppError;
use vaxguide::intake::{
    AlertError, AlertPublisher, DeliveryRequest, IntakeSession, ProviderAlert, SessionStore,
    StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, IntakeSession>>>,
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &str) -> Result<Option<IntakeSession>, StoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(session_id).cloned())
    }

    fn save(&self, session_id: &str, session: IntakeSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(session_id.to_string(), session);
        Ok(())
    }

    fn remove(&self, session_id: &str) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(session_id);
        Ok(())
    }
}

/// Records outbound alerts so tests and the demo can assert on the
/// integration boundary. A deployment would swap in real transports here.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    provider_alerts: Arc<Mutex<Vec<ProviderAlert>>>,
    deliveries: Arc<Mutex<Vec<DeliveryRequest>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn provider_alert(&self, alert: ProviderAlert) -> Result<(), AlertError> {
        let mut guard = self.provider_alerts.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }

    fn dispatch_delivery(&self, request: DeliveryRequest) -> Result<(), AlertError> {
        let mut guard = self.deliveries.lock().expect("delivery mutex poisoned");
        guard.push(request);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    pub(crate) fn provider_alerts(&self) -> Vec<ProviderAlert> {
        self.provider_alerts
            .lock()
            .expect("alert mutex poisoned")
            .clone()
    }

    pub(crate) fn deliveries(&self) -> Vec<DeliveryRequest> {
        self.deliveries
            .lock()
            .expect("delivery mutex poisoned")
            .clone()
    }
}

/// Load the configured rule source, falling back to the built-in dataset.
pub(crate) fn load_catalog(config: &AppConfig) -> Result<VaccineCatalog, AppError> {
    match &config.catalog_path {
        Some(path) => Ok(VaccineCatalog::from_path(path)?),
        None => Ok(VaccineCatalog::standard()),
    }
}
