use std::collections::BTreeMap;
use std::sync::Arc;

use super::alerts::{AlertError, AlertPublisher, DeliveryRequest, ProviderAlert};
use super::domain::{DeliveryMethod, IntakeError, IntakeStage, Preference, PreferenceSummary};
use super::session::IntakeSession;
use super::store::{SessionStore, StoreError};
use crate::catalog::VaccineCatalog;
use crate::engine::{Candidate, FinalRecommendation, HistoryEntry, IntakeForm};
use crate::locations::{LocationError, LocationGateway, PostalCode, Site};
use tracing::{info, warn};

/// Service composing the catalog, the session store, the alert channels,
/// and the location gateway into the workflow entry API.
pub struct IntakeService<S, A, L> {
    catalog: Arc<VaccineCatalog>,
    sessions: Arc<S>,
    alerts: Arc<A>,
    locations: Arc<L>,
}

/// Result of submitting the preference stage through the service.
#[derive(Debug, Clone)]
pub struct PreferencesResult {
    pub stage: IntakeStage,
    pub summary: PreferenceSummary,
}

/// Outcome of a nearby-location lookup. A lookup is superseded when a
/// newer postal code was submitted while this one was in flight; the
/// stale response is discarded, last write wins.
#[derive(Debug, Clone)]
pub enum LocationLookup {
    Sites(Vec<Site>),
    Superseded,
}

impl<S, A, L> IntakeService<S, A, L>
where
    S: SessionStore + 'static,
    A: AlertPublisher + 'static,
    L: LocationGateway + 'static,
{
    pub fn new(
        catalog: VaccineCatalog,
        sessions: Arc<S>,
        alerts: Arc<A>,
        locations: Arc<L>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions,
            alerts,
            locations,
        }
    }

    pub fn catalog(&self) -> &VaccineCatalog {
        &self.catalog
    }

    /// Current session state for status views.
    pub fn session(&self, session_id: &str) -> Result<IntakeSession, IntakeServiceError> {
        self.sessions
            .load(session_id)?
            .ok_or_else(|| IntakeServiceError::SessionNotFound(session_id.to_string()))
    }

    /// `form -> history`. Creates the session on first contact.
    pub fn submit_intake(
        &self,
        session_id: &str,
        form: IntakeForm,
    ) -> Result<Vec<Candidate>, IntakeServiceError> {
        let session = self.sessions.load(session_id)?.unwrap_or_default();
        let session = session.submit_form(&self.catalog, form)?;
        let candidates = session.candidates().to_vec();
        self.sessions.save(session_id, session)?;
        Ok(candidates)
    }

    /// `history -> recommendations`.
    pub fn submit_history(
        &self,
        session_id: &str,
        entries: BTreeMap<String, HistoryEntry>,
    ) -> Result<Vec<FinalRecommendation>, IntakeServiceError> {
        let session = self.session(session_id)?.confirm_history(entries)?;
        let recommendations = session.recommendations().to_vec();
        self.sessions.save(session_id, session)?;
        Ok(recommendations)
    }

    /// `recommendations -> vaccine-request`.
    pub fn advance_to_preferences(
        &self,
        session_id: &str,
    ) -> Result<IntakeStage, IntakeServiceError> {
        let session = self.session(session_id)?.begin_preferences()?;
        let stage = session.stage();
        self.sessions.save(session_id, session)?;
        Ok(stage)
    }

    /// `vaccine-request -> provider-alert | location-info`. Applies the
    /// submitted preference map, then branches; entering the
    /// provider-alert stage publishes the notification signal.
    pub fn submit_preferences(
        &self,
        session_id: &str,
        preferences: BTreeMap<String, Preference>,
    ) -> Result<PreferencesResult, IntakeServiceError> {
        let mut session = self.session(session_id)?;
        for (vaccine, preference) in preferences {
            session = session.set_preference(&vaccine, preference)?;
        }

        let outcome = session.submit_preferences()?;
        let stage = outcome.session.stage();
        self.sessions.save(session_id, outcome.session)?;

        if !outcome.ed_requested.is_empty() {
            info!(
                session_id,
                vaccines = ?outcome.ed_requested,
                "notifying provider of point-of-care vaccine request"
            );
            self.alerts.provider_alert(ProviderAlert {
                session_id: session_id.to_string(),
                ed_vaccines: outcome.ed_requested,
            })?;
        }

        Ok(PreferencesResult {
            stage,
            summary: outcome.summary,
        })
    }

    /// `provider-alert -> location-info`.
    pub fn acknowledge_alert(&self, session_id: &str) -> Result<IntakeStage, IntakeServiceError> {
        let session = self.session(session_id)?.acknowledge_provider_alert()?;
        let stage = session.stage();
        self.sessions.save(session_id, session)?;
        Ok(stage)
    }

    pub fn go_back(&self, session_id: &str) -> Result<IntakeStage, IntakeServiceError> {
        let session = self.session(session_id)?.back()?;
        let stage = session.stage();
        self.sessions.save(session_id, session)?;
        Ok(stage)
    }

    /// Reset to a fresh form from any stage.
    pub fn reset(&self, session_id: &str) -> Result<IntakeStage, IntakeServiceError> {
        let session = self.session(session_id)?.reset();
        let stage = session.stage();
        self.sessions.save(session_id, session)?;
        Ok(stage)
    }

    /// Dispatch the recommendation summary through the chosen channel.
    /// Fire-and-forget; available only in the location-info stage.
    pub fn select_delivery(
        &self,
        session_id: &str,
        method: DeliveryMethod,
    ) -> Result<(), IntakeServiceError> {
        let session = self.session(session_id)?;
        if session.stage() != IntakeStage::LocationInfo {
            return Err(IntakeError::InvalidStage {
                action: "delivery selection",
                stage: session.stage(),
            }
            .into());
        }

        info!(session_id, method = method.label(), "dispatching summary delivery");
        self.alerts.dispatch_delivery(DeliveryRequest {
            session_id: session_id.to_string(),
            method,
            vaccines: session.wanted_vaccines(),
        })?;
        Ok(())
    }

    /// Resolve nearby provider sites for a postal code. The requested code
    /// is recorded on the session before the gateway call; when the call
    /// returns, a response for anything but the most recently recorded
    /// code is discarded as superseded.
    pub async fn request_locations(
        &self,
        session_id: &str,
        raw_postal: &str,
    ) -> Result<LocationLookup, IntakeServiceError> {
        let postal: PostalCode = raw_postal
            .parse()
            .map_err(IntakeServiceError::Location)?;

        let session = self
            .session(session_id)?
            .record_location_query(postal.clone())?;
        self.sessions.save(session_id, session)?;

        let sites = match self.locations.nearby_sites(&postal).await {
            Ok(sites) => sites,
            Err(error) => {
                warn!(session_id, %postal, %error, "nearby lookup failed");
                return Err(error.into());
            }
        };

        let current = self.session(session_id)?;
        if current.pending_postal() != Some(&postal) {
            info!(session_id, %postal, "discarding superseded nearby lookup");
            return Ok(LocationLookup::Superseded);
        }

        Ok(LocationLookup::Sites(sites))
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("session {0} not found")]
    SessionNotFound(String),
    #[error(transparent)]
    Workflow(#[from] IntakeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Alert(#[from] AlertError),
    #[error(transparent)]
    Location(#[from] LocationError),
}
