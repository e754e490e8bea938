//! The intake workflow: a per-session state machine sequencing form
//! capture, vaccine-history capture, preference capture, provider-alert
//! branching, and location resolution over the pure recommendation engine.

mod alerts;
pub mod domain;
mod router;
mod service;
mod session;
mod store;

pub use alerts::{AlertError, AlertPublisher, DeliveryRequest, ProviderAlert};
pub use domain::{
    ed_available, DeliveryMethod, IntakeError, IntakeStage, Preference, PreferenceSummary,
    ED_AVAILABLE_VACCINES,
};
pub use router::intake_router;
pub use service::{IntakeService, IntakeServiceError, LocationLookup, PreferencesResult};
pub use session::{IntakeSession, PreferenceOutcome};
pub use store::{SessionStore, StoreError};
