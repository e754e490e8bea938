use super::domain::DeliveryMethod;
use serde::Serialize;

/// Outbound notification hooks: the provider-alert channel signalled when
/// an ED-available vaccine is requested, and the delivery channels for the
/// final summary. Both are fire-and-forget; no retry semantics.
pub trait AlertPublisher: Send + Sync {
    fn provider_alert(&self, alert: ProviderAlert) -> Result<(), AlertError>;
    fn dispatch_delivery(&self, request: DeliveryRequest) -> Result<(), AlertError>;
}

/// Signal to the provider-notification channel that a session requested
/// vaccines available for on-the-spot administration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAlert {
    pub session_id: String,
    pub ed_vaccines: Vec<String>,
}

/// One delivery of the recommendation summary through a chosen channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRequest {
    pub session_id: String,
    pub method: DeliveryMethod,
    pub vaccines: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}
