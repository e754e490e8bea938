use super::session::IntakeSession;

/// Storage abstraction for sessions so the service can be exercised in
/// isolation. Sessions are ephemeral; implementations hold them in memory
/// for the process lifetime at most.
pub trait SessionStore: Send + Sync {
    fn load(&self, session_id: &str) -> Result<Option<IntakeSession>, StoreError>;
    fn save(&self, session_id: &str, session: IntakeSession) -> Result<(), StoreError>;
    fn remove(&self, session_id: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
