//! Pure recommendation engine: profile validation, rule resolution,
//! ranking, dose parsing, and history filtering. No state, no errors —
//! invalid input is rejected before the engine runs and empty results are
//! valid results.

pub mod domain;
mod doses;
mod history;
mod ranking;
mod resolver;

pub use domain::{
    Candidate, ConditionNote, FieldValidationError, FinalRecommendation, FormField, Gender,
    HistoryEntry, IntakeForm, IntakeProfile, RecommendationOrigin,
};
pub use doses::required_doses;
pub use history::filter_history;
pub use ranking::{display_order, rank};
pub use resolver::resolve;
