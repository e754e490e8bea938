//! Vaccine recommendation engine and intake workflow.
//!
//! The crate is organized around three layers:
//!
//! - [`catalog`]: the immutable vaccine rule source (age brackets,
//!   condition rules, gender notes) with a built-in standard dataset and
//!   JSON loaders.
//! - [`engine`]: pure resolution of a user profile into ranked vaccine
//!   candidates, plus history filtering and dose-requirement parsing.
//! - [`intake`]: the session workflow sequencing form capture, history
//!   capture, preference capture, provider alerting, and location lookup.
//!
//! [`locations`] holds the nearby-site gateway contract and the Google
//! Maps adapter consumed by the workflow's final stage.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod locations;
pub mod telemetry;

pub use catalog::{Priority, VaccineCatalog};
pub use engine::{Candidate, FinalRecommendation, Gender, HistoryEntry, IntakeForm};
pub use intake::{IntakeService, IntakeSession, IntakeStage, Preference};
pub use locations::{LocationGateway, PostalCode, Site};
