use crate::engine::FieldValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The active stage of an intake session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStage {
    #[default]
    Form,
    History,
    Recommendations,
    VaccineRequest,
    ProviderAlert,
    LocationInfo,
}

impl IntakeStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::History => "history",
            Self::Recommendations => "recommendations",
            Self::VaccineRequest => "vaccine-request",
            Self::ProviderAlert => "provider-alert",
            Self::LocationInfo => "location-info",
        }
    }
}

/// Per-vaccine user preference captured during the vaccine-request stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    Want,
    Unsure,
    No,
    Unset,
}

impl Preference {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Want => "want",
            Self::Unsure => "unsure",
            Self::No => "no",
            Self::Unset => "unset",
        }
    }
}

/// Delivery channel for the final recommendation summary. Each dispatch is
/// a single fire-and-forget effect with no retry semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Print,
    DischargeRecord,
    Sms,
}

impl DeliveryMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::DischargeRecord => "discharge_record",
            Self::Sms => "sms",
        }
    }
}

/// Vaccines stocked for on-the-spot administration at the point of care.
/// A `want` preference for any of these routes the session through the
/// provider-alert stage.
pub const ED_AVAILABLE_VACCINES: [&str; 4] = [
    "Influenza (Flu)",
    "COVID-19",
    "Tetanus, Diphtheria, Pertussis (Tdap)",
    "Hepatitis B",
];

pub fn ed_available(vaccine: &str) -> bool {
    ED_AVAILABLE_VACCINES.contains(&vaccine)
}

/// Preference tally returned when the vaccine-request stage is submitted,
/// in recommendation display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceSummary {
    pub wanted: Vec<String>,
    pub unsure: Vec<String>,
    #[serde(rename = "no")]
    pub declined: Vec<String>,
}

/// Workflow errors: guard violations and invalid user input. The engine
/// itself never errors; these arise only from sequencing misuse.
#[derive(Debug)]
pub enum IntakeError {
    Validation(Vec<FieldValidationError>),
    InvalidStage {
        action: &'static str,
        stage: IntakeStage,
    },
    UnknownVaccine(String),
    PreferencesIncomplete {
        missing: Vec<String>,
    },
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeError::Validation(errors) => {
                let details: Vec<String> = errors.iter().map(FieldValidationError::to_string).collect();
                write!(f, "form validation failed: {}", details.join("; "))
            }
            IntakeError::InvalidStage { action, stage } => {
                write!(f, "{} is not available in the {} stage", action, stage.label())
            }
            IntakeError::UnknownVaccine(name) => {
                write!(f, "no recommendation named '{}'", name)
            }
            IntakeError::PreferencesIncomplete { missing } => {
                write!(f, "preferences still unset for: {}", missing.join(", "))
            }
        }
    }
}

impl std::error::Error for IntakeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_match_wire_names() {
        assert_eq!(IntakeStage::VaccineRequest.label(), "vaccine-request");
        assert_eq!(IntakeStage::ProviderAlert.label(), "provider-alert");
        assert_eq!(IntakeStage::LocationInfo.label(), "location-info");
    }

    #[test]
    fn ed_availability_is_an_exact_name_match() {
        assert!(ed_available("COVID-19"));
        assert!(ed_available("Hepatitis B"));
        assert!(!ed_available("Pneumococcal"));
        assert!(!ed_available("covid-19"));
    }
}
