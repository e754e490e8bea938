use crate::catalog::Priority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_AGE: u16 = 0;
pub const MAX_AGE: u16 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

/// Raw form input as captured from the user. Validated into an
/// [`IntakeProfile`] before resolution runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub age: Option<u16>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl IntakeForm {
    /// Per-field validation: age present and within range, gender present.
    /// Condition ids are passed through; unknown ids simply never match.
    pub fn validate(&self) -> Result<IntakeProfile, Vec<FieldValidationError>> {
        let mut errors = Vec::new();

        let age = match self.age {
            None => {
                errors.push(FieldValidationError::new(FormField::Age, "Age is required"));
                None
            }
            Some(age) if age > MAX_AGE => {
                errors.push(FieldValidationError::new(
                    FormField::Age,
                    "Age must be between 0 and 120",
                ));
                None
            }
            Some(age) => Some(age),
        };

        let gender = match self.gender {
            None => {
                errors.push(FieldValidationError::new(
                    FormField::Gender,
                    "Gender is required",
                ));
                None
            }
            Some(gender) => Some(gender),
        };

        match (age, gender) {
            (Some(age), Some(gender)) if errors.is_empty() => {
                let mut conditions = Vec::new();
                for id in &self.conditions {
                    if !conditions.contains(id) {
                        conditions.push(id.clone());
                    }
                }
                Ok(IntakeProfile {
                    age,
                    gender,
                    conditions,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Validated resolver input. Condition ids are deduplicated, selection
/// order preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeProfile {
    pub age: u16,
    pub gender: Gender,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Age,
    Gender,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: FormField,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: FormField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

/// Marks whether a candidate arose from age matching or was introduced by
/// a condition rule alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationOrigin {
    Age,
    Condition,
}

/// A condition-specific recommendation attached to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionNote {
    pub condition: String,
    pub recommendation: String,
    pub priority: Priority,
}

/// A provisionally recommended vaccine before history filtering. Exactly
/// one exists per vaccine name in a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub vaccine: String,
    pub description: String,
    pub recommendation: String,
    pub frequency: String,
    pub priority: Priority,
    pub origin: RecommendationOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition_notes: Vec<ConditionNote>,
}

/// Self-reported prior-vaccination data for one vaccine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_dose_date: Option<NaiveDate>,
    #[serde(default)]
    pub doses_received: u32,
}

/// A candidate surviving history filtering, annotated with dose-completion
/// status. Immutable once computed for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRecommendation {
    pub vaccine: String,
    pub description: String,
    pub recommendation: String,
    pub frequency: String,
    pub priority: Priority,
    pub origin: RecommendationOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition_notes: Vec<ConditionNote>,
    pub previously_received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_received_date: Option<NaiveDate>,
    pub doses_received: u32,
    pub required_doses: u32,
    pub needs_more_doses: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_missing_age_and_gender_per_field() {
        let form = IntakeForm::default();
        let errors = form.validate().expect_err("empty form rejected");
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| e.field == FormField::Age && e.message == "Age is required"));
        assert!(errors
            .iter()
            .any(|e| e.field == FormField::Gender && e.message == "Gender is required"));
    }

    #[test]
    fn validate_rejects_age_above_maximum() {
        let form = IntakeForm {
            age: Some(121),
            gender: Some(Gender::Other),
            conditions: Vec::new(),
        };
        let errors = form.validate().expect_err("out-of-range age rejected");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Age must be between 0 and 120");
    }

    #[test]
    fn validate_deduplicates_conditions_preserving_order() {
        let form = IntakeForm {
            age: Some(40),
            gender: Some(Gender::Male),
            conditions: vec![
                "diabetes".to_string(),
                "asplenia".to_string(),
                "diabetes".to_string(),
            ],
        };
        let profile = form.validate().expect("valid form");
        assert_eq!(profile.conditions, vec!["diabetes", "asplenia"]);
    }
}
