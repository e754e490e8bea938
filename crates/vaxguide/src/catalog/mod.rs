//! The vaccine rule source: an immutable catalog of vaccines with
//! age-bracketed recommendations, per-condition rules, and gender notes,
//! plus the selectable medical-condition list.
//!
//! A built-in dataset derived from the CDC adult immunization schedules is
//! available through [`VaccineCatalog::standard`]; deployments may instead
//! load a JSON document with the same shape via [`VaccineCatalog::from_path`].

mod standard;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Severity/urgency classification attached to a recommendation.
///
/// Two orderings matter and they are not the same: `display_rank` drives the
/// result listing (high first, contraindicated last), while `severity`
/// drives escalation when multiple condition rules touch one vaccine
/// (escalation only ever moves up in severity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Standard,
    Caution,
    Contraindicated,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Standard => "standard",
            Self::Caution => "caution",
            Self::Contraindicated => "contraindicated",
        }
    }

    /// Position in the result listing.
    pub const fn display_rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Standard => 1,
            Self::Caution => 2,
            Self::Contraindicated => 3,
        }
    }

    const fn severity(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Caution => 1,
            Self::High => 2,
            Self::Contraindicated => 3,
        }
    }

    /// Merge an incoming condition-rule priority into the current one.
    /// Contraindicated always wins, high overrides standard and caution,
    /// caution overrides standard only. Never lowers.
    pub fn escalate(self, incoming: Priority) -> Priority {
        if incoming.severity() > self.severity() {
            incoming
        } else {
            self
        }
    }
}

/// An inclusive age range with its recommendation wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub min: u16,
    pub max: u16,
    pub recommendation: String,
}

impl AgeBracket {
    pub fn contains(&self, age: u16) -> bool {
        age >= self.min && age <= self.max
    }
}

/// Gender-specific guidance attached to a vaccine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub female: Option<String>,
}

/// Condition-specific recommendation with its priority tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub recommendation: String,
    pub priority: Priority,
}

/// One vaccine's full rule set. `name` is the unique merge key across the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineRule {
    pub name: String,
    pub description: String,
    pub frequency: String,
    pub age_groups: Vec<AgeBracket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_notes: Option<GenderNotes>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub medical_conditions: BTreeMap<String, ConditionRule>,
}

impl VaccineRule {
    /// The unique bracket containing `age`, if any. Brackets are expected
    /// to be non-overlapping within a vaccine; the first match wins.
    pub fn bracket_for(&self, age: u16) -> Option<&AgeBracket> {
        self.age_groups.iter().find(|bracket| bracket.contains(age))
    }

    pub fn condition_rule(&self, condition_id: &str) -> Option<&ConditionRule> {
        self.medical_conditions.get(condition_id)
    }

    /// The female gender note, when the rule defines one.
    pub fn female_note(&self) -> Option<&str> {
        self.gender_notes
            .as_ref()
            .and_then(|notes| notes.female.as_deref())
    }
}

/// A selectable medical condition / indication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalCondition {
    pub id: String,
    pub label: String,
}

/// The loaded rule source. Read-only for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineCatalog {
    pub vaccines: Vec<VaccineRule>,
    pub medical_conditions: Vec<MedicalCondition>,
}

impl VaccineCatalog {
    /// The built-in dataset.
    pub fn standard() -> Self {
        Self {
            vaccines: standard::standard_vaccine_rules(),
            medical_conditions: standard::standard_medical_conditions(),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn vaccine(&self, name: &str) -> Option<&VaccineRule> {
        self.vaccines.iter().find(|rule| rule.name == name)
    }

    pub fn condition_label(&self, condition_id: &str) -> Option<&str> {
        self.medical_conditions
            .iter()
            .find(|condition| condition.id == condition_id)
            .map(|condition| condition.label.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog document: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_unique_vaccine_names() {
        let catalog = VaccineCatalog::standard();
        let mut names: Vec<&str> = catalog
            .vaccines
            .iter()
            .map(|rule| rule.name.as_str())
            .collect();
        names.sort_unstable();
        let len_before = names.len();
        names.dedup();
        assert_eq!(names.len(), len_before, "vaccine names must be unique");
    }

    #[test]
    fn standard_catalog_brackets_do_not_overlap() {
        let catalog = VaccineCatalog::standard();
        for rule in &catalog.vaccines {
            for age in 0..=120u16 {
                let matching = rule
                    .age_groups
                    .iter()
                    .filter(|bracket| bracket.contains(age))
                    .count();
                assert!(
                    matching <= 1,
                    "vaccine {} has overlapping brackets at age {}",
                    rule.name,
                    age
                );
            }
        }
    }

    #[test]
    fn standard_catalog_condition_rules_reference_known_conditions() {
        let catalog = VaccineCatalog::standard();
        for rule in &catalog.vaccines {
            for condition_id in rule.medical_conditions.keys() {
                assert!(
                    catalog.condition_label(condition_id).is_some(),
                    "vaccine {} references unknown condition {}",
                    rule.name,
                    condition_id
                );
            }
        }
    }

    #[test]
    fn escalation_never_lowers_priority() {
        assert_eq!(
            Priority::Contraindicated.escalate(Priority::High),
            Priority::Contraindicated
        );
        assert_eq!(Priority::Caution.escalate(Priority::High), Priority::High);
        assert_eq!(Priority::High.escalate(Priority::Caution), Priority::High);
        assert_eq!(
            Priority::Standard.escalate(Priority::Caution),
            Priority::Caution
        );
        assert_eq!(
            Priority::Standard.escalate(Priority::Standard),
            Priority::Standard
        );
    }

    #[test]
    fn catalog_round_trips_through_json() {
        let catalog = VaccineCatalog::standard();
        let json = serde_json::to_string(&catalog).expect("serializes");
        let reloaded =
            VaccineCatalog::from_reader(json.as_bytes()).expect("parses back");
        assert_eq!(reloaded.vaccines.len(), catalog.vaccines.len());
        assert_eq!(
            reloaded.medical_conditions.len(),
            catalog.medical_conditions.len()
        );
    }
}
