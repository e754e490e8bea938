//! Merges age-based and condition-based rule matches into one candidate
//! per vaccine.
//!
//! Resolution is a two-phase pure reduce: the first phase builds age-origin
//! candidates, the second folds condition rules over that map, producing a
//! new merged candidate at every step. Priorities only ever escalate.

use super::domain::{Candidate, ConditionNote, Gender, IntakeProfile, RecommendationOrigin};
use crate::catalog::{VaccineCatalog, VaccineRule};
use std::collections::BTreeMap;

/// Resolve a validated profile against the catalog. Absence of matches is
/// a valid empty result, never an error.
pub fn resolve(catalog: &VaccineCatalog, profile: &IntakeProfile) -> BTreeMap<String, Candidate> {
    let mut candidates = age_candidates(catalog, profile);

    for vaccine in &catalog.vaccines {
        for condition_id in &profile.conditions {
            let Some(rule) = vaccine.condition_rule(condition_id) else {
                continue;
            };

            let note = ConditionNote {
                condition: catalog
                    .condition_label(condition_id)
                    .unwrap_or(condition_id)
                    .to_string(),
                recommendation: rule.recommendation.clone(),
                priority: rule.priority,
            };

            let merged = match candidates.remove(&vaccine.name) {
                Some(existing) => fold_condition(existing, note),
                None => condition_candidate(vaccine, note, profile.gender),
            };
            candidates.insert(vaccine.name.clone(), merged);
        }
    }

    candidates
}

fn age_candidates(
    catalog: &VaccineCatalog,
    profile: &IntakeProfile,
) -> BTreeMap<String, Candidate> {
    catalog
        .vaccines
        .iter()
        .filter_map(|vaccine| {
            let bracket = vaccine.bracket_for(profile.age)?;
            Some((
                vaccine.name.clone(),
                Candidate {
                    vaccine: vaccine.name.clone(),
                    description: vaccine.description.clone(),
                    recommendation: bracket.recommendation.clone(),
                    frequency: vaccine.frequency.clone(),
                    priority: crate::catalog::Priority::Standard,
                    origin: RecommendationOrigin::Age,
                    gender_note: applicable_gender_note(vaccine, profile.gender),
                    condition_notes: Vec::new(),
                },
            ))
        })
        .collect()
}

/// Merge one condition rule into an existing candidate: the note is
/// appended and the priority escalated; everything else carries over.
fn fold_condition(existing: Candidate, note: ConditionNote) -> Candidate {
    let priority = existing.priority.escalate(note.priority);
    let mut condition_notes = existing.condition_notes;
    condition_notes.push(note);
    Candidate {
        priority,
        condition_notes,
        ..existing
    }
}

/// A candidate introduced by a condition rule alone. The condition's
/// recommendation doubles as the headline recommendation text.
fn condition_candidate(vaccine: &VaccineRule, note: ConditionNote, gender: Gender) -> Candidate {
    Candidate {
        vaccine: vaccine.name.clone(),
        description: vaccine.description.clone(),
        recommendation: note.recommendation.clone(),
        frequency: vaccine.frequency.clone(),
        priority: note.priority,
        origin: RecommendationOrigin::Condition,
        gender_note: applicable_gender_note(vaccine, gender),
        condition_notes: vec![note],
    }
}

fn applicable_gender_note(vaccine: &VaccineRule, gender: Gender) -> Option<String> {
    match gender {
        Gender::Female => vaccine.female_note().map(str::to_string),
        Gender::Male | Gender::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Priority;

    fn profile(age: u16, gender: Gender, conditions: &[&str]) -> IntakeProfile {
        IntakeProfile {
            age,
            gender,
            conditions: conditions.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[test]
    fn age_match_produces_standard_priority_candidate() {
        let catalog = VaccineCatalog::standard();
        let candidates = resolve(&catalog, &profile(30, Gender::Male, &[]));

        let flu = candidates.get("Influenza (Flu)").expect("flu candidate");
        assert_eq!(flu.priority, Priority::Standard);
        assert_eq!(flu.origin, RecommendationOrigin::Age);
        assert_eq!(flu.recommendation, "1 dose annually");
        assert!(flu.condition_notes.is_empty());
    }

    #[test]
    fn no_bracket_match_means_no_candidate() {
        let catalog = VaccineCatalog::standard();
        let candidates = resolve(&catalog, &profile(30, Gender::Male, &[]));
        assert!(!candidates.contains_key("Shingles (Zoster)"));
        assert!(!candidates.contains_key("RSV (Respiratory Syncytial Virus)"));
    }

    #[test]
    fn female_gender_note_is_attached_only_for_female() {
        let catalog = VaccineCatalog::standard();
        let tdap = "Tetanus, Diphtheria, Pertussis (Tdap)";

        let for_female = resolve(&catalog, &profile(30, Gender::Female, &[]));
        assert!(for_female[tdap].gender_note.is_some());

        let for_male = resolve(&catalog, &profile(30, Gender::Male, &[]));
        assert!(for_male[tdap].gender_note.is_none());

        let for_other = resolve(&catalog, &profile(30, Gender::Other, &[]));
        assert!(for_other[tdap].gender_note.is_none());
    }

    #[test]
    fn condition_rule_escalates_existing_age_candidate() {
        let catalog = VaccineCatalog::standard();
        let candidates = resolve(&catalog, &profile(40, Gender::Male, &["asplenia"]));

        let pneumo = candidates.get("Pneumococcal").expect("pneumococcal");
        assert_eq!(pneumo.priority, Priority::High);
        assert_eq!(pneumo.origin, RecommendationOrigin::Age);
        assert_eq!(pneumo.condition_notes.len(), 1);
        assert_eq!(
            pneumo.condition_notes[0].condition,
            "Asplenia (no spleen, or a spleen that does not work well)"
        );
    }

    #[test]
    fn condition_only_candidate_uses_condition_recommendation() {
        let catalog = VaccineCatalog::standard();
        // Age 30 has no shingles bracket; immunocompromise introduces it.
        let candidates = resolve(&catalog, &profile(30, Gender::Male, &["immunocompromised"]));

        let shingles = candidates.get("Shingles (Zoster)").expect("shingles");
        assert_eq!(shingles.origin, RecommendationOrigin::Condition);
        assert_eq!(shingles.priority, Priority::High);
        assert_eq!(
            shingles.recommendation,
            "2 doses recommended for adults 19 or older with weakened immune systems."
        );
        assert_eq!(shingles.condition_notes.len(), 1);
    }

    #[test]
    fn contraindicated_wins_over_later_high() {
        let catalog = VaccineCatalog::standard();
        // MMR: pregnancy is contraindicated; flu stays high for pregnancy.
        let candidates = resolve(
            &catalog,
            &profile(30, Gender::Female, &["pregnancy", "immunocompromised"]),
        );

        let mmr = candidates
            .get("MMR (Measles, Mumps, Rubella)")
            .expect("mmr candidate");
        assert_eq!(mmr.priority, Priority::Contraindicated);
        assert_eq!(mmr.condition_notes.len(), 2);
    }

    #[test]
    fn empty_conditions_reproduce_age_only_set() {
        let catalog = VaccineCatalog::standard();
        let base = resolve(&catalog, &profile(65, Gender::Male, &[]));
        assert!(base
            .values()
            .all(|candidate| candidate.origin == RecommendationOrigin::Age
                && candidate.priority == Priority::Standard
                && candidate.condition_notes.is_empty()));
    }
}
