//! Filters ranked candidates against self-reported vaccination history.

use super::domain::{Candidate, FinalRecommendation, HistoryEntry};
use super::doses::required_doses;
use std::collections::BTreeMap;

/// Produce the final recommendation list: fully satisfied vaccines drop
/// out, partially satisfied ones are annotated, everything else passes
/// through. Input ranking order is preserved among survivors.
pub fn filter_history(
    ranked: &[Candidate],
    history: &BTreeMap<String, HistoryEntry>,
) -> Vec<FinalRecommendation> {
    ranked
        .iter()
        .filter_map(|candidate| {
            let required = required_doses(&candidate.recommendation);
            match history.get(&candidate.vaccine) {
                Some(entry) if entry.received => {
                    if entry.doses_received >= required {
                        return None;
                    }
                    Some(annotate(candidate, required, entry))
                }
                _ => Some(not_previously_received(candidate, required)),
            }
        })
        .collect()
}

fn not_previously_received(candidate: &Candidate, required: u32) -> FinalRecommendation {
    FinalRecommendation {
        vaccine: candidate.vaccine.clone(),
        description: candidate.description.clone(),
        recommendation: candidate.recommendation.clone(),
        frequency: candidate.frequency.clone(),
        priority: candidate.priority,
        origin: candidate.origin,
        gender_note: candidate.gender_note.clone(),
        condition_notes: candidate.condition_notes.clone(),
        previously_received: false,
        last_received_date: None,
        doses_received: 0,
        required_doses: required,
        needs_more_doses: false,
    }
}

fn annotate(candidate: &Candidate, required: u32, entry: &HistoryEntry) -> FinalRecommendation {
    FinalRecommendation {
        vaccine: candidate.vaccine.clone(),
        description: candidate.description.clone(),
        recommendation: candidate.recommendation.clone(),
        frequency: candidate.frequency.clone(),
        priority: candidate.priority,
        origin: candidate.origin,
        gender_note: candidate.gender_note.clone(),
        condition_notes: candidate.condition_notes.clone(),
        previously_received: true,
        last_received_date: entry.last_dose_date,
        doses_received: entry.doses_received,
        required_doses: required,
        needs_more_doses: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Priority;
    use crate::engine::domain::RecommendationOrigin;
    use chrono::NaiveDate;

    fn candidate(name: &str, recommendation: &str) -> Candidate {
        Candidate {
            vaccine: name.to_string(),
            description: String::new(),
            recommendation: recommendation.to_string(),
            frequency: String::new(),
            priority: Priority::Standard,
            origin: RecommendationOrigin::Age,
            gender_note: None,
            condition_notes: Vec::new(),
        }
    }

    fn entry(received: bool, doses: u32) -> HistoryEntry {
        HistoryEntry {
            received,
            last_dose_date: None,
            doses_received: doses,
        }
    }

    #[test]
    fn absent_entry_passes_candidate_through() {
        let ranked = vec![candidate("Shingles (Zoster)", "2 doses initially")];
        let finals = filter_history(&ranked, &BTreeMap::new());
        assert_eq!(finals.len(), 1);
        assert!(!finals[0].previously_received);
        assert!(!finals[0].needs_more_doses);
        assert_eq!(finals[0].required_doses, 2);
        assert_eq!(finals[0].doses_received, 0);
    }

    #[test]
    fn unreceived_entry_ignores_reported_dose_count() {
        let ranked = vec![candidate("Shingles (Zoster)", "2 doses initially")];
        let history = BTreeMap::from([("Shingles (Zoster)".to_string(), entry(false, 5))]);
        let finals = filter_history(&ranked, &history);
        assert_eq!(finals.len(), 1);
        assert!(!finals[0].previously_received);
        assert_eq!(finals[0].doses_received, 0);
    }

    #[test]
    fn fully_satisfied_vaccine_is_dropped() {
        let ranked = vec![candidate("Shingles (Zoster)", "2 doses initially")];
        let history = BTreeMap::from([("Shingles (Zoster)".to_string(), entry(true, 2))]);
        assert!(filter_history(&ranked, &history).is_empty());
    }

    #[test]
    fn partially_satisfied_vaccine_is_annotated() {
        let ranked = vec![candidate("Shingles (Zoster)", "2 doses initially")];
        let date = NaiveDate::from_ymd_opt(2024, 11, 2);
        let history = BTreeMap::from([(
            "Shingles (Zoster)".to_string(),
            HistoryEntry {
                received: true,
                last_dose_date: date,
                doses_received: 1,
            },
        )]);
        let finals = filter_history(&ranked, &history);
        assert_eq!(finals.len(), 1);
        assert!(finals[0].previously_received);
        assert!(finals[0].needs_more_doses);
        assert_eq!(finals[0].doses_received, 1);
        assert_eq!(finals[0].required_doses, 2);
        assert_eq!(finals[0].last_received_date, date);
    }

    #[test]
    fn ranking_order_is_preserved_among_survivors() {
        let ranked = vec![
            candidate("COVID-19", "1 or more doses of updated vaccine"),
            candidate("Influenza (Flu)", "1 dose annually"),
            candidate("Hepatitis B", "2, 3, or 4 doses depending on vaccine"),
        ];
        let history = BTreeMap::from([("Influenza (Flu)".to_string(), entry(true, 1))]);
        let names: Vec<String> = filter_history(&ranked, &history)
            .into_iter()
            .map(|f| f.vaccine)
            .collect();
        assert_eq!(names, vec!["COVID-19", "Hepatitis B"]);
    }

    #[test]
    fn increasing_doses_only_ever_removes() {
        let ranked = vec![candidate("Hepatitis B", "2, 3, or 4 doses depending on vaccine")];
        let mut kept_previously = true;
        for doses in 0..6 {
            let history = BTreeMap::from([("Hepatitis B".to_string(), entry(true, doses))]);
            let kept = !filter_history(&ranked, &history).is_empty();
            assert!(
                kept_previously || !kept,
                "vaccine reappeared at doses_received={doses}"
            );
            kept_previously = kept;
        }
    }
}
