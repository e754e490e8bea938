use std::collections::BTreeMap;

use vaxguide::catalog::{Priority, VaccineCatalog};
use vaxguide::engine::{
    filter_history, rank, required_doses, resolve, Gender, HistoryEntry, IntakeForm,
    IntakeProfile, RecommendationOrigin,
};

fn profile(age: u16, gender: Gender, conditions: &[&str]) -> IntakeProfile {
    IntakeProfile {
        age,
        gender,
        conditions: conditions.iter().map(|id| id.to_string()).collect(),
    }
}

#[test]
fn age_recommendation_text_appears_exactly_once_regardless_of_conditions() {
    let catalog = VaccineCatalog::standard();

    let base = resolve(&catalog, &profile(40, Gender::Male, &[]));
    let with_conditions = resolve(
        &catalog,
        &profile(40, Gender::Male, &["diabetes", "asplenia", "smoking"]),
    );

    for (name, candidate) in &base {
        let enriched = with_conditions
            .get(name)
            .expect("age-derived candidate survives condition selection");
        assert_eq!(
            enriched.recommendation, candidate.recommendation,
            "headline recommendation for {name} must stay the age bracket text"
        );
        assert_eq!(
            enriched
                .condition_notes
                .iter()
                .filter(|note| note.recommendation == candidate.recommendation)
                .count(),
            0,
            "age text must not be duplicated into condition notes for {name}"
        );
    }
}

#[test]
fn escalation_is_idempotent_across_repeated_conditions() {
    let catalog = VaccineCatalog::standard();

    // The validated profile deduplicates; resolving the deduplicated set
    // twice must also be stable.
    let form = IntakeForm {
        age: Some(40),
        gender: Some(Gender::Male),
        conditions: vec![
            "asplenia".to_string(),
            "asplenia".to_string(),
            "asplenia".to_string(),
        ],
    };
    let deduped = form.validate().expect("form is valid");
    assert_eq!(deduped.conditions, vec!["asplenia"]);

    let once = resolve(&catalog, &deduped);
    let twice = resolve(&catalog, &deduped);
    assert_eq!(once, twice);

    let pneumo = &once["Pneumococcal"];
    assert_eq!(pneumo.priority, Priority::High);
    assert_eq!(pneumo.condition_notes.len(), 1);
}

#[test]
fn empty_conditions_and_history_round_trip_to_age_only_candidates() {
    let catalog = VaccineCatalog::standard();

    for age in [0u16, 18, 30, 50, 65, 80, 120] {
        let resolved = resolve(&catalog, &profile(age, Gender::Other, &[]));
        let ranked = rank(resolved.clone());
        let finals = filter_history(&ranked, &BTreeMap::new());

        assert_eq!(finals.len(), resolved.len());
        for rec in finals {
            assert_eq!(rec.origin, RecommendationOrigin::Age);
            assert_eq!(rec.priority, Priority::Standard);
            assert!(!rec.previously_received);
            assert!(!rec.needs_more_doses);
        }
    }
}

#[test]
fn scenario_65_year_old_woman_sees_pinned_vaccines_first() {
    let catalog = VaccineCatalog::standard();

    let ranked = rank(resolve(&catalog, &profile(65, Gender::Female, &[])));
    let finals = filter_history(&ranked, &BTreeMap::new());

    assert!(finals.len() >= 2);
    assert_eq!(finals[0].vaccine, "COVID-19");
    assert_eq!(finals[1].vaccine, "Influenza (Flu)");
    assert_eq!(finals[0].priority, Priority::Standard);
    assert_eq!(finals[1].priority, Priority::Standard);

    // The rest of the standard tier follows in name order.
    let tail: Vec<&str> = finals[2..].iter().map(|f| f.vaccine.as_str()).collect();
    let mut sorted = tail.clone();
    sorted.sort_unstable();
    assert_eq!(tail, sorted);
}

#[test]
fn scenario_asplenia_escalates_pneumococcal_with_single_note() {
    let catalog = VaccineCatalog::standard();

    let resolved = resolve(&catalog, &profile(40, Gender::Male, &["asplenia"]));
    let pneumo = resolved.get("Pneumococcal").expect("pneumococcal resolved");

    assert_eq!(pneumo.priority, Priority::High);
    assert_eq!(pneumo.origin, RecommendationOrigin::Age);
    assert_eq!(pneumo.condition_notes.len(), 1);

    // High priority moves it ahead of the pinned standard-tier vaccines.
    let ranked = rank(resolved);
    assert_eq!(ranked[0].vaccine, "Pneumococcal");
}

#[test]
fn scenario_completed_two_dose_series_is_excluded() {
    let catalog = VaccineCatalog::standard();
    let ranked = rank(resolve(&catalog, &profile(65, Gender::Female, &[])));

    let shingles = ranked
        .iter()
        .find(|c| c.vaccine == "Shingles (Zoster)")
        .expect("shingles is age-recommended at 65");
    assert_eq!(required_doses(&shingles.recommendation), 2);

    let history = BTreeMap::from([(
        "Shingles (Zoster)".to_string(),
        HistoryEntry {
            received: true,
            last_dose_date: None,
            doses_received: 2,
        },
    )]);
    let finals = filter_history(&ranked, &history);
    assert!(finals.iter().all(|f| f.vaccine != "Shingles (Zoster)"));
}

#[test]
fn scenario_partial_two_dose_series_needs_more_doses() {
    let catalog = VaccineCatalog::standard();
    let ranked = rank(resolve(&catalog, &profile(65, Gender::Female, &[])));

    let history = BTreeMap::from([(
        "Shingles (Zoster)".to_string(),
        HistoryEntry {
            received: true,
            last_dose_date: None,
            doses_received: 1,
        },
    )]);
    let finals = filter_history(&ranked, &history);

    let shingles = finals
        .iter()
        .find(|f| f.vaccine == "Shingles (Zoster)")
        .expect("partially vaccinated shingles remains");
    assert!(shingles.previously_received);
    assert!(shingles.needs_more_doses);
    assert_eq!(shingles.doses_received, 1);
    assert_eq!(shingles.required_doses, 2);
}

#[test]
fn contraindicated_candidates_sort_last_but_are_reported() {
    let catalog = VaccineCatalog::standard();
    let ranked = rank(resolve(
        &catalog,
        &profile(30, Gender::Female, &["pregnancy"]),
    ));

    let last = ranked.last().expect("candidates resolved");
    assert_eq!(last.priority, Priority::Contraindicated);
    assert!(ranked
        .iter()
        .any(|c| c.vaccine == "MMR (Measles, Mumps, Rubella)"
            && c.priority == Priority::Contraindicated));
}

#[test]
fn history_filtering_is_monotonic_in_doses_received() {
    let catalog = VaccineCatalog::standard();
    let ranked = rank(resolve(&catalog, &profile(65, Gender::Male, &[])));

    for candidate in &ranked {
        let mut seen_drop = false;
        for doses in 0..8u32 {
            let history = BTreeMap::from([(
                candidate.vaccine.clone(),
                HistoryEntry {
                    received: true,
                    last_dose_date: None,
                    doses_received: doses,
                },
            )]);
            let kept = filter_history(&ranked, &history)
                .iter()
                .any(|f| f.vaccine == candidate.vaccine);
            if seen_drop {
                assert!(
                    !kept,
                    "{} reappeared after being satisfied at {} doses",
                    candidate.vaccine, doses
                );
            }
            seen_drop = seen_drop || !kept;
        }
        assert!(
            seen_drop,
            "{} was never satisfied by any dose count",
            candidate.vaccine
        );
    }
}
