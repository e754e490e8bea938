//! Built-in rule dataset derived from the CDC adult immunization schedules
//! by age and by medical condition. Wording matters: the dose-requirement
//! parser reads these recommendation strings.

use super::{AgeBracket, ConditionRule, GenderNotes, MedicalCondition, Priority, VaccineRule};
use std::collections::BTreeMap;

fn bracket(min: u16, max: u16, recommendation: &str) -> AgeBracket {
    AgeBracket {
        min,
        max,
        recommendation: recommendation.to_string(),
    }
}

fn rule(recommendation: &str, priority: Priority) -> ConditionRule {
    ConditionRule {
        recommendation: recommendation.to_string(),
        priority,
    }
}

fn condition(id: &str, label: &str) -> MedicalCondition {
    MedicalCondition {
        id: id.to_string(),
        label: label.to_string(),
    }
}

fn female_note(note: &str) -> Option<GenderNotes> {
    Some(GenderNotes {
        female: Some(note.to_string()),
    })
}

pub(super) fn standard_medical_conditions() -> Vec<MedicalCondition> {
    vec![
        condition("pregnancy", "Pregnancy"),
        condition("diabetes", "Diabetes (Type 1 or Type 2)"),
        condition("heart_disease", "Heart Disease"),
        condition(
            "lung_disease",
            "Chronic Lung Disease (including Asthma and COPD)",
        ),
        condition("kidney_disease", "Chronic Kidney Disease"),
        condition("liver_disease", "Chronic Liver Disease"),
        condition("asplenia", "Asplenia (no spleen, or a spleen that does not work well)"),
        condition("immunocompromised", "Weakened Immune System"),
        condition("smoking", "Cigarette Smoking"),
    ]
}

pub(super) fn standard_vaccine_rules() -> Vec<VaccineRule> {
    vec![
        VaccineRule {
            name: "COVID-19".to_string(),
            description: "Protects against severe illness from SARS-CoV-2 infection."
                .to_string(),
            frequency: "1 or more doses of updated vaccine each year".to_string(),
            age_groups: vec![bracket(18, 120, "1 or more doses of updated vaccine")],
            gender_notes: None,
            medical_conditions: BTreeMap::from([
                (
                    "immunocompromised".to_string(),
                    rule(
                        "Additional doses of updated vaccine recommended; timing depends on the degree of immunosuppression.",
                        Priority::High,
                    ),
                ),
                (
                    "pregnancy".to_string(),
                    rule(
                        "Updated vaccine recommended during pregnancy.",
                        Priority::High,
                    ),
                ),
                (
                    "heart_disease".to_string(),
                    rule(
                        "Stay up to date; cardiovascular disease raises the risk of severe COVID-19.",
                        Priority::High,
                    ),
                ),
            ]),
        },
        VaccineRule {
            name: "Influenza (Flu)".to_string(),
            description: "Protects against seasonal influenza viruses.".to_string(),
            frequency: "Annually".to_string(),
            age_groups: vec![
                bracket(18, 49, "1 dose annually"),
                bracket(50, 64, "1 dose annually"),
                bracket(
                    65,
                    120,
                    "1 dose annually; high-dose or adjuvanted formulations preferred",
                ),
            ],
            gender_notes: None,
            medical_conditions: BTreeMap::from([
                (
                    "heart_disease".to_string(),
                    rule(
                        "1 dose annually; avoid live attenuated influenza vaccine (LAIV).",
                        Priority::High,
                    ),
                ),
                (
                    "diabetes".to_string(),
                    rule(
                        "1 dose annually; avoid live attenuated influenza vaccine (LAIV).",
                        Priority::High,
                    ),
                ),
                (
                    "lung_disease".to_string(),
                    rule(
                        "1 dose annually; inactivated or recombinant vaccine only.",
                        Priority::High,
                    ),
                ),
                (
                    "pregnancy".to_string(),
                    rule(
                        "1 dose annually during pregnancy; inactivated or recombinant vaccine only.",
                        Priority::High,
                    ),
                ),
                (
                    "immunocompromised".to_string(),
                    rule(
                        "1 dose annually; live attenuated influenza vaccine is contraindicated.",
                        Priority::Caution,
                    ),
                ),
            ]),
        },
        VaccineRule {
            name: "Tetanus, Diphtheria, Pertussis (Tdap)".to_string(),
            description: "Protects against tetanus, diphtheria, and whooping cough."
                .to_string(),
            frequency: "Booster every 10 years".to_string(),
            age_groups: vec![bracket(
                18,
                120,
                "1 dose Tdap, then a Td or Tdap booster every 10 years",
            )],
            gender_notes: female_note(
                "One dose of Tdap is recommended during each pregnancy, preferably during weeks 27 through 36.",
            ),
            medical_conditions: BTreeMap::from([(
                "pregnancy".to_string(),
                rule(
                    "1 dose during each pregnancy, preferably during the early part of weeks 27 through 36.",
                    Priority::High,
                ),
            )]),
        },
        VaccineRule {
            name: "Shingles (Zoster)".to_string(),
            description:
                "Protects against shingles and post-herpetic nerve pain (recombinant zoster vaccine)."
                    .to_string(),
            frequency: "2-dose series (lifetime)".to_string(),
            age_groups: vec![bracket(50, 120, "2 doses initially, 2 to 6 months apart")],
            gender_notes: None,
            medical_conditions: BTreeMap::from([(
                "immunocompromised".to_string(),
                rule(
                    "2 doses recommended for adults 19 or older with weakened immune systems.",
                    Priority::High,
                ),
            )]),
        },
        VaccineRule {
            name: "Pneumococcal".to_string(),
            description:
                "Protects against pneumococcal disease, including pneumonia and meningitis."
                    .to_string(),
            frequency: "1 or more doses depending on vaccine history".to_string(),
            age_groups: vec![
                bracket(
                    19,
                    64,
                    "1 dose of PCV20 or PCV15 if you have risk conditions; discuss with your provider",
                ),
                bracket(65, 120, "1 dose of PCV20, or PCV15 followed by PPSV23"),
            ],
            gender_notes: None,
            medical_conditions: BTreeMap::from([
                (
                    "asplenia".to_string(),
                    rule(
                        "1 dose of PCV20 strongly recommended; additional doses may apply without a working spleen.",
                        Priority::High,
                    ),
                ),
                (
                    "diabetes".to_string(),
                    rule(
                        "1 dose of PCV20 or PCV15 recommended for adults 19 through 64 with diabetes.",
                        Priority::High,
                    ),
                ),
                (
                    "kidney_disease".to_string(),
                    rule(
                        "1 dose recommended for chronic kidney disease.",
                        Priority::High,
                    ),
                ),
                (
                    "liver_disease".to_string(),
                    rule(
                        "1 dose recommended for chronic liver disease.",
                        Priority::High,
                    ),
                ),
                (
                    "smoking".to_string(),
                    rule(
                        "Adults 19 through 64 who smoke cigarettes should complete pneumococcal vaccination.",
                        Priority::High,
                    ),
                ),
            ]),
        },
        VaccineRule {
            name: "Hepatitis B".to_string(),
            description: "Protects against hepatitis B virus infection of the liver."
                .to_string(),
            frequency: "2, 3, or 4 doses depending on vaccine".to_string(),
            age_groups: vec![
                bracket(18, 59, "2, 3, or 4 doses depending on vaccine or condition"),
                bracket(
                    60,
                    120,
                    "2, 3, or 4 doses based on risk; discuss with your provider",
                ),
            ],
            gender_notes: None,
            medical_conditions: BTreeMap::from([
                (
                    "diabetes".to_string(),
                    rule(
                        "Vaccination recommended for adults with diabetes younger than 60.",
                        Priority::High,
                    ),
                ),
                (
                    "liver_disease".to_string(),
                    rule(
                        "Vaccination recommended for chronic liver disease.",
                        Priority::High,
                    ),
                ),
                (
                    "kidney_disease".to_string(),
                    rule(
                        "Vaccination recommended; dialysis patients need the higher-dose schedule.",
                        Priority::High,
                    ),
                ),
            ]),
        },
        VaccineRule {
            name: "MMR (Measles, Mumps, Rubella)".to_string(),
            description: "Protects against measles, mumps, and rubella (live vaccine)."
                .to_string(),
            frequency: "1 or 2 doses (lifetime)".to_string(),
            age_groups: vec![bracket(
                18,
                67,
                "1 or 2 doses if born in 1957 or later without evidence of immunity",
            )],
            gender_notes: female_note(
                "Verify rubella immunity before a planned pregnancy; MMR must not be given during pregnancy.",
            ),
            medical_conditions: BTreeMap::from([
                (
                    "pregnancy".to_string(),
                    rule(
                        "Live vaccine; do not administer during pregnancy.",
                        Priority::Contraindicated,
                    ),
                ),
                (
                    "immunocompromised".to_string(),
                    rule(
                        "Live vaccine; contraindicated with significant immunosuppression.",
                        Priority::Contraindicated,
                    ),
                ),
            ]),
        },
        VaccineRule {
            name: "Varicella (Chickenpox)".to_string(),
            description: "Protects against chickenpox (live vaccine).".to_string(),
            frequency: "2 doses (lifetime)".to_string(),
            age_groups: vec![bracket(18, 44, "2 doses if no evidence of immunity")],
            gender_notes: female_note("Avoid pregnancy for 1 month after each dose."),
            medical_conditions: BTreeMap::from([
                (
                    "pregnancy".to_string(),
                    rule(
                        "Live vaccine; do not administer during pregnancy.",
                        Priority::Contraindicated,
                    ),
                ),
                (
                    "immunocompromised".to_string(),
                    rule(
                        "Live vaccine; contraindicated with significant immunosuppression.",
                        Priority::Contraindicated,
                    ),
                ),
            ]),
        },
        VaccineRule {
            name: "HPV (Human Papillomavirus)".to_string(),
            description:
                "Protects against HPV types that cause most cervical and several other cancers."
                    .to_string(),
            frequency: "2 or 3 dose series (lifetime)".to_string(),
            age_groups: vec![
                bracket(18, 26, "2 or 3 doses depending on age at first dose"),
                bracket(
                    27,
                    45,
                    "Shared clinical decision-making; 3 doses if vaccination is chosen",
                ),
            ],
            gender_notes: female_note(
                "HPV vaccination is not recommended during pregnancy.",
            ),
            medical_conditions: BTreeMap::from([(
                "immunocompromised".to_string(),
                rule(
                    "3 doses recommended through age 26 regardless of age at first dose.",
                    Priority::High,
                ),
            )]),
        },
        VaccineRule {
            name: "RSV (Respiratory Syncytial Virus)".to_string(),
            description: "Protects older adults against severe RSV disease.".to_string(),
            frequency: "1 dose (single lifetime dose)".to_string(),
            age_groups: vec![
                bracket(
                    60,
                    74,
                    "1 dose if you have conditions that increase the risk of severe RSV",
                ),
                bracket(75, 120, "1 dose"),
            ],
            gender_notes: None,
            medical_conditions: BTreeMap::from([
                (
                    "heart_disease".to_string(),
                    rule(
                        "1 dose recommended for ages 60 through 74 with chronic heart disease.",
                        Priority::High,
                    ),
                ),
                (
                    "lung_disease".to_string(),
                    rule(
                        "1 dose recommended for ages 60 through 74 with chronic lung disease.",
                        Priority::High,
                    ),
                ),
                (
                    "pregnancy".to_string(),
                    rule(
                        "Seasonal maternal dose during weeks 32 through 36 of pregnancy; ask about timing.",
                        Priority::Caution,
                    ),
                ),
            ]),
        },
    ]
}
