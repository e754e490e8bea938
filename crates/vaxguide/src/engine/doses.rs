//! Extracts a required-dose count from free-text recommendation strings.
//!
//! This is a heuristic tightly coupled to the rule source's wording
//! conventions; it lives behind this function so a structured dose-count
//! field can replace it without touching callers. Any mention of
//! "annual"/"annually" resolves to one dose per recurrence cycle, even
//! when a numeric series phrase is also present.

use regex::Regex;
use std::sync::OnceLock;

const DEFAULT_DOSES: u32 = 1;

fn dose_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(?:or more\s*)?doses?\b").expect("dose pattern is valid")
    })
}

/// Required dose count parsed from a recommendation string; always >= 1.
pub fn required_doses(text: &str) -> u32 {
    if text.to_ascii_lowercase().contains("annual") {
        return 1;
    }

    dose_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .filter(|count| *count > 0)
        .unwrap_or(DEFAULT_DOSES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_dose_counts() {
        assert_eq!(required_doses("2 doses initially, 2 to 6 months apart"), 2);
        assert_eq!(required_doses("1 dose"), 1);
        assert_eq!(required_doses("3 doses over 6 months"), 3);
    }

    #[test]
    fn accepts_or_more_phrasing() {
        assert_eq!(required_doses("1 or more doses of updated vaccine"), 1);
        assert_eq!(required_doses("2 or more doses depending on risk"), 2);
    }

    #[test]
    fn annual_wording_always_means_one_dose_per_cycle() {
        assert_eq!(required_doses("1 dose annually"), 1);
        assert_eq!(required_doses("Annually"), 1);
        assert_eq!(required_doses("ANNUAL booster recommended"), 1);
        // Annual wording wins even next to a multi-dose series phrase.
        assert_eq!(required_doses("2 doses initially, then 1 dose annually"), 1);
    }

    #[test]
    fn unparseable_text_defaults_to_one() {
        assert_eq!(required_doses("Discuss with your provider"), 1);
        assert_eq!(required_doses(""), 1);
        assert_eq!(required_doses("dose counts vary"), 1);
    }

    #[test]
    fn first_numeric_dose_phrase_wins() {
        assert_eq!(
            required_doses("2, 3, or 4 doses depending on vaccine or condition"),
            4
        );
        assert_eq!(required_doses("2 doses now, 3 doses later"), 2);
    }
}
