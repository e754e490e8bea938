//! Deterministic display ordering for resolved candidates.
//!
//! The order is policy, not incidental: priority tier first (high,
//! standard, caution, contraindicated), then COVID-19 and Influenza (Flu)
//! pinned ahead of their tier peers, then case-sensitive name order.

use super::domain::Candidate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const PINNED_NAMES: [&str; 2] = ["COVID-19", "Influenza (Flu)"];

/// Sort resolved candidates into display order.
pub fn rank(candidates: BTreeMap<String, Candidate>) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates.into_values().collect();
    ranked.sort_by(display_order);
    ranked
}

/// Total order over candidates; every pair compares, ties are impossible
/// because vaccine names are unique within a pass.
pub fn display_order(a: &Candidate, b: &Candidate) -> Ordering {
    a.priority
        .display_rank()
        .cmp(&b.priority.display_rank())
        .then_with(|| pin_rank(&a.vaccine).cmp(&pin_rank(&b.vaccine)))
        .then_with(|| a.vaccine.cmp(&b.vaccine))
}

fn pin_rank(name: &str) -> usize {
    PINNED_NAMES
        .iter()
        .position(|pinned| *pinned == name)
        .unwrap_or(PINNED_NAMES.len())
}
