//! The intake session: one immutable value holding the active stage and
//! all session-derived data, advanced by pure transition methods that
//! consume the session and return the next one. Backward navigation never
//! discards user-entered data; `reset` discards everything.

use super::domain::{ed_available, IntakeError, IntakeStage, Preference, PreferenceSummary};
use crate::catalog::VaccineCatalog;
use crate::engine::{
    filter_history, rank, resolve, Candidate, FinalRecommendation, HistoryEntry, IntakeForm,
};
use crate::locations::PostalCode;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct IntakeSession {
    stage: IntakeStage,
    form: IntakeForm,
    candidates: Vec<Candidate>,
    history: BTreeMap<String, HistoryEntry>,
    recommendations: Vec<FinalRecommendation>,
    preferences: BTreeMap<String, Preference>,
    provider_alerted: bool,
    pending_postal: Option<PostalCode>,
}

/// Result of submitting the vaccine-request stage: the advanced session,
/// the preference tally, and the ED-available subset of wanted vaccines
/// (non-empty exactly when the provider-alert stage was entered).
#[derive(Debug, Clone)]
pub struct PreferenceOutcome {
    pub session: IntakeSession,
    pub summary: PreferenceSummary,
    pub ed_requested: Vec<String>,
}

impl IntakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> IntakeStage {
        self.stage
    }

    pub fn form(&self) -> &IntakeForm {
        &self.form
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn history(&self) -> &BTreeMap<String, HistoryEntry> {
        &self.history
    }

    pub fn recommendations(&self) -> &[FinalRecommendation] {
        &self.recommendations
    }

    pub fn preferences(&self) -> &BTreeMap<String, Preference> {
        &self.preferences
    }

    pub fn provider_alerted(&self) -> bool {
        self.provider_alerted
    }

    pub fn pending_postal(&self) -> Option<&PostalCode> {
        self.pending_postal.as_ref()
    }

    /// Wanted vaccines in recommendation display order.
    pub fn wanted_vaccines(&self) -> Vec<String> {
        self.recommendations
            .iter()
            .filter(|rec| self.preferences.get(&rec.vaccine) == Some(&Preference::Want))
            .map(|rec| rec.vaccine.clone())
            .collect()
    }

    /// `form -> history`: validate, resolve, rank, and seed default history
    /// entries for every candidate. Downstream data from a previous pass
    /// through the workflow is discarded; the form values persist.
    pub fn submit_form(
        self,
        catalog: &VaccineCatalog,
        form: IntakeForm,
    ) -> Result<Self, IntakeError> {
        if self.stage != IntakeStage::Form {
            return Err(IntakeError::InvalidStage {
                action: "form submission",
                stage: self.stage,
            });
        }

        let profile = form.validate().map_err(IntakeError::Validation)?;
        let candidates = rank(resolve(catalog, &profile));
        let history = candidates
            .iter()
            .map(|candidate| (candidate.vaccine.clone(), HistoryEntry::default()))
            .collect();

        Ok(Self {
            stage: IntakeStage::History,
            form,
            candidates,
            history,
            recommendations: Vec::new(),
            preferences: BTreeMap::new(),
            provider_alerted: false,
            pending_postal: None,
        })
    }

    /// `history -> recommendations`: merge the reported entries over the
    /// defaults (entries for unknown vaccines are ignored) and run the
    /// history filter. An empty final list still advances.
    pub fn confirm_history(
        self,
        entries: BTreeMap<String, HistoryEntry>,
    ) -> Result<Self, IntakeError> {
        if self.stage != IntakeStage::History {
            return Err(IntakeError::InvalidStage {
                action: "history confirmation",
                stage: self.stage,
            });
        }

        let Self {
            form,
            candidates,
            mut history,
            preferences,
            provider_alerted,
            pending_postal,
            ..
        } = self;
        for (vaccine, entry) in entries {
            if history.contains_key(&vaccine) {
                history.insert(vaccine, entry);
            }
        }

        let recommendations = filter_history(&candidates, &history);

        Ok(Self {
            stage: IntakeStage::Recommendations,
            form,
            candidates,
            history,
            recommendations,
            preferences,
            provider_alerted,
            pending_postal,
        })
    }

    /// `recommendations -> vaccine-request`: every final recommendation
    /// gets a preference slot, unset unless a previous pass already
    /// captured one for the same vaccine.
    pub fn begin_preferences(self) -> Result<Self, IntakeError> {
        if self.stage != IntakeStage::Recommendations {
            return Err(IntakeError::InvalidStage {
                action: "preference capture",
                stage: self.stage,
            });
        }

        let preferences = self
            .recommendations
            .iter()
            .map(|rec| {
                let existing = self
                    .preferences
                    .get(&rec.vaccine)
                    .copied()
                    .unwrap_or(Preference::Unset);
                (rec.vaccine.clone(), existing)
            })
            .collect();

        Ok(Self {
            stage: IntakeStage::VaccineRequest,
            preferences,
            ..self
        })
    }

    pub fn set_preference(
        self,
        vaccine: &str,
        preference: Preference,
    ) -> Result<Self, IntakeError> {
        if self.stage != IntakeStage::VaccineRequest {
            return Err(IntakeError::InvalidStage {
                action: "preference selection",
                stage: self.stage,
            });
        }
        if !self.preferences.contains_key(vaccine) {
            return Err(IntakeError::UnknownVaccine(vaccine.to_string()));
        }

        let mut session = self;
        session
            .preferences
            .insert(vaccine.to_string(), preference);
        Ok(session)
    }

    /// `vaccine-request -> provider-alert | location-info`: guarded on
    /// every preference being set. The provider-alert branch is taken
    /// exactly when a wanted vaccine is ED-available.
    pub fn submit_preferences(self) -> Result<PreferenceOutcome, IntakeError> {
        if self.stage != IntakeStage::VaccineRequest {
            return Err(IntakeError::InvalidStage {
                action: "preference submission",
                stage: self.stage,
            });
        }

        let missing: Vec<String> = self
            .recommendations
            .iter()
            .filter(|rec| self.preferences.get(&rec.vaccine) == Some(&Preference::Unset))
            .map(|rec| rec.vaccine.clone())
            .collect();
        if !missing.is_empty() {
            return Err(IntakeError::PreferencesIncomplete { missing });
        }

        let mut summary = PreferenceSummary::default();
        for rec in &self.recommendations {
            match self.preferences.get(&rec.vaccine) {
                Some(Preference::Want) => summary.wanted.push(rec.vaccine.clone()),
                Some(Preference::Unsure) => summary.unsure.push(rec.vaccine.clone()),
                Some(Preference::No) => summary.declined.push(rec.vaccine.clone()),
                _ => {}
            }
        }

        let ed_requested: Vec<String> = summary
            .wanted
            .iter()
            .filter(|vaccine| ed_available(vaccine))
            .cloned()
            .collect();
        let provider_alerted = !ed_requested.is_empty();

        let session = Self {
            stage: if provider_alerted {
                IntakeStage::ProviderAlert
            } else {
                IntakeStage::LocationInfo
            },
            provider_alerted,
            ..self
        };

        Ok(PreferenceOutcome {
            session,
            summary,
            ed_requested,
        })
    }

    /// `provider-alert -> location-info`, unconditional.
    pub fn acknowledge_provider_alert(self) -> Result<Self, IntakeError> {
        if self.stage != IntakeStage::ProviderAlert {
            return Err(IntakeError::InvalidStage {
                action: "provider-alert acknowledgement",
                stage: self.stage,
            });
        }

        Ok(Self {
            stage: IntakeStage::LocationInfo,
            ..self
        })
    }

    /// Backward navigation. Where the session returns to from
    /// `location-info` depends on whether the provider-alert stage was
    /// entered on the way in. Nothing is discarded.
    pub fn back(self) -> Result<Self, IntakeError> {
        let stage = match self.stage {
            IntakeStage::History => IntakeStage::Form,
            IntakeStage::VaccineRequest => IntakeStage::Recommendations,
            IntakeStage::ProviderAlert => IntakeStage::VaccineRequest,
            IntakeStage::LocationInfo => {
                if self.provider_alerted {
                    IntakeStage::ProviderAlert
                } else {
                    IntakeStage::VaccineRequest
                }
            }
            IntakeStage::Form | IntakeStage::Recommendations => {
                return Err(IntakeError::InvalidStage {
                    action: "backward navigation",
                    stage: self.stage,
                })
            }
        };

        Ok(Self { stage, ..self })
    }

    /// Available from any stage: back to a fresh form, all session-derived
    /// data discarded. The catalog is untouched.
    pub fn reset(self) -> Self {
        Self::new()
    }

    /// Record the postal code of an in-flight nearby lookup. A later
    /// submission supersedes this one; completed lookups compare against
    /// the recorded value and discard stale responses.
    pub fn record_location_query(self, postal: PostalCode) -> Result<Self, IntakeError> {
        if self.stage != IntakeStage::LocationInfo {
            return Err(IntakeError::InvalidStage {
                action: "location lookup",
                stage: self.stage,
            });
        }

        Ok(Self {
            pending_postal: Some(postal),
            ..self
        })
    }
}
