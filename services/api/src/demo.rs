use crate::infra::{InMemoryAlertPublisher, InMemorySessionStore};
use clap::Args;
use std::collections::BTreeMap;
use std::sync::Arc;
use vaxguide::catalog::VaccineCatalog;
use vaxguide::engine::{Gender, HistoryEntry, IntakeForm};
use vaxguide::error::AppError;
use vaxguide::intake::{DeliveryMethod, IntakeService, IntakeStage, Preference};
use vaxguide::locations::{LocationError, LocationGateway, PostalCode, Site};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Age to resolve recommendations for
    #[arg(long, default_value_t = 67)]
    pub(crate) age: u16,
    /// Gender (male, female, other)
    #[arg(long, default_value = "female", value_parser = parse_gender)]
    pub(crate) gender: Gender,
    /// Medical condition id to include (repeatable)
    #[arg(long = "condition")]
    pub(crate) conditions: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// Print the catalog as JSON instead of a listing
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        "other" => Ok(Gender::Other),
        other => Err(format!("unknown gender '{other}' (male, female, other)")),
    }
}

/// The demo never reaches out to the network; the location stage reports
/// the gateway as offline.
#[derive(Debug, Default)]
pub(crate) struct OfflineLocationGateway;

#[async_trait::async_trait]
impl LocationGateway for OfflineLocationGateway {
    async fn nearby_sites(&self, _postal: &PostalCode) -> Result<Vec<Site>, LocationError> {
        Err(LocationError::Upstream("offline demo gateway".to_string()))
    }
}

pub(crate) fn run_catalog_listing(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = VaccineCatalog::standard();

    if args.json {
        match serde_json::to_string_pretty(&catalog) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("catalog unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Vaccine catalog ({} vaccines)", catalog.vaccines.len());
    for vaccine in &catalog.vaccines {
        println!("\n{} - {}", vaccine.name, vaccine.frequency);
        println!("  {}", vaccine.description);
        for bracket in &vaccine.age_groups {
            println!(
                "  ages {}-{}: {}",
                bracket.min, bracket.max, bracket.recommendation
            );
        }
        for (condition_id, rule) in &vaccine.medical_conditions {
            println!(
                "  [{}] {}: {}",
                rule.priority.label(),
                condition_id,
                rule.recommendation
            );
        }
    }

    println!("\nSelectable conditions");
    for condition in &catalog.medical_conditions {
        println!("- {} ({})", condition.label, condition.id);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        age,
        gender,
        conditions,
    } = args;

    println!("Vaccine intake workflow demo");

    let sessions = Arc::new(InMemorySessionStore::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let locations = Arc::new(OfflineLocationGateway);
    let service = Arc::new(IntakeService::new(
        VaccineCatalog::standard(),
        sessions,
        alerts.clone(),
        locations,
    ));
    let session_id = "demo";

    let form = IntakeForm {
        age: Some(age),
        gender: Some(gender),
        conditions: conditions.clone(),
    };
    println!(
        "\nIntake form: age {age}, gender {}, conditions {:?}",
        gender.label(),
        conditions
    );

    let candidates = match service.submit_intake(session_id, form) {
        Ok(candidates) => candidates,
        Err(err) => {
            println!("  Form rejected: {err}");
            return Ok(());
        }
    };

    println!("\nCandidates ({})", candidates.len());
    for candidate in &candidates {
        println!(
            "- [{}] {} - {}",
            candidate.priority.label(),
            candidate.vaccine,
            candidate.recommendation
        );
        if let Some(note) = &candidate.gender_note {
            println!("    note: {note}");
        }
        for note in &candidate.condition_notes {
            println!("    {}: {}", note.condition, note.recommendation);
        }
    }

    // Sample history: one annual vaccine already satisfied this cycle and
    // one multi-dose series started but unfinished.
    let mut history = BTreeMap::new();
    history.insert(
        "Influenza (Flu)".to_string(),
        HistoryEntry {
            received: true,
            last_dose_date: None,
            doses_received: 1,
        },
    );
    history.insert(
        "Shingles (Zoster)".to_string(),
        HistoryEntry {
            received: true,
            last_dose_date: None,
            doses_received: 1,
        },
    );

    let recommendations = match service.submit_history(session_id, history) {
        Ok(recommendations) => recommendations,
        Err(err) => {
            println!("  History rejected: {err}");
            return Ok(());
        }
    };

    println!("\nAfter history capture ({} remain)", recommendations.len());
    for rec in &recommendations {
        let doses = if rec.needs_more_doses {
            format!(" ({}/{} doses)", rec.doses_received, rec.required_doses)
        } else {
            String::new()
        };
        println!("- [{}] {}{}", rec.priority.label(), rec.vaccine, doses);
    }

    if let Err(err) = service.advance_to_preferences(session_id) {
        println!("  Unable to open preference capture: {err}");
        return Ok(());
    }

    let mut preferences = BTreeMap::new();
    for rec in &recommendations {
        let preference = if vaxguide::intake::ed_available(&rec.vaccine) {
            Preference::Want
        } else {
            Preference::Unsure
        };
        preferences.insert(rec.vaccine.clone(), preference);
    }

    let result = match service.submit_preferences(session_id, preferences) {
        Ok(result) => result,
        Err(err) => {
            println!("  Preferences rejected: {err}");
            return Ok(());
        }
    };

    println!("\nPreference summary");
    println!("- wanted: {:?}", result.summary.wanted);
    println!("- unsure: {:?}", result.summary.unsure);
    println!("- declined: {:?}", result.summary.declined);
    println!("- next stage: {}", result.stage.label());

    if result.stage == IntakeStage::ProviderAlert {
        for alert in alerts.provider_alerts() {
            println!(
                "  Provider alerted: session {} requested {:?}",
                alert.session_id, alert.ed_vaccines
            );
        }
        if let Err(err) = service.acknowledge_alert(session_id) {
            println!("  Unable to acknowledge alert: {err}");
            return Ok(());
        }
        println!("  Alert acknowledged; moving to location info");
    }

    if let Err(err) = service.select_delivery(session_id, DeliveryMethod::Print) {
        println!("  Delivery dispatch failed: {err}");
        return Ok(());
    }

    for delivery in alerts.deliveries() {
        println!(
            "\nSummary dispatched via {} for {:?}",
            delivery.method.label(),
            delivery.vaccines
        );
    }

    Ok(())
}
