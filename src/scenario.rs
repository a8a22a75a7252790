//! Random disaster scenarios drawn from a location's risk history.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use crate::hazard::{self, HazardType, Severity, Status};
use crate::location::LocationProfile;

/// Cumulative probability of an extreme (5) draw.
const EXTREME_THRESHOLD: f64 = 0.10;
/// Cumulative probability of a severe (4) or worse draw.
const SEVERE_THRESHOLD: f64 = 0.50;

const MIN_DISTANCE_MILES: u8 = 1;
const MAX_DISTANCE_MILES: u8 = 15;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    #[serde(rename = "type")]
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub status: Status,
    pub description: String,
    #[serde(rename = "distance")]
    pub distance_miles: u8,
    pub impact_time: String,
    pub official_actions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// The part of a scenario returned to clients.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    #[serde(rename = "type")]
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub status: Status,
    pub distance: u8,
    pub impact_time: String,
    pub timestamp: DateTime<Utc>,
}

impl ScenarioRecord {
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            hazard_type: self.hazard_type,
            severity: self.severity,
            status: self.status,
            distance: self.distance_miles,
            impact_time: self.impact_time.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Maps one uniform draw in [0, 1) to a severity: 10% extreme, 40% severe, 50% moderate.
pub fn severity_for_roll(roll: f64) -> Severity {
    if roll < EXTREME_THRESHOLD {
        Severity::EXTREME
    } else if roll < SEVERE_THRESHOLD {
        Severity::SEVERE
    } else {
        Severity::MODERATE
    }
}

/// Generates a scenario using the thread-local random source.
pub fn generate_scenario(profile: &LocationProfile) -> ScenarioRecord {
    generate_scenario_with(profile, &mut rand::rng())
}

/// Generates a scenario from the given random source.
///
/// The hazard is drawn uniformly from `historical_risks`, so a type listed twice
/// is twice as likely.
///
/// Panics if `historical_risks` is empty; [`crate::service::AlertService::new`]
/// refuses directories holding such a profile.
pub fn generate_scenario_with<R: Rng>(
    profile: &LocationProfile,
    rng: &mut R,
) -> ScenarioRecord {
    let hazard_type = *profile
        .historical_risks
        .choose(rng)
        .expect("location profile has no historical risks");
    let severity = severity_for_roll(rng.random::<f64>());
    let template = hazard::template(hazard_type, severity);
    let distance_miles = rng.random_range(MIN_DISTANCE_MILES..=MAX_DISTANCE_MILES);

    ScenarioRecord {
        hazard_type,
        severity,
        status: template.status,
        description: template.description.to_string(),
        distance_miles,
        impact_time: template.impact_time.to_string(),
        official_actions: template
            .official_actions
            .iter()
            .map(|a| a.to_string())
            .collect(),
        timestamp: Utc::now(),
    }
}
