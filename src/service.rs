//! End-to-end alert construction for one postal code.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::alert::AlertPayload;
use crate::llm::{generate_alert, TextGenerator};
use crate::localize::{localize, LanguageOverride};
use crate::location::{is_postal_code, ConfigError, LocationDirectory};
use crate::prompt::alert_prompt;
use crate::scenario::{generate_scenario, ScenarioSummary};
use crate::TARGET_ALERT;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("location code {0:?} must be exactly 5 digits")]
    InvalidFormat(String),

    #[error("location code {code} is not in the directory")]
    UnknownLocation { code: String, available: Vec<String> },
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub zip_code: String,
    pub neighborhood: String,
}

/// Wire body of a generated alert.
#[derive(Clone, Debug, Serialize)]
pub struct AlertResponse {
    #[serde(rename = "disaster")]
    pub scenario: ScenarioSummary,
    pub alert: AlertPayload,
    pub location: LocationSummary,
}

/// Shared, read-only state needed to build alerts.
#[derive(Clone)]
pub struct AlertService {
    directory: Arc<LocationDirectory>,
    generator: Arc<dyn TextGenerator>,
    overrides: Arc<Vec<LanguageOverride>>,
}

impl AlertService {
    /// Validates the directory so every profile can yield a scenario.
    pub fn new(
        directory: LocationDirectory,
        generator: Arc<dyn TextGenerator>,
        overrides: Vec<LanguageOverride>,
    ) -> Result<Self, ConfigError> {
        directory.validate()?;
        Ok(AlertService {
            directory: Arc::new(directory),
            generator,
            overrides: Arc::new(overrides),
        })
    }

    pub fn directory(&self) -> &LocationDirectory {
        &self.directory
    }

    /// Generates a scenario for the location and renders it as a localized alert.
    ///
    /// Generation failures never surface here; they degrade to the fallback alert.
    pub async fn build_alert(&self, location_code: &str) -> Result<AlertResponse, AlertError> {
        if !is_postal_code(location_code) {
            return Err(AlertError::InvalidFormat(location_code.to_string()));
        }
        let profile =
            self.directory
                .get(location_code)
                .ok_or_else(|| AlertError::UnknownLocation {
                    code: location_code.to_string(),
                    available: self.directory.codes(),
                })?;

        let scenario = generate_scenario(profile);
        info!(target: TARGET_ALERT, "ZIP {}: generated {} (severity {})", location_code, scenario.hazard_type, scenario.severity);

        let prompt = alert_prompt(&scenario, profile, location_code);
        let alert = generate_alert(self.generator.as_ref(), &prompt).await;
        let alert = localize(alert, location_code, &self.overrides);

        info!(target: TARGET_ALERT, "ZIP {}: alert ready ({} translations)", location_code, alert.translations.len());

        Ok(AlertResponse {
            scenario: scenario.summary(),
            alert,
            location: LocationSummary {
                zip_code: location_code.to_string(),
                neighborhood: profile.neighborhood.clone(),
            },
        })
    }
}
