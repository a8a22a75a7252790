//! The personalized alert returned by the generation capability.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_ACTIONS: usize = 3;
pub const MAX_ACTIONS: usize = 5;
pub const MIN_CONSIDERATIONS: usize = 2;
pub const MAX_CONSIDERATIONS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingLevel {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl fmt::Display for ReadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReadingLevel::Low => "low",
            ReadingLevel::Medium => "medium",
            ReadingLevel::High => "high",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub headline: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub primary_language: String,
    pub secondary_languages: Vec<String>,
    pub reading_level: ReadingLevel,
    pub urgency_level: u8,
    pub headline: String,
    pub body: String,
    pub actions: Vec<String>,
    pub special_considerations: Vec<String>,
    pub translations: BTreeMap<String, Translation>,
}

impl AlertPayload {
    /// Checks the schema rules and repairs what can be repaired.
    ///
    /// Blank list entries are dropped, overlong lists are truncated and secondary
    /// languages without a translation are removed; anything else that breaks the
    /// schema is reported as an error message.
    pub fn validated(mut self) -> Result<AlertPayload, String> {
        if !(1..=5).contains(&self.urgency_level) {
            return Err(format!("urgencyLevel {} outside 1-5", self.urgency_level));
        }
        if self.primary_language.trim().is_empty() {
            return Err("primaryLanguage is empty".to_string());
        }
        if self.headline.trim().is_empty() || self.body.trim().is_empty() {
            return Err("headline and body must not be empty".to_string());
        }

        self.actions.retain(|a| !a.trim().is_empty());
        if self.actions.len() < MIN_ACTIONS {
            return Err(format!(
                "{} actions, expected at least {}",
                self.actions.len(),
                MIN_ACTIONS
            ));
        }
        self.actions.truncate(MAX_ACTIONS);

        self.special_considerations.retain(|c| !c.trim().is_empty());
        if self.special_considerations.len() < MIN_CONSIDERATIONS {
            return Err(format!(
                "{} special considerations, expected at least {}",
                self.special_considerations.len(),
                MIN_CONSIDERATIONS
            ));
        }
        self.special_considerations.truncate(MAX_CONSIDERATIONS);

        if let Some((language, _)) = self
            .translations
            .iter()
            .find(|(_, t)| t.headline.trim().is_empty() || t.body.trim().is_empty())
        {
            return Err(format!("translation for {} is incomplete", language));
        }

        let translations = &self.translations;
        self.secondary_languages
            .retain(|language| translations.contains_key(language.as_str()));

        Ok(self)
    }
}

/// Generic alert used whenever generation cannot produce a usable payload.
pub fn fallback_payload() -> AlertPayload {
    let mut translations = BTreeMap::new();
    translations.insert(
        "Spanish".to_string(),
        Translation {
            headline: "⚠️ Alerta de emergencia: actúe ahora".to_string(),
            body: "Un desastre natural está afectando su zona. Siga las indicaciones de las autoridades locales y evacúe si se lo ordenan. Manténgase informado por los canales de emergencia y tenga listos agua, alimentos y medicamentos.".to_string(),
        },
    );

    AlertPayload {
        primary_language: "English".to_string(),
        secondary_languages: vec!["Spanish".to_string()],
        reading_level: ReadingLevel::Medium,
        urgency_level: 4,
        headline: "⚠️ Emergency Alert: Take Action Now".to_string(),
        body: "A natural disaster is affecting your area. Follow the guidance of local officials and evacuate if you are told to. Stay informed through emergency broadcasts and keep water, food, and medications ready to go.".to_string(),
        actions: vec![
            "Monitor local news and emergency alerts".to_string(),
            "Get your emergency kit ready".to_string(),
            "Follow evacuation orders as soon as they are issued".to_string(),
            "Stay away from windows and other hazards".to_string(),
            "Keep your phone charged and limit non-emergency calls".to_string(),
        ],
        special_considerations: vec![
            "People with limited mobility should arrange transportation help now".to_string(),
            "Families with children should pack comfort items and stay calm together".to_string(),
            "Anyone with medical needs should secure medications and equipment".to_string(),
        ],
        translations,
    }
}
