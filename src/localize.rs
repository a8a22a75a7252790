//! Location-keyed language overrides applied after generation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::alert::{AlertPayload, Translation};
use crate::TARGET_ALERT;

/// Forces `language` as the only secondary language for `location_code`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageOverride {
    pub location_code: String,
    pub language: String,
}

impl LanguageOverride {
    pub fn new(location_code: &str, language: &str) -> Self {
        LanguageOverride {
            location_code: location_code.to_string(),
            language: language.to_string(),
        }
    }
}

impl FromStr for LanguageOverride {
    type Err = String;

    /// Parses `CODE:Language`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((code, language)) if !code.trim().is_empty() && !language.trim().is_empty() => {
                Ok(LanguageOverride::new(code.trim(), language.trim()))
            }
            _ => Err(format!("expected CODE:Language, got {:?}", s)),
        }
    }
}

impl fmt::Display for LanguageOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location_code, self.language)
    }
}

/// Westwood reads Persian, East Los Angeles reads Spanish.
pub fn default_overrides() -> Vec<LanguageOverride> {
    vec![
        LanguageOverride::new("90024", "Persian"),
        LanguageOverride::new("90022", "Spanish"),
    ]
}

/// Applies the first override matching `location_code`; otherwise returns the payload unchanged.
///
/// A matched payload keeps exactly one translation. When the generated reply has
/// none for the forced language, the top-level headline and body stand in.
pub fn localize(
    mut payload: AlertPayload,
    location_code: &str,
    overrides: &[LanguageOverride],
) -> AlertPayload {
    let Some(rule) = overrides
        .iter()
        .find(|rule| rule.location_code == location_code)
    else {
        return payload;
    };

    let translation = payload
        .translations
        .remove(&rule.language)
        .unwrap_or_else(|| {
            debug!(target: TARGET_ALERT, "no {} translation for {}, using top-level text", rule.language, location_code);
            Translation {
                headline: payload.headline.clone(),
                body: payload.body.clone(),
            }
        });

    payload.secondary_languages = vec![rule.language.clone()];
    payload.translations = BTreeMap::from([(rule.language.clone(), translation)]);
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::fallback_payload;

    fn multilingual() -> AlertPayload {
        let mut payload = fallback_payload();
        payload.secondary_languages = vec!["Spanish".into(), "Chinese".into(), "Persian".into()];
        for language in ["Chinese", "Persian"] {
            payload.translations.insert(
                language.to_string(),
                Translation {
                    headline: format!("{} headline", language),
                    body: format!("{} body", language),
                },
            );
        }
        payload
    }

    #[test]
    fn test_persian_override() {
        let payload = localize(multilingual(), "90024", &default_overrides());
        assert_eq!(payload.secondary_languages, vec!["Persian".to_string()]);
        assert_eq!(payload.translations.len(), 1);
        assert_eq!(payload.translations["Persian"].headline, "Persian headline");
    }

    #[test]
    fn test_spanish_override() {
        let payload = localize(multilingual(), "90022", &default_overrides());
        assert_eq!(payload.secondary_languages, vec!["Spanish".to_string()]);
        assert_eq!(payload.translations.keys().collect::<Vec<_>>(), vec!["Spanish"]);
    }

    #[test]
    fn test_missing_translation_uses_top_level_text() {
        let payload = fallback_payload();
        let localized = localize(payload.clone(), "90024", &default_overrides());
        assert_eq!(localized.secondary_languages, vec!["Persian".to_string()]);
        assert_eq!(localized.translations.len(), 1);
        assert_eq!(
            localized.translations["Persian"],
            Translation {
                headline: payload.headline.clone(),
                body: payload.body.clone(),
            }
        );
    }

    #[test]
    fn test_other_codes_pass_through() {
        for code in ["90210", "10001", "99999", ""] {
            let payload = multilingual();
            assert_eq!(localize(payload.clone(), code, &default_overrides()), payload);
        }
    }

    #[test]
    fn test_first_matching_override_wins() {
        let overrides = vec![
            LanguageOverride::new("90210", "Hebrew"),
            LanguageOverride::new("90210", "Persian"),
        ];
        let payload = localize(multilingual(), "90210", &overrides);
        assert_eq!(payload.secondary_languages, vec!["Hebrew".to_string()]);
        assert!(payload.translations.contains_key("Hebrew"));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            "90024:Persian".parse::<LanguageOverride>(),
            Ok(LanguageOverride::new("90024", "Persian"))
        );
        assert_eq!(
            " 33139 : Spanish ".parse::<LanguageOverride>(),
            Ok(LanguageOverride::new("33139", "Spanish"))
        );
        assert!("90024".parse::<LanguageOverride>().is_err());
        assert!(":Persian".parse::<LanguageOverride>().is_err());
        assert_eq!(LanguageOverride::new("90024", "Persian").to_string(), "90024:Persian");
    }
}
