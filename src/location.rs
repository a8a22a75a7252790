//! Read-only demographic reference data keyed by postal code.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::alert::ReadingLevel;
use crate::hazard::HazardType;

/// Allowed drift of a language table away from 100%.
const LANGUAGE_SUM_TOLERANCE: f64 = 5.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read location data from {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse location data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("location code {0:?} is not a 5-digit postal code")]
    BadCode(String),

    #[error("location {code} has no historical risks")]
    NoHistoricalRisks { code: String },

    #[error("location {code} has no languages")]
    NoLanguages { code: String },

    #[error("location {code} has percentage {value} for {key}, expected 0-100")]
    BadPercentage {
        code: String,
        key: String,
        value: f64,
    },

    #[error("location {code} languages sum to {sum:.1}%, expected 100 ± 5")]
    LanguageSum { code: String, sum: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    Low,
    Medium,
    High,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Low => "low",
            EducationLevel::Medium => "medium",
            EducationLevel::High => "high",
        }
    }

    /// Reading level an alert for this community should be written at.
    pub fn reading_level(&self) -> ReadingLevel {
        match self {
            EducationLevel::Low => ReadingLevel::Low,
            EducationLevel::Medium => ReadingLevel::Medium,
            EducationLevel::High => ReadingLevel::High,
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of the population (percent) in each vulnerable group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VulnerablePopulations {
    pub elderly: f64,
    pub children: f64,
    pub disabled: f64,
}

impl VulnerablePopulations {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("elderly", self.elderly),
            ("children", self.children),
            ("disabled", self.disabled),
        ]
        .into_iter()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProfile {
    pub neighborhood: String,
    /// Language name to speaker percentage, in display order.
    pub languages: IndexMap<String, f64>,
    pub median_age: u32,
    pub median_income: u64,
    pub education_level: EducationLevel,
    pub geography: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub vulnerable_populations: VulnerablePopulations,
    pub historical_risks: Vec<HazardType>,
}

impl LocationProfile {
    fn validate(&self, code: &str) -> Result<(), ConfigError> {
        if self.historical_risks.is_empty() {
            return Err(ConfigError::NoHistoricalRisks {
                code: code.to_string(),
            });
        }
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages {
                code: code.to_string(),
            });
        }

        let check = |key: &str, value: f64| {
            if (0.0..=100.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::BadPercentage {
                    code: code.to_string(),
                    key: key.to_string(),
                    value,
                })
            }
        };
        for (language, pct) in &self.languages {
            check(language.as_str(), *pct)?;
        }
        for (group, pct) in self.vulnerable_populations.iter() {
            check(group, pct)?;
        }

        let sum: f64 = self.languages.values().sum();
        if (sum - 100.0).abs() > LANGUAGE_SUM_TOLERANCE {
            return Err(ConfigError::LanguageSum {
                code: code.to_string(),
                sum,
            });
        }
        Ok(())
    }
}

/// Returns true for exactly five ASCII digits.
pub fn is_postal_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Lookup table of location profiles.
#[derive(Clone, Debug)]
pub struct LocationDirectory {
    profiles: BTreeMap<String, LocationProfile>,
}

impl LocationDirectory {
    pub fn from_profiles(profiles: BTreeMap<String, LocationProfile>) -> Self {
        LocationDirectory { profiles }
    }

    /// Loads a JSON object of postal code to profile.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let profiles: BTreeMap<String, LocationProfile> = serde_json::from_str(json)?;
        Ok(LocationDirectory { profiles })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, code: &str) -> Option<&LocationProfile> {
        self.profiles.get(code)
    }

    /// Known postal codes in ascending order.
    pub fn codes(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Checks reference data integrity. Run once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (code, profile) in &self.profiles {
            if !is_postal_code(code) {
                return Err(ConfigError::BadCode(code.clone()));
            }
            profile.validate(code)?;
        }
        Ok(())
    }

    /// The built-in demo locations.
    pub fn builtin() -> Self {
        use EducationLevel::*;
        use HazardType::*;

        let mut profiles = BTreeMap::new();
        let mut add = |code: &str,
                       neighborhood: &str,
                       languages: &[(&str, f64)],
                       median_age: u32,
                       median_income: u64,
                       education_level: EducationLevel,
                       geography: &str,
                       (lat, lng): (f64, f64),
                       (elderly, children, disabled): (f64, f64, f64),
                       historical_risks: &[HazardType]| {
            profiles.insert(
                code.to_string(),
                LocationProfile {
                    neighborhood: neighborhood.to_string(),
                    languages: languages
                        .iter()
                        .map(|(name, pct)| (name.to_string(), *pct))
                        .collect(),
                    median_age,
                    median_income,
                    education_level,
                    geography: geography.to_string(),
                    coordinates: Some(Coordinates { lat, lng }),
                    vulnerable_populations: VulnerablePopulations {
                        elderly,
                        children,
                        disabled,
                    },
                    historical_risks: historical_risks.to_vec(),
                },
            );
        };

        add(
            "90210",
            "Beverly Hills, CA",
            &[
                ("English", 65.2),
                ("Persian", 18.4),
                ("Spanish", 8.3),
                ("Hebrew", 4.1),
                ("Other", 4.0),
            ],
            44,
            87902,
            High,
            "Urban residential area in Los Angeles basin, coastal proximity",
            (34.0901, -118.4065),
            (18.5, 19.2, 8.1),
            &[Wildfire, Earthquake, Flood],
        );
        add(
            "90022",
            "East Los Angeles, CA",
            &[
                ("Spanish", 82.7),
                ("English", 15.1),
                ("Indigenous", 1.4),
                ("Other", 0.8),
            ],
            28,
            38456,
            Low,
            "Dense urban area, inland valley basin",
            (34.0239, -118.1553),
            (8.2, 32.5, 12.3),
            &[Earthquake, Flood, Wildfire],
        );
        add(
            "90024",
            "Westwood, Los Angeles, CA",
            &[
                ("Persian", 41.5),
                ("English", 38.2),
                ("Spanish", 8.1),
                ("Chinese", 6.4),
                ("Other", 5.8),
            ],
            36,
            71350,
            High,
            "Urban residential area west of downtown Los Angeles, foothills to the north",
            (34.0635, -118.4455),
            (16.2, 14.8, 7.9),
            &[Earthquake, Wildfire],
        );
        add(
            "94102",
            "San Francisco, CA",
            &[
                ("English", 48.3),
                ("Chinese", 21.6),
                ("Spanish", 14.2),
                ("Vietnamese", 8.4),
                ("Tagalog", 4.1),
                ("Other", 3.4),
            ],
            39,
            41234,
            Medium,
            "Dense urban downtown, hilly terrain, coastal proximity",
            (37.7799, -122.4148),
            (14.7, 8.9, 15.8),
            &[Earthquake, Tsunami, Flood],
        );
        add(
            "33139",
            "Miami Beach, FL",
            &[
                ("Spanish", 48.5),
                ("English", 38.2),
                ("Portuguese", 6.4),
                ("Haitian", 3.8),
                ("Other", 3.1),
            ],
            42,
            54321,
            Medium,
            "Barrier island, low elevation (avg 4.5 ft above sea level), coastal",
            (25.8067, -80.1350),
            (22.1, 12.4, 11.2),
            &[Hurricane, Flood, Tsunami],
        );
        add(
            "90802",
            "Long Beach, CA",
            &[
                ("English", 52.3),
                ("Spanish", 28.9),
                ("Tagalog", 7.2),
                ("Khmer", 5.1),
                ("Other", 6.5),
            ],
            35,
            47890,
            Medium,
            "Coastal port city, sea level elevation, urban waterfront",
            (33.7701, -118.1937),
            (12.3, 21.7, 13.4),
            &[Tsunami, Earthquake, Flood],
        );
        add(
            "97201",
            "Portland, OR",
            &[
                ("English", 84.2),
                ("Spanish", 7.3),
                ("Vietnamese", 2.8),
                ("Chinese", 2.1),
                ("Other", 3.6),
            ],
            38,
            62145,
            High,
            "Urban area near Willamette River, moderate elevation, forested hills nearby",
            (45.5051, -122.6750),
            (13.8, 15.2, 10.7),
            &[Wildfire, Flood, Earthquake],
        );
        add(
            "70112",
            "New Orleans, LA",
            &[
                ("English", 75.4),
                ("Spanish", 13.2),
                ("Vietnamese", 6.8),
                ("French", 2.9),
                ("Other", 1.7),
            ],
            37,
            38567,
            Medium,
            "Below sea level (avg -6 ft), near Mississippi River, coastal proximity",
            (29.9511, -90.0715),
            (11.9, 18.3, 16.7),
            &[Hurricane, Flood],
        );
        add(
            "80202",
            "Denver, CO",
            &[("English", 76.8), ("Spanish", 18.2), ("Other", 5.0)],
            34,
            58234,
            High,
            "High elevation (5,280 ft), urban plains, mountain proximity",
            (39.7547, -104.9970),
            (9.2, 16.8, 9.3),
            &[Wildfire, Flood],
        );
        add(
            "99501",
            "Anchorage, AK",
            &[
                ("English", 80.3),
                ("Spanish", 6.2),
                ("Tagalog", 4.8),
                ("Samoan", 2.9),
                ("Korean", 2.1),
                ("Other", 3.7),
            ],
            33,
            67821,
            High,
            "Coastal subarctic, low elevation, near Cook Inlet, mountainous terrain",
            (61.2181, -149.9003),
            (10.4, 24.1, 11.8),
            &[Earthquake, Tsunami, Wildfire],
        );
        add(
            "10001",
            "Manhattan, NY",
            &[
                ("English", 56.7),
                ("Spanish", 22.4),
                ("Chinese", 7.8),
                ("Korean", 3.9),
                ("Russian", 3.2),
                ("Other", 6.0),
            ],
            38,
            73456,
            High,
            "Dense urban island, low elevation, coastal waterfront",
            (40.7506, -73.9971),
            (15.3, 14.2, 10.4),
            &[Hurricane, Flood],
        );

        LocationDirectory { profiles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_directory_is_valid() {
        let directory = LocationDirectory::builtin();
        assert_eq!(directory.len(), 11);
        directory.validate().unwrap();
    }

    #[test]
    fn test_codes_are_sorted() {
        let codes = LocationDirectory::builtin().codes();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(codes.first().map(String::as_str), Some("10001"));
    }

    #[test]
    fn test_lookup() {
        let directory = LocationDirectory::builtin();
        let profile = directory.get("90210").unwrap();
        assert_eq!(profile.neighborhood, "Beverly Hills, CA");
        assert_eq!(profile.languages.keys().next().map(String::as_str), Some("English"));
        assert!(directory.get("99999").is_none());
    }

    #[test]
    fn test_postal_code_format() {
        assert!(is_postal_code("90210"));
        assert!(!is_postal_code("9021"));
        assert!(!is_postal_code("ABCDE"));
        assert!(!is_postal_code("902100"));
        assert!(!is_postal_code(""));
    }

    fn sample_json(risks: &str, english: f64) -> String {
        format!(
            r#"{{
  "12345": {{
    "neighborhood": "Testville",
    "languages": {{ "English": {english}, "Spanish": 10.0 }},
    "medianAge": 40,
    "medianIncome": 50000,
    "educationLevel": "medium",
    "geography": "River valley",
    "vulnerablePopulations": {{ "elderly": 10.0, "children": 20.0, "disabled": 5.0 }},
    "historicalRisks": {risks}
  }}
}}"#
        )
    }

    #[test]
    fn test_json_directory_loads() {
        let directory =
            LocationDirectory::from_json_str(&sample_json(r#"["flood"]"#, 90.0)).unwrap();
        directory.validate().unwrap();
        let profile = directory.get("12345").unwrap();
        assert_eq!(profile.historical_risks, vec![HazardType::Flood]);
        assert!(profile.coordinates.is_none());
    }

    #[test]
    fn test_unknown_hazard_is_rejected() {
        let result = LocationDirectory::from_json_str(&sample_json(r#"["tornado"]"#, 90.0));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_empty_risks_fail_validation() {
        let directory = LocationDirectory::from_json_str(&sample_json("[]", 90.0)).unwrap();
        assert!(matches!(
            directory.validate(),
            Err(ConfigError::NoHistoricalRisks { .. })
        ));
    }

    #[test]
    fn test_language_sum_fails_validation() {
        let directory =
            LocationDirectory::from_json_str(&sample_json(r#"["flood"]"#, 50.0)).unwrap();
        assert!(matches!(
            directory.validate(),
            Err(ConfigError::LanguageSum { .. })
        ));
    }
}
