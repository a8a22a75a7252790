use crate::location::LocationProfile;
use crate::prompt::common::{
    format_dollars, format_percent, reading_guidance, CHILDREN_THRESHOLD, DISABLED_THRESHOLD,
    ELDERLY_THRESHOLD, PRIMARY_LANGUAGE_THRESHOLD, RESPONSE_SCHEMA, ROLE,
    SECONDARY_LANGUAGE_THRESHOLD,
};
use crate::scenario::ScenarioRecord;

/// Generate the prompt asking for a personalized alert for one scenario and community.
pub fn alert_prompt(
    scenario: &ScenarioRecord,
    profile: &LocationProfile,
    location_code: &str,
) -> String {
    let official_actions = scenario
        .official_actions
        .iter()
        .enumerate()
        .map(|(i, action)| format!("  {}. {}", i + 1, action))
        .collect::<Vec<_>>()
        .join("\n");

    let languages = profile
        .languages
        .iter()
        .map(|(language, pct)| format!("{}: {}", language, format_percent(*pct)))
        .collect::<Vec<_>>()
        .join(", ");

    let vulnerable = profile
        .vulnerable_populations
        .iter()
        .map(|(group, pct)| format!("{}: {}", group, format_percent(pct)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"{role}

## DISASTER
- Type: {hazard}
- Severity: {severity}/5 ({status})
- Description: {description}
- Distance from recipient: {distance} miles
- Expected impact: {impact_time}
- Official guidance:
{official_actions}

## COMMUNITY (ZIP {location_code})
- Location: {neighborhood}
- Languages spoken: {languages}
- Median age: {median_age} years
- Median household income: {median_income}
- Education level: {education}
- Geography: {geography}
- Vulnerable populations: {vulnerable}

## INSTRUCTIONS
Write one alert for this community. Follow every rule below exactly.

1. **Languages:** The PRIMARY language is the most widely spoken language if more than {primary_threshold} of residents speak it; otherwise it is English. SECONDARY languages are the other languages spoken by more than {secondary_threshold} of residents; list 2-3 of them.

2. **Reading level ({education}):** {reading} Set "readingLevel" to "{reading_level}".
   - low: 6th grade reading level
   - medium: 8th grade reading level
   - high: 10th grade reading level

3. **Urgency:** Choose an urgency level from 1 to 5 that matches the severity and how soon impact is expected.

4. **Headline:** At most 10 words with exactly ONE emoji. Make it specific to a {hazard_lower} near {neighborhood}.

5. **Body:** 40-60 words that:
   * state the threat plainly
   * give the distance ({distance} miles) and the timeframe ({impact_time})
   * name the single most important action to take right now
   * use a culturally appropriate tone: direct for high-education communities, more community-focused for others

6. **Actions:** 3-5 steps, most critical first, that:
   * fit a severity {severity} {hazard_lower} and this geography
   * use the imperative ("Leave now", not "You should leave")

7. **Special considerations:** 2-4 specific, actionable notes for vulnerable residents:
   * elderly above {elderly}: mobility and medication guidance
   * children above {children}: child safety guidance
   * disabled above {disabled}: accessibility guidance

8. **Translations:** Translate BOTH the headline and the body completely into every secondary language. Translations must be culturally appropriate and accurate, not word-for-word.
{schema}"#,
        role = ROLE,
        hazard = scenario.hazard_type.as_str().to_uppercase(),
        hazard_lower = scenario.hazard_type,
        severity = scenario.severity,
        status = scenario.status.as_str().to_uppercase(),
        description = scenario.description,
        distance = scenario.distance_miles,
        impact_time = scenario.impact_time,
        official_actions = official_actions,
        location_code = location_code,
        neighborhood = profile.neighborhood,
        languages = languages,
        median_age = profile.median_age,
        median_income = format_dollars(profile.median_income),
        education = profile.education_level,
        geography = profile.geography,
        vulnerable = vulnerable,
        primary_threshold = format_percent(PRIMARY_LANGUAGE_THRESHOLD),
        secondary_threshold = format_percent(SECONDARY_LANGUAGE_THRESHOLD),
        reading = reading_guidance(profile.education_level),
        reading_level = profile.education_level.reading_level(),
        elderly = format_percent(ELDERLY_THRESHOLD),
        children = format_percent(CHILDREN_THRESHOLD),
        disabled = format_percent(DISABLED_THRESHOLD),
        schema = RESPONSE_SCHEMA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::HazardType;
    use crate::location::{EducationLevel, LocationDirectory};
    use crate::scenario::generate_scenario;

    #[test]
    fn test_prompt_carries_scenario_and_community() {
        let directory = LocationDirectory::builtin();
        for code in directory.codes() {
            let profile = directory.get(&code).unwrap();
            let scenario = generate_scenario(profile);
            let prompt = alert_prompt(&scenario, profile, &code);

            assert!(prompt.contains(&scenario.hazard_type.as_str().to_uppercase()));
            assert!(prompt.contains(&scenario.severity.to_string()));
            assert!(prompt.contains(&code));
            assert!(prompt.contains(&profile.neighborhood));
            for language in profile.languages.keys() {
                assert!(prompt.contains(language.as_str()), "{} missing", language);
            }
            for action in &scenario.official_actions {
                assert!(prompt.contains(action.as_str()));
            }
        }
    }

    #[test]
    fn test_prompt_formats_demographics() {
        let directory = LocationDirectory::builtin();
        let profile = directory.get("90210").unwrap();
        let scenario = generate_scenario(profile);
        let prompt = alert_prompt(&scenario, profile, "90210");

        assert!(prompt.contains("Median household income: $87,902"));
        assert!(prompt.contains("Persian: 18.4%"));
        assert!(prompt.contains("elderly: 18.5%, children: 19.2%, disabled: 8.1%"));
        assert!(prompt.contains("Education level: high"));
        assert!(prompt.contains("10th grade reading level. Technical"));
        assert!(prompt.contains(r#"Set "readingLevel" to "high"."#));
    }

    #[test]
    fn test_prompt_states_rules_and_schema() {
        let directory = LocationDirectory::builtin();
        let mut profile = directory.get("90022").unwrap().clone();
        profile.historical_risks = vec![HazardType::Earthquake];
        assert_eq!(profile.education_level, EducationLevel::Low);
        let scenario = generate_scenario(&profile);
        let prompt = alert_prompt(&scenario, &profile, "90022");

        assert!(prompt.contains("EARTHQUAKE"));
        assert!(prompt.contains("Education level: low"));
        assert!(prompt.contains("more than 40% of residents"));
        assert!(prompt.contains("more than 5% of residents"));
        assert!(prompt.contains("elderly above 15%"));
        assert!(prompt.contains("children above 25%"));
        assert!(prompt.contains("disabled above 12%"));
        assert!(prompt.contains("culturally appropriate tone"));
        assert!(prompt.contains("direct for high-education communities, more community-focused"));
        assert!(prompt.contains("Translations must be culturally appropriate and accurate"));
        assert!(prompt.contains("\"specialConsiderations\""));
        assert!(prompt.trim_end().ends_with("no ``` code fences."));
    }
}
