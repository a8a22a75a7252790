use crate::location::EducationLevel;

/// A language above this share (percent) becomes the primary language.
pub const PRIMARY_LANGUAGE_THRESHOLD: f64 = 40.0;
/// Languages above this share (percent) get a translation.
pub const SECONDARY_LANGUAGE_THRESHOLD: f64 = 5.0;

pub const ELDERLY_THRESHOLD: f64 = 15.0;
pub const CHILDREN_THRESHOLD: f64 = 25.0;
pub const DISABLED_THRESHOLD: f64 = 12.0;

/// Opening line shared by every alert prompt.
pub const ROLE: &str = "You are the message writer for a public emergency alert system. Your alerts must be accurate, calm, and easy to act on, because people will use them to protect their lives.";

/// Output contract appended to every alert prompt.
pub const RESPONSE_SCHEMA: &str = r#"
### **Response Format**
Reply with exactly ONE JSON object with these fields and types:

{
  "primaryLanguage": string,                 // e.g. "English"
  "secondaryLanguages": [string],            // 2-3 language names
  "readingLevel": "low" | "medium" | "high",
  "urgencyLevel": integer 1-5,
  "headline": string,                        // at most 10 words, exactly one emoji
  "body": string,                            // 40-60 words
  "actions": [string],                       // 3-5 items, most critical first
  "specialConsiderations": [string],         // 2-4 items
  "translations": {
    "<language name>": { "headline": string, "body": string }
  }
}

**CRITICAL:** The reply must be the JSON object and nothing else. No commentary before or after it, no Markdown, no ``` code fences.
"#;

/// Reading grade and writing constraints for a community's education level.
pub fn reading_guidance(level: EducationLevel) -> &'static str {
    match level {
        EducationLevel::Low => {
            "6th grade reading level. Short sentences, everyday words only, no jargon."
        }
        EducationLevel::Medium => {
            "8th grade reading level. Clear, complete sentences; explain any technical word."
        }
        EducationLevel::High => {
            "10th grade reading level. Technical terms are fine when the context explains them."
        }
    }
}

/// Formats whole dollars with thousands separators, e.g. `$87,902`.
pub fn format_dollars(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a percentage without a trailing `.0` for whole numbers.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}%", value as i64)
    } else {
        format!("{}%", value)
    }
}
