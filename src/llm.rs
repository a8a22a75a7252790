use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::alert::{fallback_payload, AlertPayload};
use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

/// Why a generation attempt produced no usable alert.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation capability unavailable: {0}")]
    Unavailable(String),

    #[error("generation request failed: {0}")]
    Request(String),

    #[error("generation request timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation returned no text")]
    EmptyResponse,

    #[error("reply is not a valid alert object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("reply breaks the alert schema: {0}")]
    Invalid(String),
}

/// Anything that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl TextGenerator for LLMParams {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match timeout(self.timeout, self.request(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        }
    }

    fn describe(&self) -> String {
        let backend = match &self.llm_client {
            LLMClient::Ollama(_) => "ollama",
            LLMClient::OpenAI(_) => "openai",
            LLMClient::Disabled(_) => "disabled",
        };
        format!("{}:{}", backend, self.model)
    }
}

impl LLMParams {
    async fn request(&self, prompt: &str) -> Result<String, GenerationError> {
        match &self.llm_client {
            LLMClient::Ollama(ollama) => {
                let request = GenerationRequest::new(self.model.clone(), prompt.to_string())
                    .options(
                        GenerationOptions::default()
                            .temperature(self.temperature)
                            .num_predict(self.max_tokens as i32),
                    );
                let response = ollama
                    .generate(request)
                    .await
                    .map_err(|e| GenerationError::Request(e.to_string()))?;
                Ok(response.response)
            }
            LLMClient::OpenAI(client) => {
                let message = ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| GenerationError::Request(e.to_string()))?;
                let request = CreateChatCompletionRequestArgs::default()
                    .model(self.model.as_str())
                    .temperature(self.temperature)
                    .max_completion_tokens(self.max_tokens)
                    .messages(vec![ChatCompletionRequestMessage::User(message)])
                    .build()
                    .map_err(|e| GenerationError::Request(e.to_string()))?;
                let response = client
                    .chat()
                    .create(request)
                    .await
                    .map_err(|e| GenerationError::Request(e.to_string()))?;
                response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or(GenerationError::EmptyResponse)
            }
            LLMClient::Disabled(reason) => Err(GenerationError::Unavailable(reason.clone())),
        }
    }
}

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?i:json)?\s*").expect("valid fence regex"));
static FENCE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```$").expect("valid fence regex"));

/// Removes a leading ```` ``` ````/```` ```json ```` fence, a trailing fence, and
/// surrounding whitespace.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = FENCE_OPEN.find(text).map_or(text, |m| &text[m.end()..]);
    let text = FENCE_CLOSE.find(text).map_or(text, |m| &text[..m.start()]);
    text.trim()
}

/// Parses a raw reply into a validated alert.
pub fn parse_alert_payload(reply: &str) -> Result<AlertPayload, GenerationError> {
    let json = strip_code_fences(reply);
    if json.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let payload: AlertPayload = serde_json::from_str(json)?;
    payload.validated().map_err(GenerationError::Invalid)
}

/// One generation attempt. Every failure comes back as a [`GenerationError`].
pub async fn try_generate_alert(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> Result<AlertPayload, GenerationError> {
    debug!(target: TARGET_LLM_REQUEST, "[{}]: sending prompt: {}", generator.describe(), prompt);
    let reply = generator.generate(prompt).await?;
    debug!(target: TARGET_LLM_REQUEST, "[{}]: reply: {}", generator.describe(), reply);
    parse_alert_payload(&reply)
}

/// Generates a personalized alert, substituting the fallback payload on any failure.
pub async fn generate_alert(generator: &dyn TextGenerator, prompt: &str) -> AlertPayload {
    match try_generate_alert(generator, prompt).await {
        Ok(payload) => {
            info!(target: TARGET_LLM_REQUEST, "[{}]: personalized alert generated", generator.describe());
            payload
        }
        Err(e) => {
            warn!(target: TARGET_LLM_REQUEST, "[{}]: {}; using fallback alert", generator.describe(), e);
            fallback_payload()
        }
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::sync::Mutex;

    /// Returns a canned reply, or a request failure when there is none.
    pub struct StubGenerator {
        reply: Option<String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        pub fn replying(reply: &str) -> Self {
            StubGenerator {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            StubGenerator {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| GenerationError::Request("connection refused".to_string()))
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    pub const VALID_REPLY: &str = r#"{
  "primaryLanguage": "English",
  "secondaryLanguages": ["Spanish", "Persian"],
  "readingLevel": "high",
  "urgencyLevel": 5,
  "headline": "🔥 Wildfire 3 miles from Beverly Hills: leave now",
  "body": "A fast-moving wildfire is 3 miles away and could reach the area within the hour. Evacuate now using the routes posted by officials.",
  "actions": ["Evacuate now", "Shut off gas", "Take medications", "Bring pets"],
  "specialConsiderations": ["Help elderly neighbors leave", "Keep children close"],
  "translations": {
    "Spanish": { "headline": "🔥 Incendio a 3 millas: evacúe ya", "body": "Un incendio se acerca." },
    "Persian": { "headline": "🔥 آتش‌سوزی در ۳ مایلی", "body": "آتش‌سوزی نزدیک است." }
  }
}"#;
}

#[cfg(test)]
mod tests {
    use super::stub::{StubGenerator, VALID_REPLY};
    use super::*;
    use crate::alert::ReadingLevel;

    fn assert_fallback(payload: &AlertPayload) {
        assert_eq!(payload.primary_language, "English");
        assert!(payload.translations.contains_key("Spanish"));
        assert_eq!(payload, &fallback_payload());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{}"), "{}");
        assert_eq!(strip_code_fences("  {}\n"), "{}");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("```JSON {\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{}"), "{}");
    }

    #[test]
    fn test_parse_valid_reply() {
        let payload = parse_alert_payload(VALID_REPLY).unwrap();
        assert_eq!(payload.reading_level, ReadingLevel::High);
        assert_eq!(payload.urgency_level, 5);
        assert_eq!(payload.actions.len(), 4);
        assert_eq!(payload.translations.len(), 2);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = format!("```json\n{}\n```", VALID_REPLY);
        assert!(parse_alert_payload(&fenced).is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_replies() {
        assert!(matches!(
            parse_alert_payload("Sorry, I can't help with that."),
            Err(GenerationError::Malformed(_))
        ));
        assert!(matches!(
            parse_alert_payload("```json\n```"),
            Err(GenerationError::EmptyResponse)
        ));
        let missing_field = VALID_REPLY.replace("\"urgencyLevel\": 5,", "");
        assert!(matches!(
            parse_alert_payload(&missing_field),
            Err(GenerationError::Malformed(_))
        ));
        let bad_urgency = VALID_REPLY.replace("\"urgencyLevel\": 5", "\"urgencyLevel\": 9");
        assert!(matches!(
            parse_alert_payload(&bad_urgency),
            Err(GenerationError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_alert_success() {
        let generator = StubGenerator::replying(VALID_REPLY);
        let payload = generate_alert(&generator, "prompt").await;
        assert_eq!(payload.headline, "🔥 Wildfire 3 miles from Beverly Hills: leave now");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_yields_fallback() {
        let generator = StubGenerator::failing();
        for _ in 0..3 {
            assert_fallback(&generate_alert(&generator, "prompt").await);
        }
        // No retries.
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_unparseable_reply_yields_fallback() {
        let generator = StubGenerator::replying("<html>502 Bad Gateway</html>");
        assert_fallback(&generate_alert(&generator, "prompt").await);
        let generator = StubGenerator::replying("");
        assert_fallback(&generate_alert(&generator, "").await);
    }

    #[tokio::test]
    async fn test_disabled_client_yields_fallback() {
        let params = LLMParams {
            llm_client: LLMClient::Disabled("OPENAI_API_KEY not set".to_string()),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            timeout: Duration::from_secs(5),
        };
        assert!(matches!(
            params.generate("prompt").await,
            Err(GenerationError::Unavailable(_))
        ));
        assert_fallback(&generate_alert(&params, "prompt").await);
    }
}
