pub mod alert;
pub mod environment;
pub mod hazard;
pub mod llm;
pub mod localize;
pub mod location;
pub mod logging;
pub mod prompt;
pub mod scenario;
pub mod service;
pub mod web;

use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use ollama_rs::Ollama;
use std::time::Duration;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";
pub const TARGET_ALERT: &str = "alert";

#[derive(Clone, Debug)]
pub enum LLMClient {
    Ollama(Ollama),
    OpenAI(OpenAIClient<OpenAIConfig>),
    /// Configuration left the capability unusable; every call fails with the reason.
    Disabled(String),
}

#[derive(Clone, Debug)]
pub struct LLMParams {
    pub llm_client: LLMClient,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}
