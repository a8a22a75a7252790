use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use ollama_rs::Ollama;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::localize::{default_overrides, LanguageOverride};
use crate::{LLMClient, LLMParams};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 3001;

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// Empty entries are dropped.
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses an environment variable, falling back to `default` when unset or invalid.
pub fn get_env_var_or<T: FromStr>(var: &str, default: T) -> T {
    match env::var(var) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("{} has invalid value {:?}, using default", var, value);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LlmBackend {
    Ollama,
    OpenAI,
}

/// Runtime configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub backend: LlmBackend,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub ollama_host: String,
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    pub port: u16,
    pub locations_path: Option<PathBuf>,
    pub language_overrides: Vec<LanguageOverride>,
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// - `LLM_TYPE`: "ollama" (default) or "openai"
    /// - `LLM_MODEL`: model name (default depends on `LLM_TYPE`)
    /// - `LLM_TEMPERATURE`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`
    /// - `OLLAMA_HOST`: Ollama URL (default http://localhost:11434)
    /// - `OPENAI_API_KEY`, `OPENAI_API_BASE`
    /// - `PORT`: API port (default 3001)
    /// - `LOCATIONS_JSON_PATH`: replaces the built-in location directory
    /// - `LANGUAGE_OVERRIDES`: `CODE:Language` pairs separated by `;`
    pub fn from_env() -> Config {
        let backend = match env::var("LLM_TYPE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "openai" => LlmBackend::OpenAI,
            "" | "ollama" => LlmBackend::Ollama,
            other => {
                warn!("Unknown LLM_TYPE {:?}, using ollama", other);
                LlmBackend::Ollama
            }
        };
        let default_model = match backend {
            LlmBackend::Ollama => DEFAULT_OLLAMA_MODEL,
            LlmBackend::OpenAI => DEFAULT_OPENAI_MODEL,
        };

        Config {
            backend,
            model: env::var("LLM_MODEL").unwrap_or_else(|_| default_model.to_string()),
            temperature: get_env_var_or("LLM_TEMPERATURE", DEFAULT_TEMPERATURE),
            max_tokens: get_env_var_or("LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            timeout: Duration::from_secs(get_env_var_or("LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
            ollama_host: env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            openai_api_base: env::var("OPENAI_API_BASE").ok().filter(|b| !b.trim().is_empty()),
            port: get_env_var_or("PORT", DEFAULT_PORT),
            locations_path: env::var("LOCATIONS_JSON_PATH").ok().map(PathBuf::from),
            language_overrides: parse_overrides(&get_env_var_as_vec("LANGUAGE_OVERRIDES", ';')),
        }
    }

    /// Builds the generation parameters for the configured backend.
    pub fn llm_params(&self) -> LLMParams {
        let llm_client = match self.backend {
            LlmBackend::OpenAI => match &self.openai_api_key {
                Some(api_key) => {
                    let mut config = OpenAIConfig::new().with_api_key(api_key);
                    if let Some(base) = &self.openai_api_base {
                        config = config.with_api_base(base);
                    }
                    info!("Using OpenAI model {}", self.model);
                    LLMClient::OpenAI(OpenAIClient::with_config(config))
                }
                None => {
                    warn!("OPENAI_API_KEY is not set; every alert will use the fallback text");
                    LLMClient::Disabled("OPENAI_API_KEY is not set".to_string())
                }
            },
            LlmBackend::Ollama => {
                let (host, port) = parse_ollama_host(&self.ollama_host);
                info!("Connecting to Ollama at {}:{} with model {}", host, port, self.model);
                LLMClient::Ollama(Ollama::new(host, port))
            }
        };

        LLMParams {
            llm_client,
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: self.timeout,
        }
    }
}

/// Splits an Ollama URL into scheme+host and port, defaulting to http and 11434.
pub fn parse_ollama_host(url: &str) -> (String, u16) {
    let (scheme, rest) = url.trim().split_once("://").unwrap_or(("http", url.trim()));
    let rest = rest.trim_end_matches('/');
    match rest.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (format!("{}://{}", scheme, host), port),
            Err(_) => (format!("{}://{}", scheme, rest), 11434),
        },
        None => (format!("{}://{}", scheme, rest), 11434),
    }
}

fn parse_overrides(entries: &[String]) -> Vec<LanguageOverride> {
    if entries.is_empty() {
        return default_overrides();
    }
    entries
        .iter()
        .filter_map(|entry| match entry.parse() {
            Ok(rule) => Some(rule),
            Err(e) => {
                warn!("Ignoring language override: {}", e);
                None
            }
        })
        .collect()
}
