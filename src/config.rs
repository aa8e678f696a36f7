use anyhow::Result;
use serde::Deserialize;
use std::env;

/// Default OpenAI-compatible gateway the handler forwards documents to
pub const DEFAULT_LLM_API_BASE: &str = "https://ai.gateway.lovable.dev/v1";
/// Multimodal model able to read both PDFs and images
pub const DEFAULT_LLM_MODEL: &str = "google/gemini-2.5-pro";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory for rolling log files; stdout only when unset
    pub log_dir: Option<String>,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

// Hand-written so the credential never lands in a log line.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LLMConfig {
    /// The configured credential, treating an empty value as absent
    pub fn active_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the summarize endpoint used by the CLI client
    pub endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        Ok(Self {
            server: ServerConfig {
                port,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                log_dir: env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            },
            llm: LLMConfig {
                api_key: env::var("LLM_API_KEY")
                    .or_else(|_| env::var("LOVABLE_API_KEY"))
                    .ok(),
                api_base: env::var("LLM_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_LLM_API_BASE.to_string()),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()?,
            },
            client: ClientConfig {
                endpoint: env::var("SUMMARIZE_ENDPOINT").unwrap_or_else(|_| {
                    format!("http://localhost:{}/api/summarize-document", port)
                }),
            },
        })
    }

    /// Configuration pointing at a specific upstream, used by tests and embedders
    pub fn for_upstream(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "127.0.0.1".to_string(),
                log_dir: None,
            },
            llm: LLMConfig {
                api_key,
                api_base: api_base.into(),
                model: DEFAULT_LLM_MODEL.to_string(),
                timeout_secs: 120,
            },
            client: ClientConfig {
                endpoint: "http://localhost:3000/api/summarize-document".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_not_configured() {
        let config = Config::for_upstream("http://localhost", Some("  ".to_string()));
        assert!(config.llm.active_api_key().is_none());

        let config = Config::for_upstream("http://localhost", Some("sk-test".to_string()));
        assert_eq!(config.llm.active_api_key(), Some("sk-test"));
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config::for_upstream("http://localhost", Some("sk-secret".to_string()));
        let printed = format!("{:?}", config.llm);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("***"));
    }
}
