use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{PromptDeckError, Result};

/// Credential/config placeholder for the primary chat provider. The primary
/// provider call itself was retired, but the proxy still gates on the key
/// being present before forwarding anything.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// One dashboard tool card: a chat experience backed by an inference
/// endpoint. The proxy route for a tool is `/api/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolConfig {
    pub id: String,
    pub label: String,
    pub backend_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub openai: Option<OpenAiConfig>,
    #[serde(default = "default_tools")]
    pub tools: Vec<ToolConfig>,
}

fn default_tools() -> Vec<ToolConfig> {
    vec![
        ToolConfig {
            id: "conversation".to_string(),
            label: "Conversation w/ OpenAI".to_string(),
            backend_url: "http://127.0.0.1:3000/query".to_string(),
        },
        ToolConfig {
            id: "localconversation".to_string(),
            label: "Conversation w/ Local LLM".to_string(),
            backend_url: "http://127.0.0.1:3001/query".to_string(),
        },
        ToolConfig {
            id: "sqlconversation".to_string(),
            label: "Chat with SQL".to_string(),
            backend_url: "http://127.0.0.1:3002/query-sql".to_string(),
        },
    ]
}

impl Config {
    pub fn convention_defaults() -> Self {
        let mut config = Self {
            openai: None,
            tools: default_tools(),
        };
        config.apply_env_overrides();
        config
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let raw =
            fs::read_to_string(path).map_err(|e| PromptDeckError::Config(e.to_string()))?;
        let mut config: Config =
            serde_json::from_str(&raw).map_err(|e| PromptDeckError::Config(e.to_string()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads from an explicit file when given, otherwise falls back to
    /// convention defaults plus env overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::convention_defaults()),
        }
    }

    pub fn tool(&self, id: &str) -> Option<&ToolConfig> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    pub fn provider_key_present(&self) -> bool {
        self.openai
            .as_ref()
            .and_then(|openai| openai.api_key.as_ref())
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PROMPTDECK_OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                let openai = self.openai.get_or_insert(OpenAiConfig {
                    api_key: None,
                    model: None,
                    base_url: None,
                });
                openai.api_key = Some(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_carry_the_three_tool_cards() {
        let config = Config {
            openai: None,
            tools: default_tools(),
        };
        assert_eq!(config.tools.len(), 3);
        let sql = config.tool("sqlconversation").unwrap();
        assert_eq!(sql.label, "Chat with SQL");
        assert_eq!(sql.backend_url, "http://127.0.0.1:3002/query-sql");
        assert!(config.tool("imagine").is_none());
    }

    #[test]
    fn provider_key_presence_ignores_blank_keys() {
        let mut config = Config {
            openai: Some(OpenAiConfig {
                api_key: Some("   ".to_string()),
                model: None,
                base_url: None,
            }),
            tools: vec![],
        };
        assert!(!config.provider_key_present());

        config.openai = Some(OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            model: None,
            base_url: None,
        });
        assert!(config.provider_key_present());
    }

    #[test]
    fn loads_config_from_file_and_fills_missing_tools() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", r#"{"openai": {"api_key": "sk-file", "model": null, "base_url": null}}"#)
            .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert!(config.provider_key_present());
        assert_eq!(config.tools.len(), 3);
    }

    #[test]
    fn rejects_missing_file() {
        let err = Config::from_file("/nonexistent/promptdeck.json").unwrap_err();
        assert!(matches!(err, PromptDeckError::Config(_)));
    }
}
