use crate::core::error::ChatError;
use crate::workspace::guard::validate_url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable-per-call configuration snapshot for the chat core. Loaded from
/// `~/.lochat/config.yaml`, overridable from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Full chat-completions endpoint URL.
    pub api_url: String,
    /// Bearer token. Local endpoints such as Ollama accept any value.
    pub api_token: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub max_history_messages: usize,
    pub request_timeout_ms: u64,
    /// Byte budget for model-proposed file writes.
    pub max_file_size: usize,
    /// Skip the confirmation prompt for proposed writes. The path and size
    /// guards still apply; they are security boundaries, not UX.
    pub write_without_prompt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434/v1/chat/completions".to_string(),
            api_token: "ollama".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_history_messages: 50,
            request_timeout_ms: 120_000,
            max_file_size: 1_048_576,
            write_without_prompt: false,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful coding assistant. Keep answers concise. \
When proposing file content, respond with a fenced code block beginning with \
```file path=\"relative/path.ext\" followed by the complete file content.";

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join(".lochat").join("config.yaml")
    }

    pub fn load() -> Result<Config, ChatError> {
        Self::load_from(&Self::config_path())
    }

    fn load_from(path: &Path) -> Result<Config, ChatError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            config.validate()?;
            return Ok(config);
        }

        let config = Config::default();
        let _ = config.save_to(path);
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if !validate_url(&self.api_url) {
            return Err(ChatError::Config(format!(
                "api_url must be an http(s) URL, got: {}",
                self.api_url
            )));
        }
        if self.max_history_messages == 0 {
            return Err(ChatError::Config(
                "max_history_messages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join(".lochat").join("input_history.txt")
    }
}
