//! OpenAI Responses API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Reply generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// OpenAI API key
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// System instructions sent with every request
    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on reply length
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate OpenAI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("OPENAI__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl("openai"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_output_tokens == 0 {
            return Err(ValidationError::InvalidMaxOutputTokens);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            instructions: default_instructions(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_instructions() -> String {
    "You are a helpful assistant that can answer questions directly to the point and concisely."
        .to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_output_tokens() -> u32 {
    150
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> OpenAiConfig {
        OpenAiConfig {
            api_key: "sk-test".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_openai_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.max_output_tokens, 150);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_api_key() {
        assert_eq!(
            OpenAiConfig::default().validate(),
            Err(ValidationError::MissingRequired("OPENAI__API_KEY"))
        );
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_temperature_range() {
        let config = OpenAiConfig {
            temperature: 2.5,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }

    #[test]
    fn test_base_url_scheme() {
        let config = OpenAiConfig {
            base_url: "api.openai.com".to_string(),
            ..valid()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl("openai"))
        );
    }
}
