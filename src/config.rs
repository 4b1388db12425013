use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

#[derive(Deserialize, Debug)]
pub struct Config {
    pub llm: LlmConfig,
}

#[derive(Deserialize, Debug)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: Option<f32>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

// Temperature 0 keeps repeated audits of the same contract comparable
fn default_temperature() -> Option<f32> {
    Some(0.0)
}

fn default_max_tokens() -> Option<u32> {
    Some(4096)
}

const DEFAULT_CONFIG: &str = r#"# LLM endpoint configuration
[llm]
# OpenAI-compatible API base URL
base_url = "https://api.openai.com/v1"
# Model used for the audit
model = "gpt-4o"
# Sampling temperature (0 keeps reports deterministic)
temperature = 0.0
# Upper bound on reply tokens
max_tokens = 4096

# Extra headers sent with every request, e.g. for an API gateway
# [llm.headers]
# x-team = "security"
"#;

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the default config file; refuses to clobber an existing one
    /// unless `overwrite` is set
    pub fn write_default(path: &str, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
        if !overwrite && fs::exists(path)? {
            return Err(format!("{} already exists (use --override to replace it)", path).into());
        }
        fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
            [llm]
            base_url = "http://localhost:8080/v1"
            model = "test-model"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.temperature, Some(0.0));
        assert_eq!(config.llm.max_tokens, Some(4096));
        assert!(config.llm.headers.is_empty());
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[test]
    fn test_headers_parsed() {
        let config: Config = toml::from_str(
            r#"
            [llm]
            base_url = "http://localhost:8080/v1"
            model = "test-model"

            [llm.headers]
            x-team = "security"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.llm.headers.get("x-team").map(String::as_str),
            Some("security")
        );
    }
}
