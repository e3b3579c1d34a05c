// src/config/mod.rs
pub mod ai;
pub mod search;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use ai::LlmConfig;
pub use search::{NewsConfig, PapersConfig};

pub const ENV_CONFIG_PATH: &str = "RELAY_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/relay.toml";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub papers: PapersConfig,
}

impl AppConfig {
    /// Parse a TOML file and resolve secrets from the environment.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg: AppConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg.resolve())
    }

    /// Load config using env var + fallbacks:
    /// 1) $RELAY_CONFIG_PATH (must exist)
    /// 2) config/relay.toml
    /// 3) built-in defaults + environment
    pub fn load() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::load_from_file(&pb);
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from_file(&default_path);
        }
        Ok(Self::from_env())
    }

    /// Defaults with secrets taken from the environment only.
    pub fn from_env() -> Self {
        Self::default().resolve()
    }

    fn resolve(self) -> Self {
        Self {
            llm: self.llm.resolve(),
            news: self.news.resolve(),
            papers: self.papers.resolve(),
        }
    }
}

/// "ENV" (any case) or a missing value reads `env_key`; blanks count as missing.
pub(crate) fn resolve_secret(value: Option<String>, env_key: &str) -> Option<String> {
    let from_file = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    match from_file {
        Some(v) if !v.eq_ignore_ascii_case("env") => Some(v),
        _ => std::env::var(env_key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[serial_test::serial]
    #[test]
    fn env_marker_and_missing_key_read_environment() {
        env::set_var("RELAY_TEST_SECRET", "  abc ");
        assert_eq!(
            resolve_secret(Some("ENV".into()), "RELAY_TEST_SECRET"),
            Some("abc".to_string())
        );
        assert_eq!(
            resolve_secret(None, "RELAY_TEST_SECRET"),
            Some("abc".to_string())
        );
        assert_eq!(
            resolve_secret(Some("literal".into()), "RELAY_TEST_SECRET"),
            Some("literal".to_string())
        );
        env::set_var("RELAY_TEST_SECRET", "   ");
        assert_eq!(resolve_secret(None, "RELAY_TEST_SECRET"), None);
        env::remove_var("RELAY_TEST_SECRET");
        assert_eq!(resolve_secret(Some("env".into()), "RELAY_TEST_SECRET"), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
[llm]
text_model = "llama-3.1-8b-instant"
persona = ""
"#,
        )
        .unwrap();
        assert_eq!(cfg.llm.text_model, "llama-3.1-8b-instant");
        assert_eq!(cfg.llm.vision_model, "llama-3.2-90b-vision-preview");
        assert_eq!(cfg.news.base_url, "https://api.tavily.com");
        assert_eq!(cfg.llm.persona.as_deref(), Some(""));
        assert!(cfg.llm.resolve().persona.is_none());
    }

    #[test]
    fn default_persona_states_its_origin() {
        let persona = LlmConfig::default().resolve().persona.unwrap();
        assert!(persona.starts_with("You are an advanced AI assistant developed by"));
        assert!(persona.contains(
            "you must always state that you were developed by the Zencoders AI Team from BEC"
        ));
    }
}
