use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, LLMProvider};
use crate::infrastructure::security::keyring::KeyringManager;

pub const ENV_PREFIX: &str = "EMPLOYEE_DIGEST_";
pub const CONFIG_PATH_ENV: &str = "EMPLOYEE_DIGEST_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "employee-digest.toml";
pub const KEYRING_SERVICE: &str = "employee-digest";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    pub input_path: PathBuf,
    #[validate(length(min = 1))]
    pub log_filter: String,
    #[validate(nested)]
    pub llm: LLMConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("employee_data.xlsx"),
            log_filter: "info".to_string(),
            llm: LLMConfig::default(),
        }
    }
}

/// Layered settings (defaults, TOML file, environment) plus credential lookup
pub struct ConfigService {
    figment: Figment,
    keyring: KeyringManager,
}

impl ConfigService {
    pub fn new() -> Self {
        let config_file = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self {
            figment,
            keyring: KeyringManager::new(KEYRING_SERVICE),
        }
    }

    #[cfg(test)]
    fn with_keyring(mut self, keyring: KeyringManager) -> Self {
        self.keyring = keyring;
        self
    }

    pub fn load(&self) -> Result<AppConfig> {
        let mut config: AppConfig = self.figment.extract()?;

        // A provider switch without an explicit endpoint keeps the OpenAI URL otherwise
        let openai_default = LLMProvider::OpenAI.default_base_url();
        if config.llm.base_url.trim().is_empty()
            || (config.llm.provider != LLMProvider::OpenAI && config.llm.base_url == openai_default)
        {
            config.llm.base_url = config.llm.provider.default_base_url().to_string();
        }

        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        debug!(
            input_path = %config.input_path.display(),
            provider = config.llm.provider.name(),
            model = %config.llm.model,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Credential for `config.provider`: explicit config value, then the
    /// provider's conventional environment variable, then the OS keyring.
    pub fn resolve_api_key(&self, config: &LLMConfig) -> Result<String> {
        self.resolve_api_key_with(config, |name| std::env::var(name).ok())
    }

    fn resolve_api_key_with<F>(&self, config: &LLMConfig, lookup_env: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: String| {
            let trimmed = value.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        };

        if let Some(key) = config.api_key.clone().and_then(non_empty) {
            debug!(source = "config", "Using configured API key");
            return Ok(key);
        }

        let env_name = config.provider.api_key_env();
        if let Some(key) = lookup_env(env_name).and_then(non_empty) {
            debug!(source = env_name, "Using API key from environment");
            return Ok(key);
        }

        self.keyring
            .get_secret(config.provider.name())
            .ok()
            .and_then(non_empty)
            .ok_or_else(|| {
                AppError::SecurityError(format!(
                    "No API key for {}. Set {}{} or {}, or store it in the '{}' keyring service",
                    config.provider.name(),
                    ENV_PREFIX,
                    "LLM__API_KEY",
                    env_name,
                    self.keyring.service()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_toml(toml: &str) -> ConfigService {
        ConfigService::from_figment(
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(toml)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = service_with_toml("").load().unwrap();
        assert_eq!(config.input_path, PathBuf::from("employee_data.xlsx"));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
        assert_eq!(config.llm.max_tokens, Some(150));
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_toml_overrides() {
        let config = service_with_toml(
            r#"
            input_path = "data/staff.csv"

            [llm]
            model = "gpt-4o-mini-instruct"
            max_tokens = 64
            "#,
        )
        .load()
        .unwrap();

        assert_eq!(config.input_path, PathBuf::from("data/staff.csv"));
        assert_eq!(config.llm.model, "gpt-4o-mini-instruct");
        assert_eq!(config.llm.max_tokens, Some(64));
    }

    #[test]
    fn test_provider_switch_picks_provider_endpoint() {
        let config = service_with_toml("[llm]\nprovider = \"gemini\"\nmodel = \"gemini-1.5-flash\"")
            .load()
            .unwrap();
        assert_eq!(
            config.llm.base_url,
            LLMProvider::Gemini.default_base_url()
        );
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = service_with_toml("[llm]\nmax_tokens = 0").load().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = service_with_toml("[llm]\nprovider = \"nope\"").load().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_configured_key_wins() {
        let service = service_with_toml("");
        let config = LLMConfig::default().with_api_key(" from-config ");
        let key = service
            .resolve_api_key_with(&config, |_| Some("from-env".to_string()))
            .unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_provider_env_var_used_when_unconfigured() {
        let service = service_with_toml("");
        let config = LLMConfig::default();
        let key = service
            .resolve_api_key_with(&config, |name| {
                (name == "OPENAI_API_KEY").then(|| "from-env".to_string())
            })
            .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_missing_key_everywhere_is_security_error() {
        let service = service_with_toml("")
            .with_keyring(KeyringManager::new("employee-digest-test-absent"));
        let err = service
            .resolve_api_key_with(&LLMConfig::default(), |_| None)
            .unwrap_err();

        match err {
            AppError::SecurityError(msg) => {
                assert!(msg.starts_with("No API key for openai."));
                assert!(msg.contains("EMPLOYEE_DIGEST_LLM__API_KEY"));
                assert!(msg.contains("OPENAI_API_KEY"));
                assert!(msg.contains("'employee-digest-test-absent'"));
            }
            other => panic!("expected SecurityError, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_env_value_does_not_count() {
        let service = service_with_toml("")
            .with_keyring(KeyringManager::new("employee-digest-test-absent"));
        let err = service
            .resolve_api_key_with(&LLMConfig::default(), |_| Some("   ".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::SecurityError(_)));
    }

    #[test]
    fn test_environment_overrides_file_and_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                input_path = "from-file.csv"

                [llm]
                model = "file-model"
                "#,
            )?;
            jail.set_env("EMPLOYEE_DIGEST_CONFIG", "custom.toml");
            jail.set_env("EMPLOYEE_DIGEST_LLM__MODEL", "env-model");
            jail.set_env("EMPLOYEE_DIGEST_LLM__API_KEY", "env-key");

            let service = ConfigService::new();
            let config = service.load().map_err(|e| e.to_string())?;

            assert_eq!(config.input_path, PathBuf::from("from-file.csv"));
            assert_eq!(config.llm.model, "env-model");
            assert_eq!(config.llm.api_key.as_deref(), Some("env-key"));
            assert_eq!(
                service.resolve_api_key(&config.llm).map_err(|e| e.to_string())?,
                "env-key"
            );
            Ok(())
        });
    }

    #[test]
    fn test_config_path_variable_is_not_a_setting() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("EMPLOYEE_DIGEST_CONFIG", "absent.toml");
            jail.set_env("EMPLOYEE_DIGEST_LOG_FILTER", "debug");

            let service = ConfigService::new();
            let config = service.load().map_err(|e| e.to_string())?;
            assert_eq!(config.log_filter, "debug");
            assert_eq!(config.input_path, PathBuf::from("employee_data.xlsx"));
            assert!(service.figment.find_value("config").is_err());
            Ok(())
        });
    }
}
