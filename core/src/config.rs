use std::{str::FromStr, time::Duration};

use crate::error::ConfigError;
use crate::fallback::fallback;
use crate::generation::GenerationSettings;
use crate::interpret::CompletenessPolicy;


#[derive(Debug, Clone)]
pub struct Config {
    /// `None` is not fatal here; every lookup then fails with a server error.
    pub api_key: Option<String>,
    pub generation: GenerationSettings,
    pub policy: CompletenessPolicy,
    pub expose_error_details: bool,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = GenerationSettings::default();
        let default_policy = CompletenessPolicy::default();

        let timeout_secs = parse(&var, "GENERATION_TIMEOUT_SECS", defaults.timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "GENERATION_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let generation = GenerationSettings {
            endpoint: var("OPENAI_BASE_URL").unwrap_or(defaults.endpoint),
            model: var("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature: parse(&var, "OPENAI_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse(&var, "OPENAI_MAX_TOKENS", defaults.max_tokens)?,
            timeout: Duration::from_secs(timeout_secs),
        };

        let policy = CompletenessPolicy {
            min_total_events: parse(&var, "MIN_TOTAL_EVENTS", default_policy.min_total_events)?,
            require_every_state: parse(&var, "REQUIRE_EVERY_STATE", default_policy.require_every_state)?,
        };

        let available = fallback().total();
        if policy.min_total_events > available {
            return Err(ConfigError::ThresholdAboveFallback {
                min_total: policy.min_total_events,
                available,
            });
        }

        let expose_error_details = var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        Ok(Self {
            api_key: var("OPENAI_API_KEY"),
            generation,
            policy,
            expose_error_details,
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
        })
    }
}

fn parse<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();

        assert!(config.api_key.is_none());
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.generation.max_tokens, 4000);
        assert_eq!(config.generation.timeout, Duration::from_secs(60));
        assert_eq!(config.policy, CompletenessPolicy::default());
        assert!(!config.expose_error_details);
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_TEMPERATURE", "0.2"),
            ("GENERATION_TIMEOUT_SECS", "15"),
            ("MIN_TOTAL_EVENTS", "15"),
            ("REQUIRE_EVERY_STATE", "false"),
            ("APP_ENV", "Development"),
        ]).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.timeout, Duration::from_secs(15));
        assert_eq!(config.policy.min_total_events, 15);
        assert!(!config.policy.require_every_state);
        assert!(config.expose_error_details);
    }

    #[test]
    fn blank_key_is_absent() {
        assert!(config(&[("OPENAI_API_KEY", "  ")]).unwrap().api_key.is_none());
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = config(&[("OPENAI_MAX_TOKENS", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "OPENAI_MAX_TOKENS", .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = config(&[("GENERATION_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "GENERATION_TIMEOUT_SECS", .. }));
        assert!(config(&[("GENERATION_TIMEOUT_SECS", "1")]).is_ok());
    }

    #[test]
    fn rejects_threshold_the_fallback_cannot_meet() {
        let err = config(&[("MIN_TOTAL_EVENTS", "500")]).unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdAboveFallback { min_total: 500, .. }));
    }
}
