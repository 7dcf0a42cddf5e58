//! Process configuration read from the environment
//!
//! A `.env` file, when present, is loaded into the environment before
//! [`AppConfig::from_env`] runs.

use crate::dispatch::DispatchLimits;
use crate::llm::{RetryPolicy, DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 7860;
const DEFAULT_PERSONA_DIR: &str = "me";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Pushover credentials; both halves are needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushoverConfig {
    pub token: String,
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub persona_name: String,
    pub persona_dir: PathBuf,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// `None` selects the log-only notifier
    pub pushover: Option<PushoverConfig>,
    pub limits: DispatchLimits,
    pub retry: RetryPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let persona_name = get("PERSONA_NAME").ok_or(ConfigError::Missing("PERSONA_NAME"))?;
        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let pushover = match (get("PUSHOVER_TOKEN"), get("PUSHOVER_USER")) {
            (Some(token), Some(user)) => Some(PushoverConfig { token, user }),
            _ => None,
        };

        let max_rounds: u32 = parse_or(&get, "MAX_TOOL_ROUNDS", DispatchLimits::default().max_rounds)?;
        if max_rounds == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_TOOL_ROUNDS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let defaults = DispatchLimits::default();
        let round_secs: u64 = parse_or(&get, "ROUND_TIMEOUT_SECS", defaults.round_timeout.as_secs())?;
        let turn_secs: u64 = parse_or(&get, "TURN_TIMEOUT_SECS", defaults.turn_timeout.as_secs())?;

        let max_attempts: u32 = parse_or(&get, "LLM_MAX_ATTEMPTS", RetryPolicy::default().max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "LLM_MAX_ATTEMPTS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            port: parse_or(&get, "FOLIO_PORT", DEFAULT_PORT)?,
            persona_name,
            persona_dir: get("PERSONA_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_PERSONA_DIR), PathBuf::from),
            api_key,
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            pushover,
            limits: DispatchLimits {
                max_rounds,
                round_timeout: Duration::from_secs(round_secs),
                turn_timeout: Duration::from_secs(turn_secs),
            },
            retry: RetryPolicy {
                max_attempts,
                ..RetryPolicy::default()
            },
        })
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [("PERSONA_NAME", "Jordan Doe"), ("OPENAI_API_KEY", "sk-test")];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.port, 7860);
        assert_eq!(config.persona_name, "Jordan Doe");
        assert_eq!(config.persona_dir, PathBuf::from("me"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.pushover.is_none());
        assert_eq!(config.limits.max_rounds, 8);
        assert_eq!(config.limits.round_timeout, Duration::from_secs(60));
        assert_eq!(config.limits.turn_timeout, Duration::from_secs(180));
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_missing_required() {
        let err = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("PERSONA_NAME"));

        let err = AppConfig::from_lookup(lookup(&[("PERSONA_NAME", "J"), ("OPENAI_API_KEY", " ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("OPENAI_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("FOLIO_PORT", "9000"),
            ("PERSONA_DIR", "/srv/persona"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("PUSHOVER_TOKEN", "tok"),
            ("PUSHOVER_USER", "usr"),
            ("MAX_TOOL_ROUNDS", "3"),
            ("TURN_TIMEOUT_SECS", "30"),
            ("LLM_MAX_ATTEMPTS", "5"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.persona_dir, PathBuf::from("/srv/persona"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(
            config.pushover,
            Some(PushoverConfig {
                token: "tok".to_string(),
                user: "usr".to_string()
            })
        );
        assert_eq!(config.limits.max_rounds, 3);
        assert_eq!(config.limits.turn_timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_partial_pushover_falls_back_to_log() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PUSHOVER_TOKEN", "tok"));
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.pushover.is_none());
    }

    #[test]
    fn test_invalid_numbers() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("FOLIO_PORT", "eighty"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "FOLIO_PORT", .. }));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAX_TOOL_ROUNDS", "0"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MAX_TOOL_ROUNDS", .. }));
    }
}
