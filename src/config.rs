//! Configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Recognised keys:
//!
//! | Key                    | Values               | Default   |
//! |------------------------|----------------------|-----------|
//! | `FANOUT_DETACH_POLICY` | `lenient`, `strict`  | `lenient` |
//! | `FANOUT_LOG_JSON`      | boolean              | `false`   |
//! | `FANOUT_ECHO_STDOUT`   | boolean              | `true`    |

use crate::domain::DetachPolicy;
use crate::error::ConfigError;

const DETACH_POLICY_KEY: &str = "FANOUT_DETACH_POLICY";

/// Top-level configuration.
///
/// Loaded once at startup via [`FanoutConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutConfig {
    /// How publishers treat detaching a listener that is not attached.
    pub detach_policy: DetachPolicy,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,

    /// Whether subscriber output is echoed to stdout as it is produced.
    pub echo_stdout: bool,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            detach_policy: DetachPolicy::Lenient,
            log_json: false,
            echo_stdout: true,
        }
    }
}

impl FanoutConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `FANOUT_DETACH_POLICY` is
    /// set to something other than `lenient` or `strict`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`FanoutConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let detach_policy = match lookup(DETACH_POLICY_KEY) {
            None => defaults.detach_policy,
            Some(raw) => DetachPolicy::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: DETACH_POLICY_KEY,
                value: raw,
            })?,
        };
        let log_json = parse_bool(lookup("FANOUT_LOG_JSON").as_deref(), defaults.log_json);
        let echo_stdout = parse_bool(
            lookup("FANOUT_ECHO_STDOUT").as_deref(),
            defaults.echo_stdout,
        );

        Ok(Self {
            detach_policy,
            log_json,
            echo_stdout,
        })
    }
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let Ok(config) = FanoutConfig::from_lookup(lookup_from(&[])) else {
            panic!("empty environment must be valid");
        };
        assert_eq!(config, FanoutConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let lookup = lookup_from(&[
            ("FANOUT_DETACH_POLICY", "STRICT"),
            ("FANOUT_LOG_JSON", "1"),
            ("FANOUT_ECHO_STDOUT", "false"),
        ]);
        let Ok(config) = FanoutConfig::from_lookup(lookup) else {
            panic!("valid environment rejected");
        };
        assert_eq!(config.detach_policy, DetachPolicy::Strict);
        assert!(config.log_json);
        assert!(!config.echo_stdout);
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let lookup = lookup_from(&[("FANOUT_DETACH_POLICY", "sometimes")]);
        let Err(ConfigError::InvalidValue { key, value }) = FanoutConfig::from_lookup(lookup) else {
            panic!("expected invalid value error");
        };
        assert_eq!(key, "FANOUT_DETACH_POLICY");
        assert_eq!(value, "sometimes");
    }

    #[test]
    fn unparseable_bool_falls_back() {
        assert!(parse_bool(Some("yes please"), true));
        assert!(!parse_bool(None, false));
        assert!(parse_bool(Some("TRUE"), false));
    }
}
