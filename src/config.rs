//! Parser configuration

use crate::error::{Error, Result};

/// Default cap on reported errors per parse
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// Default bound on how far a probe may look ahead
pub const DEFAULT_MAX_LOOKAHEAD: usize = 64;

pub const ENV_MAX_ERRORS: &str = "QUILL_PARSE_MAX_ERRORS";
pub const ENV_DIET: &str = "QUILL_PARSE_DIET";
pub const ENV_MAX_LOOKAHEAD: &str = "QUILL_PARSE_MAX_LOOKAHEAD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Errors reported after this many are dropped
    pub max_errors: usize,
    /// Skip function bodies by brace counting
    pub diet: bool,
    /// Token limit for disambiguation probes
    pub max_lookahead: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
            diet: false,
            max_lookahead: DEFAULT_MAX_LOOKAHEAD,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `QUILL_PARSE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_MAX_ERRORS) {
            config.max_errors = value
                .trim()
                .parse()
                .map_err(|_| Error::config_error(ENV_MAX_ERRORS, value.clone()))?;
        }
        if let Some(value) = lookup(ENV_DIET) {
            config.diet = match value.trim() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(Error::config_error(ENV_DIET, value.clone())),
            };
        }
        if let Some(value) = lookup(ENV_MAX_LOOKAHEAD) {
            config.max_lookahead = match value.trim().parse() {
                Ok(n) if n > 0 => n,
                _ => return Err(Error::config_error(ENV_MAX_LOOKAHEAD, value.clone())),
            };
        }
        Ok(config)
    }

    pub fn with_diet(mut self, diet: bool) -> Self {
        self.diet = diet;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn with_max_lookahead(mut self, max_lookahead: usize) -> Self {
        self.max_lookahead = max_lookahead;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = ParserConfig::from_lookup(|_| None).expect("defaults");
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = ParserConfig::from_lookup(lookup_from(&[
            (ENV_MAX_ERRORS, "3"),
            (ENV_DIET, "true"),
            (ENV_MAX_LOOKAHEAD, "16"),
        ]))
        .expect("valid overrides");
        assert_eq!(config.max_errors, 3);
        assert!(config.diet);
        assert_eq!(config.max_lookahead, 16);
    }

    #[test]
    fn malformed_value_is_a_config_error() {
        let err = ParserConfig::from_lookup(lookup_from(&[(ENV_MAX_ERRORS, "many")])).unwrap_err();
        assert!(matches!(err, Error::Config { ref key, .. } if key == ENV_MAX_ERRORS));
    }
}
