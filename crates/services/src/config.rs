use crate::error::ConfigError;

/// Runtime knobs of the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Handle shown by `/help`.
    pub contact: String,
    /// How many recent callback ids are remembered for redelivery checks.
    pub dedup_window: usize,
    /// Number of lock shards in the session store.
    pub session_shards: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            contact: "@quiz_support".to_owned(),
            dedup_window: 1,
            session_shards: 16,
        }
    }
}

impl BotConfig {
    /// Load from `QUIZ_CONTACT`, `QUIZ_DEDUP_WINDOW` and `QUIZ_SESSION_SHARDS`,
    /// falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable is malformed or zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BotConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable is malformed or zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let contact = lookup("QUIZ_CONTACT")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.contact);
        let dedup_window = parse_positive(&lookup, "QUIZ_DEDUP_WINDOW", defaults.dedup_window)?;
        let session_shards =
            parse_positive(&lookup, "QUIZ_SESSION_SHARDS", defaults.session_shards)?;

        Ok(Self {
            contact,
            dedup_window,
            session_shards,
        })
    }
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            raw: raw.clone(),
        })?;
    if value == 0 {
        return Err(ConfigError::Zero { key });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, BotConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("QUIZ_CONTACT", "@physics_help"),
            ("QUIZ_DEDUP_WINDOW", "8"),
            ("QUIZ_SESSION_SHARDS", "4"),
        ]))
        .unwrap();
        assert_eq!(config.contact, "@physics_help");
        assert_eq!(config.dedup_window, 8);
        assert_eq!(config.session_shards, 4);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = BotConfig::from_lookup(lookup_from(&[("QUIZ_DEDUP_WINDOW", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "QUIZ_DEDUP_WINDOW",
                raw: "lots".into()
            }
        );

        let err = BotConfig::from_lookup(lookup_from(&[("QUIZ_SESSION_SHARDS", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::Zero { key: "QUIZ_SESSION_SHARDS" });
    }
}
