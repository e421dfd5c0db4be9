//! Engine settings.

mod error;

use serde::Deserialize;

pub use error::SettingsError;

/// Nesting limit applied when no setting overrides it.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// What happens to raw keys no declaration matches when a context is given.
///
/// Without a context unmatched keys are always passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnhandledKeys {
    /// Leave the key out of the output.
    #[default]
    Drop,
    /// Fail with [`DecantError::UnhandledKeys`](crate::DecantError::UnhandledKeys).
    Reject,
}

/// Tunables read by the dispatch engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Deepest association nesting accepted before decanting fails.
    pub max_depth: usize,
    pub unhandled_keys: UnhandledKeys,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            unhandled_keys: UnhandledKeys::default(),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text, filling unset keys with defaults.
    ///
    /// ```
    /// use decanter::{Settings, UnhandledKeys};
    ///
    /// let settings = Settings::from_toml_str("unhandled_keys = \"reject\"").unwrap();
    /// assert_eq!(settings.unhandled_keys, UnhandledKeys::Reject);
    /// assert_eq!(settings.max_depth, decanter::settings::DEFAULT_MAX_DEPTH);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks values serde cannot rule out on its own.
    ///
    /// A `max_depth` of zero would reject every association before it is
    /// looked at.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_depth == 0 {
            return Err(SettingsError::ZeroMaxDepth);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_toml_str(
            r#"
            max_depth = 4
            unhandled_keys = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(settings.max_depth, 4);
        assert_eq!(settings.unhandled_keys, UnhandledKeys::Reject);
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let result = Settings::from_toml_str("max_depth = 0");
        assert!(matches!(result, Err(SettingsError::ZeroMaxDepth)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Settings::from_toml_str("max_dept = 4");
        assert!(matches!(result, Err(SettingsError::Deserialize(_))));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result = Settings::from_toml_str(r#"unhandled_keys = "ignore""#);
        assert!(matches!(result, Err(SettingsError::Deserialize(_))));
    }
}
