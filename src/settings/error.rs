use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("max_depth must be at least 1")]
    ZeroMaxDepth,

    #[error("failed to deserialize settings: {0}")]
    Deserialize(#[from] toml::de::Error),
}
