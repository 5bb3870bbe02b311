use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to parse override file: {0}")]
    Overrides(#[from] serde_yaml_ng::Error),

    #[error("Unknown browser: {0}")]
    UnknownBrowser(String),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, Error>;
