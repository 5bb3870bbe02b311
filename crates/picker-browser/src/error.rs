use picker_core::BrowserId;
use thiserror::Error;

/// Failures while reading a browser's on-disk profile store
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid profiles.ini: {0}")]
    Ini(#[from] ini::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a launch request was refused or failed
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid profile name: {0}")]
    InvalidProfileName(String),

    #[error("Browser {0} not found")]
    BrowserNotFound(BrowserId),

    #[error("Profile {profile} not found for browser {browser}")]
    ProfileNotFound { browser: BrowserId, profile: String },

    #[error("Failed to launch {browser}: {source}")]
    Spawn {
        browser: BrowserId,
        #[source]
        source: std::io::Error,
    },
}
