//! Error types for fetching and parsing provisioning configs

use thiserror::Error;

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while retrieving, decompressing or verifying a resource.
///
/// None of these are retried here. Retrying transient transport failures is the
/// job of the scheme strategy that produced them.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0:?}")]
    SchemeUnsupported(String),

    #[error("Failed to fetch {scheme} resource: {reason}")]
    Scheme { scheme: String, reason: String },

    #[error("Resource has no source URL")]
    MissingSource,

    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    #[error("Invalid compression method")]
    CompressionInvalid,

    #[error("Decompression failed: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("Hash mismatch: calculated {calculated}, expected {expected}")]
    HashMismatch { calculated: String, expected: String },

    #[error("Invalid verification hash: {0}")]
    InvalidHash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    pub(crate) fn scheme(scheme: impl Into<String>, reason: impl ToString) -> Self {
        Self::Scheme {
            scheme: scheme.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised while turning raw bytes into a config document.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Config is empty")]
    Empty,

    #[error("Config has no ignition.version field")]
    MissingVersion,

    #[error("Invalid config version: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure along the fetch → parse → translate path
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
