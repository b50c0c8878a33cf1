//! Versioned config documents
//!
//! Each schema version is an independent set of types. A document is read in
//! the version it declares and then translated forward one version at a time
//! until it reaches [`SchemaVersion::LATEST`].
//!
//! ```text
//! 3.0.0 ──v3_1::translate──► 3.1.0 ──v3_2::translate──► 3.2.0
//! ```

pub mod v3_0;
pub mod v3_1;
pub mod v3_2;

use serde::Deserialize;

use crate::error::ParseError;
use crate::version::SchemaVersion;

/// The current config type
pub type Config = v3_2::Config;

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    ignition: Option<IgnitionProbe>,
}

#[derive(Deserialize)]
struct IgnitionProbe {
    #[serde(default)]
    version: Option<String>,
}

/// Read the declared schema version of a raw document without parsing the rest
pub fn detect_version(raw: &[u8]) -> Result<SchemaVersion, ParseError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty);
    }
    let probe: VersionProbe = serde_json::from_slice(raw)?;
    let version = probe
        .ignition
        .and_then(|ignition| ignition.version)
        .ok_or(ParseError::MissingVersion)?;
    SchemaVersion::parse(&version)
}

/// Parse a raw document of any supported version into the current schema
pub fn parse(raw: &[u8]) -> Result<Config, ParseError> {
    let version = detect_version(raw)?;
    if !version.is_latest() {
        tracing::info!(from = %version, to = %SchemaVersion::LATEST, "translating config");
    }

    let config = match version {
        SchemaVersion::V3_0 => {
            let cfg: v3_0::Config = serde_json::from_slice(raw)?;
            v3_2::translate::translate(v3_1::translate::translate(cfg))
        }
        SchemaVersion::V3_1 => {
            let cfg: v3_1::Config = serde_json::from_slice(raw)?;
            v3_2::translate::translate(cfg)
        }
        SchemaVersion::V3_2 => {
            let cfg: v3_2::Config = serde_json::from_slice(raw)?;
            v3_2::translate::normalize(cfg)
        }
    };
    Ok(config)
}
