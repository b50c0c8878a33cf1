//! Config schema versions

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;

/// Every config schema version this crate can read, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    V3_0,
    V3_1,
    V3_2,
}

impl SchemaVersion {
    /// The version all documents are normalized to
    pub const LATEST: SchemaVersion = SchemaVersion::V3_2;

    pub const ALL: [SchemaVersion; 3] = [SchemaVersion::V3_0, SchemaVersion::V3_1, SchemaVersion::V3_2];

    /// Parse the `ignition.version` string of a document.
    ///
    /// Only the exact canonical strings are accepted; prerelease tags and
    /// patch levels other than zero are rejected.
    pub fn parse(version_str: &str) -> Result<Self, ParseError> {
        let version = Version::parse(version_str)?;
        if !version.pre.is_empty() || !version.build.is_empty() || version.patch != 0 {
            return Err(ParseError::UnsupportedVersion(version_str.to_string()));
        }
        match (version.major, version.minor) {
            (3, 0) => Ok(SchemaVersion::V3_0),
            (3, 1) => Ok(SchemaVersion::V3_1),
            (3, 2) => Ok(SchemaVersion::V3_2),
            _ => Err(ParseError::UnsupportedVersion(version_str.to_string())),
        }
    }

    /// Canonical version string stamped into documents of this schema
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V3_0 => "3.0.0",
            SchemaVersion::V3_1 => "3.1.0",
            SchemaVersion::V3_2 => "3.2.0",
        }
    }

    pub fn semver(&self) -> Version {
        match self {
            SchemaVersion::V3_0 => Version::new(3, 0, 0),
            SchemaVersion::V3_1 => Version::new(3, 1, 0),
            SchemaVersion::V3_2 => Version::new(3, 2, 0),
        }
    }

    /// The version a document of this schema translates into, if any
    pub fn next(&self) -> Option<SchemaVersion> {
        match self {
            SchemaVersion::V3_0 => Some(SchemaVersion::V3_1),
            SchemaVersion::V3_1 => Some(SchemaVersion::V3_2),
            SchemaVersion::V3_2 => None,
        }
    }

    pub fn is_latest(&self) -> bool {
        *self == Self::LATEST
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
