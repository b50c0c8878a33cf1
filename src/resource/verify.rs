//! Digest verification of fetched content

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

/// Digest algorithms accepted in `verification.hash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Compute the raw digest of `data`
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// Compute the lowercase hex digest of `data`
    pub fn hex_digest(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Split a verification string such as `sha512-c751b0...` into the
    /// algorithm and the raw expected sum.
    pub fn parse_verification(hash: &str) -> Result<(Self, Vec<u8>), FetchError> {
        let (name, sum) = hash
            .split_once('-')
            .ok_or_else(|| FetchError::InvalidHash(format!("missing algorithm prefix in {hash:?}")))?;
        let algorithm: HashAlgorithm = name.parse()?;
        let sum = hex::decode(sum).map_err(|e| FetchError::InvalidHash(e.to_string()))?;
        if sum.len() != algorithm.digest_len() {
            return Err(FetchError::InvalidHash(format!(
                "{} sum must be {} bytes, got {}",
                algorithm,
                algorithm.digest_len(),
                sum.len()
            )));
        }
        Ok((algorithm, sum))
    }
}

impl FromStr for HashAlgorithm {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(FetchError::InvalidHash(format!("unknown algorithm {other:?}"))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check decompressed `data` against an expected raw sum.
///
/// Verification only runs when both the algorithm and the expected sum are
/// present. Sums are compared as lowercase hex, never as raw bytes.
pub fn verify(
    data: &[u8],
    algorithm: Option<HashAlgorithm>,
    expected_sum: Option<&[u8]>,
) -> Result<(), FetchError> {
    let (algorithm, expected_sum) = match (algorithm, expected_sum) {
        (Some(algorithm), Some(sum)) => (algorithm, sum),
        _ => return Ok(()),
    };

    let calculated = algorithm.hex_digest(data);
    let expected = hex::encode(expected_sum);
    if calculated != expected {
        tracing::warn!(%algorithm, %calculated, %expected, "fetched content failed verification");
        return Err(FetchError::HashMismatch { calculated, expected });
    }
    Ok(())
}
