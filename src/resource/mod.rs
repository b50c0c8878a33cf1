//! Verified resource fetching
//!
//! A URL is dispatched to a retrieval strategy by scheme, the returned bytes are
//! decompressed, then checked against the expected digest. Only bytes that made
//! it through every stage are written to the caller's sink.
//!
//! ```text
//! url ──► SchemeFetcher ──► decompress ──► verify ──► sink
//! ```

pub mod compression;
pub mod data_url;
pub mod oem;
pub mod verify;

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::FetchSettings;
use crate::error::FetchError;
use crate::schema::v3_2;

pub use compression::{decompress, Compression};
pub use data_url::DataUrlFetcher;
pub use oem::OemFetcher;
pub use verify::{verify, HashAlgorithm};

/// How fetched bytes should be interpreted and validated.
///
/// `headers` and `timeout` are handed to the scheme strategy untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Digest algorithm used to verify the decompressed content
    pub hash: Option<HashAlgorithm>,
    /// Expected raw digest; only checked together with `hash`
    pub expected_sum: Option<Vec<u8>>,
    /// Declared compression codec (`gzip`), or none
    pub compression: Option<String>,
    /// Extra request headers for network strategies
    pub headers: Vec<(String, String)>,
    /// Transport timeout for network strategies
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    /// Options for a current-schema resource reference
    pub fn from_resource(resource: &v3_2::Resource) -> Result<Self, FetchError> {
        let (hash, expected_sum) = match resource.verification.hash.as_deref() {
            Some(hash) => {
                let (algorithm, sum) = HashAlgorithm::parse_verification(hash)?;
                (Some(algorithm), Some(sum))
            }
            None => (None, None),
        };
        Ok(Self {
            hash,
            expected_sum,
            compression: resource.compression.clone(),
            headers: resource
                .http_headers
                .iter()
                .map(|h| (h.name.clone(), h.value.clone().unwrap_or_default()))
                .collect(),
            timeout: None,
        })
    }

    pub fn with_verification(mut self, hash: HashAlgorithm, expected_sum: Vec<u8>) -> Self {
        self.hash = Some(hash);
        self.expected_sum = Some(expected_sum);
        self
    }

    pub fn with_compression(mut self, codec: impl Into<String>) -> Self {
        self.compression = Some(codec.into());
        self
    }

    fn verifies(&self) -> bool {
        self.hash.is_some() && self.expected_sum.is_some()
    }
}

/// A retrieval strategy for one URL scheme.
///
/// Implementations return the raw (possibly compressed) bytes. Retries and
/// timeouts for flaky transports belong in the implementation.
pub trait SchemeFetcher: Send + Sync {
    fn fetch(&self, url: &Url, opts: &FetchOptions) -> Result<Vec<u8>, FetchError>;
}

/// Dispatches URLs to scheme strategies and runs the verification pipeline
#[derive(Clone)]
pub struct Fetcher {
    schemes: HashMap<String, Arc<dyn SchemeFetcher>>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// A fetcher that understands inline `data:` URLs only
    pub fn new() -> Self {
        let mut fetcher = Self {
            schemes: HashMap::new(),
        };
        fetcher.register("data", DataUrlFetcher);
        fetcher
    }

    /// A fetcher with the built-in strategies enabled by `settings`
    pub fn from_settings(settings: &FetchSettings) -> Self {
        let mut fetcher = Self {
            schemes: HashMap::new(),
        };
        for scheme in &settings.enabled_schemes {
            match scheme.as_str() {
                "data" => fetcher.register("data", DataUrlFetcher),
                "oem" => fetcher.register("oem", OemFetcher::new(&settings.oem_dir)),
                other => tracing::warn!(scheme = other, "no built-in strategy for scheme"),
            }
        }
        fetcher
    }

    /// Install (or replace) the strategy for `scheme`
    pub fn register(&mut self, scheme: impl Into<String>, strategy: impl SchemeFetcher + 'static) {
        self.schemes.insert(scheme.into(), Arc::new(strategy));
    }

    pub fn supports(&self, scheme: &str) -> bool {
        self.schemes.contains_key(scheme)
    }

    /// Fetch `url` and append the verified, decompressed bytes to `sink`.
    ///
    /// Nothing is written to `sink` unless every stage succeeds.
    pub fn fetch<W: Write + ?Sized>(
        &self,
        url: &Url,
        sink: &mut W,
        opts: &FetchOptions,
    ) -> Result<(), FetchError> {
        let data = self.fetch_to_buffer(url, opts)?;
        sink.write_all(&data)?;
        Ok(())
    }

    /// Fetch `url` and return the verified, decompressed bytes
    pub fn fetch_to_buffer(&self, url: &Url, opts: &FetchOptions) -> Result<Vec<u8>, FetchError> {
        let strategy = self
            .schemes
            .get(url.scheme())
            .ok_or_else(|| FetchError::SchemeUnsupported(url.scheme().to_string()))?;

        tracing::debug!(
            scheme = url.scheme(),
            compression = opts.compression.as_deref().unwrap_or("none"),
            verify = opts.verifies(),
            "fetching resource"
        );

        let raw = strategy.fetch(url, opts)?;
        let data = decompress(raw, opts.compression.as_deref())?;
        verify(&data, opts.hash, opts.expected_sum.as_deref())?;
        Ok(data)
    }

    /// Fetch a current-schema resource reference into `sink`
    pub fn fetch_resource<W: Write + ?Sized>(
        &self,
        resource: &v3_2::Resource,
        sink: &mut W,
    ) -> Result<(), FetchError> {
        let source = resource
            .source
            .as_deref()
            .ok_or(FetchError::MissingSource)?;
        let url = Url::parse(source)?;
        let opts = FetchOptions::from_resource(resource)?;
        self.fetch(&url, sink, &opts)
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut schemes: Vec<_> = self.schemes.keys().collect();
        schemes.sort();
        f.debug_struct("Fetcher").field("schemes", &schemes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    impl SchemeFetcher for Counting {
        fn fetch(&self, _url: &Url, _opts: &FetchOptions) -> Result<Vec<u8>, FetchError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(b"from network".to_vec())
        }
    }

    #[test]
    fn test_unknown_scheme() {
        let fetcher = Fetcher::new();
        let url = Url::parse("https://example.com/config.ign").unwrap();
        let mut sink = Vec::new();
        match fetcher.fetch(&url, &mut sink, &FetchOptions::default()) {
            Err(FetchError::SchemeUnsupported(scheme)) => assert_eq!(scheme, "https"),
            other => panic!("Expected SchemeUnsupported, got {:?}", other),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_registered_strategy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut fetcher = Fetcher::new();
        fetcher.register("https", Counting(calls.clone()));

        let url = Url::parse("https://example.com/config.ign").unwrap();
        let data = fetcher.fetch_to_buffer(&url, &FetchOptions::default()).unwrap();
        assert_eq!(data, b"from network");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_is_appended() {
        let fetcher = Fetcher::new();
        let url = Url::parse("data:,world").unwrap();
        let mut sink = b"hello ".to_vec();
        fetcher.fetch(&url, &mut sink, &FetchOptions::default()).unwrap();
        assert_eq!(sink, b"hello world");
    }

    #[test]
    fn test_from_settings() {
        let settings = FetchSettings {
            enabled_schemes: vec!["oem".to_string(), "tftp".to_string()],
            ..FetchSettings::default()
        };
        let fetcher = Fetcher::from_settings(&settings);
        assert!(fetcher.supports("oem"));
        assert!(!fetcher.supports("data"));
        assert!(!fetcher.supports("tftp"));
    }

    #[test]
    fn test_options_from_resource() {
        let resource = v3_2::Resource {
            source: Some("data:,x".to_string()),
            compression: Some("gzip".to_string()),
            http_headers: vec![v3_2::HttpHeader {
                name: "X-Token".to_string(),
                value: Some("abc".to_string()),
            }],
            verification: v3_2::Verification {
                hash: Some(format!("sha256-{}", HashAlgorithm::Sha256.hex_digest(b"x"))),
            },
        };
        let opts = FetchOptions::from_resource(&resource).unwrap();
        assert_eq!(opts.hash, Some(HashAlgorithm::Sha256));
        assert_eq!(opts.compression.as_deref(), Some("gzip"));
        assert_eq!(opts.headers, vec![("X-Token".to_string(), "abc".to_string())]);
        assert_eq!(opts.expected_sum, Some(HashAlgorithm::Sha256.digest(b"x")));
    }

    #[test]
    fn test_fetch_resource() {
        let fetcher = Fetcher::new();
        let resource = v3_2::Resource {
            source: Some("data:,x".to_string()),
            verification: v3_2::Verification {
                hash: Some(format!("sha512-{}", HashAlgorithm::Sha512.hex_digest(b"x"))),
            },
            ..Default::default()
        };
        let mut sink = Vec::new();
        fetcher.fetch_resource(&resource, &mut sink).unwrap();
        assert_eq!(sink, b"x");
    }

    #[test]
    fn test_fetch_resource_without_source() {
        let fetcher = Fetcher::new();
        let mut sink = Vec::new();
        let err = fetcher
            .fetch_resource(&v3_2::Resource::default(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, FetchError::MissingSource));
        assert_eq!(err.to_string(), "Resource has no source URL");
        assert!(sink.is_empty());
    }
}
