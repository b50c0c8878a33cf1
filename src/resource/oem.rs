//! `oem:` URLs resolve to files shipped in the platform's OEM directory

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

use super::{FetchOptions, SchemeFetcher};
use crate::error::FetchError;

/// Reads `oem:///some/file` from beneath a fixed base directory
#[derive(Debug, Clone)]
pub struct OemFetcher {
    base_dir: PathBuf,
}

impl OemFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Map the URL path onto the base directory, refusing anything that would
    /// leave it.
    fn resolve(&self, url: &Url) -> Result<PathBuf, FetchError> {
        let decoded = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|e| FetchError::scheme("oem", e))?;
        let relative = Path::new(decoded.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return Err(FetchError::scheme("oem", "empty path"));
        }
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FetchError::scheme(
                "oem",
                format!("path {:?} escapes the OEM directory", url.path()),
            ));
        }
        Ok(self.base_dir.join(relative))
    }
}

impl SchemeFetcher for OemFetcher {
    fn fetch(&self, url: &Url, _opts: &FetchOptions) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(url)?;
        tracing::debug!(path = %path.display(), "reading OEM resource");
        std::fs::read(&path)
            .map_err(|e| FetchError::scheme("oem", format!("{}: {}", path.display(), e)))
    }
}
