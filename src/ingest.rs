//! Fetch a config from a URL and bring it up to the current schema

use url::Url;

use crate::error::Result;
use crate::resource::{FetchOptions, Fetcher};
use crate::schema::{self, Config};

/// Fetch `url`, verify it per `opts`, and parse it into the current schema.
pub fn load(fetcher: &Fetcher, url: &Url, opts: &FetchOptions) -> Result<Config> {
    let raw = fetcher.fetch_to_buffer(url, opts)?;
    let config = schema::parse(&raw)?;
    tracing::debug!(scheme = url.scheme(), bytes = raw.len(), "ingested config");
    Ok(config)
}
