//! Inline `data:` URLs
//!
//! Only the shape `data:<media-params>,<payload>` is interpreted. When the
//! parameter list ends in `;base64` the payload is standard base64, otherwise it
//! is percent-encoded text. The media type itself is ignored.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::percent_decode_str;
use url::{Position, Url};

use super::{FetchOptions, SchemeFetcher};
use crate::error::FetchError;

/// Scheme strategy for payloads embedded in the URL itself
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlFetcher;

impl SchemeFetcher for DataUrlFetcher {
    fn fetch(&self, url: &Url, _opts: &FetchOptions) -> Result<Vec<u8>, FetchError> {
        decode_data_url(url)
    }
}

/// Decode the payload of a `data:` URL
pub fn decode_data_url(url: &Url) -> Result<Vec<u8>, FetchError> {
    // Everything after "data:" up to the fragment
    decode_opaque(&url[Position::BeforePath..Position::AfterQuery])
}

/// Decode the opaque part (`<media-params>,<payload>`) of a `data:` URL
pub fn decode_opaque(opaque: &str) -> Result<Vec<u8>, FetchError> {
    let (params, payload) = opaque
        .split_once(',')
        .ok_or_else(|| FetchError::DataUrl("missing ',' separator".to_string()))?;

    // Media-type parameters are case-insensitive
    if params.to_ascii_lowercase().ends_with(";base64") {
        // Payload may itself be percent-encoded when it carries '=' padding
        let payload: Vec<u8> = percent_decode_str(payload).collect();
        STANDARD
            .decode(payload)
            .map_err(|e| FetchError::DataUrl(format!("bad base64 payload: {e}")))
    } else {
        Ok(percent_decode_str(payload).collect())
    }
}
