//! Provisioning Config Ingestion
//!
//! Obtains the declarative config a freshly booted machine is provisioned
//! from, and brings it to the current schema version before anything acts on
//! it.
//!
//! ## Features
//!
//! - **Verified Fetch**: URLs are dispatched by scheme, decompressed and
//!   checked against an expected digest; nothing unverified reaches the caller
//! - **Inline Data**: `data:` URLs with percent-encoded or base64 payloads
//! - **Schema Translation**: older documents are translated field by field into
//!   the current schema, with explicit overrides where versions diverge
//!
//! ## Architecture
//!
//! ```text
//! url ─► resource::Fetcher ─► bytes ─► schema::parse ─► v3_x::Config
//!                                                         │
//!                                     translate::Translator (per version pair)
//!                                                         ▼
//!                                                   v3_2::Config
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod resource;
pub mod schema;
pub mod translate;
pub mod version;

pub use config::Settings;
pub use error::{Error, FetchError, ParseError, Result};
pub use resource::{FetchOptions, Fetcher, HashAlgorithm, SchemeFetcher};
pub use schema::Config;
pub use translate::{TranslateFrom, Translator};
pub use version::SchemaVersion;
