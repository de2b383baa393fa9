//! A library for fetching arXiv paper metadata and rendering it as a BibTeX
//! citation.
//!
//! Fetching tolerates a temporarily unavailable service (HTTP 503) and transient
//! request or parse failures by retrying with backoff. An identifier the API does
//! not know is reported at once, without retrying.
//!
//! # Example
//! ```rust,no_run
//! use bibfetch::{clients::ArxivClient, format};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let record = ArxivClient::new().fetch_metadata("2301.07041").await;
//!   println!("{}", bibfetch::metadata::to_json(&record)?);
//!   println!("{}", format::format_citation(&record, &Default::default())?);
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)] use tracing_test::traced_test;
use url::Url;

pub mod atom;
pub mod clients;
pub mod errors;
pub mod format;
pub mod metadata;
pub mod retry;

use atom::Namespaces;
pub use clients::ArxivClient;
pub use errors::BibfetchError;
pub use format::CitationConfig;
pub use metadata::Metadata;
use retry::{Attempt, Backoff};
