//! Error types for the bibfetch library.
//!
//! Every failure of a fetch or a citation render is represented as a
//! [`BibfetchError`] value. The variants fall into four groups:
//! - Transport and parse failures, which are retried by the client
//! - In-band "not found" answers from the API, which are terminal
//! - Retry exhaustion, which wraps the last failure
//! - Citation key preconditions that the metadata does not meet
//!
//! # Examples
//!
//! ```no_run
//! use bibfetch::{clients::ArxivClient, errors::BibfetchError};
//!
//! # async fn example() -> Result<(), BibfetchError> {
//! match ArxivClient::new().fetch_metadata("9999.99999").await {
//!   Err(BibfetchError::NotFound(id)) => println!("No such paper: {id}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(metadata) => println!("Title: {}", metadata.title),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Errors that can occur while fetching metadata or formatting a citation.
///
/// The `Display` text of each variant is the human readable message that the
/// command line front end reports as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum BibfetchError {
  /// A network request failed before a response was received.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The body could not be read
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The API answered with a non-success status other than 503.
  #[error("HTTP status {0}")]
  HttpStatus(reqwest::StatusCode),

  /// The response body is not well-formed XML.
  #[error(transparent)]
  Xml(#[from] quick_xml::Error),

  /// An attribute inside the response could not be read.
  #[error(transparent)]
  XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

  /// The entry lacks an element (or attribute) every record must carry.
  ///
  /// The string names what was missing, e.g. `"title"` or `"link@href"`.
  #[error("missing expected element: {0}")]
  MissingElement(&'static str),

  /// The `published` timestamp of an entry is not RFC 3339.
  #[error("invalid timestamp: {0}")]
  InvalidTimestamp(#[from] chrono::ParseError),

  /// The API reported in-band that the identifier does not resolve.
  ///
  /// This is never retried.
  #[error("Paper ID '{0}' not found or invalid.")]
  NotFound(String),

  /// Every permitted attempt failed; `source` is the failure of the last one.
  #[error("Failed after {attempts} attempts: {source}")]
  RetriesExhausted {
    /// The attempt budget that was used up
    attempts: u32,
    /// Failure of the final attempt
    #[source]
    source:   Box<BibfetchError>,
  },

  /// The attempt loop ended without producing a record or a failure.
  ///
  /// This only happens when every attempt was answered with a 503.
  #[error("Unknown failure during metadata fetch.")]
  Unknown,

  /// The metadata does not satisfy the preconditions of citation key
  /// derivation (no author, no `.` in the identifier, and so on).
  #[error("Malformed metadata: {0}")]
  MalformedMetadata(String),

  /// A configured endpoint is not a valid URL.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),
}

impl BibfetchError {
  /// Whether a failure of this kind is worth another attempt.
  ///
  /// In-band "not found" answers and the outcomes of the retry loop itself are
  /// final. Everything raised while requesting or parsing is retried.
  pub fn is_retryable(&self) -> bool {
    !matches!(
      self,
      BibfetchError::NotFound(_)
        | BibfetchError::RetriesExhausted { .. }
        | BibfetchError::Unknown
        | BibfetchError::MalformedMetadata(_)
        | BibfetchError::InvalidUrl(_)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages() {
    assert_eq!(
      BibfetchError::NotFound("9999.99999".into()).to_string(),
      "Paper ID '9999.99999' not found or invalid."
    );
    assert_eq!(BibfetchError::Unknown.to_string(), "Unknown failure during metadata fetch.");

    let exhausted = BibfetchError::RetriesExhausted {
      attempts: 3,
      source:   Box::new(BibfetchError::HttpStatus(reqwest::StatusCode::INTERNAL_SERVER_ERROR)),
    };
    assert_eq!(
      exhausted.to_string(),
      "Failed after 3 attempts: HTTP status 500 Internal Server Error"
    );
  }

  #[test]
  fn test_retryable() {
    assert!(BibfetchError::MissingElement("title").is_retryable());
    assert!(BibfetchError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY).is_retryable());
    assert!(!BibfetchError::NotFound("x".into()).is_retryable());
    assert!(!BibfetchError::Unknown.is_retryable());
  }
}
