//! Client implementation for fetching paper metadata from arXiv.org.
//!
//! The client queries arXiv's Atom feed API (http://export.arxiv.org/api/query),
//! retries while the service is unavailable or a request fails, and turns the
//! first entry of the feed into [`Metadata`].
//!
//! # Examples
//!
//! ```no_run
//! use bibfetch::clients::ArxivClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArxivClient::new();
//! let metadata = client.fetch_metadata("2301.07041").await?;
//!
//! println!("Title: {}", metadata.title);
//! println!("Authors: {}", metadata.authors.len());
//! # Ok(())
//! # }
//! ```

use std::num::NonZeroU32;

use reqwest::StatusCode;

use super::*;

/// Default query endpoint of the arXiv export API.
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Default number of attempts per fetch.
pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(3) {
  Some(attempts) => attempts,
  None => unreachable!(),
};

/// Client for interacting with the arXiv API.
///
/// Configuration is fixed once the client is built; every call to
/// [`ArxivClient::fetch_metadata`] resolves one identifier with its own attempt
/// budget.
///
/// # Examples
///
/// ```no_run
/// # use std::num::NonZeroU32;
/// # use bibfetch::clients::arxiv::ArxivClient;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ArxivClient::new().with_max_attempts(NonZeroU32::new(5).unwrap());
///
/// let metadata = client.fetch_metadata("2301.07041").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArxivClient {
  /// Internal web client used to connect to the API.
  client:       reqwest::Client,
  /// Query endpoint; the identifier is appended as `?id_list=`.
  endpoint:     String,
  /// Total attempts allowed for one fetch.
  max_attempts: NonZeroU32,
  /// Delays between attempts.
  backoff:      Backoff,
  /// Namespace bindings the response is parsed against.
  namespaces:   Namespaces,
}

impl ArxivClient {
  /// Creates a new arXiv client with the default endpoint, three attempts and
  /// the default backoff.
  pub fn new() -> Self {
    Self {
      client:       reqwest::Client::new(),
      endpoint:     ARXIV_API_URL.to_owned(),
      max_attempts: DEFAULT_MAX_ATTEMPTS,
      backoff:      Backoff::default(),
      namespaces:   Namespaces::default(),
    }
  }

  /// Points the client at a different query endpoint.
  ///
  /// # Errors
  ///
  /// Returns [`BibfetchError::InvalidUrl`] if `endpoint` is not an absolute URL.
  /// Any fragment is dropped; an existing query string is kept and the
  /// identifier is appended to it.
  pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, BibfetchError> {
    let mut url = Url::parse(endpoint)?;
    url.set_fragment(None);
    self.endpoint = url.as_str().trim_end_matches(['?', '&']).to_owned();
    Ok(self)
  }

  /// Sets the number of attempts per fetch.
  pub fn with_max_attempts(mut self, max_attempts: NonZeroU32) -> Self {
    self.max_attempts = max_attempts;
    self
  }

  /// Replaces the delays between attempts.
  pub fn with_backoff(mut self, backoff: Backoff) -> Self {
    self.backoff = backoff;
    self
  }

  /// Replaces the namespace bindings used when parsing responses.
  pub fn with_namespaces(mut self, namespaces: Namespaces) -> Self {
    self.namespaces = namespaces;
    self
  }

  /// The query URL for `identifier`. The identifier is not escaped.
  pub fn query_url(&self, identifier: &str) -> String {
    let separator = if self.endpoint.contains('?') { '&' } else { '?' };
    format!("{}{separator}id_list={identifier}", self.endpoint)
  }

  /// Fetches paper metadata from arXiv using its identifier.
  ///
  /// # Arguments
  ///
  /// * `identifier` - An arXiv paper identifier, e.g. "2301.07041". It is placed into the query
  ///   URL verbatim, so the caller is responsible for making it URL-safe.
  ///
  /// # Errors
  ///
  /// - [`BibfetchError::NotFound`] when arXiv answers with its `Error` entry or no entry at all;
  ///   this is returned after a single request.
  /// - [`BibfetchError::RetriesExhausted`] when every attempt failed to request or parse; it wraps
  ///   the failure of the last attempt.
  /// - [`BibfetchError::Unknown`] when every attempt was answered with a 503.
  pub async fn fetch_metadata(&self, identifier: &str) -> Result<Metadata, BibfetchError> {
    let url = self.query_url(identifier);
    let max_attempts = self.max_attempts.get();

    for attempt in 0..max_attempts {
      debug!("Fetching from arXiv via: {url} (attempt {}/{max_attempts})", attempt + 1);

      match self.attempt(&url, identifier).await {
        Ok(Attempt::Found(metadata)) => return Ok(metadata),
        Ok(Attempt::NotFound) => return Err(BibfetchError::NotFound(identifier.to_owned())),
        Ok(Attempt::Unavailable) => {
          let delay = self.backoff.unavailable_delay(attempt);
          warn!("503 Service Unavailable. Retrying in {}s...", delay.as_secs_f64());
          tokio::time::sleep(delay).await;
        },
        Err(error) if !error.is_retryable() => return Err(error),
        Err(error) if attempt + 1 == max_attempts => {
          warn!("arXiv fetch for {identifier} failed on the final attempt: {error}");
          return Err(BibfetchError::RetriesExhausted {
            attempts: max_attempts,
            source:   Box::new(error),
          });
        },
        Err(error) => {
          debug!("arXiv fetch attempt {} failed: {error}", attempt + 1);
          tokio::time::sleep(self.backoff.error_delay).await;
        },
      }
    }

    Err(BibfetchError::Unknown)
  }

  /// Performs one request and classifies its outcome.
  async fn attempt(&self, url: &str, identifier: &str) -> Result<Attempt, BibfetchError> {
    let response = self.client.get(url).send().await?;

    let status = response.status();
    if status == StatusCode::SERVICE_UNAVAILABLE {
      return Ok(Attempt::Unavailable);
    }
    if !status.is_success() {
      return Err(BibfetchError::HttpStatus(status));
    }

    let body = response.text().await?;
    trace!("arXiv response: {body}");

    match atom::parse_entry(&body, &self.namespaces)? {
      Some(entry) if !entry.is_error() => Ok(Attempt::Found(entry.into_metadata(identifier)?)),
      _ => Ok(Attempt::NotFound),
    }
  }
}

impl Default for ArxivClient {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_query_url() {
    let client = ArxivClient::new();
    assert_eq!(
      client.query_url("2304.00123"),
      "http://export.arxiv.org/api/query?id_list=2304.00123"
    );

    let client = ArxivClient::new().with_endpoint("http://127.0.0.1:8080/api/query").unwrap();
    assert_eq!(
      client.query_url("math.AG/0601001"),
      "http://127.0.0.1:8080/api/query?id_list=math.AG/0601001"
    );
  }

  #[test]
  fn test_query_url_keeps_endpoint_query() {
    let client =
      ArxivClient::new().with_endpoint("http://127.0.0.1:8080/api/query?max_results=1").unwrap();
    assert_eq!(
      client.query_url("2304.00123"),
      "http://127.0.0.1:8080/api/query?max_results=1&id_list=2304.00123"
    );

    let client = ArxivClient::new().with_endpoint("http://127.0.0.1:8080/api/query?#top").unwrap();
    assert_eq!(
      client.query_url("2304.00123"),
      "http://127.0.0.1:8080/api/query?id_list=2304.00123"
    );
  }

  #[test]
  fn test_invalid_endpoint() {
    assert!(matches!(
      ArxivClient::new().with_endpoint("not a url"),
      Err(BibfetchError::InvalidUrl(_))
    ));
  }

  #[ignore = "requires network access to export.arxiv.org"]
  #[tokio::test]
  async fn test_arxiv_entry_fetch() {
    let client = ArxivClient::new();
    let metadata = client.fetch_metadata("2301.07041").await.unwrap();

    dbg!(&metadata);

    assert!(!metadata.title.is_empty());
    assert!(!metadata.authors.is_empty());
    assert_eq!(metadata.id, "2301.07041");
  }
}
