//! The records produced by a metadata fetch.
//!
//! A fetch yields either a [`Metadata`] or a [`BibfetchError`]. Both serialize to
//! the JSON shapes the command line front end prints: the metadata object with the
//! keys `arxiv_id, title, authors, published, updated, doi, summary, links`, or an
//! [`ErrorRecord`] of the form `{"error": "..."}`.

use super::*;

/// Bibliographic metadata of a single paper.
///
/// Instances are built by [`ArxivClient::fetch_metadata`] and are always
/// complete: the title is non-empty, there is at least one author and
/// `published` is an RFC 3339 timestamp.
///
/// # Examples
///
/// ```
/// use bibfetch::metadata::Metadata;
///
/// let metadata = Metadata {
///   id:        "2304.00123".into(),
///   title:     "A Title".into(),
///   authors:   vec!["Jane Q. Smith".into()],
///   published: "2023-04-01T00:00:00Z".into(),
///   updated:   "2023-04-02T00:00:00Z".into(),
///   doi:       None,
///   summary:   "An abstract.".into(),
///   links:     vec!["http://arxiv.org/abs/2304.00123v1".into()],
/// };
/// assert_eq!(metadata.year(), Some("2023"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
  /// The identifier the record was requested with, verbatim
  #[serde(rename = "arxiv_id")]
  pub id:        String,
  /// Title with newlines replaced by spaces and outer whitespace trimmed
  pub title:     String,
  /// Author names in document order
  pub authors:   Vec<String>,
  /// Raw publication timestamp
  pub published: String,
  /// Raw timestamp of the latest revision
  pub updated:   String,
  /// DOI without the resolver prefix, if the entry links one
  pub doi:       Option<String>,
  /// Abstract, normalized like the title
  pub summary:   String,
  /// Every link href in document order; the first one is canonical
  pub links:     Vec<String>,
}

impl Metadata {
  /// The four-digit publication year, if `published` starts with one.
  pub fn year(&self) -> Option<&str> {
    self.published.get(..4).filter(|year| year.bytes().all(|b| b.is_ascii_digit()))
  }

  /// The canonical link of the record.
  pub fn primary_link(&self) -> Option<&str> { self.links.first().map(String::as_str) }
}

/// Serializable form of a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
  /// Human readable failure message
  pub error: String,
}

impl From<&BibfetchError> for ErrorRecord {
  fn from(error: &BibfetchError) -> Self { Self { error: error.to_string() } }
}

/// Renders a fetch result as indented JSON, either the metadata object or an
/// [`ErrorRecord`].
pub fn to_json(record: &Result<Metadata, BibfetchError>) -> Result<String, serde_json::Error> {
  match record {
    Ok(metadata) => serde_json::to_string_pretty(metadata),
    Err(error) => serde_json::to_string_pretty(&ErrorRecord::from(error)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Metadata {
    Metadata {
      id:        "2304.00123".into(),
      title:     "Attention Is Enough".into(),
      authors:   vec!["Jane Q. Smith".into(), "John Doe".into()],
      published: "2023-04-01T17:59:59Z".into(),
      updated:   "2023-04-03T09:00:00Z".into(),
      doi:       None,
      summary:   "We show things.".into(),
      links:     vec!["http://arxiv.org/abs/2304.00123v1".into()],
    }
  }

  #[test]
  fn test_json_key_order() {
    let json = to_json(&Ok(sample())).unwrap();
    let keys = ["arxiv_id", "title", "authors", "published", "updated", "doi", "summary", "links"];
    let positions: Vec<usize> =
      keys.iter().map(|key| json.find(&format!("\"{key}\"")).unwrap()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(json.contains("\"doi\": null"));
    assert!(json.starts_with("{\n  \"arxiv_id\": \"2304.00123\""));
  }

  #[test]
  fn test_error_json() {
    let record = Err(BibfetchError::NotFound("9999.99999".into()));
    let json = to_json(&record).unwrap();
    assert_eq!(json, "{\n  \"error\": \"Paper ID '9999.99999' not found or invalid.\"\n}");
  }

  #[test]
  fn test_year() {
    let mut metadata = sample();
    assert_eq!(metadata.year(), Some("2023"));
    metadata.published = "20x3-01-01".into();
    assert_eq!(metadata.year(), None);
    metadata.published = "20".into();
    assert_eq!(metadata.year(), None);
  }
}
