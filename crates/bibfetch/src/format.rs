//! BibTeX rendering of fetched metadata.
//!
//! A citation is an `@article` entry keyed by the first author's surname, the
//! publication year and the part of the arXiv identifier before its first `.`.
//! Rendering is a pure function of the [`Metadata`] and the [`CitationConfig`].
//!
//! # Examples
//!
//! ```
//! use bibfetch::{format, metadata::Metadata};
//!
//! let metadata = Metadata {
//!   id:        "2304.00123".into(),
//!   title:     "A Title".into(),
//!   authors:   vec!["Jane Q. Smith".into(), "John Doe".into()],
//!   published: "2023-04-01T00:00:00Z".into(),
//!   updated:   "2023-04-01T00:00:00Z".into(),
//!   doi:       None,
//!   summary:   String::new(),
//!   links:     vec!["http://arxiv.org/abs/2304.00123v1".into()],
//! };
//!
//! assert_eq!(format::citation_key(&metadata).unwrap(), "Smith20232304");
//!
//! let bibtex = format::format_bibtex(&metadata, &Default::default()).unwrap();
//! assert!(bibtex.starts_with("@article{Smith20232304,"));
//! assert!(bibtex.contains("author = {Jane Q. Smith and John Doe},"));
//! ```

use super::*;

/// Fixed tags written into every citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationConfig {
  /// Value of the `archivePrefix` field
  pub archive_prefix: String,
  /// Subject classification written as `primaryClass`
  pub primary_class:  String,
}

impl Default for CitationConfig {
  fn default() -> Self {
    Self { archive_prefix: "arXiv".to_owned(), primary_class: "cs.LG".to_owned() }
  }
}

/// Derives the citation key `<surname><year><prefix>`.
///
/// The surname is the last whitespace separated token of the first author, the
/// year is the first four characters of `published` and the prefix is the part of
/// the identifier before its first `.`.
///
/// # Errors
///
/// Returns [`BibfetchError::MalformedMetadata`] when there is no usable first
/// author, `published` does not start with a four-digit year, or the identifier
/// has no `.`.
pub fn citation_key(metadata: &Metadata) -> Result<String, BibfetchError> {
  let surname = metadata
    .authors
    .first()
    .and_then(|author| author.split_whitespace().last())
    .ok_or_else(|| BibfetchError::MalformedMetadata("no author to derive a key from".into()))?;

  let year = metadata.year().ok_or_else(|| {
    BibfetchError::MalformedMetadata(format!(
      "published timestamp '{}' does not start with a year",
      metadata.published
    ))
  })?;

  let (prefix, _) = metadata.id.split_once('.').ok_or_else(|| {
    BibfetchError::MalformedMetadata(format!("identifier '{}' has no '.'", metadata.id))
  })?;

  Ok(format!("{surname}{year}{prefix}"))
}

/// Renders `metadata` as a BibTeX `@article` entry.
///
/// # Errors
///
/// Returns [`BibfetchError::MalformedMetadata`] when the key cannot be derived
/// (see [`citation_key`]) or the record has no link to cite.
pub fn format_bibtex(
  metadata: &Metadata,
  config: &CitationConfig,
) -> Result<String, BibfetchError> {
  let key = citation_key(metadata)?;
  // `citation_key` has already checked the year
  let year = metadata.year().unwrap_or_default();
  let url = metadata
    .primary_link()
    .ok_or_else(|| BibfetchError::MalformedMetadata("no link to cite".into()))?;
  let authors = metadata.authors.join(" and ");

  Ok(format!(
    "@article{{{key},
  title = {{{title}}},
  author = {{{authors}}},
  year = {{{year}}},
  eprint = {{{id}}},
  archivePrefix = {{{archive_prefix}}},
  primaryClass = {{{primary_class}}},
  url = {{{url}}}
}}",
    title = metadata.title,
    id = metadata.id,
    archive_prefix = config.archive_prefix,
    primary_class = config.primary_class,
  ))
}

/// Renders the citation for a fetch result.
///
/// A failed fetch has nothing to cite and renders as an empty string.
pub fn format_citation(
  record: &Result<Metadata, BibfetchError>,
  config: &CitationConfig,
) -> Result<String, BibfetchError> {
  match record {
    Ok(metadata) => format_bibtex(metadata, config),
    Err(_) => Ok(String::new()),
  }
}
