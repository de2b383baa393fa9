//! Namespace-aware parsing of the arXiv Atom feed.
//!
//! The arXiv export API answers with an Atom document whose entries mix elements
//! of the Atom namespace with elements of arXiv's own extension namespace. Elements
//! are matched by resolved namespace and local name, so the prefixes used in the
//! document do not matter and extension elements such as `<arxiv:doi>` never stand
//! in for their Atom namesakes.
//!
//! Only the first `entry` of the feed is read.
//!
//! # Examples
//!
//! ```
//! use bibfetch::atom::{parse_entry, Namespaces};
//!
//! let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
//!   <entry><title>Error</title></entry>
//! </feed>"#;
//!
//! let entry = parse_entry(xml, &Namespaces::default()).unwrap().unwrap();
//! assert!(entry.is_error());
//! ```

use quick_xml::{
  events::{BytesStart, Event},
  name::{Namespace, ResolveResult},
  reader::NsReader,
};

use super::*;

/// Namespace of the Atom syndication format.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Namespace of arXiv's Atom extension elements.
pub const ARXIV_NAMESPACE: &str = "http://arxiv.org/schemas/atom";

/// Resolver prefix removed from DOI links.
pub const DOI_RESOLVER_PREFIX: &str = "http://dx.doi.org/";

/// The namespace bindings a response is parsed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
  /// URI of the Atom namespace
  pub atom:  String,
  /// URI of the provider extension namespace
  pub arxiv: String,
}

impl Default for Namespaces {
  fn default() -> Self {
    Self { atom: ATOM_NAMESPACE.to_owned(), arxiv: ARXIV_NAMESPACE.to_owned() }
  }
}

/// A `link` element of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
  /// Target of the link
  pub href:  Option<String>,
  /// The `title` attribute; arXiv marks DOI links with `title="doi"`
  pub title: Option<String>,
}

/// The raw contents of a feed entry, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
  /// Text of `atom:title`
  pub title:     Option<String>,
  /// Text of `atom:summary`
  pub summary:   Option<String>,
  /// Text of `atom:published`
  pub published: Option<String>,
  /// Text of `atom:updated`
  pub updated:   Option<String>,
  /// Text of each `atom:author/atom:name`
  pub authors:   Vec<String>,
  /// Every `atom:link`
  pub links:     Vec<Link>,
}

impl Entry {
  /// Whether this is the placeholder entry arXiv returns for unknown ids.
  ///
  /// The API reports a bad identifier in-band, with an entry titled `Error`.
  pub fn is_error(&self) -> bool {
    self.title.as_deref().is_some_and(|title| normalize(title) == "Error")
  }

  /// The DOI of the last link titled `doi`, with the resolver prefix removed.
  pub fn doi(&self) -> Result<Option<String>, BibfetchError> {
    match self.links.iter().rev().find(|link| link.title.as_deref() == Some("doi")) {
      Some(link) => {
        let href = link.href.as_deref().ok_or(BibfetchError::MissingElement("link@href"))?;
        Ok(Some(href.strip_prefix(DOI_RESOLVER_PREFIX).unwrap_or(href).to_owned()))
      },
      None => Ok(None),
    }
  }

  /// Validates the entry and turns it into [`Metadata`] for `identifier`.
  ///
  /// # Errors
  ///
  /// Returns [`BibfetchError::MissingElement`] when a required element is absent
  /// (or the title is blank, or there are no authors) and
  /// [`BibfetchError::InvalidTimestamp`] when `published` is not RFC 3339.
  pub fn into_metadata(self, identifier: &str) -> Result<Metadata, BibfetchError> {
    let doi = self.doi()?;

    let title = normalize(self.title.as_deref().ok_or(BibfetchError::MissingElement("title"))?);
    if title.is_empty() {
      return Err(BibfetchError::MissingElement("title"));
    }
    let summary =
      normalize(self.summary.as_deref().ok_or(BibfetchError::MissingElement("summary"))?);
    let published = self.published.as_deref().ok_or(BibfetchError::MissingElement("published"))?;
    let published = published.trim().to_owned();
    DateTime::parse_from_rfc3339(&published)?;
    let updated = self.updated.as_deref().ok_or(BibfetchError::MissingElement("updated"))?;
    let updated = updated.trim().to_owned();

    if self.authors.is_empty() {
      return Err(BibfetchError::MissingElement("author"));
    }

    let links = self
      .links
      .into_iter()
      .map(|link| link.href.ok_or(BibfetchError::MissingElement("link@href")))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Metadata {
      id: identifier.to_owned(),
      title,
      authors: self.authors,
      published,
      updated,
      doi,
      summary,
      links,
    })
  }
}

/// Replaces newlines with spaces and trims the ends.
///
/// `\r\n` and a lone `\r` count as one newline, as XML line-end handling would
/// have it.
pub fn normalize(text: &str) -> String {
  text.trim().replace("\r\n", "\n").replace(['\r', '\n'], " ")
}

/// Where an element sits in the parts of the document we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
  /// `atom:feed` at the document root
  Feed,
  /// `atom:entry` under the feed
  Entry,
  /// `atom:title` under the entry
  Title,
  /// `atom:summary` under the entry
  Summary,
  /// `atom:published` under the entry
  Published,
  /// `atom:updated` under the entry
  Updated,
  /// `atom:author` under the entry
  Author,
  /// `atom:name` under an author
  Name,
  /// `atom:link` under the entry
  Link,
  /// Anything in the extension namespace
  Extension,
  /// Everything else
  Other,
}

impl Element {
  /// Elements whose text content is collected.
  fn captures_text(self) -> bool {
    matches!(
      self,
      Element::Title | Element::Summary | Element::Published | Element::Updated | Element::Name
    )
  }
}

/// Classifies an element by its resolved namespace, local name and parent.
fn classify(
  namespace: &ResolveResult,
  start: &BytesStart,
  parent: Option<Element>,
  namespaces: &Namespaces,
) -> Element {
  let bound_to =
    |uri: &str| matches!(namespace, ResolveResult::Bound(Namespace(ns)) if *ns == uri.as_bytes());

  if bound_to(&namespaces.arxiv) {
    return Element::Extension;
  }
  if !bound_to(&namespaces.atom) {
    return Element::Other;
  }

  match (parent, start.local_name().as_ref()) {
    (None, b"feed") => Element::Feed,
    (Some(Element::Feed), b"entry") => Element::Entry,
    (Some(Element::Entry), b"title") => Element::Title,
    (Some(Element::Entry), b"summary") => Element::Summary,
    (Some(Element::Entry), b"published") => Element::Published,
    (Some(Element::Entry), b"updated") => Element::Updated,
    (Some(Element::Entry), b"author") => Element::Author,
    (Some(Element::Entry), b"link") => Element::Link,
    (Some(Element::Author), b"name") => Element::Name,
    _ => Element::Other,
  }
}

/// Reads the `href` and `title` attributes of a link element.
fn read_link(start: &BytesStart) -> Result<Link, BibfetchError> {
  let attribute = |key: &str| -> Result<Option<String>, BibfetchError> {
    match start.try_get_attribute(key)? {
      Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
      None => Ok(None),
    }
  };
  Ok(Link { href: attribute("href")?, title: attribute("title")? })
}

/// Parses an API response and returns its first entry, if any.
///
/// # Errors
///
/// Returns [`BibfetchError::Xml`] or [`BibfetchError::XmlAttribute`] when the
/// document is malformed.
pub fn parse_entry(xml: &str, namespaces: &Namespaces) -> Result<Option<Entry>, BibfetchError> {
  let mut reader = NsReader::from_str(xml);

  let mut stack: Vec<Element> = Vec::new();
  let mut entry: Option<Entry> = None;
  let mut text = String::new();

  loop {
    let (namespace, event) = reader.read_resolved_event()?;
    let capturing = stack.last().is_some_and(|element| element.captures_text());

    match &event {
      Event::Start(start) | Event::Empty(start) => {
        let element = classify(&namespace, start, stack.last().copied(), namespaces);
        match element {
          Element::Entry => entry = Some(Entry::default()),
          Element::Link =>
            if let Some(entry) = entry.as_mut() {
              entry.links.push(read_link(start)?);
            },
          Element::Extension => trace!(
            "Skipping extension element {}",
            String::from_utf8_lossy(start.local_name().as_ref())
          ),
          element if element.captures_text() => text.clear(),
          _ => {},
        }
        stack.push(element);
      },
      Event::Text(content) if capturing => text.push_str(&content.unescape()?),
      Event::CData(content) if capturing => text.push_str(&String::from_utf8_lossy(content)),
      Event::Eof => return Ok(entry),
      _ => {},
    }

    // an empty element closes as soon as it opens
    if matches!(event, Event::End(_) | Event::Empty(_)) {
      match stack.pop() {
        Some(Element::Entry) => return Ok(entry),
        Some(element) if element.captures_text() =>
          if let Some(entry) = entry.as_mut() {
            entry.set(element, std::mem::take(&mut text));
          },
        _ => {},
      }
    }
  }
}

impl Entry {
  /// Stores collected text in the field that `element` stands for.
  fn set(&mut self, element: Element, text: String) {
    match element {
      Element::Title => self.title = Some(text),
      Element::Summary => self.summary = Some(text),
      Element::Published => self.published = Some(text),
      Element::Updated => self.updated = Some(text),
      Element::Name => self.authors.push(text),
      _ => {},
    }
  }
}
