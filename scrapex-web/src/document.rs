//! Typed view over parsed markup.
//!
//! [`ParsedDocument`] wraps an html5ever tree (via `scraper`) and only exposes
//! what extraction needs: elements by tag name, attributes, and text.
//! Selection always walks the tree in document order.

use crate::error::ScrapeError;
use crate::fetch::RawDocument;
use scraper::{ElementRef, Html};
use std::borrow::Cow;

pub struct ParsedDocument {
    html: Html,
    markup: String,
}

impl ParsedDocument {
    /// Parse markup. HTML parsing recovers from any malformed input.
    ///
    /// `markup` is kept verbatim; a leading byte-order mark is only skipped
    /// for parsing.
    pub fn parse(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let html = Html::parse_document(markup.strip_prefix('\u{feff}').unwrap_or(markup.as_str()));
        Self { html, markup }
    }

    /// Decode and parse a fetched body.
    ///
    /// Fails only when the body is binary; undecodable bytes in text bodies
    /// are replaced rather than rejected.
    pub fn from_raw(raw: &RawDocument) -> Result<Self, ScrapeError> {
        if raw.is_binary() {
            return Err(ScrapeError::ParseFailed {
                cause: format!("response from {} is binary, not markup", raw.source()),
            });
        }
        let text = raw.text();
        if let Cow::Owned(_) = text {
            tracing::debug!(source = raw.source(), "document.decode.lossy");
        }
        let doc = Self::parse(text);
        if !doc.html.errors.is_empty() {
            tracing::trace!(
                source = raw.source(),
                recovered_errors = doc.html.errors.len(),
                "document.parse.recovered"
            );
        }
        Ok(doc)
    }

    /// The markup this document was parsed from, verbatim.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Every element whose tag is in `names`, in document order.
    pub fn by_tag<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = Element<'a>> + 'a {
        let root = Element {
            node: self.html.root_element(),
        };
        std::iter::once(root)
            .filter(move |el| el.is(names))
            .chain(root.find(names))
    }

    pub fn first_by_tag<'a>(&'a self, names: &'a [&'a str]) -> Option<Element<'a>> {
        self.by_tag(names).next()
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("markup_len", &self.markup.len())
            .finish()
    }
}

/// A borrowed element of a [`ParsedDocument`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    node: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Lower-case local name, e.g. `a` or `h2`.
    pub fn tag(&self) -> &'a str {
        self.node.value().name()
    }

    pub fn is(&self, names: &[&str]) -> bool {
        names.contains(&self.tag())
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.value().attr(name)
    }

    /// Like [`Element::attr`], treating an empty value as absent.
    pub fn non_empty_attr(&self, name: &str) -> Option<&'a str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    /// Concatenated text of every descendant text node.
    pub fn text(&self) -> String {
        self.node.text().collect()
    }

    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Descendants (not including `self`) whose tag is in `names`.
    pub fn find(self, names: &'a [&'a str]) -> impl Iterator<Item = Element<'a>> + 'a {
        self.node
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(|node| Element { node })
            .filter(move |el| el.is(names))
    }

    /// Whether an element named `name` sits between `self` and `boundary`.
    pub fn has_ancestor_within(&self, name: &str, boundary: &Element<'_>) -> bool {
        let stop = boundary.node.id();
        self.node
            .ancestors()
            .take_while(|node| node.id() != stop)
            .filter_map(ElementRef::wrap)
            .any(|el| el.value().name() == name)
    }
}
