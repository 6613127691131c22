use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

const DEFAULT_MAX_ITEMS: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Which categories to extract and how many items to keep per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    pub include_metadata: bool,
    pub extract_scripts: bool,
    pub extract_styles: bool,
    pub extract_tables: bool,
    pub extract_lists: bool,
    pub include_raw_html: bool,
    /// Cap applied to every sequence field of the result.
    pub max_items: NonZeroUsize,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            extract_scripts: false,
            extract_styles: false,
            extract_tables: true,
            extract_lists: true,
            include_raw_html: false,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl ExtractionOptions {
    /// Every category switched on.
    pub fn everything(max_items: NonZeroUsize) -> Self {
        Self {
            include_metadata: true,
            extract_scripts: true,
            extract_styles: true,
            extract_tables: true,
            extract_lists: true,
            include_raw_html: true,
            max_items,
        }
    }

    /// Every optional category switched off.
    pub fn basic(max_items: NonZeroUsize) -> Self {
        Self {
            include_metadata: false,
            extract_scripts: false,
            extract_styles: false,
            extract_tables: false,
            extract_lists: false,
            include_raw_html: false,
            max_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub alt: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Either an external stylesheet (`href`) or an inline block (`content`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Everything one scrape produced.
///
/// When `error` is set every other field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapingResult {
    pub title: String,
    pub headings: Vec<String>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub paragraphs: Vec<String>,
    pub tables: Vec<Table>,
    pub lists: Vec<List>,
    pub metadata: BTreeMap<String, String>,
    pub scripts: Vec<Script>,
    pub styles: Vec<Style>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapingResult {
    /// An empty result carrying only `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
