//! Projection of a [`ParsedDocument`] into a [`ScrapingResult`].
//!
//! Every rule is independent. Optional categories are gated by their flag and
//! every sequence is capped to `max_items` by the same [`capped`] step, after
//! the full category has been collected.

use crate::address::Address;
use crate::document::{Element, ParsedDocument};
use crate::types::{
    ExtractionOptions, Image, Link, List, ListKind, ScrapingResult, Script, Style, Table,
};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

const TITLE: &[&str] = &["title"];
const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const ANCHORS: &[&str] = &["a"];
const IMAGES: &[&str] = &["img"];
const PARAGRAPHS: &[&str] = &["p"];
const TABLES: &[&str] = &["table"];
const ROWS: &[&str] = &["tr"];
const HEADER_CELLS: &[&str] = &["th"];
const DATA_CELLS: &[&str] = &["td"];
const UNORDERED: &[&str] = &["ul"];
const ORDERED: &[&str] = &["ol"];
const ITEMS: &[&str] = &["li"];
const META: &[&str] = &["meta"];
const SCRIPTS: &[&str] = &["script"];
const LINKS: &[&str] = &["link"];
const STYLES: &[&str] = &["style"];

/// Extract everything `options` asks for from `doc`.
///
/// Root-relative URLs are resolved against `base`. The result never has
/// `error` set.
pub fn extract(doc: &ParsedDocument, base: &Address, options: ExtractionOptions) -> ScrapingResult {
    let max = options.max_items;
    let result = ScrapingResult {
        title: title(doc),
        headings: capped(true, max, || texts(doc, HEADINGS)),
        links: capped(true, max, || links(doc, base)),
        images: capped(true, max, || images(doc, base)),
        paragraphs: capped(true, max, || texts(doc, PARAGRAPHS)),
        tables: capped(options.extract_tables, max, || tables(doc)),
        lists: capped(options.extract_lists, max, || lists(doc)),
        metadata: if options.include_metadata {
            metadata(doc)
        } else {
            BTreeMap::new()
        },
        scripts: capped(options.extract_scripts, max, || scripts(doc)),
        styles: capped(options.extract_styles, max, || styles(doc)),
        raw_html: options
            .include_raw_html
            .then(|| doc.markup().to_string()),
        error: None,
    };

    tracing::debug!(
        %base,
        headings = result.headings.len(),
        links = result.links.len(),
        images = result.images.len(),
        paragraphs = result.paragraphs.len(),
        tables = result.tables.len(),
        lists = result.lists.len(),
        metadata = result.metadata.len(),
        scripts = result.scripts.len(),
        styles = result.styles.len(),
        "extract.done"
    );
    result
}

/// Gate a category on its flag, then keep the first `max` items.
fn capped<T>(enabled: bool, max: NonZeroUsize, collect: impl FnOnce() -> Vec<T>) -> Vec<T> {
    if !enabled {
        return Vec::new();
    }
    let mut items = collect();
    items.truncate(max.get());
    items
}

fn title(doc: &ParsedDocument) -> String {
    doc.first_by_tag(TITLE)
        .map(|el| el.trimmed_text())
        .unwrap_or_default()
}

/// Trimmed, non-blank text of every element named in `tags`.
fn texts(doc: &ParsedDocument, tags: &'static [&'static str]) -> Vec<String> {
    doc.by_tag(tags)
        .map(|el| el.trimmed_text())
        .filter(|text| !text.is_empty())
        .collect()
}

fn links(doc: &ParsedDocument, base: &Address) -> Vec<Link> {
    doc.by_tag(ANCHORS)
        .filter_map(|a| {
            let href = a.non_empty_attr("href")?;
            Some(Link {
                text: a.trimmed_text(),
                url: base.resolve(href),
            })
        })
        .collect()
}

fn images(doc: &ParsedDocument, base: &Address) -> Vec<Image> {
    doc.by_tag(IMAGES)
        .filter_map(|img| {
            let src = img.non_empty_attr("src")?;
            Some(Image {
                alt: img.attr("alt").unwrap_or_default().to_string(),
                url: base.resolve(src),
            })
        })
        .collect()
}

fn tables(doc: &ParsedDocument) -> Vec<Table> {
    doc.by_tag(TABLES).filter_map(table).collect()
}

fn table(table: Element<'_>) -> Option<Table> {
    let mut headers: Vec<String> = table
        .find(HEADER_CELLS)
        .map(|cell| cell.trimmed_text())
        .collect();

    let rows: Vec<Vec<String>> = if headers.is_empty() {
        // No header cells: the first row stands in as the header.
        let mut rows = table.find(ROWS);
        if let Some(first) = rows.next() {
            headers = cells(first);
        }
        rows.map(cells).filter(|row| !row.is_empty()).collect()
    } else {
        table
            .find(ROWS)
            .filter(|tr| tr.has_ancestor_within("tbody", &table))
            .map(cells)
            .filter(|row| !row.is_empty())
            .collect()
    };

    (!headers.is_empty() || !rows.is_empty()).then_some(Table { headers, rows })
}

fn cells(row: Element<'_>) -> Vec<String> {
    row.find(DATA_CELLS).map(|cell| cell.trimmed_text()).collect()
}

fn lists(doc: &ParsedDocument) -> Vec<List> {
    let mut out = Vec::new();
    for (tags, kind) in [(UNORDERED, ListKind::Unordered), (ORDERED, ListKind::Ordered)] {
        for list in doc.by_tag(tags) {
            let items: Vec<String> = list
                .find(ITEMS)
                .map(|li| li.trimmed_text())
                .filter(|text| !text.is_empty())
                .collect();
            if !items.is_empty() {
                out.push(List { kind, items });
            }
        }
    }
    out
}

fn metadata(doc: &ParsedDocument) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();

    for meta in doc.by_tag(META) {
        let key = meta
            .non_empty_attr("name")
            .or_else(|| meta.non_empty_attr("property"));
        if let (Some(key), Some(content)) = (key, meta.non_empty_attr("content")) {
            out.insert(key.to_string(), content.to_string());
        }
    }

    // Open Graph, then Twitter cards, are applied again on top so they win
    // over any same-keyed generic entry.
    overlay_namespace(doc, &mut out, "property", "og:");
    overlay_namespace(doc, &mut out, "name", "twitter:");
    out
}

fn overlay_namespace(
    doc: &ParsedDocument,
    out: &mut BTreeMap<String, String>,
    attr: &str,
    prefix: &str,
) {
    for meta in doc.by_tag(META) {
        let Some(key) = meta.attr(attr).filter(|k| k.starts_with(prefix)) else {
            continue;
        };
        if let Some(content) = meta.non_empty_attr("content") {
            out.insert(key.to_string(), content.to_string());
        }
    }
}

fn scripts(doc: &ParsedDocument) -> Vec<Script> {
    doc.by_tag(SCRIPTS)
        .map(|script| Script {
            src: script.attr("src").map(str::to_string),
            content: Some(script.trimmed_text()),
        })
        .collect()
}

fn styles(doc: &ParsedDocument) -> Vec<Style> {
    let external = doc
        .by_tag(LINKS)
        .filter(|link| link.attr("rel") == Some("stylesheet"))
        .map(|link| Style {
            href: link.attr("href").map(str::to_string),
            content: None,
        });
    let inline = doc.by_tag(STYLES).map(|style| Style {
        href: None,
        content: Some(style.trimmed_text()),
    });
    external.chain(inline).collect()
}
