//! Page acquisition and content extraction.
//!
//! - Address normalization and relative-URL resolution (`address`)
//! - Ordered relay endpoints with append/prepend insertion (`relay`)
//! - `PageFetcher` trait with relay-fallback and direct implementations (`fetch`)
//! - Typed document model over the parsed markup (`document`)
//! - Option-gated, capped extraction into a [`ScrapingResult`] (`extract`)
//! - The [`Scraper`] orchestrator that never lets an error escape (`scrape`)
//!
//! ```no_run
//! use scrapex_web::{ExtractionOptions, scrape};
//!
//! # async fn demo() {
//! let result = scrape("example.com", ExtractionOptions::default()).await;
//! match &result.error {
//!     Some(message) => eprintln!("scrape failed: {message}"),
//!     None => println!("{} ({} links)", result.title, result.links.len()),
//! }
//! # }
//! ```

pub mod address;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod relay;
pub mod scrape;
pub mod types;

pub use address::Address;
pub use document::{Element, ParsedDocument};
pub use error::ScrapeError;
pub use extract::extract;
pub use fetch::{DirectFetcher, FetchSettings, PageFetcher, RawDocument, RelayFetcher, fetch_direct};
pub use relay::{InsertionStyle, RelayEndpoint, default_relays};
pub use scrape::{Scraper, scrape};
pub use types::{
    ExtractionOptions, Image, Link, List, ListKind, ScrapingResult, Script, Style, Table,
};
