use scrapex_http::HttpError;
use thiserror::Error;

/// Message used when there was no relay to try at all.
pub(crate) const ALL_RELAYS_FAILED: &str = "All proxy services failed";

/// Failures along the fetch → parse → extract path.
///
/// Only [`crate::Scraper::scrape`] flattens these into a string.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A single relay attempt failed; the fetcher moves on to the next one.
    #[error("relay {relay} failed: {cause}")]
    RelayFailed {
        relay: String,
        #[source]
        cause: HttpError,
    },

    /// Every configured relay failed; carries the last relay's cause.
    #[error("Unable to fetch content: {last_cause}")]
    FetchFailed { last_cause: String },

    #[error("Direct fetch failed: {cause}")]
    DirectFailed {
        #[source]
        cause: HttpError,
    },

    /// The fetched body could not be turned into a document.
    #[error("failed to parse document: {cause}")]
    ParseFailed { cause: String },
}
