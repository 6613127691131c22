use crate::address::Address;
use crate::document::ParsedDocument;
use crate::error::ScrapeError;
use crate::extract::extract;
use crate::fetch::{DirectFetcher, FetchSettings, PageFetcher, RelayFetcher};
use crate::relay::{RelayEndpoint, default_relays};
use crate::types::{ExtractionOptions, ScrapingResult};
use scrapex_http::HttpError;
use std::sync::Arc;

/// Fetch → parse → extract, with every failure folded into the result.
///
/// Holds no mutable state, so one `Scraper` can serve concurrent calls.
#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn PageFetcher>,
}

impl Scraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// A scraper that goes through `relays`, in order.
    pub fn with_relays(
        relays: Vec<RelayEndpoint>,
        settings: &FetchSettings,
    ) -> Result<Self, HttpError> {
        Ok(Self::new(Arc::new(RelayFetcher::new(relays, settings)?)))
    }

    /// A scraper that fetches pages directly.
    pub fn direct(settings: &FetchSettings) -> Result<Self, HttpError> {
        Ok(Self::new(Arc::new(DirectFetcher::new(settings)?)))
    }

    /// Like [`Scraper::scrape`], but keeps the structured error.
    pub async fn try_scrape(
        &self,
        address: &str,
        options: ExtractionOptions,
    ) -> Result<ScrapingResult, ScrapeError> {
        let address = Address::new(address);
        let raw = self.fetcher.fetch(&address).await?;

        // The parsed tree is !Send; it must not outlive this synchronous tail.
        let doc = ParsedDocument::from_raw(&raw)?;
        Ok(extract(&doc, &address, options))
    }

    /// Scrape `address`. Never fails: errors land in [`ScrapingResult::error`].
    pub async fn scrape(&self, address: &str, options: ExtractionOptions) -> ScrapingResult {
        match self.try_scrape(address, options).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(address, error = %err, "scrape.failed");
                ScrapingResult::failed(err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for Scraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scraper").finish_non_exhaustive()
    }
}

/// Scrape through the built-in relay list with default transport settings.
pub async fn scrape(address: &str, options: ExtractionOptions) -> ScrapingResult {
    match Scraper::with_relays(default_relays(), &FetchSettings::default()) {
        Ok(scraper) => scraper.scrape(address, options).await,
        Err(err) => {
            tracing::error!(address, error = %err, "scrape.client_build_failed");
            ScrapingResult::failed(err.to_string())
        }
    }
}
