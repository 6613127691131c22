//! Command-line surface of the `scrapex` binary.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use scrapex_web::ExtractionOptions;

/// Fetch a page through public relays and print what was extracted as JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "scrapex", version)]
pub struct Cli {
    /// Page to scrape; `https://` is assumed when no scheme is given
    pub address: String,

    /// Configuration file (defaults to ./scrapex.yaml and the user config dir)
    #[arg(long, env = "SCRAPEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cap on every extracted list
    #[arg(long)]
    pub max_items: Option<NonZeroUsize>,

    #[arg(long)]
    pub no_metadata: bool,

    #[arg(long)]
    pub no_tables: bool,

    #[arg(long)]
    pub no_lists: bool,

    /// Include external and inline scripts
    #[arg(long)]
    pub scripts: bool,

    /// Include stylesheets and inline styles
    #[arg(long)]
    pub styles: bool,

    /// Include the fetched markup verbatim
    #[arg(long)]
    pub raw_html: bool,

    /// Skip the relays and request the page directly
    #[arg(long)]
    pub direct: bool,

    /// Single-line JSON output
    #[arg(long)]
    pub compact: bool,

    /// Mirror logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer the flags over configured options. Flags only ever move a
    /// setting away from its default, so an unset flag keeps the configured
    /// value.
    pub fn options(&self, base: ExtractionOptions) -> ExtractionOptions {
        ExtractionOptions {
            include_metadata: base.include_metadata && !self.no_metadata,
            extract_tables: base.extract_tables && !self.no_tables,
            extract_lists: base.extract_lists && !self.no_lists,
            extract_scripts: base.extract_scripts || self.scripts,
            extract_styles: base.extract_styles || self.styles,
            include_raw_html: base.include_raw_html || self.raw_html,
            max_items: self.max_items.unwrap_or(base.max_items),
        }
    }
}
