use crate::extractor::extract_listing;
use crate::fetcher::{BrowserClient, HttpClient, PageFetch, PageFetcher, PoliteDelay, BASE_URL};
use crate::models::{City, Language, Listing};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ScrapingOptions {
    pub base_url: String,
    pub language: Language,
    pub city: City,
    pub output_dir: String,
    pub max_pages: Option<u32>,
    pub delay: PoliteDelay,
}

impl Default for ScrapingOptions {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            language: Language::French,
            city: City::Casablanca,
            output_dir: ".".to_string(),
            max_pages: None,
            delay: PoliteDelay::default(),
        }
    }
}

/// Anything that can hand out results pages by 1-based page number.
pub trait PageSource {
    fn fetch_page(&self, page: u32) -> PageFetch;
}

impl<C: HttpClient> PageSource for PageFetcher<C> {
    fn fetch_page(&self, page: u32) -> PageFetch {
        PageFetcher::fetch_page(self, page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeRun {
    pub listings: Vec<Listing>,
    pub pages_fetched: u32,
    pub rejected: usize,
}

/// Walks results pages from page 1 until one adds no listing.
///
/// A failed page adds nothing and therefore ends the run just like a page past
/// the last one. `max_pages`, when set, stops the walk earlier.
pub fn scrape_all_pages<S: PageSource>(
    source: &S,
    max_pages: Option<u32>,
    progress: &ProgressBar,
) -> ScrapeRun {
    let mut run = ScrapeRun::default();
    let mut page = 1;

    loop {
        // Count before the fetch; stagnation is measured against it
        let before = run.listings.len();
        progress.set_message(format!("page {} ({} listings so far)", page, before));

        let fetch = source.fetch_page(page);
        run.pages_fetched += 1;

        // Every card is tried; a rejected one never stops the page
        for container in fetch.containers() {
            match extract_listing(container) {
                Ok(listing) => {
                    info!(
                        "Found listing: {} | {} | {} DH",
                        listing.location, listing.title, listing.price
                    );
                    run.listings.push(listing);
                }
                Err(rejection) => {
                    warn!("Skipping container on page {}: {}", page, rejection);
                    run.rejected += 1;
                }
            }
        }

        let added = run.listings.len() - before;
        progress.tick();

        // A page that adds nothing ends the run
        if added == 0 {
            info!("Page {} added no listings, stopping", page);
            break;
        }

        info!("Page {} added {} listings", page, added);

        if max_pages.is_some_and(|max| page >= max) {
            info!("Reached maximum number of pages ({}), stopping", page);
            break;
        }

        page += 1;
    }

    progress.finish_with_message(format!(
        "{} listings from {} pages",
        run.listings.len(),
        run.pages_fetched
    ));

    run
}

/// Scrapes the live portal with the options' language, city and delay.
///
/// `progress` starts ticking here unless it is hidden.
pub fn run_scraper(options: &ScrapingOptions, progress: &ProgressBar) -> Result<ScrapeRun> {
    let client = BrowserClient::new().context("Failed to set up HTTP client")?;
    let fetcher = PageFetcher::new(client, options.base_url.clone(), options.language, options.city)
        .with_delay(options.delay);

    info!(
        "Scraping {} listings ({})",
        options.city,
        options.language.label()
    );

    if !progress.is_hidden() {
        progress.enable_steady_tick(Duration::from_millis(120));
    }

    Ok(scrape_all_pages(&fetcher, options.max_pages, progress))
}

/// Spinner for a live run; it stays idle until the run starts ticking it.
pub fn spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner} Scraping {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress
}
