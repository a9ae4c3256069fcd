use crate::models::{City, Language};
use crate::selectors::CONTAINER;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue};
use scraper::{ElementRef, Html};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const BASE_URL: &str = "https://www.mubawab.ma/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PREVIEW_CHARS: usize = 2000;

const BROWSER_HEADERS: [(&str, &str); 5] = [
    ("user-agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"),
    ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    ("accept-language", "en-US,en;q=0.5"),
    ("connection", "keep-alive"),
    ("upgrade-insecure-requests", "1"),
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Blocking GET against a results page.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// `reqwest` client that presents itself as a desktop browser.
pub struct BrowserClient {
    client: reqwest::blocking::Client,
}

impl BrowserClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .default_headers(browser_headers())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in BROWSER_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers
}

impl HttpClient for BrowserClient {
    fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|source| FetchError::Body { url: url.to_string(), source })?;

        Ok(HttpResponse { status, body })
    }
}

/// Random pause applied after every response, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoliteDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl PoliteDelay {
    pub const NONE: PoliteDelay = PoliteDelay { min_ms: 0, max_ms: 0 };

    /// Draws one pause length within `min_ms..=max_ms`.
    pub fn sample(&self) -> Duration {
        let (low, high) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        if high == 0 {
            return Duration::ZERO;
        }

        Duration::from_millis(rand::thread_rng().gen_range(low..=high))
    }

    pub fn pause(&self) {
        let pause = self.sample();
        if pause.is_zero() {
            return;
        }

        debug!("Sleeping {} ms before the next request", pause.as_millis());
        std::thread::sleep(pause);
    }
}

impl Default for PoliteDelay {
    fn default() -> Self {
        Self { min_ms: 1000, max_ms: 3000 }
    }
}

/// Results page address: `{base}{lang}/t/{city}`, with `:p:{page}` from page 2 on.
pub fn build_page_url(base_url: &str, language: Language, city: City, page: u32) -> String {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    if page <= 1 {
        format!("{}{}/t/{}", base, language.code(), city.slug())
    } else {
        format!("{}{}/t/{}:p:{}", base, language.code(), city.slug(), page)
    }
}

/// Outcome of fetching one results page.
///
/// A failed request, a non-200 status and a page without listing cards all
/// end up with no containers.
pub struct PageFetch {
    pub url: String,
    pub status: Option<u16>,
    document: Option<Html>,
    container_pattern: Option<usize>,
}

impl PageFetch {
    pub fn empty(url: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            url: url.into(),
            status,
            document: None,
            container_pattern: None,
        }
    }

    /// Parses `body` and picks the first container pattern with a match.
    pub fn from_html(url: impl Into<String>, status: u16, body: &str) -> Self {
        let url = url.into();
        let document = Html::parse_document(body);

        let container_pattern = match CONTAINER.first_nonempty(document.root_element()) {
            Some((index, containers)) => {
                info!(
                    "Found {} containers using {} selector",
                    containers.len(),
                    CONTAINER.pattern(index).unwrap_or_default()
                );
                Some(index)
            }
            None => {
                warn!("No listing containers found on {}", url);
                debug!("Page content preview:\n{}", preview(body));
                None
            }
        };

        Self {
            url,
            status: Some(status),
            document: Some(document),
            container_pattern,
        }
    }

    /// Listing cards in document order.
    pub fn containers(&self) -> Vec<ElementRef<'_>> {
        match (&self.document, self.container_pattern) {
            (Some(document), Some(index)) => CONTAINER.select_with(index, document.root_element()),
            _ => Vec::new(),
        }
    }

    pub fn container_pattern(&self) -> Option<&'static str> {
        self.container_pattern.and_then(|index| CONTAINER.pattern(index))
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

/// Fetches results pages for one language and city.
pub struct PageFetcher<C: HttpClient> {
    client: C,
    base_url: String,
    language: Language,
    city: City,
    delay: PoliteDelay,
}

impl<C: HttpClient> PageFetcher<C> {
    pub fn new(client: C, base_url: impl Into<String>, language: Language, city: City) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            language,
            city,
            delay: PoliteDelay::default(),
        }
    }

    pub fn with_delay(mut self, delay: PoliteDelay) -> Self {
        self.delay = delay;
        self
    }

    pub fn page_url(&self, page: u32) -> String {
        build_page_url(&self.base_url, self.language, self.city, page)
    }

    pub fn fetch_page(&self, page: u32) -> PageFetch {
        let url = self.page_url(page);
        info!("Requesting: {}", url);

        let response = match self.client.get(&url) {
            Ok(response) => response,
            // Nothing was received, so no status and no pause
            Err(e) => {
                warn!("Request failed: {} ({})", e, error_chain(&e));
                return PageFetch::empty(url, None);
            }
        };

        // Pause after every response, error statuses included
        self.delay.pause();
        info!("Status code: {}", response.status);

        match response.status {
            200 => PageFetch::from_html(url, response.status, &response.body),
            403 => {
                warn!("Error 403: access forbidden for {}", url);
                PageFetch::empty(url, Some(403))
            }
            404 => {
                warn!("Error 404: page not found at {}", url);
                PageFetch::empty(url, Some(404))
            }
            status => {
                warn!("Error {} for {}", status, url);
                PageFetch::empty(url, Some(status))
            }
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut causes = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    if causes.is_empty() {
        "no further detail".to_string()
    } else {
        causes.join(": ")
    }
}
