//! Ordered selector fallback chains for the portal's listing markup.
//!
//! Markup on the results pages drifts between redesigns, so every lookup is a
//! list of patterns tried from most specific to most generic. The first
//! pattern that yields a match wins, even if a later one would be more precise.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use tracing::warn;

pub struct SelectorChain {
    patterns: Vec<(&'static str, Selector)>,
}

impl SelectorChain {
    pub fn new(name: &'static str, patterns: &[&'static str]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| match Selector::parse(pattern) {
                Ok(selector) => Some((*pattern, selector)),
                Err(e) => {
                    warn!("Skipping invalid {} selector {:?}: {:?}", name, pattern, e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Source text of the pattern at `index`.
    pub fn pattern(&self, index: usize) -> Option<&'static str> {
        self.patterns.get(index).map(|(pattern, _)| *pattern)
    }

    /// First element matched by the first pattern that matches anything under `scope`.
    pub fn first_match<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.patterns
            .iter()
            .find_map(|(_, selector)| scope.select(selector).next())
    }

    /// All elements of the first pattern with at least one match, with that pattern's index.
    pub fn first_nonempty<'a>(&self, scope: ElementRef<'a>) -> Option<(usize, Vec<ElementRef<'a>>)> {
        self.patterns
            .iter()
            .enumerate()
            .find_map(|(index, (_, selector))| {
                let matches: Vec<ElementRef<'a>> = scope.select(selector).collect();
                if matches.is_empty() {
                    None
                } else {
                    Some((index, matches))
                }
            })
    }

    /// All elements matched by the pattern at `index`.
    pub fn select_with<'a>(&self, index: usize, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match self.patterns.get(index) {
            Some((_, selector)) => scope.select(selector).collect(),
            None => Vec::new(),
        }
    }
}

/// Listing cards on a results page.
pub static CONTAINER: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(
        "container",
        &[
            "div.listingBox.feat",
            "div[class*='listingBox']",
            "div[class*='listing']",
            "article",
            ".property-item",
            ".listing-item",
        ],
    )
});

pub static PRICE: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(
        "price",
        &[
            "span.priceTag.hardShadow.float-left",
            "span[class*='price']",
            ".price",
            "[class*='prix']",
        ],
    )
});

pub static TITLE: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(
        "title",
        &[
            "h2.listingTit.col-11",
            "h2[class*='listing']",
            "h2",
            "h3",
            ".title",
            "[class*='titre']",
        ],
    )
});

pub static LOCATION: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(
        "location",
        &[
            "span.listingH3",
            "span[class*='location']",
            ".location",
            "[class*='lieu']",
        ],
    )
});

/// Icon + text blocks carrying area and room counts.
pub static FEATURE_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.adDetailFeature").expect("static feature block selector"));

pub static FEATURE_ICON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("i").expect("static icon selector"));
