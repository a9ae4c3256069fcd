use crate::models::Feature;
use crate::selectors::{FEATURE_BLOCK, FEATURE_ICON};
use regex::Regex;
use scraper::ElementRef;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

const NBSP: char = '\u{00A0}';
const ICON_CLASS_PREFIX: &str = "icon-";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Collapses every whitespace run (non-breaking spaces included) into a single
/// space and trims both ends.
pub fn normalize_text(text: &str) -> String {
    let text = text.replace(NBSP, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Text of an element with its text nodes joined by spaces, normalized.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Extracts an integer amount from a formatted price such as `"24 000 000 DH"`.
///
/// Every non-digit is dropped, decimal separators included, so `"1,5 M DH"`
/// comes out as `15`. Returns `None` when no digit is left.
pub fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text
        .replace(NBSP, " ")
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse::<u64>().ok()
}

/// Reads the icon-coded detail blocks of a listing card.
///
/// A recognized block without digits still produces its key, mapped to `None`.
/// Blocks are read in document order and a later block overwrites an earlier
/// one with the same key.
pub fn parse_features(container: ElementRef<'_>) -> BTreeMap<Feature, Option<u32>> {
    let mut features = BTreeMap::new();

    for block in container.select(&FEATURE_BLOCK) {
        let Some(icon) = block.select(&FEATURE_ICON).next() else {
            continue;
        };

        let Some(icon_class) = icon
            .value()
            .classes()
            .find(|class| class.starts_with(ICON_CLASS_PREFIX))
        else {
            continue;
        };

        let Some(feature) = Feature::from_icon_class(icon_class) else {
            debug!("Ignoring unknown feature icon {}", icon_class);
            continue;
        };

        let text = element_text(block);
        let value = DIGIT_RUN
            .find(&text)
            .and_then(|run| run.as_str().parse::<u32>().ok());

        features.insert(feature, value);
    }

    features
}
