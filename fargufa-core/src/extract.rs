//! Locating the target section in page markup and reading availability from it.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::AvailabilityResult;
use crate::ports::PortError;

/// How many levels above a matching text node's parent the section is taken from.
///
/// Tuned to the listing's markup, which keeps the count a few wrappers away
/// from the location name. Not a guarantee of a correct extraction.
pub const ANCESTOR_DEPTH: usize = 4;

/// Elements whose text is not page content.
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "template"];

static PLACES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([0-9]+)\s*pláss\b").expect("places pattern is valid")
});

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[01]?[0-9]|2[0-3]):[0-5][0-9]\b").expect("time pattern is valid")
});

/// Finds the block of page text that belongs to one location.
#[derive(Debug, Clone)]
pub struct SectionLocator {
    pattern: Regex,
}

impl SectionLocator {
    /// Build a locator matching `location` as a case-insensitive whole word.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Pattern`] when the escaped name exceeds the regex size limits.
    pub fn new(location: &str) -> Result<Self, PortError> {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(location)))?;
        Ok(Self { pattern })
    }

    /// Whether `text` mentions the location as a whole word.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Extract the text block around the first mention of the location.
    ///
    /// Falls back to the whole page text when the location is not mentioned,
    /// and returns `None` only for a page without any text.
    #[must_use]
    pub fn locate(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        for node in root.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            if is_hidden(node.ancestors().filter_map(ElementRef::wrap)) || !self.matches(text) {
                continue;
            }

            let Some(mut context) = node.parent() else {
                continue;
            };
            for _ in 0..ANCESTOR_DEPTH {
                if let Some(ancestor) = context.parent() {
                    context = ancestor;
                }
            }

            // The document node itself is not an element; its text is the root element's.
            let block = ElementRef::wrap(context).map_or_else(|| flatten(root), flatten);
            if self.matches(&block) {
                return Some(block);
            }
        }

        let page = flatten(root);
        (!page.is_empty()).then_some(page)
    }
}

/// Read the place count and the clock times from a section of text.
///
/// Returns `Ok(None)` when the section has no `<n> pláss` figure. Times are
/// deduplicated and ordered as strings, not chronologically.
///
/// # Errors
///
/// Returns [`PortError::Parse`] when the place count does not fit a `u64`.
pub fn parse_availability(text: &str) -> Result<Option<AvailabilityResult>, PortError> {
    let Some(count) = PLACES_PATTERN
        .captures(text)
        .and_then(|captures| captures.get(1))
    else {
        return Ok(None);
    };

    let places = count.as_str().parse::<u64>()?;
    let times = TIME_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().to_owned())
        .collect();

    Ok(Some(AvailabilityResult { places, times }))
}

/// Whether any of a node's ancestors keeps its text off the page.
fn is_hidden<'a>(mut ancestors: impl Iterator<Item = ElementRef<'a>>) -> bool {
    ancestors.any(|element| HIDDEN_ELEMENTS.contains(&element.value().name()))
}

/// Visible text under `element`, each piece trimmed and joined with single spaces.
fn flatten(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter(|node| !is_hidden(node.ancestors().filter_map(ElementRef::wrap)))
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
