// ABOUTME: Selector-based text and attribute extraction utilities over a parsed HTML document.
// ABOUTME: Compiles caller-supplied CSS selectors, reporting invalid ones as parse errors.

//! Selector-based extraction utilities.
//!
//! Key behaviors:
//! - Matches are returned in document order.
//! - Text extraction concatenates every descendant text node and trims the
//!   result; inner markup is discarded.
//! - Elements whose text is empty are kept (as empty strings) so that the
//!   output lines up one-to-one with the matched elements.

use scraper::{ElementRef, Html, Selector};

use crate::error::HarvestError;

/// Compiles a CSS selector, mapping failures to a parse error for `url`.
pub fn compile(css: &str, url: &str, op: &str) -> Result<Selector, HarvestError> {
    Selector::parse(css).map_err(|e| {
        HarvestError::parse(
            url,
            op,
            Some(anyhow::anyhow!("invalid selector '{}': {}", css, e)),
        )
    })
}

/// Compiles one of the built-in selectors.
///
/// Built-in selectors are constants known to be valid; a failure here is a
/// programming error and is reported the same way as a caller's selector.
pub(crate) fn builtin(css: &str) -> Result<Selector, HarvestError> {
    compile(css, "", "Builtin")
}

/// Returns the trimmed text content of an element.
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Returns the trimmed text of every element matching `selector`, in document order.
pub fn select_texts(doc: &Html, selector: &Selector) -> Vec<String> {
    doc.select(selector).map(|el| element_text(&el)).collect()
}

/// Returns the trimmed text of the first element matching `selector`.
pub fn select_first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(|el| element_text(&el))
}

/// Returns the raw value of `attr` on an element, if present.
pub fn attr<'a>(el: &ElementRef<'a>, attr: &str) -> Option<&'a str> {
    el.value().attr(attr)
}
