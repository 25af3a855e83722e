// ABOUTME: Basic-mode extraction turning an HTML document into a ScrapeRecord.
// ABOUTME: Applies caller selector rules, or the default headings/paragraphs/links/images groups.

use scraper::Html;
use url::Url;

use crate::error::HarvestError;
use crate::extractors::select::{attr, builtin, compile, element_text, select_first_text, select_texts};
use crate::result::{Content, ContentValue, ScrapeRecord, SelectorRules, NO_TITLE};

const TITLE_SELECTOR: &str = "title";
const HEADINGS_SELECTOR: &str = "h1, h2, h3";
const PARAGRAPHS_SELECTOR: &str = "p";
const LINKS_SELECTOR: &str = "a[href]";
const IMAGES_SELECTOR: &str = "img[src]";

/// Extract a record from `html`, fetched from `url`.
///
/// With non-empty `rules`, every rule becomes a content group holding the
/// trimmed text of each match (an empty list when nothing matches). Without
/// rules the default groups `headings`, `paragraphs`, `links` and `images`
/// are produced. An invalid selector fails the whole extraction.
pub fn extract_basic(
    html: &str,
    url: &str,
    rules: Option<&SelectorRules>,
) -> Result<ScrapeRecord, HarvestError> {
    let base = parse_base(url, "ExtractBasic")?;
    let doc = Html::parse_document(html);

    let title = select_first_text(&doc, &builtin(TITLE_SELECTOR)?)
        .unwrap_or_else(|| NO_TITLE.to_string());

    let content = match rules {
        Some(rules) if !rules.is_empty() => extract_rules(&doc, url, rules)?,
        _ => extract_defaults(&doc, &base)?,
    };

    Ok(ScrapeRecord {
        url: url.to_string(),
        title,
        scraped_at: super::capture_timestamp(),
        content,
    })
}

pub(crate) fn parse_base(url: &str, op: &str) -> Result<Url, HarvestError> {
    Url::parse(url).map_err(|e| {
        HarvestError::invalid_url(url, op, Some(anyhow::anyhow!("invalid URL: {}", e)))
    })
}

fn extract_rules(doc: &Html, url: &str, rules: &SelectorRules) -> Result<Content, HarvestError> {
    let mut content = Content::with_capacity(rules.len());
    for (name, css) in rules {
        let selector = compile(css, url, "ExtractBasic")?;
        let values = select_texts(doc, &selector)
            .into_iter()
            .map(ContentValue::Text)
            .collect();
        content.insert(name.clone(), values);
    }
    Ok(content)
}

fn extract_defaults(doc: &Html, base: &Url) -> Result<Content, HarvestError> {
    let headings = select_texts(doc, &builtin(HEADINGS_SELECTOR)?);
    let paragraphs = select_texts(doc, &builtin(PARAGRAPHS_SELECTOR)?);

    let links: Vec<ContentValue> = doc
        .select(&builtin(LINKS_SELECTOR)?)
        .map(|a| ContentValue::Link {
            text: element_text(&a),
            href: resolve(base, attr(&a, "href").unwrap_or_default()),
        })
        .collect();

    let images: Vec<ContentValue> = doc
        .select(&builtin(IMAGES_SELECTOR)?)
        .map(|img| ContentValue::Image {
            alt: attr(&img, "alt").unwrap_or_default().to_string(),
            src: resolve(base, attr(&img, "src").unwrap_or_default()),
        })
        .collect();

    let mut content = Content::with_capacity(4);
    content.insert(
        "headings".to_string(),
        headings.into_iter().map(ContentValue::Text).collect(),
    );
    content.insert(
        "paragraphs".to_string(),
        paragraphs.into_iter().map(ContentValue::Text).collect(),
    );
    content.insert("links".to_string(), links);
    content.insert("images".to_string(), images);
    Ok(content)
}

/// Resolve `href` against `base`. References that cannot be joined are kept verbatim.
pub fn resolve(base: &Url, href: &str) -> String {
    match base.join(href.trim()) {
        Ok(u) => u.to_string(),
        Err(_) => href.to_string(),
    }
}
