use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// An anchor found on a seed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute target address
    pub url: String,
    /// Anchor text content, used as the document title
    pub title: String,
}

impl Link {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Target of placeholder anchors that run script instead of navigating
const VOID_LINK: &str = "javascript:void(0);";

/// Decides which extracted links are worth visiting
pub struct LinkFilter {
    excluded: HashSet<String>,
}

impl LinkFilter {
    pub fn new<S: AsRef<str>>(excluded: &[S]) -> Self {
        Self {
            excluded: excluded.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Whether `url` is on the exclusion list (exact match)
    pub fn is_excluded(&self, url: &str) -> bool {
        self.excluded.contains(url)
    }

    /// Rejects links that:
    /// - Have an empty URL or title
    /// - Point at a PDF
    /// - Are `javascript:void(0);` placeholders
    /// - Are excluded
    pub fn allows(&self, link: &Link) -> bool {
        !link.url.is_empty()
            && !link.title.is_empty()
            && !link.url.ends_with(".pdf")
            && link.url != VOID_LINK
            && !self.is_excluded(&link.url)
    }
}

/// Collect every `<a href>` in `html`, resolving hrefs against `base`
///
/// Hrefs that do not resolve to a URL are skipped.
pub fn extract_links(html: &str, base: &Url) -> Vec<Link> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a").expect("anchor selector");

    document
        .select(&anchors)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = base.join(href).ok()?;
            Some(Link {
                url: url.to_string(),
                title: anchor.text().collect(),
            })
        })
        .collect()
}

/// Text content of every paragraph inside `<body>`, in document order
pub fn extract_paragraphs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let paragraphs = Selector::parse("body p").expect("paragraph selector");

    document
        .select(&paragraphs)
        .map(|p| p.text().collect())
        .collect()
}
