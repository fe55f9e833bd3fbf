mod error;
mod http;
mod links;


pub use error::CrawlError;
pub use http::HttpPageSource;
pub use links::{Link, LinkFilter, extract_links, extract_paragraphs};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::chunker::Chunker;
use crate::document::{Document, ScrapeOutput};
use crate::sanitizer::sanitize;
use crate::tokenizer::TokenCounter;

/// Where page links and paragraph text come from
#[async_trait]
pub trait PageSource: Send + Sync {
    /// All anchors on the page at `url`, unfiltered
    async fn links(&self, url: &str) -> Result<Vec<Link>, CrawlError>;

    /// Raw text of every body paragraph on the page at `url`
    async fn paragraphs(&self, url: &str) -> Result<Vec<String>, CrawlError>;
}

/// Seed pages and URLs never to visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub seeds: Vec<String>,
    pub exclude_urls: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seeds: [
                "https://docs.eseye.com/Content/Home.htm",
                "https://docs.eseye.com/Content/HardwareProducts/HardwareProducts.htm",
                "https://docs.eseye.com/Content/SoftwareProducts/SoftwareProducts.htm",
                "https://docs.eseye.com/Content/Connectivity/ConnectivityIntro.htm",
                "https://docs.eseye.com/Content/ManagingMyEstate/ManagingMyEstate.htm",
                "https://docs.eseye.com/Content/DeveloperDocs/GettingStartedForDevelopers.htm",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            exclude_urls: [
                "https://www.eseye.com/privacy-policy/",
                "https://www.eseye.com/company/policies/privacy-policy/",
                "https://privacy.microsoft.com/en-us/privacystatement",
                "https://privacy.microsoft.com/en-US/privacystatement",
                "https://www.eseye.com/company/policies/cookie-policy/",
                "https://www.cookiebot.com/en/what-is-behind-powered-by-cookiebot/",
                "https://www.cookiebot.com/goto/privacy-policy/",
                "https://www.linkedin.com/legal/privacy-policy",
                "https://policies.google.com/privacy",
                "https://www.eseye.com/company/policies/terms-conditions/",
                "https://www.cookiebot.com/",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Turn one page's paragraphs into chunked documents.
///
/// Each paragraph is sanitized and becomes its own document. Paragraphs of
/// at most one character, dead-page paragraphs and documents without chunks
/// are skipped. Returns `None` when nothing usable is left.
pub fn page_documents<T: TokenCounter>(
    link: &Link,
    paragraphs: Vec<String>,
    chunker: &Chunker<T>,
) -> Option<Vec<Document>> {
    let mut documents = Vec::new();

    for raw in paragraphs {
        let content = sanitize(&raw);
        if content.trim().chars().count() <= 1 {
            continue;
        }

        let tokens = chunker.count_tokens(&content);
        let document = Document::new(&link.title, &link.url, content, tokens);

        let Some(document) = chunker.chunk(document) else {
            continue;
        };
        if !document.chunks.is_empty() {
            documents.push(document);
        }
    }

    if documents.is_empty() {
        None
    } else {
        Some(documents)
    }
}

/// Crawl every non-excluded seed one level deep.
///
/// `visited` is owned by the caller and scoped to one run; pages already in
/// it are not fetched again, and every page attempted is added to it.
/// Failing seeds and pages are logged and skipped.
pub async fn crawl<S, T>(
    source: &S,
    config: &CrawlConfig,
    chunker: &Chunker<T>,
    visited: &mut HashSet<String>,
) -> ScrapeOutput
where
    S: PageSource + ?Sized,
    T: TokenCounter,
{
    let filter = LinkFilter::new(&config.exclude_urls);
    let mut essays = Vec::new();

    for seed in config.seeds.iter().filter(|s| !filter.is_excluded(s)) {
        let links = match source.links(seed).await {
            Ok(links) => links,
            Err(e) => {
                warn!(seed = %seed, error = %e, "failed to collect links");
                continue;
            }
        };

        let links: Vec<Link> = links.into_iter().filter(|l| filter.allows(l)).collect();
        info!(seed = %seed, links = links.len(), "collected links");

        for link in links {
            if visited.contains(&link.url) {
                continue;
            }

            match source.paragraphs(&link.url).await {
                Ok(paragraphs) => match page_documents(&link, paragraphs, chunker) {
                    Some(documents) => {
                        debug!(url = %link.url, documents = documents.len(), "page chunked");
                        essays.extend(documents);
                    }
                    None => debug!(url = %link.url, "no usable content"),
                },
                Err(e) => warn!(url = %link.url, error = %e, "failed to fetch page"),
            }

            visited.insert(link.url);
        }
    }

    let output = ScrapeOutput::from_documents(essays);
    info!(
        essays = output.total_essays,
        tokens = output.total_tokens,
        chunks = output.chunk_count(),
        visited = visited.len(),
        "crawl complete"
    );
    output
}
