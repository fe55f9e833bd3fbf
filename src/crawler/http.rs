use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{CrawlError, Link, PageSource, extract_links, extract_paragraphs};

/// Fetches pages over HTTP and reads them as static HTML
pub struct HttpPageSource {
    http: Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self, CrawlError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, CrawlError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docsift/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }

    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        debug!(url, "fetching page");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn links(&self, url: &str) -> Result<Vec<Link>, CrawlError> {
        let base = Url::parse(url).map_err(|source| CrawlError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let body = self.fetch(url).await?;
        Ok(extract_links(&body, &base))
    }

    async fn paragraphs(&self, url: &str) -> Result<Vec<String>, CrawlError> {
        let body = self.fetch(url).await?;
        Ok(extract_paragraphs(&body))
    }
}
