use super::{AssetResolver, HeadCheck};
use crate::types::*;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves pages served over HTTP(S)
#[derive(Debug, Clone, Default)]
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Reject bases that are not absolute http(s) URLs
    pub fn check_base(base: &str) -> Result<Url> {
        let url = Url::parse(base.trim())
            .map_err(|e| FlipbookError::InvalidBase(format!("{base}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(FlipbookError::InvalidBase(format!(
                "{base}: unsupported scheme '{other}'"
            ))),
        }
    }
}

impl AssetResolver for HttpResolver {
    async fn head_check(&self, page: &PageId) -> HeadCheck {
        let response = self
            .client
            .head(page.as_str())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await;

        match response {
            Ok(response) => HeadCheck {
                ok: response.status().is_success(),
                content_type: response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
            },
            Err(e) => {
                log::debug!("HEAD {} failed: {}", page, e);
                HeadCheck::missing()
            }
        }
    }

    async fn fetch(&self, page: &PageId) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(page.as_str())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
