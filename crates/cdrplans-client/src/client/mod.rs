//! HTTP client for the CDR energy plan endpoints.

mod catalog;
mod detail;
mod urls;

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ClientError;

pub use urls::{plan_detail_url, plans_page_url, plans_url};

/// Maximum number of catalog pages fetched for one provider before giving up.
/// Guards against a server whose `totalPages` keeps growing.
pub(super) const MAX_PAGES: u32 = 500;

/// Version header every CDR energy endpoint requires.
const CDR_VERSION_HEADER: &str = "x-v";
const CDR_VERSION: &str = "1";

/// HTTP client for a retailer's public CDR plan endpoints.
///
/// Non-2xx responses surface as [`ClientError::UnexpectedStatus`] and are never
/// retried here: the next scheduled refresh is the retry.
pub struct CdrClient {
    pub(super) client: Client,
}

impl CdrClient {
    /// Creates a `CdrClient` with the given per-request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Issues a CDR GET and returns the parsed JSON body.
    ///
    /// The whole body is buffered before parsing, so callers never see a
    /// partially received document.
    pub(super) async fn get_json(&self, url: Url, context: &str) -> Result<Value, ClientError> {
        let response = self
            .client
            .get(url.clone())
            .header(CDR_VERSION_HEADER, CDR_VERSION)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
