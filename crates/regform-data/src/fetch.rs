//! HTTP transport behind a narrow trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::error::{DataError, Result};

/// User agent sent with reference-data requests.
const USER_AGENT_VALUE: &str = concat!("regform/", env!("CARGO_PKG_VERSION"));

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport seam for dataset requests.
///
/// Production uses [`HttpFetch`]; tests substitute fakes that serve
/// canned JSON and count calls.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch one URL and parse the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;
}

/// Plain-GET JSON transport over reqwest.
pub struct HttpFetch {
    client: Client,
}

impl HttpFetch {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| DataError::Client(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| DataError::Network {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|err| DataError::Parse {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}
