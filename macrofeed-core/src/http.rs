//! HTTP client abstraction for talking to the macro backend.
//!
//! The dashboard only ever needs two shapes of request: a GET that returns a
//! body, and a bodiless (or JSON-bodied) POST whose status is all that matters.
//! Keeping them behind a trait lets the REST client be exercised without a
//! network, while the default implementation wraps reqwest.
//!
//! Any non-2xx status is reported as [`Error::Status`], whatever the body says.

use async_trait::async_trait;
use reqwest;
use tracing::debug;

use crate::Error;

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, Error>;
    async fn post(&self, url: &str, body: Option<String>) -> Result<String, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    /// No request timeout is configured: a hung request stalls only its own load cycle.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for DefaultHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_body(url: &str, response: reqwest::Response) -> Result<String, Error> {
    let status = response.status();
    if !status.is_success() {
        debug!("{} answered {}", url, status);
        return Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: &str) -> Result<String, Error> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_body(url, response).await
    }

    async fn post(&self, url: &str, body: Option<String>) -> Result<String, Error> {
        debug!("POST {}", url);
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }
        let response = request.send().await?;
        read_body(url, response).await
    }
}
