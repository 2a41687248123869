// File: macrofeed-core/src/api.rs

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use macrofeed_common::models::{HealthStatus, MacroId, UpdateRecord};
use macrofeed_common::traits::FeedApi;

use crate::Error;
use crate::http::{DefaultHttpClient, HttpClient};

/// REST client for the macro backend.
///
/// `base_url` is the API root (e.g. `http://localhost:3000/api`); the health
/// probe lives at the server root, next to it.
#[derive(Clone)]
pub struct RestFeedApi {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl RestFeedApi {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_http(base_url, Arc::new(DefaultHttpClient::new()))
    }

    pub fn with_http(base_url: &str, http: Arc<dyn HttpClient>) -> Result<Self, Error> {
        // reject garbage early rather than on the first tick
        Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn macro_endpoint(&self, prefix: &str, macro_id: &MacroId) -> String {
        self.endpoint(&format!("{}/{}", prefix, urlencoding::encode(macro_id.as_str())))
    }

    fn health_endpoint(&self) -> Result<String, Error> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join("/health")?.to_string())
    }
}

#[async_trait]
impl FeedApi for RestFeedApi {
    async fn list_macros(&self) -> Result<Vec<MacroId>, Error> {
        let body = self.http.get(&self.endpoint("macros")).await?;
        let macros: Vec<MacroId> = serde_json::from_str(&body)?;
        debug!("Backend lists {} macros", macros.len());
        Ok(macros)
    }

    async fn list_updates(&self, macro_id: &MacroId) -> Result<Vec<UpdateRecord>, Error> {
        let body = self.http.get(&self.macro_endpoint("updates", macro_id)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn clear_updates(&self, macro_id: &MacroId) -> Result<(), Error> {
        self.http.post(&self.macro_endpoint("clear", macro_id), None).await?;
        Ok(())
    }

    async fn get_update(&self, macro_id: &MacroId, update_id: i64) -> Result<UpdateRecord, Error> {
        let url = format!("{}/{}", self.macro_endpoint("updates", macro_id), update_id);
        match self.http.get(&url).await {
            Ok(body) => Ok(serde_json::from_str(&body)?),
            Err(Error::Status { status: 404, .. }) => Err(Error::NotFound(format!(
                "update {} for macro '{}'",
                update_id, macro_id
            ))),
            Err(e) => Err(e),
        }
    }

    async fn clear_all(&self) -> Result<(), Error> {
        self.http.post(&self.endpoint("clear-all"), None).await?;
        Ok(())
    }

    async fn health(&self) -> Result<bool, Error> {
        let body = self.http.get(&self.health_endpoint()?).await?;
        let status: HealthStatus = serde_json::from_str(&body)?;
        Ok(status.status == "ok")
    }
}
