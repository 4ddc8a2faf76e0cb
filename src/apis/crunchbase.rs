use crate::constants::{API_KEY_HEADER, CRUNCHBASE_BASE_URL};
use crate::error::Result;
use crate::types::{ApiResponse, EntityApi, EntityKind};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Client for the Crunchbase v4 single-entity lookup endpoint.
pub struct CrunchbaseClient {
    client: reqwest::Client,
    base_url: String,
    entity: EntityKind,
    api_key: String,
}

impl CrunchbaseClient {
    pub fn new(entity: EntityKind, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: CRUNCHBASE_BASE_URL.to_string(),
            entity,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl EntityApi for CrunchbaseClient {
    fn api_name(&self) -> &'static str {
        self.entity.path_segment()
    }

    #[instrument(skip(self))]
    async fn fetch_entity(&self, id: &Uuid) -> Result<ApiResponse> {
        // Uuid's Display is the canonical hyphenated form, so any accepted
        // input rendering reaches the API normalized.
        let url = format!("{}/{}/{}", self.base_url, self.entity.path_segment(), id);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "lookup response received");

        Ok(ApiResponse { status, body })
    }
}
