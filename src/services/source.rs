// src/services/source.rs

//! Live fact source backed by HTTP fetches.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, DropCandidate, GiveawayFact, VaultFact};
use crate::services::{FactSource, alienware, lenovo};
use crate::utils::http::fetch_text;

/// Fetches and extracts facts from the live sites.
pub struct HttpFactSource {
    config: Arc<Config>,
    client: Client,
}

impl HttpFactSource {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl FactSource for HttpFactSource {
    async fn giveaway(&self) -> Result<GiveawayFact> {
        let html = fetch_text(&self.client, &self.config.alienware.giveaway_url).await?;
        alienware::extract_giveaway(&html)
    }

    async fn vault(&self) -> Result<VaultFact> {
        let html = fetch_text(&self.client, &self.config.alienware.vault_url).await?;
        alienware::extract_vault(&html)
    }

    async fn drops(&self) -> Result<Vec<DropCandidate>> {
        lenovo::fetch_candidates(&self.client, &self.config.lenovo).await
    }
}
