//! Dolibarr REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use eusko_core::directory::{Association, DirectoryError, Member, MemberDirectory};
use eusko_shared::DolibarrConfig;

use crate::dolibarr::wire::{AssociationWire, MemberWire};
use crate::error::GatewayError;

const API_KEY_HEADER: &str = "DOLAPIKEY";
const MEMBERS: &str = "members";
const ASSOCIATIONS: &str = "associations";

/// Member directory over the Dolibarr REST API.
#[derive(Clone)]
pub struct DolibarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DolibarrClient {
    /// Builds a client using the configured API key.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Setup` if the HTTP client cannot be built.
    pub fn new(config: &DolibarrConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// GETs a resource. A 404 is an empty result, not an error.
    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, GatewayError> {
        debug!(resource, "Dolibarr call");
        let response = self
            .client
            .get(format!("{}/{resource}", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(resource, %status, "Dolibarr rejected the call");
            return Err(GatewayError::Rejected { status, detail });
        }
        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl MemberDirectory for DolibarrClient {
    async fn member_by_login(&self, login: &str) -> Result<Option<Member>, DirectoryError> {
        let filter = format!("login='{}'", login.replace('\'', ""));
        let members: Option<Vec<MemberWire>> = self
            .get(MEMBERS, &[("sqlfilters", filter)])
            .await
            .map_err(|e| e.into_directory(MEMBERS))?;

        Ok(members
            .unwrap_or_default()
            .into_iter()
            .find(|member| member.login == login)
            .map(Into::into))
    }

    async fn associations(&self) -> Result<Vec<Association>, DirectoryError> {
        let associations: Option<Vec<AssociationWire>> = self
            .get(ASSOCIATIONS, &[])
            .await
            .map_err(|e| e.into_directory(ASSOCIATIONS))?;

        Ok(associations
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect())
    }
}
