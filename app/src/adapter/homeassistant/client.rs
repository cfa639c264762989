use anyhow::{Context as _, bail};
use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;

use super::incoming::StateChangedEvent;

/// Thin wrapper around the Home Assistant REST API.
#[derive(Clone)]
pub struct HaClient {
    base_url: String,
    client: ClientWithMiddleware,
}

impl HaClient {
    pub fn new(base_url: &str, token: &str) -> anyhow::Result<Self> {
        let client = HttpClientConfig::new(Some(token.to_owned())).new_client()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    pub async fn get_states(&self) -> anyhow::Result<Vec<StateChangedEvent>> {
        let url = format!("{}/api/states", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Error calling {}", url))?;

        if !response.status().is_success() {
            bail!("Error getting states: HTTP {}", response.status());
        }

        response.json().await.context("Error parsing states response")
    }

    pub async fn call_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
        mut data: serde_json::Value,
    ) -> anyhow::Result<()> {
        let url = format!("{}/api/services/{}/{}", self.base_url, domain, service);

        data.as_object_mut()
            .context("Service data must be a JSON object")?
            .insert("entity_id".to_string(), serde_json::json!(entity_id));

        let response = self
            .client
            .post(&url)
            .json(&data)
            .send()
            .await
            .with_context(|| format!("Error calling {}/{} on {}", domain, service, entity_id))?;

        if !response.status().is_success() {
            bail!(
                "Error calling {}/{} on {}: HTTP {}",
                domain,
                service,
                entity_id,
                response.status()
            );
        }

        Ok(())
    }
}
