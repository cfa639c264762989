mod client;
mod incoming;

pub use client::HaClient;
pub use incoming::SensorRouter;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct HomeAssistantSettings {
    pub url: String,
    pub token: String,
    pub event_topic: String,
}

impl HomeAssistantSettings {
    pub fn new_client(&self) -> anyhow::Result<HaClient> {
        HaClient::new(&self.url, &self.token)
    }
}
