use infrastructure::MqttSender;

/// Publishes device commands directly to Zigbee2MQTT `set` topics, used as
/// the fallback channel when the Home Assistant entity is missing.
#[derive(Clone)]
pub struct Z2mSender {
    mqtt: MqttSender,
    base_topic: String,
}

impl Z2mSender {
    pub fn new(mqtt: MqttSender, base_topic: &str) -> Self {
        Self {
            mqtt,
            base_topic: base_topic.to_owned(),
        }
    }

    pub async fn publish(&self, device: &str, payload: serde_json::Value) -> anyhow::Result<()> {
        let topic = format!("{}/{}/set", self.base_topic, device);
        self.mqtt.send_transient(topic, payload.to_string()).await
    }
}
