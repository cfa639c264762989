use std::sync::Arc;

use rumqttc::v5::{
    AsyncClient, Event, EventLoop, MqttOptions,
    mqttbytes::{
        QoS,
        v5::{ConnectProperties, Packet, Publish, SubscribeProperties},
    },
};
use serde::Deserialize;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize, Clone)]
pub struct MqttConfig {
    host: String,
    port: u16,
    client_id: String,
}

impl MqttConfig {
    pub fn new_client(&self) -> Mqtt {
        Mqtt::connect(&self.host, self.port, &self.client_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttInMessage {
    pub topic: String,
    pub payload: String,
}

pub struct MqttSubscription {
    rx: mpsc::Receiver<MqttInMessage>,
}

impl MqttSubscription {
    pub async fn recv(&mut self) -> Option<MqttInMessage> {
        self.rx.recv().await
    }
}

#[derive(Clone)]
pub struct MqttSender {
    client: Arc<AsyncClient>,
}

impl MqttSender {
    pub async fn send_transient(&self, topic: impl Into<String>, payload: impl Into<String>) -> anyhow::Result<()> {
        let (topic, payload) = (topic.into(), payload.into());
        tracing::debug!("Publishing MQTT message to {}: {:?}", topic, payload);

        self.client
            .publish(topic.clone(), QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| {
                tracing::error!("Error publishing MQTT message to {}: {}", topic, e);
                e.into()
            })
    }
}

pub struct Mqtt {
    client: Arc<AsyncClient>,
    event_loop: EventLoop,
    subscriptions: Vec<SubscriptionHandle>,
}

struct SubscriptionHandle {
    topic: String,
    txs: Vec<mpsc::Sender<MqttInMessage>>,
}

impl Mqtt {
    pub fn connect(host: &str, port: u16, client_id: &str) -> Self {
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(std::time::Duration::from_secs(5));
        options.set_clean_start(false);

        let mut connect_props = ConnectProperties::new();
        connect_props.session_expiry_interval = 60.into();
        connect_props.max_packet_size = Some(1024 * 1024);
        options.set_connect_properties(connect_props);

        let (client, event_loop) = AsyncClient::new(options, 10);

        Mqtt {
            client: Arc::new(client),
            event_loop,
            subscriptions: vec![],
        }
    }

    pub async fn subscribe(&mut self, topic: impl Into<String>) -> anyhow::Result<MqttSubscription> {
        let topic = topic.into();
        let (tx, rx) = mpsc::channel::<MqttInMessage>(32);

        if let Some(subscription) = self.subscriptions.iter_mut().find(|s| s.topic == topic) {
            subscription.txs.push(tx);
            return Ok(MqttSubscription { rx });
        }

        tracing::info!("Creating new subscription for topic {:?}", topic);

        self.subscriptions.push(SubscriptionHandle {
            topic: topic.clone(),
            txs: vec![tx],
        });

        self.client
            .subscribe_with_properties(
                topic,
                QoS::AtLeastOnce,
                SubscribeProperties {
                    id: Some(self.subscriptions.len()), //must be > 0
                    user_properties: vec![],
                },
            )
            .await?;

        Ok(MqttSubscription { rx })
    }

    pub fn sender(&self) -> MqttSender {
        MqttSender {
            client: self.client.clone(),
        }
    }

    pub async fn run(mut self) {
        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    self.handle_publish(publish).await;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("MQTT error: {}", e);
                }
            }
        }
    }

    async fn handle_publish(&self, msg: Publish) {
        let message = match to_in_message(&msg) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("Error parsing MQTT message: {}", e);
                return;
            }
        };

        let subscription_ids = match msg.properties {
            Some(p) => p.subscription_identifiers,
            None => {
                tracing::error!("No subscription identifiers in MQTT message on {}", message.topic);
                return;
            }
        };

        for id in subscription_ids {
            let Some(subscription) = self.subscriptions.get(id - 1) else {
                tracing::error!("No subscription for id {}", id);
                continue;
            };

            for tx in subscription.txs.iter() {
                if let Err(e) = tx
                    .send_timeout(message.clone(), tokio::time::Duration::from_secs(5))
                    .await
                {
                    tracing::error!(
                        "Failed to forward MQTT message to subscriber of {}: {}",
                        subscription.topic,
                        e
                    );
                }
            }
        }
    }
}

fn to_in_message(msg: &Publish) -> Result<MqttInMessage, std::str::Utf8Error> {
    Ok(MqttInMessage {
        topic: std::str::from_utf8(&msg.topic)?.to_string(),
        payload: std::str::from_utf8(&msg.payload)?.to_string(),
    })
}
