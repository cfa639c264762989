mod http;
mod monitoring;
mod mqtt;

pub use http::{HttpClientConfig, HttpServerConfig};
pub use monitoring::MonitoringConfig;
pub use mqtt::{Mqtt, MqttConfig, MqttInMessage, MqttSender, MqttSubscription};
