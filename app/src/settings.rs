use config::{Config, ConfigError, Environment, File};
use infrastructure::{HttpServerConfig, MonitoringConfig, MqttConfig};
use serde::Deserialize;

use crate::adapter::homeassistant::HomeAssistantSettings;
use crate::home::RoomConfig;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub mqtt: MqttConfig,
    pub http_server: HttpServerConfig,
    pub monitoring: MonitoringConfig,
    pub homeassistant: HomeAssistantSettings,
    pub z2m: Zigbee2MqttSettings,
    pub state_file: String,
    pub rooms: Vec<RoomConfig>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml"))
            .add_source(Environment::default().separator("_").list_separator(","));

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Zigbee2MqttSettings {
    pub base_topic: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_deserializes() {
        let toml = r#"
            state_file = "/var/lib/trv-control/state.json"

            [mqtt]
            host = "localhost"
            port = 1883
            client_id = "trv-control"

            [http_server]
            port = 8080

            [monitoring]
            app_name = "trv-control"
            [monitoring.logs]
            default_level = "info"
            filters = ["rumqttc=warn"]

            [homeassistant]
            url = "http://localhost:8123"
            token = "secret"
            event_topic = "homeassistant/event"

            [z2m]
            base_topic = "zigbee2mqtt"

            [[rooms]]
            name = "Living Room"
            temperature_sensor = "sensor.livingroom_temperature"
            window_sensor = "binary_sensor.livingroom_window"

            [[rooms.trvs]]
            climate_entity = "climate.livingroom_trv"
            return_temp_sensor = "sensor.livingroom_return_temp"
            close_threshold = 30.0

            [rooms.trvs.night_schedule]
            enabled = true
            [rooms.trvs.night_schedule.days.monday]
            enabled = true
            start_time = "22:00"
            end_time = "06:00"
            temp_reduction = 2.0
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.rooms.len(), 1);
        assert_eq!(settings.rooms[0].trvs[0].close_threshold, 30.0);
        //defaults fill the omitted tuning fields
        assert_eq!(settings.rooms[0].trvs[0].max_valve_position, 100);
        assert_eq!(settings.rooms[0].trvs[0].proportional_band, 2.5);
    }
}
