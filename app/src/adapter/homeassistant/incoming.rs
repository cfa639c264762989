use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use infrastructure::MqttSubscription;

use crate::control::{RoomEvent, RoomRegistry};
use crate::core::timeseries::DataPoint;
use crate::core::unit::DegreeCelsius;
use crate::home::{HvacMode, RoomConfig, RunningState, TrvId};

use super::client::HaClient;

#[derive(Deserialize, Debug)]
#[serde(tag = "event_type", content = "event_data")]
pub enum HaEvent {
    #[serde(rename = "state_changed")]
    StateChanged {
        entity_id: String,
        new_state: StateChangedEvent,
    },

    #[serde(untagged)]
    Unknown(Value),
}

#[derive(Deserialize, Debug)]
pub struct StateChangedEvent {
    pub entity_id: String,
    pub state: StateValue,
    pub last_updated: chrono::DateTime<Utc>,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StateValue {
    Available(String),
    Unavailable,
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        match value.as_str() {
            "unavailable" | "unknown" => Ok(StateValue::Unavailable),
            _ => Ok(StateValue::Available(value)),
        }
    }
}

#[derive(Debug, Clone)]
enum SensorKind {
    RoomTemperature,
    ReturnTemperature(TrvId),
    Window,
    Climate(TrvId),
    RunningState(TrvId),
}

struct Route {
    room: String,
    kind: SensorKind,
}

/// Maps entity-state changes to room events. Fed once from the REST
/// snapshot at startup, then continuously from the MQTT event stream.
pub struct SensorRouter {
    routes: HashMap<String, Vec<Route>>,
    registry: RoomRegistry,
}

impl SensorRouter {
    pub fn new(rooms: &[RoomConfig], registry: RoomRegistry) -> Self {
        let mut routes: HashMap<String, Vec<Route>> = HashMap::new();

        let mut add = |entity: &str, room: &str, kind: SensorKind| {
            routes.entry(entity.to_string()).or_default().push(Route {
                room: room.to_string(),
                kind,
            });
        };

        for room in rooms {
            add(&room.temperature_sensor, &room.name, SensorKind::RoomTemperature);

            if let Some(window_sensor) = &room.window_sensor {
                add(window_sensor, &room.name, SensorKind::Window);
            }

            for trv in &room.trvs {
                add(
                    &trv.return_temp_sensor,
                    &room.name,
                    SensorKind::ReturnTemperature(trv.climate_entity.clone()),
                );
                add(
                    trv.climate_entity.as_str(),
                    &room.name,
                    SensorKind::Climate(trv.climate_entity.clone()),
                );
                //some firmwares expose the running state only as a sensor
                add(
                    &format!("sensor.{}_running_state", trv.climate_entity.device_name()),
                    &room.name,
                    SensorKind::RunningState(trv.climate_entity.clone()),
                );
            }
        }

        Self { routes, registry }
    }

    pub async fn process(self, client: &HaClient, mut subscription: MqttSubscription) -> anyhow::Result<()> {
        tracing::info!("Seeding current states");
        for event in client.get_states().await? {
            self.dispatch(&event).await;
        }

        tracing::info!("Start processing state events");
        while let Some(msg) = subscription.recv().await {
            match serde_json::from_str(&msg.payload) {
                Ok(HaEvent::StateChanged { new_state, .. }) => self.dispatch(&new_state).await,
                Ok(HaEvent::Unknown(_)) => {
                    tracing::trace!("Received unsupported event");
                }
                Err(e) => tracing::error!("Error parsing state event: {}", e),
            }
        }

        Ok(())
    }

    async fn dispatch(&self, event: &StateChangedEvent) {
        let Some(routes) = self.routes.get(&event.entity_id) else {
            tracing::trace!("Skipped {}", event.entity_id);
            return;
        };

        for route in routes {
            let Some(handle) = self.registry.get(&route.room) else {
                continue;
            };

            for room_event in to_room_events(event, &route.kind) {
                handle.send_event(room_event).await;
            }
        }
    }
}

fn to_room_events(event: &StateChangedEvent, kind: &SensorKind) -> Vec<RoomEvent> {
    match kind {
        SensorKind::RoomTemperature => parse_temperature(event)
            .map(RoomEvent::RoomTemperature)
            .into_iter()
            .collect(),

        SensorKind::ReturnTemperature(trv) => parse_temperature(event)
            .map(|value| RoomEvent::ReturnTemperature {
                trv: trv.clone(),
                value,
            })
            .into_iter()
            .collect(),

        SensorKind::Window => match &event.state {
            StateValue::Available(state) => {
                //binary sensors report "on", some window contacts "open"/"true"
                let open = matches!(state.as_str(), "on" | "open" | "true");
                vec![RoomEvent::Window { open }]
            }
            StateValue::Unavailable => vec![],
        },

        SensorKind::Climate(trv) => {
            let mut events = vec![];

            if let StateValue::Available(state) = &event.state {
                match HvacMode::from_state(state) {
                    Some(mode) => events.push(RoomEvent::TrvHvacMode {
                        trv: trv.clone(),
                        mode,
                    }),
                    None => tracing::debug!("Unsupported HVAC mode {:?} of {}", state, event.entity_id),
                }
            }

            if let Some(action) = event.attributes.get("hvac_action").and_then(|v| v.as_str()) {
                events.push(RoomEvent::TrvRunningState {
                    trv: trv.clone(),
                    state: RunningState::from_state(action),
                });
            }

            events
        }

        SensorKind::RunningState(trv) => match &event.state {
            StateValue::Available(state) => vec![RoomEvent::TrvRunningState {
                trv: trv.clone(),
                state: RunningState::from_state(state),
            }],
            StateValue::Unavailable => vec![],
        },
    }
}

fn parse_temperature(event: &StateChangedEvent) -> Option<DataPoint<DegreeCelsius>> {
    let StateValue::Available(state) = &event.state else {
        tracing::warn!("Value of {} is not available", event.entity_id);
        return None;
    };

    match state.parse::<f64>() {
        Ok(value) => Some(DataPoint::new(DegreeCelsius(value), event.last_updated.into())),
        Err(_) => {
            tracing::error!("Value {:?} of {} is not a temperature", state, event.entity_id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(entity_id: &str, state: &str, attributes: serde_json::Value) -> StateChangedEvent {
        serde_json::from_value(serde_json::json!({
            "entity_id": entity_id,
            "state": state,
            "last_updated": "2024-11-04T12:00:00Z",
            "attributes": attributes,
        }))
        .unwrap()
    }

    #[test]
    fn test_state_changed_event_parsing() {
        let payload = r#"{
            "event_type": "state_changed",
            "event_data": {
                "entity_id": "sensor.livingroom_temperature",
                "new_state": {
                    "entity_id": "sensor.livingroom_temperature",
                    "state": "21.4",
                    "last_changed": "2024-11-04T12:00:00+00:00",
                    "last_updated": "2024-11-04T12:00:00+00:00",
                    "attributes": {"unit_of_measurement": "°C"}
                }
            }
        }"#;

        match serde_json::from_str(payload) {
            Ok(HaEvent::StateChanged { entity_id, new_state }) => {
                assert_eq!(entity_id, "sensor.livingroom_temperature");
                assert_eq!(new_state.state, StateValue::Available("21.4".to_string()));
            }
            other => panic!("unexpected parse result {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_state() {
        let event = event("sensor.livingroom_temperature", "unavailable", serde_json::json!({}));
        assert_eq!(event.state, StateValue::Unavailable);
        assert!(parse_temperature(&event).is_none());
    }

    #[test]
    fn test_non_numeric_temperature_skipped() {
        let event = event("sensor.livingroom_temperature", "on", serde_json::json!({}));
        assert!(parse_temperature(&event).is_none());
    }

    #[test]
    fn test_window_events() {
        for state in ["on", "open", "true"] {
            let evt = event("binary_sensor.livingroom_window", state, serde_json::json!({}));
            let events = to_room_events(&evt, &SensorKind::Window);
            assert!(
                matches!(events.as_slice(), [RoomEvent::Window { open: true }]),
                "state {:?} should open the window",
                state
            );
        }

        for state in ["off", "closed", "false"] {
            let evt = event("binary_sensor.livingroom_window", state, serde_json::json!({}));
            let events = to_room_events(&evt, &SensorKind::Window);
            assert!(
                matches!(events.as_slice(), [RoomEvent::Window { open: false }]),
                "state {:?} should close the window",
                state
            );
        }
    }

    #[test]
    fn test_router_registers_running_state_entity() {
        use crate::home::ValveConfig;

        let room = RoomConfig {
            name: "Living Room".to_string(),
            temperature_sensor: "sensor.livingroom_temperature".to_string(),
            window_sensor: None,
            trvs: vec![ValveConfig {
                climate_entity: "climate.livingroom_trv".into(),
                return_temp_sensor: "sensor.livingroom_return_temp".to_string(),
                close_threshold: 32.0,
                open_threshold: None,
                max_valve_position: 100,
                min_valve_position: 0,
                anticipatory_offset: 0.5,
                proportional_band: 2.5,
                night_schedule: None,
            }],
        };

        let router = SensorRouter::new(&[room], RoomRegistry::default());

        assert!(router.routes.contains_key("sensor.livingroom_trv_running_state"));
        assert!(router.routes.contains_key("climate.livingroom_trv"));
    }

    #[test]
    fn test_running_state_sensor() {
        let trv: TrvId = "climate.livingroom_trv".into();
        let evt = event("sensor.livingroom_trv_running_state", "heat", serde_json::json!({}));

        let events = to_room_events(&evt, &SensorKind::RunningState(trv));
        assert!(matches!(
            events.as_slice(),
            [RoomEvent::TrvRunningState {
                state: RunningState::Heating,
                ..
            }]
        ));
    }

    #[test]
    fn test_climate_events_carry_mode_and_action() {
        let trv: TrvId = "climate.livingroom_trv".into();
        let event = event(
            "climate.livingroom_trv",
            "heat",
            serde_json::json!({"hvac_action": "idle"}),
        );

        let events = to_room_events(&event, &SensorKind::Climate(trv));
        assert!(matches!(
            events.as_slice(),
            [
                RoomEvent::TrvHvacMode { mode: HvacMode::Heat, .. },
                RoomEvent::TrvRunningState {
                    state: RunningState::Idle,
                    ..
                }
            ]
        ));
    }
}
