use serde_json::json;

use crate::core::unit::{DegreeCelsius, ValvePosition};
use crate::home::{HvacMode, SensorMode, TrvId};
use crate::port::ActuatorGateway;

use super::homeassistant::HaClient;
use super::z2m::Z2mSender;

/// Wait after switching the temperature source before pushing a value, the
/// actuator drops writes that arrive while it is still switching.
const SETTLE_DELAY: std::time::Duration = std::time::Duration::from_millis(100);

/// The primary command channel, a Home Assistant service call.
#[allow(async_fn_in_trait)]
pub trait ServiceCaller {
    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
        data: serde_json::Value,
    ) -> anyhow::Result<()>;
}

impl ServiceCaller for HaClient {
    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
        data: serde_json::Value,
    ) -> anyhow::Result<()> {
        HaClient::call_service(self, domain, service, entity_id, data).await
    }
}

/// The secondary command channel, a raw device payload.
#[allow(async_fn_in_trait)]
pub trait FallbackChannel {
    async fn publish(&self, device: &str, payload: serde_json::Value) -> anyhow::Result<()>;
}

impl FallbackChannel for Z2mSender {
    async fn publish(&self, device: &str, payload: serde_json::Value) -> anyhow::Result<()> {
        Z2mSender::publish(self, device, payload).await
    }
}

/// Actuator commands go through the Home Assistant entity first. When the
/// entity is missing or the call fails, the same command is published to
/// the Zigbee2MQTT device topic instead. A failed fallback is given up on
/// for this cycle, never retried.
#[derive(Clone)]
pub struct HaGateway<C = HaClient, F = Z2mSender> {
    client: C,
    z2m: F,
}

impl<C: ServiceCaller, F: FallbackChannel> HaGateway<C, F> {
    pub fn new(client: C, z2m: F) -> Self {
        Self { client, z2m }
    }

    async fn call_or_fallback(
        &self,
        trv: &TrvId,
        domain: &str,
        service: &str,
        entity_id: &str,
        data: serde_json::Value,
        fallback: serde_json::Value,
    ) -> anyhow::Result<()> {
        match self.client.call_service(domain, service, entity_id, data).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("Error calling {} for {}, falling back to Zigbee2MQTT: {:?}", entity_id, trv, e);
                self.z2m.publish(trv.device_name(), fallback).await
            }
        }
    }
}

impl<C: ServiceCaller, F: FallbackChannel> ActuatorGateway for HaGateway<C, F> {
    async fn set_valve_position(&self, trv: &TrvId, position: ValvePosition) -> anyhow::Result<()> {
        let entity_id = format!("number.{}_valve_opening_degree", trv.device_name());

        self.call_or_fallback(
            trv,
            "number",
            "set_value",
            &entity_id,
            json!({ "value": position.value() }),
            json!({ "valve_opening_degree": position.value() }),
        )
        .await
    }

    async fn send_target_temperature(&self, trv: &TrvId, target: DegreeCelsius) -> anyhow::Result<()> {
        self.call_or_fallback(
            trv,
            "climate",
            "set_temperature",
            trv.as_str(),
            json!({ "temperature": target.0 }),
            json!({ "occupied_heating_setpoint": target.0 }),
        )
        .await
    }

    async fn send_external_room_temperature(&self, trv: &TrvId, value: DegreeCelsius) -> anyhow::Result<()> {
        self.switch_sensor_mode(trv, SensorMode::External).await?;
        tokio::time::sleep(SETTLE_DELAY).await;

        let entity_id = format!("number.{}_external_temperature", trv.device_name());

        self.call_or_fallback(
            trv,
            "number",
            "set_value",
            &entity_id,
            json!({ "value": value.0 }),
            json!({ "external_temperature_input": value.0 }),
        )
        .await
    }

    async fn set_hvac_mode(&self, trv: &TrvId, mode: HvacMode) -> anyhow::Result<()> {
        self.call_or_fallback(
            trv,
            "climate",
            "set_hvac_mode",
            trv.as_str(),
            json!({ "hvac_mode": mode.as_str() }),
            json!({ "system_mode": mode.as_str() }),
        )
        .await
    }

    async fn switch_sensor_mode(&self, trv: &TrvId, mode: SensorMode) -> anyhow::Result<()> {
        let entity_id = format!("select.{}_sensor", trv.device_name());

        self.call_or_fallback(
            trv,
            "select",
            "select_option",
            &entity_id,
            json!({ "option": mode.as_str() }),
            json!({ "temperature_sensor_select": mode.as_str() }),
        )
        .await
    }
}
