#![allow(async_fn_in_trait)]

use crate::core::unit::{DegreeCelsius, ValvePosition};
use crate::home::{HvacMode, SensorMode, TrvId};

/// Command surface of a valve actuator. The production implementation talks
/// to Home Assistant first and falls back to Zigbee2MQTT; the control core
/// never inspects actuator capabilities itself.
pub trait ActuatorGateway {
    async fn set_valve_position(&self, trv: &TrvId, position: ValvePosition) -> anyhow::Result<()>;

    async fn send_target_temperature(&self, trv: &TrvId, target: DegreeCelsius) -> anyhow::Result<()>;

    /// Switches the actuator to its external temperature input and, after a
    /// short settle delay, pushes the value.
    async fn send_external_room_temperature(&self, trv: &TrvId, value: DegreeCelsius) -> anyhow::Result<()>;

    async fn set_hvac_mode(&self, trv: &TrvId, mode: HvacMode) -> anyhow::Result<()>;

    async fn switch_sensor_mode(&self, trv: &TrvId, mode: SensorMode) -> anyhow::Result<()>;
}
