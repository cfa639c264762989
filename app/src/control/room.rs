use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::control::failsafe::FailsafeMonitor;
use crate::control::history::TemperatureHistory;
use crate::control::schedule::{self, NightAdjustment};
use crate::control::status::{self, HeatingStatus, TrvStatus, TrvStatusInput};
use crate::control::valve::{ControlInput, Decision, decide};
use crate::core::persistence::StateStore;
use crate::core::time::{DateTime, Duration};
use crate::core::timeseries::DataPoint;
use crate::core::unit::{DegreeCelsius, ValvePosition};
use crate::home::{HvacMode, RoomConfig, RunningState, SensorMode, TrvId, ValveConfig};
use crate::port::ActuatorGateway;

const DEFAULT_TARGET: DegreeCelsius = DegreeCelsius(20.0);
const MIN_TARGET: f64 = 5.0;
const MAX_TARGET: f64 = 30.0;

/// Room temperature is re-broadcast to all valves on this period, together
/// with the idle-actuator check.
const REFRESH_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// Pause between switching the actuator to internal and back to external,
/// giving it time to apply the mode.
const NUDGE_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

#[derive(Debug, Clone)]
pub enum RoomEvent {
    RoomTemperature(DataPoint<DegreeCelsius>),
    ReturnTemperature { trv: TrvId, value: DataPoint<DegreeCelsius> },
    TrvHvacMode { trv: TrvId, mode: HvacMode },
    TrvRunningState { trv: TrvId, state: RunningState },
    Window { open: bool },
}

#[derive(Debug)]
pub enum RoomCommand {
    SetTargetTemperature(DegreeCelsius),
    SetHvacMode {
        mode: HvacMode,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    SetValvePosition {
        trv: TrvId,
        position: ValvePosition,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    SetThresholds {
        trv: TrvId,
        close_threshold: Option<f64>,
        open_threshold: Option<f64>,
        max_valve_position: Option<u8>,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    ResetPerformanceStats,
    Validate {
        reply: oneshot::Sender<ValidationSummary>,
    },
    Status {
        reply: oneshot::Sender<RoomStatusReport>,
    },
}

#[derive(Debug)]
enum RoomMessage {
    Event(RoomEvent),
    Command(RoomCommand),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RoomError {
    #[display("unknown TRV {trv}")]
    UnknownValve {
        #[error(not(source))]
        trv: TrvId,
    },
    #[display("window is open")]
    WindowOpen,
    #[display("invalid thresholds: {reason}")]
    InvalidThresholds {
        #[error(not(source))]
        reason: String,
    },
    #[display("room controller unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ValveStats {
    pub position_commands: u64,
    pub failsafe_activations: u64,
    pub nudges: u64,
}

#[derive(Debug, Default)]
struct ValveState {
    return_temp: Option<DataPoint<DegreeCelsius>>,
    position: ValvePosition,
    control_active: bool,
    running_state: RunningState,
    stats: ValveStats,
}

struct ValveUnit {
    config: ValveConfig,
    state: ValveState,
}

struct RoomState {
    current_temp: Option<DataPoint<DegreeCelsius>>,
    target_temp: DegreeCelsius,
    hvac_mode: HvacMode,
    saved_hvac_mode: HvacMode,
    window_open: bool,
    history: TemperatureHistory,
}

/// Owns all state of one room and its valves. Runs as a single task; sensor
/// events and administrative commands arrive on one channel, so there is
/// never concurrent mutation.
pub struct RoomController<G> {
    name: String,
    temperature_sensor: String,
    valves: Vec<ValveUnit>,
    state: RoomState,
    gateway: G,
    failsafe: FailsafeMonitor,
    store: Option<StateStore>,
    rx: mpsc::Receiver<RoomMessage>,
}

#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    tx: mpsc::Sender<RoomMessage>,
}

impl<G: ActuatorGateway> RoomController<G> {
    pub fn new(config: RoomConfig, gateway: G, store: Option<StateStore>) -> (Self, RoomHandle) {
        let (tx, rx) = mpsc::channel(64);

        let target_temp = store
            .as_ref()
            .and_then(|s| s.restored_target(&config.name))
            .inspect(|t| tracing::info!("[{}] Restored target temperature {}", config.name, t))
            .unwrap_or(DEFAULT_TARGET);

        let valves = config
            .trvs
            .into_iter()
            .map(|config| ValveUnit {
                config,
                state: ValveState::default(),
            })
            .collect();

        let controller = Self {
            name: config.name.clone(),
            temperature_sensor: config.temperature_sensor,
            valves,
            state: RoomState {
                current_temp: None,
                target_temp,
                hvac_mode: HvacMode::Heat,
                saved_hvac_mode: HvacMode::Heat,
                window_open: false,
                history: TemperatureHistory::default(),
            },
            gateway,
            failsafe: FailsafeMonitor::default(),
            store,
            rx,
        };

        let handle = RoomHandle { name: config.name, tx };

        (controller, handle)
    }

    pub async fn run(mut self) {
        let mut refresh = tokio::time::interval(REFRESH_INTERVAL);
        refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                msg = self.rx.recv() => match msg {
                    Some(RoomMessage::Event(event)) => self.on_event(event).await,
                    Some(RoomMessage::Command(command)) => self.on_command(command).await,
                    None => break,
                },
                _ = refresh.tick() => self.on_periodic_refresh().await,
            }
        }

        tracing::info!("[{}] Room controller stopped", self.name);
    }

    async fn on_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::RoomTemperature(dp) => self.on_room_temperature_changed(dp).await,
            RoomEvent::ReturnTemperature { trv, value } => self.on_return_temperature_changed(&trv, value).await,
            RoomEvent::TrvHvacMode { trv, mode } => {
                tracing::debug!("[{}] {} reports HVAC mode {}", self.name, trv, mode);
                self.state.hvac_mode = mode;
            }
            RoomEvent::TrvRunningState { trv, state } => {
                if let Some(idx) = self.valve_index(&trv) {
                    self.valves[idx].state.running_state = state;
                }
            }
            RoomEvent::Window { open } => self.on_window_changed(open).await,
        }
    }

    async fn on_command(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::SetTargetTemperature(target) => self.set_target_temperature(target).await,
            RoomCommand::SetHvacMode { mode, reply } => {
                let _ = reply.send(self.set_hvac_mode(mode).await);
            }
            RoomCommand::SetValvePosition { trv, position, reply } => {
                let _ = reply.send(self.set_valve_position(&trv, position).await);
            }
            RoomCommand::SetThresholds {
                trv,
                close_threshold,
                open_threshold,
                max_valve_position,
                reply,
            } => {
                let result = self
                    .set_thresholds(&trv, close_threshold, open_threshold, max_valve_position)
                    .await;
                let _ = reply.send(result);
            }
            RoomCommand::ResetPerformanceStats => self.reset_performance_stats(),
            RoomCommand::Validate { reply } => {
                let _ = reply.send(self.validation_summary(DateTime::now()));
            }
            RoomCommand::Status { reply } => {
                let _ = reply.send(self.status_report(DateTime::now()));
            }
        }
    }

    async fn on_room_temperature_changed(&mut self, dp: DataPoint<DegreeCelsius>) {
        if self.state.current_temp.map(|c| c.value) == Some(dp.value) {
            return;
        }

        tracing::info!("[{}] Room temperature changed to {}", self.name, dp.value);

        self.state.current_temp = Some(dp);
        self.state.history.push(dp.value, dp.timestamp);

        self.send_room_temperature_to_all_valves(dp.value).await;
    }

    async fn on_return_temperature_changed(&mut self, trv: &TrvId, value: DataPoint<DegreeCelsius>) {
        let Some(idx) = self.valve_index(trv) else {
            tracing::warn!("[{}] Return temperature for unknown TRV {}", self.name, trv);
            return;
        };

        self.valves[idx].state.return_temp = Some(value);
        self.evaluate_valve(idx).await;
    }

    async fn on_window_changed(&mut self, open: bool) {
        if open == self.state.window_open {
            return;
        }

        self.state.window_open = open;

        if open {
            tracing::info!("[{}] Window opened, turning off heating", self.name);
            self.state.saved_hvac_mode = self.state.hvac_mode;
            self.apply_hvac_mode(HvacMode::Off).await;
        } else {
            tracing::info!("[{}] Window closed, restoring heating", self.name);
            if self.state.saved_hvac_mode != HvacMode::Off {
                self.apply_hvac_mode(self.state.saved_hvac_mode).await;
            }
        }
    }

    async fn set_target_temperature(&mut self, target: DegreeCelsius) {
        let target = target.clamp(MIN_TARGET, MAX_TARGET);
        tracing::info!("[{}] Target temperature set to {}", self.name, target);

        self.state.target_temp = target;

        if let Some(store) = &self.store {
            if let Err(e) = store.save_target(&self.name, target) {
                tracing::error!("[{}] Error persisting target temperature: {:?}", self.name, e);
            }
        }

        self.evaluate_all_valves().await;
    }

    async fn set_hvac_mode(&mut self, mode: HvacMode) -> Result<(), RoomError> {
        if mode != HvacMode::Off && self.state.window_open {
            tracing::warn!("[{}] Cannot turn on heating, window is open", self.name);
            return Err(RoomError::WindowOpen);
        }

        self.apply_hvac_mode(mode).await;
        Ok(())
    }

    async fn apply_hvac_mode(&mut self, mode: HvacMode) {
        self.state.hvac_mode = mode;

        for unit in self.valves.iter() {
            let trv = &unit.config.climate_entity;
            if let Err(e) = self.gateway.set_hvac_mode(trv, mode).await {
                tracing::error!("[{}] Error sending HVAC mode to {}: {:?}", self.name, trv, e);
            }
        }
    }

    async fn set_valve_position(&mut self, trv: &TrvId, position: ValvePosition) -> Result<(), RoomError> {
        let idx = self.valve_index(trv).ok_or_else(|| RoomError::UnknownValve { trv: trv.clone() })?;

        tracing::info!("[{}] Manual valve position {} for {}", self.name, position, trv);
        self.command_position(idx, position).await;
        Ok(())
    }

    async fn set_thresholds(
        &mut self,
        trv: &TrvId,
        close_threshold: Option<f64>,
        open_threshold: Option<f64>,
        max_valve_position: Option<u8>,
    ) -> Result<(), RoomError> {
        let idx = self.valve_index(trv).ok_or_else(|| RoomError::UnknownValve { trv: trv.clone() })?;

        let updated = self.valves[idx]
            .config
            .with_thresholds(close_threshold, open_threshold, max_valve_position);

        let issues = updated.validation_issues();
        if !issues.is_empty() {
            return Err(RoomError::InvalidThresholds {
                reason: issues.join("; "),
            });
        }

        tracing::info!(
            "[{}] Thresholds for {} set to close={} open={:?} max={}",
            self.name,
            trv,
            updated.close_threshold,
            updated.open_threshold,
            updated.max_valve_position
        );

        self.valves[idx].config = updated;
        self.evaluate_valve(idx).await;
        Ok(())
    }

    fn reset_performance_stats(&mut self) {
        tracing::info!("[{}] Resetting performance statistics", self.name);

        self.state.history.clear();
        for unit in self.valves.iter_mut() {
            unit.state.stats = ValveStats::default();
        }
    }

    async fn evaluate_all_valves(&mut self) {
        for idx in 0..self.valves.len() {
            self.evaluate_valve(idx).await;
        }
    }

    async fn evaluate_valve(&mut self, idx: usize) {
        let now = DateTime::now();
        let unit = &self.valves[idx];

        let adjustment = self.night_adjustment(&unit.config, now);
        let input = ControlInput {
            return_temp: unit.state.return_temp,
            room_temp: self.state.current_temp.map(|dp| dp.value),
            target_temp: Some(adjustment.target),
            window_open: self.state.window_open,
            hvac_mode: self.state.hvac_mode,
            commanded_position: unit.state.position,
            now,
        };

        let decision = decide(&input, &unit.config, &self.failsafe);

        match decision {
            Decision::NoAction => {}
            Decision::SetPosition(position) => {
                tracing::info!(
                    "[{}] Control set valve {} to {}",
                    self.name,
                    unit.config.climate_entity,
                    position
                );
                self.command_position(idx, position).await;
                self.valves[idx].state.control_active = true;
            }
            Decision::Failsafe { position } => {
                let trv = unit.config.climate_entity.clone();
                tracing::warn!(
                    "[{}] Return temperature of {} is stale and room is below target, forcing valve to {}",
                    self.name,
                    trv,
                    position
                );

                self.command_position(idx, position).await;

                if let Err(e) = self.gateway.send_target_temperature(&trv, adjustment.target).await {
                    tracing::error!("[{}] Error sending target temperature to {}: {:?}", self.name, trv, e);
                }

                self.valves[idx].state.stats.failsafe_activations += 1;
                self.valves[idx].state.control_active = true;
                self.nudge_if_idle(idx).await;
            }
        }
    }

    async fn command_position(&mut self, idx: usize, position: ValvePosition) {
        let unit = &mut self.valves[idx];
        unit.state.position = position;
        unit.state.stats.position_commands += 1;

        let trv = &unit.config.climate_entity;
        if let Err(e) = self.gateway.set_valve_position(trv, position).await {
            tracing::error!("[{}] Error setting valve position on {}: {:?}", self.name, trv, e);
        }
    }

    /// Actuators sometimes stay "idle" although they were commanded open.
    /// Toggling the temperature-source selection forces a re-evaluation.
    async fn nudge_if_idle(&mut self, idx: usize) {
        if self.valves[idx].state.running_state != RunningState::Idle {
            return;
        }

        let trv = self.valves[idx].config.climate_entity.clone();
        tracing::info!(
            "[{}] {} is idle although heating is expected, toggling sensor mode",
            self.name,
            trv
        );

        if let Err(e) = self.gateway.switch_sensor_mode(&trv, SensorMode::Internal).await {
            tracing::warn!("[{}] Error switching {} to internal sensor: {:?}", self.name, trv, e);
            return;
        }

        tokio::time::sleep(NUDGE_DELAY).await;

        if let Err(e) = self.gateway.switch_sensor_mode(&trv, SensorMode::External).await {
            tracing::warn!("[{}] Error switching {} back to external sensor: {:?}", self.name, trv, e);
            return;
        }

        self.valves[idx].state.stats.nudges += 1;
    }

    async fn send_room_temperature_to_all_valves(&self, value: DegreeCelsius) {
        for unit in self.valves.iter() {
            let trv = &unit.config.climate_entity;
            if let Err(e) = self.gateway.send_external_room_temperature(trv, value).await {
                tracing::error!("[{}] Error sending room temperature to {}: {:?}", self.name, trv, e);
            }
        }
    }

    async fn on_periodic_refresh(&mut self) {
        match self.state.current_temp {
            Some(current) => {
                tracing::debug!(
                    "[{}] Refreshing {} valves with room temperature {}",
                    self.name,
                    self.valves.len(),
                    current.value
                );
                self.send_room_temperature_to_all_valves(current.value).await;
            }
            None => {
                tracing::warn!(
                    "[{}] Cannot refresh valves, no reading from {} yet",
                    self.name,
                    self.temperature_sensor
                );
            }
        }

        if self.state.hvac_mode == HvacMode::Heat {
            let now = DateTime::now();

            for idx in 0..self.valves.len() {
                if !self.valves[idx].state.position.is_open() {
                    continue;
                }

                let trv = self.valves[idx].config.climate_entity.clone();
                let target = self.night_adjustment(&self.valves[idx].config, now).target;

                if let Err(e) = self.gateway.send_target_temperature(&trv, target).await {
                    tracing::error!("[{}] Error sending target temperature to {}: {:?}", self.name, trv, e);
                }

                self.nudge_if_idle(idx).await;
            }
        }
    }

    fn night_adjustment(&self, config: &ValveConfig, now: DateTime) -> NightAdjustment {
        schedule::adjusted_target(config.night_schedule.as_ref(), self.state.target_temp, now)
    }

    fn valve_index(&self, trv: &TrvId) -> Option<usize> {
        self.valves.iter().position(|u| &u.config.climate_entity == trv)
    }

    fn room_status(&self, now: DateTime) -> HeatingStatus {
        //target is considered reached based on the most restrictive
        //night-adjusted target of any valve
        let target = self
            .valves
            .iter()
            .map(|u| self.night_adjustment(&u.config, now).target)
            .fold(self.state.target_temp, |acc, t| if t < acc { t } else { acc });

        status::room_status(
            self.state.window_open,
            self.state.hvac_mode,
            self.state.current_temp.map(|dp| dp.value),
            Some(target),
        )
    }

    fn status_report(&self, now: DateTime) -> RoomStatusReport {
        let history = &self.state.history;
        let learning = history.is_learning();

        let trvs = self
            .valves
            .iter()
            .map(|unit| {
                let adjustment = self.night_adjustment(&unit.config, now);
                let status = status::trv_status(&TrvStatusInput {
                    window_open: self.state.window_open,
                    hvac_mode: self.state.hvac_mode,
                    room_temp: self.state.current_temp.map(|dp| dp.value),
                    target_temp: Some(adjustment.target),
                    return_temp: unit.state.return_temp.map(|dp| dp.value),
                    valve_position: unit.state.position,
                    close_threshold: unit.config.close_threshold,
                });

                TrvReport {
                    entity: unit.config.climate_entity.clone(),
                    return_temp: unit.state.return_temp.map(|dp| dp.value),
                    return_temp_last_updated: unit.state.return_temp.map(|dp| dp.timestamp.to_human_readable()),
                    valve_position: unit.state.position,
                    control_active: unit.state.control_active,
                    running_state: unit.state.running_state,
                    status,
                    close_threshold: unit.config.close_threshold,
                    min_valve_position: unit.config.min_valve_position,
                    max_valve_position: unit.config.max_valve_position,
                    anticipatory_offset: unit.config.anticipatory_offset,
                    proportional_band: unit.config.proportional_band,
                    night_saving_active: adjustment.active,
                    adjusted_target: adjustment.active.then_some(adjustment.target),
                    stats: unit.state.stats,
                }
            })
            .collect();

        RoomStatusReport {
            room: self.name.clone(),
            status: self.room_status(now),
            hvac_mode: self.state.hvac_mode,
            window_open: self.state.window_open,
            current_temperature: self.state.current_temp.map(|dp| dp.value),
            temperature_last_updated: self.state.current_temp.map(|dp| dp.timestamp.to_human_readable()),
            target_temperature: self.state.target_temp,
            learning,
            learning_status: history.learning_status(),
            heating_rate: (!learning).then(|| history.heating_rate()),
            trvs,
        }
    }

    fn validation_summary(&self, now: DateTime) -> ValidationSummary {
        let trvs: Vec<TrvValidation> = self
            .valves
            .iter()
            .map(|unit| {
                let config_issues = unit.config.validation_issues();
                let has_return_data = unit.state.return_temp.is_some();
                let return_data_fresh = unit
                    .state
                    .return_temp
                    .is_some_and(|dp| now.elapsed_since(dp.timestamp) <= Duration::minutes(60));

                TrvValidation {
                    entity: unit.config.climate_entity.clone(),
                    return_temp_sensor: unit.config.return_temp_sensor.clone(),
                    has_return_data,
                    return_data_fresh,
                    config_issues,
                }
            })
            .collect();

        let ok = trvs
            .iter()
            .all(|t| t.has_return_data && t.return_data_fresh && t.config_issues.is_empty());

        ValidationSummary {
            room: self.name.clone(),
            ok,
            trvs,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomStatusReport {
    pub room: String,
    pub status: HeatingStatus,
    pub hvac_mode: HvacMode,
    pub window_open: bool,
    pub current_temperature: Option<DegreeCelsius>,
    pub temperature_last_updated: Option<String>,
    pub target_temperature: DegreeCelsius,
    pub learning: bool,
    pub learning_status: Option<String>,
    pub heating_rate: Option<f64>,
    pub trvs: Vec<TrvReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrvReport {
    pub entity: TrvId,
    pub return_temp: Option<DegreeCelsius>,
    pub return_temp_last_updated: Option<String>,
    pub valve_position: ValvePosition,
    pub control_active: bool,
    pub running_state: RunningState,
    #[serde(flatten)]
    pub status: TrvStatus,
    pub close_threshold: f64,
    pub min_valve_position: u8,
    pub max_valve_position: u8,
    pub anticipatory_offset: f64,
    pub proportional_band: f64,
    pub night_saving_active: bool,
    pub adjusted_target: Option<DegreeCelsius>,
    pub stats: ValveStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub room: String,
    pub ok: bool,
    pub trvs: Vec<TrvValidation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrvValidation {
    pub entity: TrvId,
    pub return_temp_sensor: String,
    pub has_return_data: bool,
    pub return_data_fresh: bool,
    pub config_issues: Vec<String>,
}

impl RoomHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn send_event(&self, event: RoomEvent) {
        if self.tx.send(RoomMessage::Event(event)).await.is_err() {
            tracing::warn!("[{}] Room controller is gone, dropping event", self.name);
        }
    }

    pub async fn set_target_temperature(&self, target: DegreeCelsius) -> Result<(), RoomError> {
        self.tx
            .send(RoomMessage::Command(RoomCommand::SetTargetTemperature(target)))
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send_command(RoomCommand::SetHvacMode { mode, reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable)?
    }

    pub async fn set_valve_position(&self, trv: TrvId, position: ValvePosition) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send_command(RoomCommand::SetValvePosition { trv, position, reply })
            .await?;
        rx.await.map_err(|_| RoomError::Unavailable)?
    }

    pub async fn set_thresholds(
        &self,
        trv: TrvId,
        close_threshold: Option<f64>,
        open_threshold: Option<f64>,
        max_valve_position: Option<u8>,
    ) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send_command(RoomCommand::SetThresholds {
            trv,
            close_threshold,
            open_threshold,
            max_valve_position,
            reply,
        })
        .await?;
        rx.await.map_err(|_| RoomError::Unavailable)?
    }

    pub async fn reset_performance_stats(&self) -> Result<(), RoomError> {
        self.send_command(RoomCommand::ResetPerformanceStats).await
    }

    pub async fn validate(&self) -> Result<ValidationSummary, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send_command(RoomCommand::Validate { reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable)
    }

    pub async fn status(&self) -> Result<RoomStatusReport, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send_command(RoomCommand::Status { reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable)
    }

    async fn send_command(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.tx
            .send(RoomMessage::Command(command))
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

/// Lookup of room handles by name, shared with the HTTP admin surface and
/// the sensor-event router.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, RoomHandle>,
}

impl RoomRegistry {
    pub fn register(&mut self, handle: RoomHandle) {
        self.rooms.insert(handle.name().to_string(), handle);
    }

    pub fn get(&self, name: &str) -> Option<&RoomHandle> {
        self.rooms.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rooms.keys().cloned().collect();
        names.sort();
        names
    }
}
