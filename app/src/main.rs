use infrastructure::Mqtt;
use settings::Settings;

use crate::adapter::homeassistant::SensorRouter;
use crate::adapter::{HaGateway, Z2mSender};
use crate::control::{RoomController, RoomRegistry};
use crate::core::persistence::StateStore;

mod adapter;
mod control;
mod core;
mod home;
pub mod port;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    let mut mqtt_client: Mqtt = settings.mqtt.new_client();

    let ha_events = mqtt_client
        .subscribe(&settings.homeassistant.event_topic)
        .await
        .expect("Error subscribing to event topic");

    let ha_client = settings
        .homeassistant
        .new_client()
        .expect("Error creating Home Assistant client");

    let gateway = HaGateway::new(
        ha_client.clone(),
        Z2mSender::new(mqtt_client.sender(), &settings.z2m.base_topic),
    );

    let store = StateStore::new(&settings.state_file);

    let mut registry = RoomRegistry::default();
    let mut room_tasks = vec![];

    for room in settings.rooms.clone() {
        tracing::info!("Starting room controller for {}", room.name);

        let (controller, handle) = RoomController::new(room, gateway.clone(), Some(store.clone()));
        registry.register(handle);
        room_tasks.push(tokio::spawn(controller.run()));
    }

    let router = SensorRouter::new(&settings.rooms, registry.clone());

    let http_server_exec = {
        let registry = registry.clone();
        let http_server = settings.http_server.clone();

        async move {
            http_server
                .run_server(move || vec![adapter::api::new_routes(registry.clone())])
                .await
                .expect("HTTP server execution failed");
        }
    };

    tracing::info!("Starting main loop");

    tokio::select!(
        _ = mqtt_client.run() => {},
        result = router.process(&ha_client, ha_events) => {
            if let Err(e) = result {
                tracing::error!("Event processing stopped: {:?}", e);
            }
        },
        _ = http_server_exec => {},
        _ = futures::future::join_all(room_tasks) => {},
    );
}
