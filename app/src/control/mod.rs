mod failsafe;
mod history;
mod room;
mod schedule;
mod status;
mod valve;

pub use failsafe::FailsafeMonitor;
pub use history::TemperatureHistory;
pub use room::{
    RoomController, RoomError, RoomEvent, RoomHandle, RoomRegistry, RoomStatusReport, TrvValidation,
    ValidationSummary,
};
pub use status::HeatingStatus;
