pub mod api;
mod gateway;
pub mod homeassistant;
mod z2m;

pub use gateway::HaGateway;
pub use z2m::Z2mSender;
