mod degree_celsius;
mod position;

pub use degree_celsius::DegreeCelsius;
pub use position::ValvePosition;
