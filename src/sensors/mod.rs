//! Sensor drivers.

pub mod temperature;

pub use temperature::ThermalZone;
