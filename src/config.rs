//! Platform configuration.
//!
//! Everything that differs between laptop models lives here: the two EC
//! I/O ports, the four EC register offsets, the manual-mode magic value,
//! the fan curve and the poll interval.  Defaults are the values for the
//! reference platform; a JSON file can override any subset of them at
//! startup (see [`JsonFileConfig`](crate::adapters::json_config::JsonFileConfig)).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::curve::FanCurve;
use crate::ec::wait::WaitStrategy;

/// Linux thermal zone exposing the CPU package temperature.
pub const DEFAULT_SENSOR_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// I/O ports of the ACPI EC interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortMap {
    /// Status on read, command on write.
    pub command: u16,
    pub data: u16,
}

impl Default for PortMap {
    fn default() -> Self {
        Self {
            command: 0x66,
            data: 0x62,
        }
    }
}

/// EC register offsets used for fan control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterMap {
    /// Fan control mode (automatic vs. host-driven).
    pub fan_mode: u8,
    /// PWM duty, written as a percentage.
    pub fan_duty: u8,
    /// Tachometer count, high byte.
    pub tach_high: u8,
    /// Tachometer count, low byte.
    pub tach_low: u8,
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self {
            fan_mode: 0x64,
            fan_duty: 0x49,
            tach_high: 0x5C,
            tach_low: 0x5D,
        }
    }
}

/// Core daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    // --- EC ---
    pub ports: PortMap,
    pub registers: RegisterMap,
    /// Value written to `registers.fan_mode` every cycle to keep the
    /// firmware curve disengaged.
    pub manual_mode_value: u8,
    /// How flag waits are bounded.
    pub wait: WaitStrategy,

    // --- Policy ---
    pub curve: FanCurve,

    // --- Sensor ---
    /// Text file holding millidegrees Celsius.
    pub sensor_path: PathBuf,

    // --- Timing ---
    /// Pause between control iterations (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            ports: PortMap::default(),
            registers: RegisterMap::default(),
            manual_mode_value: 0xD1,
            wait: WaitStrategy::default(),
            curve: FanCurve::default(),
            sensor_path: PathBuf::from(DEFAULT_SENSOR_PATH),
            poll_interval_ms: 3000,
        }
    }
}

impl FanConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ports.command == self.ports.data {
            return Err(ConfigError::ValidationFailed(
                "command and data ports must differ",
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_ms must be non-zero",
            ));
        }
        if let WaitStrategy::Bounded { timeout_us: 0 } = self.wait {
            return Err(ConfigError::ValidationFailed(
                "bounded wait timeout must be non-zero",
            ));
        }
        if self.sensor_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed("sensor_path is empty"));
        }
        self.curve.validate()
    }
}
