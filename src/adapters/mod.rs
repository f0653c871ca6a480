//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter          | Implements   | Connects to                 |
//! |------------------|--------------|-----------------------------|
//! | `json_config`    | ConfigPort   | `EC_FAND_CONFIG` JSON file  |
//! | `signals`        | —            | SIGINT / SIGTERM            |
//! | `telemetry_sink` | EventSink    | stdout status lines + log   |
//!
//! Port I/O (`drivers::dev_port`) and the thermal sensor
//! (`sensors::temperature`) implement their ports directly.

pub mod json_config;
pub mod signals;
pub mod telemetry_sink;
