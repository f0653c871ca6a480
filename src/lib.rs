//! ec-fand library.
//!
//! Host-side fan control through the ACPI embedded controller.  The EC
//! transaction engine ([`ec`]) and the control loop ([`app`]) only see
//! the port traits in [`app::ports`]; the privileged `/dev/port` backend
//! lives in [`drivers`] and is swapped for fakes in tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod ec;
pub mod error;
pub mod logging;
pub mod sensors;
