//! Application core: the control loop and its port boundary.
//!
//! [`service::FanService`] drives one iteration after another.  All
//! interaction with hardware, the sensor and the outside world happens
//! through the traits in [`ports`], so the loop runs unchanged against
//! test doubles.

pub mod events;
pub mod ports;
pub mod service;
