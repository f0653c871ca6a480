//! Control policy applied on top of the EC protocol.

pub mod curve;

pub use curve::{CurveStep, FanCurve};
