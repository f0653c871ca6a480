//! Step fan curve.
//!
//! Maps a whole-degree temperature to a duty percentage through fixed
//! breakpoints.  No hysteresis: a temperature hovering on a breakpoint
//! moves the duty every sample.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Duty applied from `from_c` (inclusive) up to the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveStep {
    pub from_c: i32,
    pub duty: u8,
}

/// Monotonic non-decreasing step function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanCurve {
    /// Duty below the first step.
    pub floor_duty: u8,
    /// Steps, ascending by `from_c`.
    pub steps: Vec<CurveStep>,
}

impl Default for FanCurve {
    fn default() -> Self {
        Self {
            floor_duty: 0,
            steps: vec![
                CurveStep { from_c: 40, duty: 30 },
                CurveStep { from_c: 50, duty: 50 },
                CurveStep { from_c: 60, duty: 70 },
                CurveStep { from_c: 70, duty: 90 },
                CurveStep { from_c: 75, duty: 100 },
            ],
        }
    }
}

impl FanCurve {
    pub fn duty_for(&self, temp_c: i32) -> u8 {
        self.steps
            .iter()
            .take_while(|step| temp_c >= step.from_c)
            .last()
            .map_or(self.floor_duty, |step| step.duty)
    }

    /// Every duty this curve can produce, lowest first.
    pub fn rungs(&self) -> impl Iterator<Item = u8> + '_ {
        core::iter::once(self.floor_duty).chain(self.steps.iter().map(|s| s.duty))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rungs().any(|duty| duty > 100) {
            return Err(ConfigError::ValidationFailed("curve duty must be 0-100"));
        }
        for pair in self.steps.windows(2) {
            if pair[1].from_c <= pair[0].from_c {
                return Err(ConfigError::ValidationFailed(
                    "curve thresholds must be strictly ascending",
                ));
            }
        }
        let mut prev_duty = self.floor_duty;
        for step in &self.steps {
            if step.duty < prev_duty {
                return Err(ConfigError::ValidationFailed(
                    "curve duty must not decrease with temperature",
                ));
            }
            prev_duty = step.duty;
        }
        Ok(())
    }
}
