//! CPU temperature from a Linux thermal zone.
//!
//! The kernel exposes the zone as a text file holding one integer in
//! millidegrees Celsius (`/sys/class/thermal/thermal_zone*/temp`).
//!
//! ## Fail-safe
//!
//! Any failure to open, read, or parse the file yields 0 °C.  The fan
//! curve maps that to its lowest rung and the control loop keeps
//! running; a sensor fault never commands the fan toward a high duty
//! and never stops the daemon.

use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::app::ports::TemperatureSource;

/// Reported when the sensor cannot be read.
pub const FAILSAFE_CELSIUS: i32 = 0;

/// Parse a millidegree reading into whole degrees, truncating toward zero.
///
/// Only the leading integer counts; anything after it is ignored, so
/// `"45000 x"` reads as 45.
pub fn parse_millidegrees(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let sign = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    text[..sign + digits]
        .parse::<i32>()
        .ok()
        .map(|milli| milli / 1000)
}

pub struct ThermalZone {
    path: PathBuf,
    /// Set while consecutive reads keep failing, so a dead sensor
    /// warns once instead of every poll.
    failing: bool,
}

impl ThermalZone {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            failing: false,
        }
    }

    fn try_read(&self) -> Result<i32, String> {
        let text = fs::read_to_string(&self.path).map_err(|e| e.to_string())?;
        parse_millidegrees(&text).ok_or_else(|| format!("unparsable reading {:?}", text.trim()))
    }
}

impl TemperatureSource for ThermalZone {
    fn read_celsius(&mut self) -> i32 {
        match self.try_read() {
            Ok(celsius) => {
                if self.failing {
                    info!("Thermal sensor {} recovered", self.path.display());
                    self.failing = false;
                }
                celsius
            }
            Err(reason) => {
                if self.failing {
                    debug!("Thermal sensor {} still failing: {}", self.path.display(), reason);
                } else {
                    warn!(
                        "Thermal sensor {} unreadable ({}), assuming {} C",
                        self.path.display(),
                        reason,
                        FAILSAFE_CELSIUS
                    );
                    self.failing = true;
                }
                FAILSAFE_CELSIUS
            }
        }
    }
}
