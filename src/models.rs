//! Data models for the rack telemetry API.

use serde::Serialize;
use thiserror::Error;

// ---

/// Smallest rack count a telemetry request may ask for.
pub const MIN_RACKS: i64 = 1;

/// Largest rack count a telemetry request may ask for.
pub const MAX_RACKS: i64 = 24;

/// Rack count used when the request does not name one.
pub const DEFAULT_RACKS: u8 = 6;

/// Coarse lifecycle tag for a rack's crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GrowthStatus {
    Early,
    Mid,
    Harvest,
}

impl GrowthStatus {
    /// Map a uniform roll in `[0, 1)` to a phase.
    ///
    /// Below 0.33 is `Early`, below 0.78 is `Mid`, the rest is `Harvest`.
    pub fn from_roll(roll: f64) -> Self {
        // ---
        if roll < 0.33 {
            GrowthStatus::Early
        } else if roll < 0.78 {
            GrowthStatus::Mid
        } else {
            GrowthStatus::Harvest
        }
    }
}

/// One rack's instantaneous state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RackReading {
    // ---
    pub rack_id: u32,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub light_lux: u32,
    pub moisture_pct: f64,
    pub growth_status: GrowthStatus,
}

/// Response envelope for `GET /api/telemetry`.
///
/// `racks[i].rack_id == i + 1` always holds.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    // ---
    /// Capture time formatted as `YYYY-MM-DD HH:MM:SS UTC`.
    pub timestamp: String,
    pub racks: Vec<RackReading>,
}

/// Reasons a requested rack count is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RackCountError {
    #[error("racks must be between 1 and 24, got {0}")]
    OutOfRange(i64),
}

/// A rack count known to lie within `[MIN_RACKS, MAX_RACKS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RackCount(u8);

impl RackCount {
    // ---
    pub fn new(count: i64) -> Result<Self, RackCountError> {
        // ---
        if (MIN_RACKS..=MAX_RACKS).contains(&count) {
            Ok(RackCount(count as u8))
        } else {
            Err(RackCountError::OutOfRange(count))
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for RackCount {
    fn default() -> Self {
        RackCount(DEFAULT_RACKS)
    }
}

/// Body of the two greeting endpoints.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Body of the `GET /test` diagnostic endpoint.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    // ---
    pub backend: &'static str,
    pub database: String,
    pub database_url: bool,
    pub database_name: bool,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}
