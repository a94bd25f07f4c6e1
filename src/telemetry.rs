//! Synthetic telemetry generation for the grow racks.
//!
//! Every snapshot draws one shared scene baseline (temperature, humidity,
//! light) and jitters each rack around it, so racks in the same response
//! look like they share one room. Moisture and growth phase are drawn
//! independently per rack.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::models::{GrowthStatus, RackCount, RackReading, TelemetrySnapshot};

// ---

/// Hard floor applied to every rack's light reading.
pub const MIN_LIGHT_LUX: i64 = 8000;

/// Format of [`TelemetrySnapshot::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Shared per-snapshot reference values all racks jitter around.
#[derive(Debug, Clone, Copy)]
struct SceneBaseline {
    temperature_c: f64,
    humidity_pct: f64,
    light_lux: i64,
}

impl SceneBaseline {
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // ---
        SceneBaseline {
            temperature_c: rng.gen_range(18.0..=22.0),
            humidity_pct: rng.gen_range(55.0..=75.0),
            light_lux: rng.gen_range(12000..=18000),
        }
    }

    fn rack<R: Rng + ?Sized>(&self, rng: &mut R, rack_id: u32) -> RackReading {
        // ---
        let temperature_c = round1(self.temperature_c + rng.gen_range(-0.8..=0.8));
        let humidity_pct = round1(self.humidity_pct + rng.gen_range(-3.5..=3.5));
        let light_lux = (self.light_lux + rng.gen_range(-1500..=1500)).max(MIN_LIGHT_LUX);
        let moisture_pct = round1(rng.gen_range(55.0..=85.0));
        let growth_status = GrowthStatus::from_roll(rng.gen::<f64>());

        RackReading {
            rack_id,
            temperature_c,
            humidity_pct,
            light_lux: light_lux as u32,
            moisture_pct,
            growth_status,
        }
    }
}

/// Generate a snapshot for `count` racks using the thread-local RNG and the
/// current time.
pub fn synthesize(count: RackCount) -> TelemetrySnapshot {
    // ---
    synthesize_with(&mut rand::thread_rng(), count, Utc::now())
}

/// Generate a snapshot from an explicit random source and capture time.
pub fn synthesize_with<R: Rng + ?Sized>(
    rng: &mut R,
    count: RackCount,
    now: DateTime<Utc>,
) -> TelemetrySnapshot {
    // ---
    let baseline = SceneBaseline::draw(&mut *rng);
    tracing::trace!(?baseline, racks = count.get(), "drew scene baseline");

    let racks = (1..=count.get() as u32)
        .map(|rack_id| baseline.rack(&mut *rng, rack_id))
        .collect();

    TelemetrySnapshot {
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        racks,
    }
}

/// Round to one decimal place, half away from zero.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
