//! Console and JSON rendering of validation results.

use deconflict_core::{ConflictRecord, ValidationResult};
use serde::Serialize;

/// Process exit code for a validation outcome.
pub fn exit_code(result: &ValidationResult) -> u8 {
    if result.is_clear() {
        0
    } else {
        2
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Human-readable report. Times are shown relative to the primary's departure and
/// all values are rounded to 2 decimals for display only.
pub fn render_text(mission_id: &str, primary_start: f64, result: &ValidationResult) -> String {
    let mut out = format!(
        "--- Validating Mission: {mission_id} ---\nStatus: {}\n",
        result.status()
    );
    for record in result.conflicts() {
        out.push_str(&render_record(primary_start, record));
    }
    out
}

fn render_record(primary_start: f64, record: &ConflictRecord) -> String {
    let location = record.location;
    format!(
        "ALERT: Potential collision with {} at {}s\nLocation: [{}, {}, {}] | Separation: {}m\n",
        record.flight_id,
        round2(record.time - primary_start),
        round2(location.x),
        round2(location.y),
        round2(location.z),
        round2(record.separation)
    )
}

#[derive(Serialize)]
struct MissionReport<'a> {
    mission: &'a str,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

/// Serialized result with unrounded values and absolute times.
pub fn render_json(mission_id: &str, result: &ValidationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&MissionReport {
        mission: mission_id,
        result,
    })
}
