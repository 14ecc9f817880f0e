//! CO2 savings engine
//!
//! Compares a trip's emissions against the baseline of driving the same
//! distance by car. Emission factors are EPA / UK DEFRA averages in
//! kg CO2 per km.

use serde::Serialize;
use thiserror::Error;

const EMISSION_CAR: f64 = 0.171;
const EMISSION_BUS: f64 = 0.089;
/// Rail-like modes are near-zero at point of use.
const EMISSION_RAIL: f64 = 0.02;

/// Points awarded per kg of CO2 saved.
const POINTS_PER_KG: f64 = 100.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClimateError {
    #[error("distance cannot be negative")]
    NegativeDistance,
    #[error("unknown transit mode: {0}")]
    UnknownMode(String),
}

/// Result of one impact calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactSummary {
    pub mode: String,
    pub distance_km: f64,
    /// What the emissions would have been by car
    pub baseline_car_kg: f64,
    pub actual_kg: f64,
    pub co2_saved_kg: f64,
    pub points_earned: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateEngine;

impl ClimateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Calculate kg of CO2 saved by not driving.
    ///
    /// Valid modes: bus, walk, bike, subway, car (case-insensitive).
    /// Negative distance is a caller error, never silently corrected.
    pub fn calculate_savings(
        &self,
        distance_km: f64,
        mode: &str,
    ) -> Result<ImpactSummary, ClimateError> {
        if distance_km < 0.0 {
            return Err(ClimateError::NegativeDistance);
        }

        let baseline = distance_km * EMISSION_CAR;
        let actual = match mode.to_lowercase().as_str() {
            "bus" => distance_km * EMISSION_BUS,
            "walk" | "bike" => 0.0,
            "subway" => distance_km * EMISSION_RAIL,
            "car" => baseline,
            other => return Err(ClimateError::UnknownMode(other.to_string())),
        };

        // A mode worse than driving never reports negative savings.
        let saved = (baseline - actual).max(0.0);

        Ok(ImpactSummary {
            mode: mode.to_string(),
            distance_km,
            baseline_car_kg: round3(baseline),
            actual_kg: round3(actual),
            co2_saved_kg: round3(saved),
            points_earned: (saved * POINTS_PER_KG) as i64,
        })
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
