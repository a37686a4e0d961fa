//! Unit conversion and rounding helpers
//!
//! Tailpipe rates in the source dataset are grams of CO2 per mile; all
//! lifecycle figures are reported in kilograms over kilometres.

/// Kilometres per mile
pub const KM_PER_MILE: f64 = 1.60934;

/// Grams per kilogram
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Convert a tailpipe rate in g/mile to kg/km.
///
/// `kg_per_km = (gpm / 1000) / 1.60934`
///
/// Zero maps to exactly zero. Negative input is not rejected here; callers own
/// that contract.
pub fn gpm_to_kg_per_km(gpm: f64) -> f64 {
    if gpm == 0.0 {
        return 0.0;
    }
    (gpm / GRAMS_PER_KG) / KM_PER_MILE
}

/// Round to 2 decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
