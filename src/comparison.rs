//! Comparison orchestration
//!
//! Turns a driving profile into four independently ranked top-3 lists for one
//! segment: recent models overall, petrol + diesel, EV and hybrid.

use crate::classify::{Powertrain, Segment};
use crate::data::{VehicleRecord, VehicleTable};
use crate::ranking::{rank_top3, RankedResult};
use crate::utils::round2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Model years counted as "recent" for the overall view
pub const RECENT_MODEL_YEARS: std::ops::RangeInclusive<i64> = 2023..=2026;

/// User driving profile
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonRequest {
    pub daily_mileage: f64,
    pub ownership_years: f64,
    pub vehicle_segment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResponse {
    pub lifetime_km: f64,
    pub overall_top_3: Vec<RankedResult>,
    pub petrol_diesel_top_3: Vec<RankedResult>,
    pub ev_top_3: Vec<RankedResult>,
    pub hybrid_top_3: Vec<RankedResult>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("Daily mileage must be greater than 0")]
    NonPositiveMileage,

    #[error("Ownership years must be greater than 0")]
    NonPositiveOwnership,

    #[error("Vehicle segment is required")]
    MissingSegment,

    #[error("Dataset not loaded")]
    DatasetUnavailable,
}

impl ComparisonRequest {
    /// Reject non-positive (or NaN) numbers and an empty segment. A
    /// whitespace-only segment is accepted and simply matches no vehicles.
    pub fn validate(&self) -> Result<(), ComparisonError> {
        if !(self.daily_mileage > 0.0) {
            return Err(ComparisonError::NonPositiveMileage);
        }
        if !(self.ownership_years > 0.0) {
            return Err(ComparisonError::NonPositiveOwnership);
        }
        if self.vehicle_segment.is_empty() {
            return Err(ComparisonError::MissingSegment);
        }
        Ok(())
    }

    /// daily distance × 365 × ownership years
    pub fn lifetime_km(&self) -> f64 {
        self.daily_mileage * DAYS_PER_YEAR * self.ownership_years
    }
}

/// Slices of the segment working set, each ranked on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonView {
    /// Recent model years, any powertrain
    Overall,
    /// Petrol or diesel, all years
    PetrolDiesel,
    /// EV, all years
    Ev,
    /// Hybrid (non plug-in), all years
    Hybrid,
}

impl ComparisonView {
    pub fn includes(&self, vehicle: &VehicleRecord) -> bool {
        match self {
            ComparisonView::Overall => RECENT_MODEL_YEARS.contains(&vehicle.year()),
            ComparisonView::PetrolDiesel => {
                matches!(vehicle.powertrain(), Powertrain::Petrol | Powertrain::Diesel)
            }
            ComparisonView::Ev => vehicle.powertrain() == Powertrain::Ev,
            ComparisonView::Hybrid => vehicle.powertrain() == Powertrain::Hybrid,
        }
    }
}

/// Rows whose segment label equals `label` exactly. Unknown labels match nothing.
pub fn segment_vehicles<'a>(table: &'a VehicleTable, label: &str) -> Vec<&'a VehicleRecord> {
    match Segment::from_label(label) {
        Some(segment) => table
            .records()
            .iter()
            .filter(|v| v.segment() == segment)
            .collect(),
        None => Vec::new(),
    }
}

/// Run a full comparison against the shared table.
///
/// Validation happens first, so a bad request is reported even when no
/// dataset is loaded.
pub fn compare(
    table: &VehicleTable,
    request: &ComparisonRequest,
) -> Result<ComparisonResponse, ComparisonError> {
    request.validate()?;

    if !table.is_loaded() {
        return Err(ComparisonError::DatasetUnavailable);
    }

    let lifetime_km = request.lifetime_km();
    let working_set = segment_vehicles(table, &request.vehicle_segment);

    let ranked = |view: ComparisonView| {
        rank_top3(
            working_set.iter().copied().filter(|v| view.includes(v)),
            lifetime_km,
        )
    };

    let response = ComparisonResponse {
        lifetime_km: round2(lifetime_km),
        overall_top_3: ranked(ComparisonView::Overall),
        petrol_diesel_top_3: ranked(ComparisonView::PetrolDiesel),
        ev_top_3: ranked(ComparisonView::Ev),
        hybrid_top_3: ranked(ComparisonView::Hybrid),
    };

    tracing::debug!(
        "Compared segment '{}' over {:.2} km: {} vehicles, \
         overall={} petrol_diesel={} ev={} hybrid={}",
        request.vehicle_segment,
        lifetime_km,
        working_set.len(),
        response.overall_top_3.len(),
        response.petrol_diesel_top_3.len(),
        response.ev_top_3.len(),
        response.hybrid_top_3.len(),
    );

    Ok(response)
}
