//! Lifecycle CO2 ranking
//!
//! Ranks a set of vehicles by total lifecycle emissions (manufacturing +
//! use-phase over a lifetime distance) and returns the lowest few.

use crate::data::VehicleRecord;
use crate::utils::{gpm_to_kg_per_km, round2};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Number of vehicles returned per ranked list
pub const TOP_N: usize = 3;

/// One ranked vehicle with its emission breakdown (kg CO2, 2 decimals)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub manufacturing_co2: f64,
    pub use_phase_co2: f64,
    pub total_lifecycle_co2: f64,
}

/// Unrounded lifecycle figures for one vehicle
#[derive(Debug, Clone, Copy)]
pub struct LifecycleEmissions {
    pub manufacturing_kg: f64,
    pub use_phase_kg: f64,
    pub total_kg: f64,
}

impl LifecycleEmissions {
    pub fn for_vehicle(vehicle: &VehicleRecord, lifetime_km: f64) -> Self {
        let use_phase_kg = gpm_to_kg_per_km(vehicle.tailpipe_gpm()) * lifetime_km;
        let manufacturing_kg = vehicle.manufacturing_co2_kg();
        Self {
            manufacturing_kg,
            use_phase_kg,
            total_kg: manufacturing_kg + use_phase_kg,
        }
    }
}

/// Keep only the latest model year of each (make, model) line.
///
/// Survivors come back ordered by make, then model. On equal years the row
/// seen first wins.
pub fn latest_per_model<'a, I>(vehicles: I) -> Vec<&'a VehicleRecord>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let mut latest: FxHashMap<(&'a str, &'a str), &'a VehicleRecord> = FxHashMap::default();

    for vehicle in vehicles {
        latest
            .entry((vehicle.make(), vehicle.model()))
            .and_modify(|kept| {
                if vehicle.year() > kept.year() {
                    *kept = vehicle;
                }
            })
            .or_insert(vehicle);
    }

    let mut survivors: Vec<&VehicleRecord> = latest.into_values().collect();
    survivors.sort_by(|a, b| a.make().cmp(b.make()).then_with(|| a.model().cmp(b.model())));
    survivors
}

/// Rank vehicles by lifecycle CO2 and return at most `limit`, lowest first.
///
/// Ties on total keep make/model order (stable sort after deduplication).
pub fn rank_lowest<'a, I>(vehicles: I, lifetime_km: f64, limit: usize) -> Vec<RankedResult>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    let survivors = latest_per_model(vehicles);
    if survivors.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&VehicleRecord, LifecycleEmissions)> = survivors
        .into_iter()
        .map(|v| (v, LifecycleEmissions::for_vehicle(v, lifetime_km)))
        .collect();

    scored.sort_by(|(_, a), (_, b)| a.total_kg.total_cmp(&b.total_kg));

    scored
        .into_iter()
        .take(limit)
        .map(|(vehicle, emissions)| RankedResult {
            make: vehicle.make().to_string(),
            model: vehicle.model().to_string(),
            year: vehicle.year(),
            manufacturing_co2: round2(emissions.manufacturing_kg),
            use_phase_co2: round2(emissions.use_phase_kg),
            total_lifecycle_co2: round2(emissions.total_kg),
        })
        .collect()
}

/// Top 3 lowest lifecycle emitters
pub fn rank_top3<'a, I>(vehicles: I, lifetime_km: f64) -> Vec<RankedResult>
where
    I: IntoIterator<Item = &'a VehicleRecord>,
{
    rank_lowest(vehicles, lifetime_km, TOP_N)
}
