//! Vehicle dataset loading and the immutable vehicle table
//!
//! Loads the fuel-economy + manufacturing-emissions dataset with Polars,
//! classifies each row once, and exposes the result as a read-only snapshot.
//!
//! Expected columns (original dataset names):
//! - `make`, `model`, `year`
//! - `co2TailpipeGpm` (g CO2 / mile), `total_manufacturing_co2_kg`
//! - `VClass` (raw body style), `fuelType1`, `fuelType2`, `atvType`

use crate::classify::{classify_powertrain, classify_segment, FuelFields, Powertrain, Segment};
use anyhow::{Context, Result};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub const COL_MAKE: &str = "make";
pub const COL_MODEL: &str = "model";
pub const COL_YEAR: &str = "year";
pub const COL_TAILPIPE_GPM: &str = "co2TailpipeGpm";
pub const COL_MANUFACTURING_KG: &str = "total_manufacturing_co2_kg";
pub const COL_VCLASS: &str = "VClass";
pub const COL_FUEL_PRIMARY: &str = "fuelType1";
pub const COL_FUEL_SECONDARY: &str = "fuelType2";
pub const COL_ATV_TYPE: &str = "atvType";

/// One unclassified row as read from the dataset
#[derive(Debug, Clone, Default)]
pub struct RawVehicle {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub tailpipe_gpm: f64,
    pub manufacturing_co2_kg: f64,
    pub vclass: Option<String>,
    pub fuel_primary: Option<String>,
    pub fuel_secondary: Option<String>,
    pub atv_type: Option<String>,
}

/// Classified vehicle row. Immutable once built.
#[derive(Debug, Clone)]
pub struct VehicleRecord {
    make: String,
    model: String,
    year: i64,
    tailpipe_gpm: f64,
    manufacturing_co2_kg: f64,
    vclass: String,
    powertrain: Powertrain,
    segment: Segment,
}

impl VehicleRecord {
    pub fn from_raw(raw: RawVehicle) -> Self {
        let fuels = FuelFields::new(
            raw.fuel_primary.as_deref(),
            raw.fuel_secondary.as_deref(),
            raw.atv_type.as_deref(),
        );
        let powertrain = classify_powertrain(&fuels);
        let segment = classify_segment(raw.vclass.as_deref());

        Self {
            make: raw.make,
            model: raw.model,
            year: raw.year,
            tailpipe_gpm: raw.tailpipe_gpm,
            manufacturing_co2_kg: raw.manufacturing_co2_kg,
            vclass: raw.vclass.unwrap_or_default(),
            powertrain,
            segment,
        }
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    /// Tailpipe rate in g CO2 / mile
    pub fn tailpipe_gpm(&self) -> f64 {
        self.tailpipe_gpm
    }

    pub fn manufacturing_co2_kg(&self) -> f64 {
        self.manufacturing_co2_kg
    }

    /// Raw body-style string the segment was derived from
    pub fn vclass(&self) -> &str {
        &self.vclass
    }

    pub fn powertrain(&self) -> Powertrain {
        self.powertrain
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }
}

/// Read-only vehicle table shared by all requests
///
/// There is no way to mutate records after construction; endpoints that need
/// an ordering sort their own copies.
#[derive(Debug, Default)]
pub struct VehicleTable {
    records: Vec<VehicleRecord>,
}

impl VehicleTable {
    /// Table with no vehicles (dataset absent)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<VehicleRecord>) -> Self {
        Self { records }
    }

    /// Classify raw rows (in parallel) preserving input order
    pub fn from_raw(rows: Vec<RawVehicle>) -> Self {
        let records = rows.into_par_iter().map(VehicleRecord::from_raw).collect();
        Self { records }
    }

    /// Load the dataset at `path`.
    ///
    /// A missing file yields an empty table (fail soft). A file that exists but
    /// cannot be parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Dataset not found at {:?}; starting with an empty table", path);
            return Ok(Self::empty());
        }

        tracing::info!("Loading vehicle dataset from {:?}", path);
        let df = read_frame(path)?;
        let table = Self::from_dataframe(&df)?;

        tracing::info!("Dataset loaded: {} vehicles", table.len());
        for (segment, count) in table.segment_counts() {
            tracing::info!("  {}: {}", segment, count);
        }

        Ok(table)
    }

    /// Extract and classify vehicles from a loaded DataFrame
    ///
    /// Rows missing make, model, year, tailpipe rate or manufacturing CO2 are
    /// skipped. Absent optional string columns read as empty.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let make = string_column(df, COL_MAKE)?;
        let model = string_column(df, COL_MODEL)?;
        let year = int_column(df, COL_YEAR)?;
        let tailpipe = float_column(df, COL_TAILPIPE_GPM)?;
        let manufacturing = float_column(df, COL_MANUFACTURING_KG)?;

        let vclass = optional_string_column(df, COL_VCLASS)?;
        let fuel_primary = optional_string_column(df, COL_FUEL_PRIMARY)?;
        let fuel_secondary = optional_string_column(df, COL_FUEL_SECONDARY)?;
        let atv_type = optional_string_column(df, COL_ATV_TYPE)?;

        let opt_str = |col: &Option<StringChunked>, i: usize| -> Option<String> {
            col.as_ref().and_then(|c| c.get(i)).map(|s| s.to_string())
        };

        let mut rows = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        for i in 0..df.height() {
            let required = (
                make.get(i),
                model.get(i),
                year.get(i),
                tailpipe.get(i),
                manufacturing.get(i),
            );

            let (Some(mk), Some(md), Some(yr), Some(gpm), Some(mfg)) = required else {
                skipped += 1;
                continue;
            };

            rows.push(RawVehicle {
                make: mk.to_string(),
                model: md.to_string(),
                year: yr,
                tailpipe_gpm: gpm,
                manufacturing_co2_kg: mfg,
                vclass: opt_str(&vclass, i),
                fuel_primary: opt_str(&fuel_primary, i),
                fuel_secondary: opt_str(&fuel_secondary, i),
                atv_type: opt_str(&atv_type, i),
            });
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} rows with missing required values", skipped);
        }

        Ok(Self::from_raw(rows))
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A table counts as loaded when it holds at least one vehicle
    pub fn is_loaded(&self) -> bool {
        !self.records.is_empty()
    }

    /// Distinct segment labels excluding `Other`, sorted alphabetically
    pub fn segments(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = self
            .records
            .iter()
            .map(|r| r.segment)
            .filter(|s| *s != Segment::Other)
            .map(|s| s.as_str())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Row count per segment label
    pub fn segment_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.segment.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// Polars helpers
// ============================================================================

/// Read CSV (default) or Parquet (`.parquet` extension)
fn read_frame(path: &Path) -> Result<DataFrame> {
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to scan parquet: {:?}", path))?
            .collect()
            .with_context(|| format!("Failed to load parquet: {:?}", path))
    } else {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_schema_overwrite(Some(Arc::new(csv_schema_overrides())))
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load CSV: {:?}", path))
    }
}

/// Fixed dtypes for the required columns. Whole-number tailpipe rates in the
/// leading rows must not pin the column to an integer type, and numeric model
/// names ("1500") stay strings.
fn csv_schema_overrides() -> Schema {
    Schema::from_iter([
        Field::new(COL_MAKE.into(), DataType::String),
        Field::new(COL_MODEL.into(), DataType::String),
        Field::new(COL_YEAR.into(), DataType::Int64),
        Field::new(COL_TAILPIPE_GPM.into(), DataType::Float64),
        Field::new(COL_MANUFACTURING_KG.into(), DataType::Float64),
    ])
}

fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;
    let cast = column
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' cannot be read as string", name))?;
    Ok(cast.str()?.clone())
}

fn optional_string_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>> {
    if df.column(name).is_err() {
        return Ok(None);
    }
    string_column(df, name).map(Some)
}

fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;
    let cast = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;
    Ok(cast.f64()?.clone())
}

fn int_column(df: &DataFrame, name: &str) -> Result<Int64Chunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?;
    let cast = column
        .cast(&DataType::Int64)
        .with_context(|| format!("Column '{}' is not an integer", name))?;
    Ok(cast.i64()?.clone())
}
