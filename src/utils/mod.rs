//! Utility modules shared by ranking and comparison
//!
//! - Conversion: g/mile → kg/km and 2-decimal rounding

pub mod conversion;

// Re-export commonly used helpers
pub use conversion::{gpm_to_kg_per_km, round2, KM_PER_MILE};
