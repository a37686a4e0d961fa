//! Row classification for the vehicle table.
//!
//! Derives the powertrain class and the normalized body-style segment from the
//! raw fuel-type and `VClass` strings. Both classifiers are ordered rule tables:
//! rules are checked top to bottom with case-insensitive substring matching and
//! the first match wins.

use serde::{Serialize, Serializer};
use std::fmt;

// ============================================================================
// Powertrain
// ============================================================================

/// Propulsion / fuel system category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Powertrain {
    Ev,
    PluginHybrid,
    Hybrid,
    Diesel,
    Petrol,
    Other,
}

impl Powertrain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Powertrain::Ev => "EV",
            Powertrain::PluginHybrid => "Plug-in Hybrid",
            Powertrain::Hybrid => "Hybrid",
            Powertrain::Diesel => "Diesel",
            Powertrain::Petrol => "Petrol",
            Powertrain::Other => "Other",
        }
    }
}

impl fmt::Display for Powertrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Powertrain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Raw field a powertrain rule inspects
#[derive(Debug, Clone, Copy)]
enum FuelField {
    Primary,
    Secondary,
    AltPowertrain,
}

/// Lower-cased fuel strings of one vehicle row
pub struct FuelFields {
    primary: String,
    secondary: String,
    alt_powertrain: String,
}

impl FuelFields {
    /// Missing fields are treated as empty strings.
    pub fn new(
        primary: Option<&str>,
        secondary: Option<&str>,
        alt_powertrain: Option<&str>,
    ) -> Self {
        Self {
            primary: primary.unwrap_or("").to_lowercase(),
            secondary: secondary.unwrap_or("").to_lowercase(),
            alt_powertrain: alt_powertrain.unwrap_or("").to_lowercase(),
        }
    }

    fn get(&self, field: FuelField) -> &str {
        match field {
            FuelField::Primary => &self.primary,
            FuelField::Secondary => &self.secondary,
            FuelField::AltPowertrain => &self.alt_powertrain,
        }
    }
}

struct PowertrainRule {
    field: FuelField,
    needle: &'static str,
    label: Powertrain,
}

impl PowertrainRule {
    const fn new(field: FuelField, needle: &'static str, label: Powertrain) -> Self {
        Self { field, needle, label }
    }
}

/// Priority order matters: an EV is recognised from its primary fuel before the
/// plug-in check, and plug-ins before generic hybrids.
const POWERTRAIN_RULES: &[PowertrainRule] = &[
    PowertrainRule::new(FuelField::Primary, "electricity", Powertrain::Ev),
    PowertrainRule::new(FuelField::AltPowertrain, "plug-in", Powertrain::PluginHybrid),
    PowertrainRule::new(FuelField::Secondary, "electricity", Powertrain::Hybrid),
    PowertrainRule::new(FuelField::Primary, "diesel", Powertrain::Diesel),
    PowertrainRule::new(FuelField::Primary, "gasoline", Powertrain::Petrol),
];

/// Classify powertrain from `fuelType1`, `fuelType2` and `atvType`.
pub fn classify_powertrain(fuels: &FuelFields) -> Powertrain {
    POWERTRAIN_RULES
        .iter()
        .find(|rule| fuels.get(rule.field).contains(rule.needle))
        .map(|rule| rule.label)
        .unwrap_or(Powertrain::Other)
}

// ============================================================================
// Segment
// ============================================================================

/// Normalized body-style bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    SuvSmall,
    SuvStandardLarge,
    PickupSmall,
    PickupStandard,
    VanCargo,
    VanPassenger,
    SpecialPurpose,
    Other,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Segment::SuvSmall,
        Segment::SuvStandardLarge,
        Segment::PickupSmall,
        Segment::PickupStandard,
        Segment::VanCargo,
        Segment::VanPassenger,
        Segment::SpecialPurpose,
        Segment::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::SuvSmall => "SUV (Small)",
            Segment::SuvStandardLarge => "SUV (Standard/Large)",
            Segment::PickupSmall => "Pickup Truck (Small)",
            Segment::PickupStandard => "Pickup Truck (Standard)",
            Segment::VanCargo => "Van (Cargo)",
            Segment::VanPassenger => "Van (Passenger/Minivan)",
            Segment::SpecialPurpose => "Special Purpose Vehicle",
            Segment::Other => "Other",
        }
    }

    /// Exact, case-sensitive lookup of a canonical label.
    pub fn from_label(label: &str) -> Option<Segment> {
        Segment::ALL.into_iter().find(|s| s.as_str() == label)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct SegmentRule {
    /// Rule matches when any of these substrings is present
    any_of: &'static [&'static str],
    /// Narrower label used when the qualifier is also present
    qualified: Option<(&'static str, Segment)>,
    label: Segment,
}

const SEGMENT_RULES: &[SegmentRule] = &[
    SegmentRule {
        any_of: &["sport utility"],
        qualified: Some(("small", Segment::SuvSmall)),
        label: Segment::SuvStandardLarge,
    },
    SegmentRule {
        any_of: &["pickup"],
        qualified: Some(("small", Segment::PickupSmall)),
        label: Segment::PickupStandard,
    },
    SegmentRule {
        any_of: &["van", "minivan"],
        qualified: Some(("cargo", Segment::VanCargo)),
        label: Segment::VanPassenger,
    },
    SegmentRule {
        any_of: &["special purpose"],
        qualified: None,
        label: Segment::SpecialPurpose,
    },
];

/// Classify the raw `VClass` body-style string into a segment.
pub fn classify_segment(vclass: Option<&str>) -> Segment {
    let vclass = vclass.unwrap_or("").to_lowercase();

    SEGMENT_RULES
        .iter()
        .find(|rule| rule.any_of.iter().any(|needle| vclass.contains(needle)))
        .map(|rule| match rule.qualified {
            Some((qualifier, segment)) if vclass.contains(qualifier) => segment,
            _ => rule.label,
        })
        .unwrap_or(Segment::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn powertrain(primary: &str, secondary: &str, atv: &str) -> Powertrain {
        classify_powertrain(&FuelFields::new(Some(primary), Some(secondary), Some(atv)))
    }

    // ---- Powertrain rules ----

    #[test]
    fn test_electricity_primary_is_ev_regardless_of_other_fields() {
        assert_eq!(powertrain("Electricity", "", ""), Powertrain::Ev);
        assert_eq!(powertrain("Electricity", "Electricity", "Plug-in Hybrid"), Powertrain::Ev);
        assert_eq!(powertrain("Electricity", "Diesel", "EV"), Powertrain::Ev);
    }

    #[test]
    fn test_plug_in_beats_secondary_electricity() {
        assert_eq!(
            powertrain("Premium Gasoline", "Electricity", "Plug-in Hybrid"),
            Powertrain::PluginHybrid
        );
        assert_eq!(powertrain("Gasoline", "", "plug-in hybrid"), Powertrain::PluginHybrid);
    }

    #[test]
    fn test_secondary_electricity_is_hybrid() {
        assert_eq!(powertrain("Regular Gasoline", "Electricity", "Hybrid"), Powertrain::Hybrid);
    }

    #[test]
    fn test_fossil_fuels() {
        assert_eq!(powertrain("Diesel", "", ""), Powertrain::Diesel);
        assert_eq!(powertrain("Regular Gasoline", "", ""), Powertrain::Petrol);
        assert_eq!(powertrain("Midgrade Gasoline", "E85", "FFV"), Powertrain::Petrol);
    }

    #[test]
    fn test_unknown_and_missing_fuels_are_other() {
        assert_eq!(powertrain("Natural Gas", "", "CNG"), Powertrain::Other);
        assert_eq!(classify_powertrain(&FuelFields::new(None, None, None)), Powertrain::Other);
    }

    // ---- Segment rules ----

    #[test]
    fn test_suv_segments() {
        assert_eq!(classify_segment(Some("Small Sport Utility Vehicle 4WD")), Segment::SuvSmall);
        assert_eq!(classify_segment(Some("Small Sport Utility Vehicle")), Segment::SuvSmall);
        for vclass in ["Standard Sport Utility Vehicle 2WD", "Sport Utility Vehicle - 4WD"] {
            assert_eq!(classify_segment(Some(vclass)), Segment::SuvStandardLarge);
        }
    }

    #[test]
    fn test_pickup_segments() {
        assert_eq!(classify_segment(Some("Small Pickup Trucks 2WD")), Segment::PickupSmall);
        assert_eq!(classify_segment(Some("Standard Pickup Trucks")), Segment::PickupStandard);
        assert_eq!(classify_segment(Some("Standard Pickup Trucks/2wd")), Segment::PickupStandard);
    }

    #[test]
    fn test_van_segments() {
        assert_eq!(classify_segment(Some("Vans, Cargo Type")), Segment::VanCargo);
        assert_eq!(classify_segment(Some("Vans, Passenger Type")), Segment::VanPassenger);
        assert_eq!(classify_segment(Some("Minivan - 2WD")), Segment::VanPassenger);
    }

    #[test]
    fn test_special_purpose_and_other() {
        assert_eq!(classify_segment(Some("Special Purpose Vehicle 4WD")), Segment::SpecialPurpose);
        assert_eq!(classify_segment(Some("Midsize Cars")), Segment::Other);
        assert_eq!(classify_segment(Some("")), Segment::Other);
        assert_eq!(classify_segment(None), Segment::Other);
    }

    #[test]
    fn test_rule_priority_sport_utility_before_pickup() {
        // Both substrings present: the SUV rule is checked first
        assert_eq!(classify_segment(Some("Small Sport Utility Pickup")), Segment::SuvSmall);
    }

    #[test]
    fn test_segment_labels_round_trip() {
        for segment in Segment::ALL {
            assert_eq!(Segment::from_label(segment.as_str()), Some(segment));
        }
        assert_eq!(Segment::from_label("suv (small)"), None);
        assert_eq!(Segment::from_label("Hovercraft"), None);
    }
}
