// End-to-end comparison scenarios over an in-memory vehicle table
//
// Run with: cargo test --test comparison_scenarios

use approx::assert_abs_diff_eq;
use carbon_wise::{compare, ComparisonError, ComparisonRequest, RawVehicle, VehicleTable};

fn small_suv(make: &str, model: &str, year: i64, fuel1: &str, gpm: f64, mfg: f64) -> RawVehicle {
    RawVehicle {
        make: make.to_string(),
        model: model.to_string(),
        year,
        tailpipe_gpm: gpm,
        manufacturing_co2_kg: mfg,
        vclass: Some("Small Sport Utility Vehicle 4WD".to_string()),
        fuel_primary: Some(fuel1.to_string()),
        fuel_secondary: None,
        atv_type: None,
    }
}

fn request(daily: f64, years: f64, segment: &str) -> ComparisonRequest {
    ComparisonRequest {
        daily_mileage: daily,
        ownership_years: years,
        vehicle_segment: segment.to_string(),
    }
}

// =========================================================================
// Scenario 1: one EV and one petrol vehicle in the same segment
// =========================================================================

#[test]
fn test_ev_versus_petrol() {
    let table = VehicleTable::from_raw(vec![
        small_suv("Hyundai", "Kona Electric", 2021, "Electricity", 0.0, 8000.0),
        small_suv("Ford", "Escape", 2024, "Regular Gasoline", 300.0, 6000.0),
    ]);

    let response = compare(&table, &request(50.0, 10.0, "SUV (Small)")).unwrap();
    assert_eq!(response.lifetime_km, 182_500.0);

    assert_eq!(response.ev_top_3.len(), 1);
    let ev = &response.ev_top_3[0];
    assert_eq!(ev.model, "Kona Electric");
    assert_eq!(ev.use_phase_co2, 0.0);
    assert_eq!(ev.total_lifecycle_co2, 8000.0);

    assert_eq!(response.petrol_diesel_top_3.len(), 1);
    let petrol = &response.petrol_diesel_top_3[0];
    // (300 / 1000 / 1.60934) × 182500
    assert_abs_diff_eq!(petrol.use_phase_co2, 34_020.16, epsilon = 1e-9);
    assert_abs_diff_eq!(petrol.total_lifecycle_co2, 40_020.16, epsilon = 1e-9);

    // The 2021 EV is outside the recent-year window; only the 2024 petrol is in overall
    assert_eq!(response.overall_top_3.len(), 1);
    assert_eq!(response.overall_top_3[0].model, "Escape");
    assert!(response.hybrid_top_3.is_empty());
}

#[test]
fn test_recent_ev_leads_overall() {
    let table = VehicleTable::from_raw(vec![
        small_suv("Hyundai", "Kona Electric", 2024, "Electricity", 0.0, 8000.0),
        small_suv("Ford", "Escape", 2024, "Regular Gasoline", 300.0, 6000.0),
    ]);

    let response = compare(&table, &request(50.0, 10.0, "SUV (Small)")).unwrap();
    let overall: Vec<&str> = response.overall_top_3.iter().map(|r| r.model.as_str()).collect();
    assert_eq!(overall, vec!["Kona Electric", "Escape"]);
}

// =========================================================================
// Scenario 2: invalid input is rejected before any computation
// =========================================================================

#[test]
fn test_zero_mileage_rejected() {
    let escape = small_suv("Ford", "Escape", 2024, "Regular Gasoline", 300.0, 6000.0);
    let table = VehicleTable::from_raw(vec![escape]);
    assert_eq!(
        compare(&table, &request(0.0, 10.0, "SUV (Small)")),
        Err(ComparisonError::NonPositiveMileage)
    );
}

// =========================================================================
// Scenario 3: no vehicles in the requested segment
// =========================================================================

#[test]
fn test_segment_without_vehicles() {
    let escape = small_suv("Ford", "Escape", 2024, "Regular Gasoline", 300.0, 6000.0);
    let table = VehicleTable::from_raw(vec![escape]);

    let response = compare(&table, &request(25.0, 3.0, "Van (Cargo)")).unwrap();
    assert_eq!(response.lifetime_km, 27_375.0);
    assert!(response.overall_top_3.is_empty());
    assert!(response.petrol_diesel_top_3.is_empty());
    assert!(response.ev_top_3.is_empty());
    assert!(response.hybrid_top_3.is_empty());
}

// =========================================================================
// Ranking properties through the full pipeline
// =========================================================================

#[test]
fn test_latest_model_year_represents_line() {
    let table = VehicleTable::from_raw(vec![
        small_suv("Toyota", "RAV4", 2018, "Regular Gasoline", 200.0, 5000.0),
        small_suv("Toyota", "RAV4", 2025, "Regular Gasoline", 260.0, 6500.0),
        small_suv("Toyota", "RAV4", 2023, "Regular Gasoline", 240.0, 6200.0),
    ]);

    let response = compare(&table, &request(30.0, 5.0, "SUV (Small)")).unwrap();
    assert_eq!(response.petrol_diesel_top_3.len(), 1);
    assert_eq!(response.petrol_diesel_top_3[0].year, 2025);
    assert_eq!(response.overall_top_3[0].year, 2025);
}

#[test]
fn test_lists_capped_at_three_and_ascending() {
    let rows = (0..8)
        .map(|i| {
            small_suv(
                "Make",
                &format!("Model {}", i),
                2024,
                "Regular Gasoline",
                150.0 + 40.0 * ((i * 5) % 8) as f64,
                6000.0,
            )
        })
        .collect();
    let table = VehicleTable::from_raw(rows);

    let response = compare(&table, &request(40.0, 6.0, "SUV (Small)")).unwrap();
    for list in [&response.overall_top_3, &response.petrol_diesel_top_3] {
        assert_eq!(list.len(), 3);
        assert!(list.windows(2).all(|w| w[0].total_lifecycle_co2 <= w[1].total_lifecycle_co2));
    }
    assert_eq!(response.overall_top_3[0].model, "Model 0");
}
