use parkopt::model::{
    Bounds, City, ElasticitySettings, OptimizerSettings, ParkingZone, PointOfInterest, Position,
    PricingScenario,
};
use parkopt::{optimize, OptimizeError};

fn two_zone_city() -> City {
    City {
        id: 1,
        name: "Twozone".into(),
        bounds: Bounds {
            min_lat: 48.9,
            max_lat: 49.1,
            min_lon: 8.3,
            max_lon: 8.5,
        },
        zones: vec![
            ParkingZone {
                id: 1,
                name: "Z1".into(),
                position: Position::new(49.0, 8.40),
                maximum_capacity: 100,
                current_capacity: 60,
                current_fee: 3.0,
                min_fee: 1.0,
                max_fee: 8.0,
                elasticity: -0.5,
                short_term_share: 0.6,
            },
            ParkingZone {
                id: 2,
                name: "Z2".into(),
                position: Position::new(49.02, 8.42),
                maximum_capacity: 150,
                current_capacity: 120,
                current_fee: 4.0,
                min_fee: 2.0,
                max_fee: 10.0,
                elasticity: -0.4,
                short_term_share: 0.7,
            },
        ],
        pois: vec![PointOfInterest {
            id: 1,
            name: "Center".into(),
            position: Position::new(49.01, 8.41),
        }],
    }
}

fn settings(seed: u64) -> OptimizerSettings {
    let mut s = ElasticitySettings::default();
    s.common.random_seed = seed;
    s.common.population_size = 20;
    s.common.generations = 5;
    s.common.target_occupancy = 0.85;
    s.common.min_fee = 1.0;
    s.common.max_fee = 10.0;
    OptimizerSettings::Elasticity(s)
}

fn dominates_emitted(a: &PricingScenario, b: &PricingScenario) -> bool {
    let no_worse = a.score_revenue >= b.score_revenue
        && a.score_occupancy_gap <= b.score_occupancy_gap
        && a.score_demand_drop <= b.score_demand_drop
        && a.score_user_balance >= b.score_user_balance;
    let strictly_better = a.score_revenue > b.score_revenue
        || a.score_occupancy_gap < b.score_occupancy_gap
        || a.score_demand_drop < b.score_demand_drop
        || a.score_user_balance > b.score_user_balance;
    no_worse && strictly_better
}

#[test]
fn two_calls_return_identical_scenario_lists() {
    let city = two_zone_city();
    let a = optimize(&city, &settings(123)).unwrap();
    let b = optimize(&city, &settings(123)).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn scenarios_respect_zone_contracts() {
    let city = two_zone_city();
    let scenarios = optimize(&city, &settings(123)).unwrap();
    for s in &scenarios {
        assert_eq!(s.zones.len(), 2);
        for (z, zone) in s.zones.iter().zip(&city.zones) {
            assert_eq!(z.zone_id, zone.id);
            assert!(
                z.new_fee >= zone.min_fee && z.new_fee <= zone.max_fee,
                "fee {} outside [{}, {}]",
                z.new_fee,
                zone.min_fee,
                zone.max_fee
            );
            assert!((0.0..=1.0).contains(&z.predicted_occupancy));
            assert!(z.predicted_revenue >= 0.0);
        }
        assert!((0.0..=1.0).contains(&s.score_occupancy_gap));
        assert!((0.0..=1.0).contains(&s.score_demand_drop));
        assert!(s.score_revenue >= 0.0);
    }
}

#[test]
fn returned_front_is_mutually_non_dominated() {
    let city = two_zone_city();
    let scenarios = optimize(&city, &settings(123)).unwrap();
    for a in &scenarios {
        for b in &scenarios {
            if a.scenario_id != b.scenario_id {
                assert!(
                    !dominates_emitted(a, b),
                    "scenario {} dominates {}",
                    a.scenario_id,
                    b.scenario_id
                );
            }
        }
    }
}

#[test]
fn scenario_ids_are_one_based_and_sequential() {
    let city = two_zone_city();
    let scenarios = optimize(&city, &settings(7)).unwrap();
    for (i, s) in scenarios.iter().enumerate() {
        assert_eq!(s.scenario_id, (i + 1) as u64);
    }
}

#[test]
fn invalid_zone_fails_before_the_search() {
    let mut city = two_zone_city();
    city.zones[0].current_capacity = 200; // above maximum
    let err = optimize(&city, &settings(1)).unwrap_err();
    assert!(matches!(err, OptimizeError::InvalidInput(_)));
}

#[test]
fn empty_city_fails_validation() {
    let mut city = two_zone_city();
    city.zones.clear();
    assert!(optimize(&city, &settings(1)).is_err());
}

#[test]
fn different_seeds_explore_differently() {
    let city = two_zone_city();
    let a = optimize(&city, &settings(123)).unwrap();
    let b = optimize(&city, &settings(321)).unwrap();
    // not a hard guarantee in general, but with continuous sampling two seeds
    // colliding on the whole front would indicate a seeding bug
    assert_ne!(a, b);
}
