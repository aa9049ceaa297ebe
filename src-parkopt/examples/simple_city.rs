//! Build a small synthetic city in code and run both evaluation engines.
//!
//! ```sh
//! cargo run --example simple_city
//! ```

use parkopt::model::{
    AgentSettings, Bounds, City, ElasticitySettings, OptimizerSettings, ParkingZone,
    PointOfInterest, Position, SelectionWeights,
};
use parkopt::{optimize, select_best};

fn demo_city() -> City {
    let zone = |id: u64, name: &str, lat: f64, lon: f64, cap: u32, cur: u32, fee: f64| ParkingZone {
        id,
        name: name.into(),
        position: Position::new(lat, lon),
        maximum_capacity: cap,
        current_capacity: cur,
        current_fee: fee,
        min_fee: 0.5,
        max_fee: 8.0,
        elasticity: -0.45,
        short_term_share: 0.6,
    };
    City {
        id: 1,
        name: "Demoville".into(),
        bounds: Bounds {
            min_lat: 49.00,
            max_lat: 49.02,
            min_lon: 8.39,
            max_lon: 8.42,
        },
        zones: vec![
            zone(1, "Market garage", 49.008, 8.402, 120, 95, 2.5),
            zone(2, "Station lot", 49.014, 8.396, 200, 170, 2.0),
            zone(3, "Riverside", 49.006, 8.415, 80, 30, 1.5),
            zone(4, "Old town", 49.011, 8.408, 60, 55, 3.0),
        ],
        pois: vec![
            PointOfInterest {
                id: 1,
                name: "Market square".into(),
                position: Position::new(49.009, 8.404),
            },
            PointOfInterest {
                id: 2,
                name: "Main station".into(),
                position: Position::new(49.015, 8.397),
            },
            PointOfInterest {
                id: 3,
                name: "Theatre".into(),
                position: Position::new(49.007, 8.412),
            },
        ],
    }
}

fn summarize(label: &str, scenarios: &[parkopt::model::PricingScenario]) {
    println!("{label}: {} scenarios on the front", scenarios.len());
    let weights = SelectionWeights {
        revenue: 0.4,
        occupancy: 0.3,
        drop: 0.2,
        fairness: 0.1,
    };
    if let Some(best) = select_best(scenarios, &weights) {
        println!(
            "  best compromise: scenario {} revenue={:.2} gap={:.3} drop={:.3} balance={:.3}",
            best.scenario_id,
            best.score_revenue,
            best.score_occupancy_gap,
            best.score_demand_drop,
            best.score_user_balance
        );
        for z in &best.zones {
            println!(
                "    zone {}: fee {:.2} occupancy {:.2} revenue {:.2}",
                z.zone_id, z.new_fee, z.predicted_occupancy, z.predicted_revenue
            );
        }
    }
}

fn main() {
    let city = demo_city();

    let mut elasticity = ElasticitySettings::default();
    elasticity.common.random_seed = 123;
    elasticity.common.population_size = 40;
    elasticity.common.generations = 30;
    let scenarios = optimize(&city, &OptimizerSettings::Elasticity(elasticity))
        .expect("elasticity optimization");
    summarize("elasticity", &scenarios);

    let mut agent = AgentSettings::default();
    agent.common.random_seed = 123;
    agent.common.population_size = 24;
    agent.common.generations = 10;
    agent.drivers_per_zone_capacity = 1.2;
    let scenarios =
        optimize(&city, &OptimizerSettings::Agent(agent)).expect("agent optimization");
    summarize("agent", &scenarios);
}
