//! Deterministic synthetic driver population builder.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use parkopt_model::{City, Driver, Position};

/// Builds reproducible driver populations for a city.
///
/// The population is a pure function of `(city, seed, count)`: starting
/// positions are uniform over the city bounding box, destinations are drawn
/// uniformly from the points of interest (falling back to the city center
/// when there are none), and fee tolerance / desired duration come from the
/// configured ranges.
#[derive(Debug, Clone)]
pub struct DriverGenerator {
    seed: u64,
    /// Hourly fee tolerance range drivers are sampled from.
    pub fee_range: (f64, f64),
    /// Desired parking duration range in minutes.
    pub duration_range: (u32, u32),
}

impl DriverGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            fee_range: (2.0, 10.0),
            duration_range: (30, 240),
        }
    }

    /// Driver count for a city: `⌊total_capacity · multiplier⌋`.
    pub fn population_size(city: &City, drivers_per_zone_capacity: f64) -> usize {
        (f64::from(city.total_capacity()) * drivers_per_zone_capacity).floor() as usize
    }

    /// Generate `count` drivers.
    pub fn generate(&self, city: &City, count: usize) -> Vec<Driver> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let center = city.center();
        let mut drivers = Vec::with_capacity(count);
        for i in 0..count {
            let starting_position = Position::new(
                rng.random_range(city.bounds.min_lat..=city.bounds.max_lat),
                rng.random_range(city.bounds.min_lon..=city.bounds.max_lon),
            );
            let destination = city
                .pois
                .choose(&mut rng)
                .map(|poi| poi.position)
                .unwrap_or(center);
            let max_parking_fee = rng.random_range(self.fee_range.0..=self.fee_range.1);
            let desired_parking_time =
                rng.random_range(self.duration_range.0..=self.duration_range.1);
            drivers.push(Driver {
                id: (i + 1) as u64,
                starting_position,
                destination,
                max_parking_fee,
                desired_parking_time,
            });
        }
        drivers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkopt_model::{Bounds, ParkingZone, PointOfInterest, Position};

    fn city(pois: bool) -> City {
        City {
            id: 1,
            name: "Gridtown".into(),
            bounds: Bounds {
                min_lat: 0.0,
                max_lat: 10.0,
                min_lon: 0.0,
                max_lon: 10.0,
            },
            zones: vec![ParkingZone {
                id: 1,
                name: "A".into(),
                position: Position::new(5.0, 5.0),
                maximum_capacity: 40,
                current_capacity: 0,
                current_fee: 2.0,
                min_fee: 1.0,
                max_fee: 6.0,
                elasticity: -0.4,
                short_term_share: 0.5,
            }],
            pois: if pois {
                vec![PointOfInterest {
                    id: 1,
                    name: "Square".into(),
                    position: Position::new(4.0, 6.0),
                }]
            } else {
                Vec::new()
            },
        }
    }

    #[test]
    fn same_seed_same_population() {
        let c = city(true);
        let a = DriverGenerator::new(9).generate(&c, 50);
        let b = DriverGenerator::new(9).generate(&c, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_population() {
        let c = city(true);
        let a = DriverGenerator::new(9).generate(&c, 50);
        let b = DriverGenerator::new(10).generate(&c, 50);
        assert_ne!(a, b);
    }

    #[test]
    fn drivers_stay_within_configured_ranges() {
        let c = city(true);
        for d in DriverGenerator::new(3).generate(&c, 200) {
            assert!(c.bounds.contains(&d.starting_position));
            assert!((2.0..=10.0).contains(&d.max_parking_fee));
            assert!((30..=240).contains(&d.desired_parking_time));
            assert_eq!(d.destination, c.pois[0].position);
        }
    }

    #[test]
    fn no_pois_falls_back_to_city_center() {
        let c = city(false);
        let drivers = DriverGenerator::new(3).generate(&c, 10);
        assert!(drivers.iter().all(|d| d.destination == c.center()));
    }

    #[test]
    fn population_size_floors_the_product() {
        let c = city(true);
        assert_eq!(DriverGenerator::population_size(&c, 1.5), 60);
        assert_eq!(DriverGenerator::population_size(&c, 0.99), 39);
    }
}
