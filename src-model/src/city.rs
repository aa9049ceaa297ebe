//! City, parking zones and points of interest.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A geographic position as a (latitude, longitude) pair.
///
/// The simulation treats coordinates as a plane and measures straight-line
/// distance; that is accurate enough for intra-city heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// Axis-aligned bounding box of a city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn contains(&self, p: &Position) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lon >= self.min_lon && p.lon <= self.max_lon
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// A managed parking zone (lot) with its pricing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingZone {
    pub id: u64,
    pub name: String,
    pub position: Position,
    /// Total number of spots.
    pub maximum_capacity: u32,
    /// Currently occupied spots, `<= maximum_capacity`.
    pub current_capacity: u32,
    /// Hourly fee currently charged.
    pub current_fee: f64,
    /// Lower bound for the recommended fee.
    pub min_fee: f64,
    /// Upper bound for the recommended fee, `>= min_fee`.
    pub max_fee: f64,
    /// Price elasticity of demand, non-positive.
    pub elasticity: f64,
    /// Fraction of demand from short-stay users, in `[0, 1]`.
    pub short_term_share: f64,
}

impl ParkingZone {
    /// Occupied fraction of capacity, in `[0, 1]`.
    pub fn occupancy_rate(&self) -> f64 {
        if self.maximum_capacity == 0 {
            return 0.0;
        }
        f64::from(self.current_capacity) / f64::from(self.maximum_capacity)
    }

    pub fn is_full(&self) -> bool {
        self.current_capacity >= self.maximum_capacity
    }

    pub fn available_spots(&self) -> u32 {
        self.maximum_capacity.saturating_sub(self.current_capacity)
    }

    pub fn distance_to(&self, p: &Position) -> f64 {
        self.position.distance_to(p)
    }

    /// Check the zone invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.maximum_capacity == 0 {
            return Err(ModelError::ZoneInvariant {
                zone_id: self.id,
                reason: "maximum_capacity must be positive".into(),
            });
        }
        if self.current_capacity > self.maximum_capacity {
            return Err(ModelError::ZoneInvariant {
                zone_id: self.id,
                reason: format!(
                    "current_capacity {} exceeds maximum_capacity {}",
                    self.current_capacity, self.maximum_capacity
                ),
            });
        }
        if !(self.current_fee.is_finite() && self.current_fee >= 0.0) {
            return Err(ModelError::ZoneInvariant {
                zone_id: self.id,
                reason: "current_fee must be finite and non-negative".into(),
            });
        }
        if !(self.min_fee.is_finite() && self.min_fee >= 0.0) {
            return Err(ModelError::ZoneInvariant {
                zone_id: self.id,
                reason: "min_fee must be finite and non-negative".into(),
            });
        }
        if !(self.max_fee.is_finite() && self.max_fee >= self.min_fee) {
            return Err(ModelError::ZoneInvariant {
                zone_id: self.id,
                reason: format!("min_fee {} exceeds max_fee {}", self.min_fee, self.max_fee),
            });
        }
        if !(self.elasticity.is_finite() && self.elasticity <= 0.0) {
            return Err(ModelError::ZoneInvariant {
                zone_id: self.id,
                reason: format!("elasticity {} must be non-positive", self.elasticity),
            });
        }
        if !(0.0..=1.0).contains(&self.short_term_share) {
            return Err(ModelError::ZoneInvariant {
                zone_id: self.id,
                reason: format!("short_term_share {} outside [0, 1]", self.short_term_share),
            });
        }
        Ok(())
    }
}

/// A destination drivers travel to (shops, offices, venues).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: u64,
    pub name: String,
    pub position: Position,
}

/// A city: bounding box, parking zones and points of interest.
///
/// The optimizer treats the city as read-only; evaluation-time state lives in
/// per-task working structures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    pub bounds: Bounds,
    pub zones: Vec<ParkingZone>,
    pub pois: Vec<PointOfInterest>,
}

impl City {
    pub fn center(&self) -> Position {
        self.bounds.center()
    }

    /// Sum of `maximum_capacity` over all zones.
    pub fn total_capacity(&self) -> u32 {
        self.zones.iter().map(|z| z.maximum_capacity).sum()
    }

    /// City-wide occupied fraction of capacity.
    pub fn occupancy_rate(&self) -> f64 {
        let cap = self.total_capacity();
        if cap == 0 {
            return 0.0;
        }
        let occupied: u32 = self.zones.iter().map(|z| z.current_capacity).sum();
        f64::from(occupied) / f64::from(cap)
    }

    /// Check the city invariants: ordered bounds, at least one zone, unique
    /// ids, every position inside the bounding box, valid zones.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.bounds.min_lat >= self.bounds.max_lat || self.bounds.min_lon >= self.bounds.max_lon {
            return Err(ModelError::InvalidBounds);
        }
        if self.zones.is_empty() {
            return Err(ModelError::NoZones);
        }
        let mut zone_ids = std::collections::HashSet::new();
        for zone in &self.zones {
            zone.validate()?;
            if !zone_ids.insert(zone.id) {
                return Err(ModelError::DuplicateZoneId(zone.id));
            }
            if !self.bounds.contains(&zone.position) {
                return Err(ModelError::ZoneInvariant {
                    zone_id: zone.id,
                    reason: "position outside city bounds".into(),
                });
            }
        }
        let mut poi_ids = std::collections::HashSet::new();
        for poi in &self.pois {
            if !poi_ids.insert(poi.id) {
                return Err(ModelError::DuplicatePoiId(poi.id));
            }
            if !self.bounds.contains(&poi.position) {
                return Err(ModelError::PoiOutsideBounds(poi.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: u64) -> ParkingZone {
        ParkingZone {
            id,
            name: format!("Z{id}"),
            position: Position::new(49.0, 8.4),
            maximum_capacity: 100,
            current_capacity: 60,
            current_fee: 3.0,
            min_fee: 1.0,
            max_fee: 8.0,
            elasticity: -0.5,
            short_term_share: 0.6,
        }
    }

    fn city() -> City {
        City {
            id: 1,
            name: "Testville".into(),
            bounds: Bounds {
                min_lat: 48.9,
                max_lat: 49.1,
                min_lon: 8.3,
                max_lon: 8.5,
            },
            zones: vec![zone(1), zone(2)],
            pois: vec![PointOfInterest {
                id: 1,
                name: "Market".into(),
                position: Position::new(49.0, 8.41),
            }],
        }
    }

    #[test]
    fn valid_city_passes() {
        assert!(city().validate().is_ok());
    }

    #[test]
    fn occupancy_rate_is_capacity_fraction() {
        let z = zone(1);
        assert!((z.occupancy_rate() - 0.6).abs() < 1e-12);
        assert!(!z.is_full());
        assert_eq!(z.available_spots(), 40);
    }

    #[test]
    fn overfull_zone_rejected() {
        let mut c = city();
        c.zones[0].current_capacity = 101;
        assert!(matches!(
            c.validate(),
            Err(ModelError::ZoneInvariant { zone_id: 1, .. })
        ));
    }

    #[test]
    fn positive_elasticity_rejected() {
        let mut c = city();
        c.zones[1].elasticity = 0.2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn inverted_fee_bounds_rejected() {
        let mut c = city();
        c.zones[0].min_fee = 9.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn zone_outside_bounds_rejected() {
        let mut c = city();
        c.zones[0].position = Position::new(50.0, 8.4);
        assert!(c.validate().is_err());
    }

    #[test]
    fn duplicate_zone_ids_rejected() {
        let mut c = city();
        c.zones[1].id = 1;
        assert!(matches!(c.validate(), Err(ModelError::DuplicateZoneId(1))));
    }

    #[test]
    fn empty_city_rejected() {
        let mut c = city();
        c.zones.clear();
        assert!(matches!(c.validate(), Err(ModelError::NoZones)));
    }

    #[test]
    fn city_serde_round_trip() {
        let c = city();
        let json = serde_json::to_string(&c).unwrap();
        let back: City = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
