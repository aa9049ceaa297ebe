//! Validation errors for the data model.

use thiserror::Error;

/// Input invariant violations detected before the search starts.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("city bounds are not ordered (min < max required on both axes)")]
    InvalidBounds,
    #[error("city has no parking zones")]
    NoZones,
    #[error("duplicate parking zone id {0}")]
    DuplicateZoneId(u64),
    #[error("duplicate point of interest id {0}")]
    DuplicatePoiId(u64),
    #[error("point of interest {0} lies outside the city bounds")]
    PoiOutsideBounds(u64),
    #[error("zone {zone_id}: {reason}")]
    ZoneInvariant { zone_id: u64, reason: String },
    #[error("settings: {0}")]
    InvalidSettings(String),
    #[error("unknown selection weight key '{0}'")]
    UnknownWeightKey(String),
}
