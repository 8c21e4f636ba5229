use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size class of a parking spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotType {
    Standard,
    Compact,
    Oversized,
}

impl fmt::Display for SpotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotType::Standard => write!(f, "standard"),
            SpotType::Compact => write!(f, "compact"),
            SpotType::Oversized => write!(f, "oversized"),
        }
    }
}

/// Occupancy state of a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotStatus {
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

impl SpotStatus {
    /// Fixed manual-toggle cycle: available → occupied → reserved →
    /// maintenance → available.
    #[must_use]
    pub fn next_in_cycle(self) -> Self {
        match self {
            SpotStatus::Available => SpotStatus::Occupied,
            SpotStatus::Occupied => SpotStatus::Reserved,
            SpotStatus::Reserved => SpotStatus::Maintenance,
            SpotStatus::Maintenance => SpotStatus::Available,
        }
    }

    pub const ALL: [SpotStatus; 4] = [
        SpotStatus::Available,
        SpotStatus::Occupied,
        SpotStatus::Reserved,
        SpotStatus::Maintenance,
    ];
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotStatus::Available => write!(f, "available"),
            SpotStatus::Occupied => write!(f, "occupied"),
            SpotStatus::Reserved => write!(f, "reserved"),
            SpotStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// Amenity attached to a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotFeature {
    EvCharging,
    Handicap,
    Premium,
    Covered,
}

impl fmt::Display for SpotFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotFeature::EvCharging => write!(f, "ev_charging"),
            SpotFeature::Handicap => write!(f, "handicap"),
            SpotFeature::Premium => write!(f, "premium"),
            SpotFeature::Covered => write!(f, "covered"),
        }
    }
}

/// A level within a building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub id: String,
    pub building_id: String,
    pub floor_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named section of spots within a floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bay {
    pub id: String,
    pub floor_id: String,
    pub bay_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single parking space, the smallest unit of allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub bay_id: String,
    pub spot_number: u32,
    #[serde(rename = "type")]
    pub kind: SpotType,
    pub status: SpotStatus,
    #[serde(default)]
    pub features: Vec<SpotFeature>,
    #[serde(default = "Local::now")]
    pub last_updated: DateTime<Local>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FloorInput {
    pub building_id: String,
    pub floor_number: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FloorUpdate {
    pub building_id: Option<String>,
    pub floor_number: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BayInput {
    pub floor_id: String,
    pub bay_number: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BayUpdate {
    pub floor_id: Option<String>,
    pub bay_number: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotInput {
    pub bay_id: String,
    pub spot_number: u32,
    #[serde(rename = "type")]
    pub kind: SpotType,
    #[serde(default = "default_status")]
    pub status: SpotStatus,
    #[serde(default)]
    pub features: Vec<SpotFeature>,
}

fn default_status() -> SpotStatus {
    SpotStatus::Available
}

#[derive(Debug, Clone, Default)]
pub struct SpotUpdate {
    pub bay_id: Option<String>,
    pub spot_number: Option<u32>,
    pub kind: Option<SpotType>,
    pub status: Option<SpotStatus>,
    pub features: Option<Vec<SpotFeature>>,
}

impl Floor {
    pub(crate) fn apply(&mut self, updates: FloorUpdate) {
        if let Some(building_id) = updates.building_id {
            self.building_id = building_id;
        }
        if let Some(floor_number) = updates.floor_number {
            self.floor_number = floor_number;
        }
        if let Some(description) = updates.description {
            self.description = Some(description);
        }
    }
}

impl Bay {
    pub(crate) fn apply(&mut self, updates: BayUpdate) {
        if let Some(floor_id) = updates.floor_id {
            self.floor_id = floor_id;
        }
        if let Some(bay_number) = updates.bay_number {
            self.bay_number = bay_number;
        }
        if let Some(description) = updates.description {
            self.description = Some(description);
        }
    }
}

impl Spot {
    /// Merge an update. `last_updated` stamping is the registry's job so the
    /// clock stays in one place.
    pub(crate) fn apply(&mut self, updates: SpotUpdate) {
        if let Some(bay_id) = updates.bay_id {
            self.bay_id = bay_id;
        }
        if let Some(spot_number) = updates.spot_number {
            self.spot_number = spot_number;
        }
        if let Some(kind) = updates.kind {
            self.kind = kind;
        }
        if let Some(status) = updates.status {
            self.status = status;
        }
        if let Some(features) = updates.features {
            self.features = features;
        }
    }
}
