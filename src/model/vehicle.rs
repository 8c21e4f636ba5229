use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A vehicle known to the facility. `spot_id` is set while the vehicle is
/// parked and cleared at checkout; a returning vehicle gets a fresh entry
/// rather than reopening an old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub license_plate: String,
    pub building_id: String,
    pub spot_id: Option<String>,
    pub check_in_time: DateTime<Local>,
    pub check_out_time: Option<DateTime<Local>>,
}

impl Vehicle {
    /// A vehicle currently occupying a spot.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.spot_id.is_some() && self.check_out_time.is_none()
    }
}

/// Ledger entry for one check-in/check-out cycle. The fee is set exactly
/// once, at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingRecord {
    pub id: String,
    pub car_id: String,
    pub license_plate: String,
    pub building_id: String,
    pub spot_id: String,
    pub check_in_time: DateTime<Local>,
    pub check_out_time: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u32>,
}

impl ParkingRecord {
    /// Most recent activity on the record, checkout winning over check-in.
    #[must_use]
    pub fn activity_time(&self) -> DateTime<Local> {
        self.check_out_time.unwrap_or(self.check_in_time)
    }
}
