//! Vehicle check-in/check-out ledger.
//!
//! The ledger owns the vehicle list and the parking-record ledger; it finds
//! and frees spots through [`SpotLookup`] and keeps building occupancy
//! counters in step through [`OccupancyAdjuster`]. Both seams are
//! implemented by the registries and injected per call, so tests can
//! substitute either side.

use chrono::{DateTime, Local, NaiveTime};

use crate::error::{CheckInError, CheckOutError};
use crate::model::{ParkingRecord, SpotStatus, Vehicle};
use crate::registry::{BuildingRegistry, LayoutRegistry};

/// Flat hourly rate, in whole currency units.
pub const HOURLY_RATE: u32 = 5;

/// Spot allocation seam used by check-in/check-out.
pub trait SpotLookup {
    /// Id of the first available spot in the building, if any.
    fn available_spot(&self, building_id: &str) -> Option<String>;

    /// Returns `false` if the spot does not exist.
    fn set_spot_status(&mut self, spot_id: &str, status: SpotStatus) -> bool;
}

/// Occupancy counter seam used by check-in/check-out.
pub trait OccupancyAdjuster {
    fn adjust_occupancy(&mut self, building_id: &str, delta: i64);
}

impl SpotLookup for LayoutRegistry {
    fn available_spot(&self, building_id: &str) -> Option<String> {
        self.first_available_spot(building_id).map(|s| s.id.clone())
    }

    fn set_spot_status(&mut self, spot_id: &str, status: SpotStatus) -> bool {
        self.update_spot_status(spot_id, status)
    }
}

impl OccupancyAdjuster for BuildingRegistry {
    fn adjust_occupancy(&mut self, building_id: &str, delta: i64) {
        BuildingRegistry::adjust_occupancy(self, building_id, delta);
    }
}

#[derive(Debug, Default)]
pub struct VehicleLedger {
    cars: Vec<Vehicle>,
    records: Vec<ParkingRecord>,
    next_car: u64,
    next_record: u64,
}

impl VehicleLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger from pre-built entities (facility file load).
    #[must_use]
    pub fn with_entries(cars: Vec<Vehicle>, records: Vec<ParkingRecord>) -> Self {
        Self {
            cars,
            records,
            next_car: 0,
            next_record: 0,
        }
    }

    #[must_use]
    pub fn cars(&self) -> &[Vehicle] {
        &self.cars
    }

    #[must_use]
    pub fn records(&self) -> &[ParkingRecord] {
        &self.records
    }

    /// Vehicles currently occupying a spot.
    #[must_use]
    pub fn active_cars(&self) -> Vec<&Vehicle> {
        self.cars.iter().filter(|c| c.is_active()).collect()
    }

    /// Opens a parking session: allocates the first available spot in the
    /// building, marks it occupied, and bumps the building's occupancy
    /// counter.
    pub fn check_in(
        &mut self,
        license_plate: &str,
        building_id: &str,
        spots: &mut impl SpotLookup,
        occupancy: &mut impl OccupancyAdjuster,
    ) -> Result<&Vehicle, CheckInError> {
        self.check_in_at(license_plate, building_id, spots, occupancy, Local::now())
    }

    pub fn check_in_at(
        &mut self,
        license_plate: &str,
        building_id: &str,
        spots: &mut impl SpotLookup,
        occupancy: &mut impl OccupancyAdjuster,
        now: DateTime<Local>,
    ) -> Result<&Vehicle, CheckInError> {
        let plate = normalize_plate(license_plate);

        let already_active = self
            .cars
            .iter()
            .any(|c| c.license_plate == plate && c.check_out_time.is_none());
        if already_active {
            return Err(CheckInError::AlreadyCheckedIn { plate });
        }

        let spot_id =
            spots
                .available_spot(building_id)
                .ok_or_else(|| CheckInError::NoAvailableSpot {
                    building_id: building_id.to_string(),
                })?;

        let car_id = alloc_id(&mut self.next_car, "car", |id| {
            self.cars.iter().any(|c| c.id == id)
        });
        let record_id = alloc_id(&mut self.next_record, "record", |id| {
            self.records.iter().any(|r| r.id == id)
        });

        spots.set_spot_status(&spot_id, SpotStatus::Occupied);
        // Always the building being checked into, regardless of which
        // building the console currently has selected.
        occupancy.adjust_occupancy(building_id, 1);

        self.records.push(ParkingRecord {
            id: record_id,
            car_id: car_id.clone(),
            license_plate: plate.clone(),
            building_id: building_id.to_string(),
            spot_id: spot_id.clone(),
            check_in_time: now,
            check_out_time: None,
            fee: None,
        });
        self.cars.push(Vehicle {
            id: car_id,
            license_plate: plate,
            building_id: building_id.to_string(),
            spot_id: Some(spot_id),
            check_in_time: now,
            check_out_time: None,
        });
        Ok(self.cars.last().expect("just pushed"))
    }

    /// Closes the plate's open session: finalizes the fee on the paired
    /// record, frees the spot, and decrements the building's occupancy
    /// counter.
    pub fn check_out(
        &mut self,
        license_plate: &str,
        spots: &mut impl SpotLookup,
        occupancy: &mut impl OccupancyAdjuster,
    ) -> Result<&ParkingRecord, CheckOutError> {
        self.check_out_at(license_plate, spots, occupancy, Local::now())
    }

    pub fn check_out_at(
        &mut self,
        license_plate: &str,
        spots: &mut impl SpotLookup,
        occupancy: &mut impl OccupancyAdjuster,
        now: DateTime<Local>,
    ) -> Result<&ParkingRecord, CheckOutError> {
        let plate = normalize_plate(license_plate);

        let car_idx = self
            .cars
            .iter()
            .position(|c| c.license_plate == plate && c.check_out_time.is_none())
            .ok_or(CheckOutError::NotCheckedIn { plate })?;

        let record_idx = self
            .records
            .iter()
            .position(|r| r.car_id == self.cars[car_idx].id && r.check_out_time.is_none())
            .ok_or_else(|| CheckOutError::RecordMissing {
                car_id: self.cars[car_idx].id.clone(),
            })?;

        let fee = parking_fee(self.cars[car_idx].check_in_time, now);

        let car = &mut self.cars[car_idx];
        if let Some(spot_id) = car.spot_id.take() {
            spots.set_spot_status(&spot_id, SpotStatus::Available);
        }
        occupancy.adjust_occupancy(&car.building_id, -1);
        car.check_out_time = Some(now);

        let record = &mut self.records[record_idx];
        record.check_out_time = Some(now);
        record.fee = Some(fee);
        Ok(&self.records[record_idx])
    }

    /// Case-insensitive exact plate match; the most recently added entry
    /// wins when a plate has parked more than once.
    #[must_use]
    pub fn find_by_plate(&self, license_plate: &str) -> Option<&Vehicle> {
        let plate = normalize_plate(license_plate);
        self.cars.iter().rev().find(|c| c.license_plate == plate)
    }

    /// All ledger entries for a plate, newest check-in first.
    #[must_use]
    pub fn parking_history(&self, license_plate: &str) -> Vec<&ParkingRecord> {
        let plate = normalize_plate(license_plate);
        let mut records: Vec<&ParkingRecord> = self
            .records
            .iter()
            .filter(|r| r.license_plate == plate)
            .collect();
        records.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
        records
    }

    #[must_use]
    pub fn todays_check_ins(&self, building_id: &str) -> Vec<&ParkingRecord> {
        self.todays_check_ins_at(building_id, Local::now())
    }

    /// Records checked in since local midnight of `now`'s day, newest
    /// first, scoped to one building.
    #[must_use]
    pub fn todays_check_ins_at(
        &self,
        building_id: &str,
        now: DateTime<Local>,
    ) -> Vec<&ParkingRecord> {
        let midnight = now.with_time(NaiveTime::MIN).earliest().unwrap_or(now);
        let mut records: Vec<&ParkingRecord> = self
            .records
            .iter()
            .filter(|r| r.building_id == building_id && r.check_in_time >= midnight)
            .collect();
        records.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
        records
    }

    /// The building's most recent ledger activity, newest first. A record's
    /// activity time is its checkout when closed, otherwise its check-in.
    #[must_use]
    pub fn recent_activity(&self, building_id: &str, limit: usize) -> Vec<&ParkingRecord> {
        let mut records: Vec<&ParkingRecord> = self
            .records
            .iter()
            .filter(|r| r.building_id == building_id)
            .collect();
        records.sort_by(|a, b| b.activity_time().cmp(&a.activity_time()));
        records.truncate(limit);
        records
    }
}

/// Plates are stored trimmed and uppercased so lookups are
/// case-insensitive.
fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Whole hours rounded up, one hour minimum, times the flat rate.
#[must_use]
pub fn parking_fee(check_in: DateTime<Local>, check_out: DateTime<Local>) -> u32 {
    let seconds = (check_out - check_in).num_seconds().max(0);
    let hours = u32::try_from((seconds as u64).div_ceil(3600)).unwrap_or(u32::MAX).max(1);
    hours.saturating_mul(HOURLY_RATE)
}

fn alloc_id(counter: &mut u64, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        *counter += 1;
        let candidate = format!("{prefix}{counter}");
        if !taken(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BayInput, BuildingInput, FloorInput, SpotInput, SpotType};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 7, hour, minute, 0).unwrap()
    }

    /// Two buildings with two spots each; building "1" is selected.
    fn facility() -> (BuildingRegistry, LayoutRegistry) {
        let mut buildings = BuildingRegistry::new();
        let first = buildings
            .add(BuildingInput {
                name: "Main Garage".to_string(),
                address: "123 Main Street".to_string(),
                description: None,
            })
            .id
            .clone();
        buildings.add(BuildingInput {
            name: "West End Facility".to_string(),
            address: "456 West Avenue".to_string(),
            description: None,
        });
        assert!(buildings.select(&first));

        let mut layout = LayoutRegistry::new();
        for building_id in ["1", "2"] {
            let floor = layout
                .add_floor(FloorInput {
                    building_id: building_id.to_string(),
                    floor_number: 1,
                    description: None,
                })
                .id
                .clone();
            let bay = layout
                .add_bay(BayInput {
                    floor_id: floor,
                    bay_number: 1,
                    description: None,
                })
                .id
                .clone();
            for n in 1..=2 {
                layout.add_spot(SpotInput {
                    bay_id: bay.clone(),
                    spot_number: n,
                    kind: SpotType::Standard,
                    status: SpotStatus::Available,
                    features: Vec::new(),
                });
            }
        }
        (buildings, layout)
    }

    #[test]
    fn test_check_in_normalizes_plate_and_occupies_first_spot() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();
        let expected_spot = layout.first_available_spot("1").unwrap().id.clone();

        let car = ledger
            .check_in_at(" abc123 ", "1", &mut layout, &mut buildings, at(10, 0))
            .unwrap();

        assert_eq!(car.license_plate, "ABC123");
        assert_eq!(car.spot_id.as_deref(), Some(expected_spot.as_str()));
        assert_eq!(
            layout.get_spot(&expected_spot).unwrap().status,
            SpotStatus::Occupied
        );
        assert_eq!(buildings.get("1").unwrap().occupied_spots, 1);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].fee, None);
    }

    #[test]
    fn test_second_check_in_for_active_plate_fails() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(10, 0))
            .unwrap();
        let err = ledger
            .check_in_at("abc123", "1", &mut layout, &mut buildings, at(10, 5))
            .unwrap_err();

        assert_eq!(
            err,
            CheckInError::AlreadyCheckedIn {
                plate: "ABC123".to_string()
            }
        );
        assert_eq!(ledger.cars().len(), 1);
    }

    #[test]
    fn test_check_in_fails_when_building_is_full() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        ledger
            .check_in_at("AAA111", "1", &mut layout, &mut buildings, at(9, 0))
            .unwrap();
        ledger
            .check_in_at("BBB222", "1", &mut layout, &mut buildings, at(9, 10))
            .unwrap();
        let err = ledger
            .check_in_at("CCC333", "1", &mut layout, &mut buildings, at(9, 20))
            .unwrap_err();

        assert_eq!(
            err,
            CheckInError::NoAvailableSpot {
                building_id: "1".to_string()
            }
        );
        // The other building still has room.
        assert!(ledger
            .check_in_at("CCC333", "2", &mut layout, &mut buildings, at(9, 30))
            .is_ok());
    }

    #[test]
    fn test_occupancy_tracks_target_building_not_selection() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();
        assert_eq!(buildings.selected_id(), Some("1"));

        ledger
            .check_in_at("XYZ789", "2", &mut layout, &mut buildings, at(8, 0))
            .unwrap();

        assert_eq!(buildings.get("2").unwrap().occupied_spots, 1);
        assert_eq!(buildings.get("1").unwrap().occupied_spots, 0);

        ledger
            .check_out_at("XYZ789", &mut layout, &mut buildings, at(9, 0))
            .unwrap();
        assert_eq!(buildings.get("2").unwrap().occupied_spots, 0);
    }

    #[test]
    fn test_immediate_check_out_charges_one_hour_minimum() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(10, 0))
            .unwrap();
        let spot_id = ledger.cars()[0].spot_id.clone().unwrap();
        let record = ledger
            .check_out_at("abc123", &mut layout, &mut buildings, at(10, 0))
            .unwrap();

        assert_eq!(record.fee, Some(5));
        assert!(record.check_out_time.is_some());
        assert_eq!(
            layout.get_spot(&spot_id).unwrap().status,
            SpotStatus::Available
        );
        assert_eq!(ledger.cars()[0].spot_id, None);
    }

    #[test]
    fn test_fee_rounds_partial_hours_up() {
        assert_eq!(parking_fee(at(10, 0), at(11, 30)), 10);
        assert_eq!(parking_fee(at(10, 0), at(13, 0)), 15);
        assert_eq!(parking_fee(at(10, 0), at(10, 1)), 5);
        // Clock skew must not produce a zero fee.
        assert_eq!(parking_fee(at(11, 0), at(10, 0)), 5);
    }

    #[test]
    fn test_check_out_without_session_fails() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        let err = ledger
            .check_out_at("GHOST1", &mut layout, &mut buildings, at(12, 0))
            .unwrap_err();
        assert_eq!(
            err,
            CheckOutError::NotCheckedIn {
                plate: "GHOST1".to_string()
            }
        );
    }

    #[test]
    fn test_at_most_one_active_entry_per_plate() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(8, 0))
            .unwrap();
        let _ = ledger.check_in_at("abc123", "1", &mut layout, &mut buildings, at(8, 30));
        ledger
            .check_out_at("ABC123", &mut layout, &mut buildings, at(9, 0))
            .unwrap();
        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(9, 30))
            .unwrap();

        let active: Vec<&Vehicle> = ledger
            .cars()
            .iter()
            .filter(|c| c.license_plate == "ABC123" && c.check_out_time.is_none())
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(ledger.cars().len(), 2);
    }

    #[test]
    fn test_find_by_plate_prefers_newest_entry() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(8, 0))
            .unwrap();
        ledger
            .check_out_at("ABC123", &mut layout, &mut buildings, at(9, 0))
            .unwrap();
        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(10, 0))
            .unwrap();

        let found = ledger.find_by_plate("abc123").unwrap();
        assert!(found.is_active());
        assert_eq!(found.check_in_time, at(10, 0));
    }

    #[test]
    fn test_parking_history_is_newest_first() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(8, 0))
            .unwrap();
        ledger
            .check_out_at("ABC123", &mut layout, &mut buildings, at(9, 0))
            .unwrap();
        ledger
            .check_in_at("ABC123", "1", &mut layout, &mut buildings, at(11, 0))
            .unwrap();
        ledger
            .check_in_at("OTHER9", "1", &mut layout, &mut buildings, at(12, 0))
            .unwrap();

        let history = ledger.parking_history("abc123");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].check_in_time, at(11, 0));
        assert_eq!(history[1].check_in_time, at(8, 0));
    }

    #[test]
    fn test_todays_check_ins_start_at_local_midnight() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();
        let yesterday = Local.with_ymd_and_hms(2026, 8, 6, 23, 30, 0).unwrap();

        ledger
            .check_in_at("OLD111", "1", &mut layout, &mut buildings, yesterday)
            .unwrap();
        ledger
            .check_out_at("OLD111", &mut layout, &mut buildings, at(1, 0))
            .unwrap();
        ledger
            .check_in_at("NEW222", "1", &mut layout, &mut buildings, at(0, 15))
            .unwrap();
        ledger
            .check_in_at("FAR333", "2", &mut layout, &mut buildings, at(7, 0))
            .unwrap();

        let today = ledger.todays_check_ins_at("1", at(12, 0));
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].license_plate, "NEW222");
    }

    #[test]
    fn test_recent_activity_orders_by_latest_touch_and_truncates() {
        let (mut buildings, mut layout) = facility();
        let mut ledger = VehicleLedger::new();

        ledger
            .check_in_at("AAA111", "1", &mut layout, &mut buildings, at(8, 0))
            .unwrap();
        ledger
            .check_in_at("BBB222", "1", &mut layout, &mut buildings, at(9, 0))
            .unwrap();
        // AAA111 checks out last, so its record is the freshest activity.
        ledger
            .check_out_at("AAA111", &mut layout, &mut buildings, at(10, 0))
            .unwrap();

        let activity = ledger.recent_activity("1", 10);
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].license_plate, "AAA111");
        assert_eq!(activity[1].license_plate, "BBB222");

        assert_eq!(ledger.recent_activity("1", 1).len(), 1);
    }
}
