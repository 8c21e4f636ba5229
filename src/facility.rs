//! Facility composition root and startup file loading.
//!
//! The registries, the ledger, and the filter state are owned by one
//! [`Facility`] value constructed at startup and passed by reference to the
//! UI and exports; there are no globals. A facility definition is plain
//! JSON holding the entity lists from the data model, loaded once — the
//! console holds everything in memory from then on.

use std::path::Path;

use chrono::Local;
use serde::Deserialize;

use crate::error::{CheckInError, CheckOutError, LoadError};
use crate::model::{Bay, Building, Floor, ParkingRecord, Spot, Vehicle};
use crate::registry::{BuildingRegistry, LayoutRegistry};
use crate::report::{facility_report, FacilityReport};
use crate::service::{SpotQueryService, VehicleLedger};

#[derive(Debug)]
pub struct Facility {
    pub name: String,
    pub buildings: BuildingRegistry,
    pub layout: LayoutRegistry,
    pub ledger: VehicleLedger,
    pub spot_query: SpotQueryService,
}

/// On-disk facility definition. Cars and records are optional so a file
/// can describe just the physical layout.
#[derive(Debug, Deserialize)]
struct FacilityFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    buildings: Vec<Building>,
    #[serde(default)]
    floors: Vec<Floor>,
    #[serde(default)]
    bays: Vec<Bay>,
    #[serde(default)]
    spots: Vec<Spot>,
    #[serde(default)]
    cars: Vec<Vehicle>,
    #[serde(default)]
    parking_records: Vec<ParkingRecord>,
}

impl Facility {
    /// An empty facility with nothing selected.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buildings: BuildingRegistry::new(),
            layout: LayoutRegistry::new(),
            ledger: VehicleLedger::new(),
            spot_query: SpotQueryService::new(),
        }
    }

    /// Loads a facility definition from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::FileRead`] if the file cannot be read,
    /// [`LoadError::Json`] if it is not valid facility JSON, and
    /// [`LoadError::DanglingReference`] if an entity points at a parent
    /// that is not in the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(&path).map_err(|source| LoadError::FileRead {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates a facility definition.
    ///
    /// # Errors
    ///
    /// See [`Facility::load`].
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        let file: FacilityFile = serde_json::from_str(content)?;
        validate(&file)?;

        let name = file
            .name
            .unwrap_or_else(|| "Parking Facility".to_string());
        Ok(Self {
            name,
            buildings: BuildingRegistry::with_buildings(file.buildings),
            layout: LayoutRegistry::with_layout(file.floors, file.bays, file.spots),
            ledger: VehicleLedger::with_entries(file.cars, file.parking_records),
            spot_query: SpotQueryService::new(),
        })
    }

    /// Check a vehicle into a building, wiring the ledger to this
    /// facility's registries.
    pub fn check_in(
        &mut self,
        license_plate: &str,
        building_id: &str,
    ) -> Result<Vehicle, CheckInError> {
        self.ledger
            .check_in(
                license_plate,
                building_id,
                &mut self.layout,
                &mut self.buildings,
            )
            .cloned()
    }

    /// Check a vehicle out of its spot.
    pub fn check_out(&mut self, license_plate: &str) -> Result<ParkingRecord, CheckOutError> {
        self.ledger
            .check_out(license_plate, &mut self.layout, &mut self.buildings)
            .cloned()
    }

    /// Manual status-cycle toggle; `false` when the spot is unknown.
    pub fn toggle_spot_status(&mut self, spot_id: &str) -> bool {
        self.spot_query
            .toggle_spot_status(&mut self.layout, spot_id)
    }

    /// Current snapshot across all buildings.
    #[must_use]
    pub fn report(&self) -> FacilityReport {
        facility_report(&self.buildings, &self.layout, &self.ledger, Local::now())
    }
}

fn validate(file: &FacilityFile) -> Result<(), LoadError> {
    for floor in &file.floors {
        if !file.buildings.iter().any(|b| b.id == floor.building_id) {
            return Err(LoadError::DanglingReference {
                kind: "floor",
                id: floor.id.clone(),
                missing: format!("building '{}'", floor.building_id),
            });
        }
    }
    for bay in &file.bays {
        if !file.floors.iter().any(|f| f.id == bay.floor_id) {
            return Err(LoadError::DanglingReference {
                kind: "bay",
                id: bay.id.clone(),
                missing: format!("floor '{}'", bay.floor_id),
            });
        }
    }
    for spot in &file.spots {
        if !file.bays.iter().any(|b| b.id == spot.bay_id) {
            return Err(LoadError::DanglingReference {
                kind: "spot",
                id: spot.id.clone(),
                missing: format!("bay '{}'", spot.bay_id),
            });
        }
    }
    for car in &file.cars {
        if let Some(spot_id) = &car.spot_id {
            if !file.spots.iter().any(|s| &s.id == spot_id) {
                return Err(LoadError::DanglingReference {
                    kind: "car",
                    id: car.id.clone(),
                    missing: format!("spot '{spot_id}'"),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpotStatus;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "name": "Downtown Parking",
        "buildings": [
            {
                "id": "1",
                "name": "Main Garage",
                "address": "123 Main Street",
                "description": "Main parking facility",
                "floor_count": 1,
                "total_spots": 2,
                "occupied_spots": 0
            }
        ],
        "floors": [
            { "id": "f1", "building_id": "1", "floor_number": 1, "description": "Ground Floor" }
        ],
        "bays": [
            { "id": "b1", "floor_id": "f1", "bay_number": 1, "description": "Section A" }
        ],
        "spots": [
            {
                "id": "spot_b1_1",
                "bay_id": "b1",
                "spot_number": 1,
                "type": "standard",
                "status": "available",
                "features": ["ev_charging"],
                "last_updated": "2026-08-07T08:00:00+00:00"
            },
            {
                "id": "spot_b1_2",
                "bay_id": "b1",
                "spot_number": 2,
                "type": "compact",
                "status": "maintenance",
                "last_updated": "2026-08-07T08:00:00+00:00"
            }
        ]
    }"#;

    #[test]
    fn test_load_seeds_registries_and_selection() {
        let facility = Facility::from_json(SAMPLE).unwrap();

        assert_eq!(facility.name, "Downtown Parking");
        assert_eq!(facility.buildings.buildings().len(), 1);
        assert_eq!(facility.buildings.selected_id(), Some("1"));
        assert_eq!(facility.layout.selected_floor_id(), Some("f1"));
        assert_eq!(facility.layout.selected_bay_id(), Some("b1"));
        assert_eq!(facility.layout.spots().len(), 2);
        assert_eq!(
            facility.layout.get_spot("spot_b1_2").unwrap().status,
            SpotStatus::Maintenance
        );
    }

    #[test]
    fn test_check_in_and_out_through_the_facility() {
        let mut facility = Facility::from_json(SAMPLE).unwrap();

        let car = facility.check_in("abc123", "1").unwrap();
        assert_eq!(car.license_plate, "ABC123");
        assert_eq!(car.spot_id.as_deref(), Some("spot_b1_1"));
        assert_eq!(facility.buildings.get("1").unwrap().occupied_spots, 1);

        let record = facility.check_out("ABC123").unwrap();
        assert_eq!(record.fee, Some(5));
        assert_eq!(
            facility.layout.get_spot("spot_b1_1").unwrap().status,
            SpotStatus::Available
        );
        assert_eq!(facility.buildings.get("1").unwrap().occupied_spots, 0);
    }

    #[test]
    fn test_dangling_bay_reference_is_rejected() {
        let broken = r#"{
            "buildings": [],
            "floors": [],
            "bays": [ { "id": "b1", "floor_id": "f9", "bay_number": 1 } ]
        }"#;
        let err = Facility::from_json(broken).unwrap_err();
        assert!(matches!(err, LoadError::DanglingReference { kind: "bay", .. }));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = Facility::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }
}
