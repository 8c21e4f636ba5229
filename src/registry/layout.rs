//! Layout registry: floors, bays, and spots in three flat lists linked by
//! foreign keys (floor → building, bay → floor, spot → bay).

use chrono::Local;

use crate::model::{
    Bay, BayInput, BayUpdate, Floor, FloorInput, FloorUpdate, Spot, SpotInput, SpotStatus,
    SpotUpdate,
};

#[derive(Debug, Default)]
pub struct LayoutRegistry {
    floors: Vec<Floor>,
    bays: Vec<Bay>,
    spots: Vec<Spot>,
    selected_floor_id: Option<String>,
    selected_bay_id: Option<String>,
    next_floor: u64,
    next_bay: u64,
    next_spot: u64,
}

impl LayoutRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry from pre-built entities (facility file load).
    /// Selection starts on the first floor and its first bay.
    #[must_use]
    pub fn with_layout(floors: Vec<Floor>, bays: Vec<Bay>, spots: Vec<Spot>) -> Self {
        let selected_floor_id = floors.first().map(|f| f.id.clone());
        let selected_bay_id = selected_floor_id
            .as_deref()
            .and_then(|fid| bays.iter().find(|b| b.floor_id == fid))
            .map(|b| b.id.clone());
        Self {
            floors,
            bays,
            spots,
            selected_floor_id,
            selected_bay_id,
            next_floor: 0,
            next_bay: 0,
            next_spot: 0,
        }
    }

    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    #[must_use]
    pub fn bays(&self) -> &[Bay] {
        &self.bays
    }

    #[must_use]
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    #[must_use]
    pub fn selected_floor_id(&self) -> Option<&str> {
        self.selected_floor_id.as_deref()
    }

    #[must_use]
    pub fn selected_bay_id(&self) -> Option<&str> {
        self.selected_bay_id.as_deref()
    }

    pub fn set_selected_floor(&mut self, id: Option<String>) {
        self.selected_floor_id = id;
    }

    pub fn set_selected_bay(&mut self, id: Option<String>) {
        self.selected_bay_id = id;
    }

    // --- Floors -----------------------------------------------------------

    pub fn add_floor(&mut self, input: FloorInput) -> &Floor {
        let id = alloc_id(&mut self.next_floor, "f", |candidate| {
            self.floors.iter().any(|f| f.id == candidate)
        });
        self.floors.push(Floor {
            id,
            building_id: input.building_id,
            floor_number: input.floor_number,
            description: input.description,
        });
        self.floors.last().expect("just pushed")
    }

    pub fn update_floor(&mut self, id: &str, updates: FloorUpdate) -> bool {
        match self.floors.iter_mut().find(|f| f.id == id) {
            Some(floor) => {
                floor.apply(updates);
                true
            }
            None => false,
        }
    }

    /// Deletes the floor, its bays, and their spots. A deleted selection
    /// falls back to the first remaining floor of the same building (and
    /// that floor's first bay), or none.
    pub fn delete_floor(&mut self, id: &str) -> bool {
        let Some(building_id) = self
            .floors
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.building_id.clone())
        else {
            return false;
        };

        let bay_ids: Vec<String> = self
            .bays
            .iter()
            .filter(|b| b.floor_id == id)
            .map(|b| b.id.clone())
            .collect();

        self.spots.retain(|s| !bay_ids.contains(&s.bay_id));
        self.bays.retain(|b| b.floor_id != id);
        self.floors.retain(|f| f.id != id);

        if self.selected_floor_id.as_deref() == Some(id) {
            let fallback = self
                .floors
                .iter()
                .find(|f| f.building_id == building_id)
                .map(|f| f.id.clone());
            match fallback {
                Some(floor_id) => {
                    self.selected_bay_id = self
                        .bays
                        .iter()
                        .find(|b| b.floor_id == floor_id)
                        .map(|b| b.id.clone());
                    self.selected_floor_id = Some(floor_id);
                }
                None => {
                    self.selected_floor_id = None;
                    self.selected_bay_id = None;
                }
            }
        }
        true
    }

    // --- Bays -------------------------------------------------------------

    pub fn add_bay(&mut self, input: BayInput) -> &Bay {
        let id = alloc_id(&mut self.next_bay, "b", |candidate| {
            self.bays.iter().any(|b| b.id == candidate)
        });
        self.bays.push(Bay {
            id,
            floor_id: input.floor_id,
            bay_number: input.bay_number,
            description: input.description,
        });
        self.bays.last().expect("just pushed")
    }

    pub fn update_bay(&mut self, id: &str, updates: BayUpdate) -> bool {
        match self.bays.iter_mut().find(|b| b.id == id) {
            Some(bay) => {
                bay.apply(updates);
                true
            }
            None => false,
        }
    }

    /// Deletes the bay and its spots. A deleted selection falls back to the
    /// first remaining bay on the same floor, or none.
    pub fn delete_bay(&mut self, id: &str) -> bool {
        let Some(floor_id) = self
            .bays
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.floor_id.clone())
        else {
            return false;
        };

        self.spots.retain(|s| s.bay_id != id);
        self.bays.retain(|b| b.id != id);

        if self.selected_bay_id.as_deref() == Some(id) {
            self.selected_bay_id = self
                .bays
                .iter()
                .find(|b| b.floor_id == floor_id)
                .map(|b| b.id.clone());
        }
        true
    }

    // --- Spots ------------------------------------------------------------

    pub fn add_spot(&mut self, input: SpotInput) -> &Spot {
        let id = alloc_id(&mut self.next_spot, "spot_", |candidate| {
            self.spots.iter().any(|s| s.id == candidate)
        });
        self.spots.push(Spot {
            id,
            bay_id: input.bay_id,
            spot_number: input.spot_number,
            kind: input.kind,
            status: input.status,
            features: input.features,
            last_updated: Local::now(),
        });
        self.spots.last().expect("just pushed")
    }

    /// Merges the update and refreshes `last_updated`.
    pub fn update_spot(&mut self, id: &str, updates: SpotUpdate) -> bool {
        match self.spots.iter_mut().find(|s| s.id == id) {
            Some(spot) => {
                spot.apply(updates);
                spot.last_updated = Local::now();
                true
            }
            None => false,
        }
    }

    pub fn delete_spot(&mut self, id: &str) -> bool {
        let before = self.spots.len();
        self.spots.retain(|s| s.id != id);
        self.spots.len() != before
    }

    pub fn update_spot_status(&mut self, id: &str, status: SpotStatus) -> bool {
        self.update_spot(
            id,
            SpotUpdate {
                status: Some(status),
                ..SpotUpdate::default()
            },
        )
    }

    #[must_use]
    pub fn get_spot(&self, id: &str) -> Option<&Spot> {
        self.spots.iter().find(|s| s.id == id)
    }

    // --- Queries ----------------------------------------------------------

    #[must_use]
    pub fn floors_by_building(&self, building_id: &str) -> Vec<&Floor> {
        let mut floors: Vec<&Floor> = self
            .floors
            .iter()
            .filter(|f| f.building_id == building_id)
            .collect();
        floors.sort_by_key(|f| f.floor_number);
        floors
    }

    #[must_use]
    pub fn bays_by_floor(&self, floor_id: &str) -> Vec<&Bay> {
        let mut bays: Vec<&Bay> = self.bays.iter().filter(|b| b.floor_id == floor_id).collect();
        bays.sort_by_key(|b| b.bay_number);
        bays
    }

    #[must_use]
    pub fn spots_by_bay(&self, bay_id: &str) -> Vec<&Spot> {
        let mut spots: Vec<&Spot> = self.spots.iter().filter(|s| s.bay_id == bay_id).collect();
        spots.sort_by_key(|s| s.spot_number);
        spots
    }

    /// Whether the spot's bay sits on a floor of the given building.
    #[must_use]
    pub fn spot_in_building(&self, spot: &Spot, building_id: &str) -> bool {
        let Some(bay) = self.bays.iter().find(|b| b.id == spot.bay_id) else {
            return false;
        };
        self.floors
            .iter()
            .find(|f| f.id == bay.floor_id)
            .is_some_and(|f| f.building_id == building_id)
    }

    /// First spot in list order that is available and belongs to the
    /// building. No ordering guarantee across bays or floors.
    #[must_use]
    pub fn first_available_spot(&self, building_id: &str) -> Option<&Spot> {
        self.spots
            .iter()
            .find(|s| s.status == SpotStatus::Available && self.spot_in_building(s, building_id))
    }
}

/// Generates `{prefix}{n}` ids from a monotonic counter, probing past any
/// ids already taken by seeded data.
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
    use crate::model::SpotType;
    use pretty_assertions::assert_eq;

    fn floor(building_id: &str, number: u32) -> FloorInput {
        FloorInput {
            building_id: building_id.to_string(),
            floor_number: number,
            description: None,
        }
    }

    fn bay(floor_id: &str, number: u32) -> BayInput {
        BayInput {
            floor_id: floor_id.to_string(),
            bay_number: number,
            description: None,
        }
    }

    fn spot(bay_id: &str, number: u32) -> SpotInput {
        SpotInput {
            bay_id: bay_id.to_string(),
            spot_number: number,
            kind: SpotType::Standard,
            status: SpotStatus::Available,
            features: Vec::new(),
        }
    }

    /// Building "1" with two floors, two bays on the first floor, and two
    /// spots per bay.
    fn sample_layout() -> LayoutRegistry {
        let mut layout = LayoutRegistry::new();
        let f1 = layout.add_floor(floor("1", 1)).id.clone();
        let f2 = layout.add_floor(floor("1", 2)).id.clone();
        let b1 = layout.add_bay(bay(&f1, 1)).id.clone();
        let b2 = layout.add_bay(bay(&f1, 2)).id.clone();
        let b3 = layout.add_bay(bay(&f2, 1)).id.clone();
        for bay_id in [&b1, &b2, &b3] {
            layout.add_spot(spot(bay_id, 1));
            layout.add_spot(spot(bay_id, 2));
        }
        layout
    }

    #[test]
    fn test_delete_floor_cascades_to_bays_and_spots_only() {
        let mut layout = sample_layout();
        let f1 = layout.floors_by_building("1")[0].id.clone();
        let f2 = layout.floors_by_building("1")[1].id.clone();

        assert!(layout.delete_floor(&f1));

        assert_eq!(layout.floors().len(), 1);
        assert_eq!(layout.floors()[0].id, f2);
        // Only the second floor's bay and its spots survive.
        assert_eq!(layout.bays().len(), 1);
        assert!(layout.bays().iter().all(|b| b.floor_id == f2));
        assert_eq!(layout.spots().len(), 2);
    }

    #[test]
    fn test_delete_selected_floor_falls_back_to_sibling() {
        let mut layout = sample_layout();
        let f1 = layout.floors_by_building("1")[0].id.clone();
        let f2 = layout.floors_by_building("1")[1].id.clone();
        layout.set_selected_floor(Some(f1.clone()));

        layout.delete_floor(&f1);

        assert_eq!(layout.selected_floor_id(), Some(f2.as_str()));
        let expected_bay = layout.bays_by_floor(&f2)[0].id.clone();
        assert_eq!(layout.selected_bay_id(), Some(expected_bay.as_str()));
    }

    #[test]
    fn test_delete_last_floor_clears_selection() {
        let mut layout = LayoutRegistry::new();
        let f1 = layout.add_floor(floor("1", 1)).id.clone();
        layout.set_selected_floor(Some(f1.clone()));

        layout.delete_floor(&f1);

        assert_eq!(layout.selected_floor_id(), None);
        assert_eq!(layout.selected_bay_id(), None);
    }

    #[test]
    fn test_delete_bay_removes_its_spots_and_reselects_sibling() {
        let mut layout = sample_layout();
        let f1 = layout.floors_by_building("1")[0].id.clone();
        let bays: Vec<String> = layout.bays_by_floor(&f1).iter().map(|b| b.id.clone()).collect();
        layout.set_selected_bay(Some(bays[0].clone()));

        assert!(layout.delete_bay(&bays[0]));

        assert_eq!(layout.spots().len(), 4);
        assert!(layout.spots().iter().all(|s| s.bay_id != bays[0]));
        assert_eq!(layout.selected_bay_id(), Some(bays[1].as_str()));
    }

    #[test]
    fn test_queries_sort_ascending_by_number() {
        let mut layout = LayoutRegistry::new();
        layout.add_floor(floor("1", 3));
        layout.add_floor(floor("1", 1));
        layout.add_floor(floor("2", 2));

        let numbers: Vec<u32> = layout
            .floors_by_building("1")
            .iter()
            .map(|f| f.floor_number)
            .collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_update_spot_refreshes_last_updated() {
        let mut layout = sample_layout();
        let id = layout.spots()[0].id.clone();
        let stamped = layout.spots()[0].last_updated;

        assert!(layout.update_spot_status(&id, SpotStatus::Reserved));

        let spot = layout.get_spot(&id).unwrap();
        assert_eq!(spot.status, SpotStatus::Reserved);
        assert!(spot.last_updated >= stamped);
    }

    #[test]
    fn test_first_available_spot_scopes_to_building() {
        let mut layout = sample_layout();
        let other_floor = layout.add_floor(floor("2", 1)).id.clone();
        let other_bay = layout.add_bay(bay(&other_floor, 1)).id.clone();
        let other_spot = layout.add_spot(spot(&other_bay, 1)).id.clone();

        // Fill everything in building "1".
        let building_one: Vec<String> = layout
            .spots()
            .iter()
            .filter(|s| s.bay_id != other_bay)
            .map(|s| s.id.clone())
            .collect();
        for id in building_one {
            layout.update_spot_status(&id, SpotStatus::Occupied);
        }

        assert!(layout.first_available_spot("1").is_none());
        assert_eq!(
            layout.first_available_spot("2").map(|s| s.id.clone()),
            Some(other_spot)
        );
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut layout = sample_layout();
        assert!(!layout.update_floor("missing", FloorUpdate::default()));
        assert!(!layout.delete_floor("missing"));
        assert!(!layout.update_bay("missing", BayUpdate::default()));
        assert!(!layout.delete_bay("missing"));
        assert!(!layout.update_spot("missing", SpotUpdate::default()));
        assert!(!layout.delete_spot("missing"));
        assert_eq!(layout.floors().len(), 2);
        assert_eq!(layout.spots().len(), 6);
    }
}
