//! Building registry: the flat list of parking structures plus the
//! current selection used by the console views.

use crate::model::{Building, BuildingInput, BuildingUpdate};

#[derive(Debug, Default)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
    selected_id: Option<String>,
    next_id: u64,
}

impl BuildingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry from pre-built entities (facility file load).
    /// The first building becomes the selection, if any.
    #[must_use]
    pub fn with_buildings(buildings: Vec<Building>) -> Self {
        let selected_id = buildings.first().map(|b| b.id.clone());
        Self {
            buildings,
            selected_id,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Building> {
        let id = self.selected_id.as_deref()?;
        self.get(id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Returns `false` if no building with that id exists.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.selected_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Registers a new building with all counters at zero. Becomes the
    /// selection when nothing is selected yet. Duplicate names are allowed.
    pub fn add(&mut self, input: BuildingInput) -> &Building {
        let id = self.alloc_id();
        let building = Building {
            id: id.clone(),
            name: input.name,
            address: input.address,
            description: input.description,
            floor_count: 0,
            total_spots: 0,
            occupied_spots: 0,
        };
        self.buildings.push(building);
        if self.selected_id.is_none() {
            self.selected_id = Some(id);
        }
        self.buildings.last().expect("just pushed")
    }

    /// Merges partial fields into the matching building. Returns `false`
    /// when the id is unknown (no-op, per the CRUD error policy).
    pub fn update(&mut self, id: &str, updates: BuildingUpdate) -> bool {
        match self.buildings.iter_mut().find(|b| b.id == id) {
            Some(building) => {
                building.apply(updates);
                true
            }
            None => false,
        }
    }

    /// Removes the building; a deleted selection falls back to the first
    /// remaining building, or none.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.buildings.len();
        self.buildings.retain(|b| b.id != id);
        if self.buildings.len() == before {
            return false;
        }
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = self.buildings.first().map(|b| b.id.clone());
        }
        true
    }

    /// Shifts the occupancy counter by `delta`, clamped at zero. Unknown
    /// ids no-op.
    pub fn adjust_occupancy(&mut self, id: &str, delta: i64) {
        if let Some(building) = self.buildings.iter_mut().find(|b| b.id == id) {
            let current = i64::from(building.occupied_spots);
            building.occupied_spots = u32::try_from((current + delta).max(0)).unwrap_or(u32::MAX);
        }
    }

    fn alloc_id(&mut self) -> String {
        // Seeded ids may collide with the counter, so probe until free.
        loop {
            self.next_id += 1;
            let candidate = self.next_id.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(name: &str) -> BuildingInput {
        BuildingInput {
            name: name.to_string(),
            address: format!("{name} street 1"),
            description: None,
        }
    }

    fn sample_building(id: &str, occupied: u32) -> Building {
        Building {
            id: id.to_string(),
            name: format!("Garage {id}"),
            address: "123 Main Street".to_string(),
            description: None,
            floor_count: 2,
            total_spots: 40,
            occupied_spots: occupied,
        }
    }

    #[test]
    fn test_add_initializes_counters_and_selects_first() {
        let mut registry = BuildingRegistry::new();
        let id = registry.add(input("Main Garage")).id.clone();

        let building = registry.get(&id).unwrap();
        assert_eq!(building.floor_count, 0);
        assert_eq!(building.total_spots, 0);
        assert_eq!(building.occupied_spots, 0);
        assert_eq!(registry.selected_id(), Some(id.as_str()));

        // A second add must not steal the selection.
        registry.add(input("West End"));
        assert_eq!(registry.selected_id(), Some(id.as_str()));
    }

    #[test]
    fn test_update_merges_partial_fields() {
        let mut registry = BuildingRegistry::new();
        let id = registry.add(input("Main Garage")).id.clone();

        let ok = registry.update(
            &id,
            BuildingUpdate {
                name: Some("Renamed".to_string()),
                total_spots: Some(120),
                ..BuildingUpdate::default()
            },
        );
        assert!(ok);

        let building = registry.get(&id).unwrap();
        assert_eq!(building.name, "Renamed");
        assert_eq!(building.total_spots, 120);
        assert_eq!(building.address, "Main Garage street 1");
    }

    #[test]
    fn test_update_unknown_id_is_a_noop() {
        let mut registry = BuildingRegistry::new();
        registry.add(input("Main Garage"));
        assert!(!registry.update("nope", BuildingUpdate::default()));
    }

    #[test]
    fn test_delete_selected_falls_back_to_first_remaining() {
        let mut registry = BuildingRegistry::new();
        let first = registry.add(input("A")).id.clone();
        let second = registry.add(input("B")).id.clone();

        assert!(registry.delete(&first));
        assert_eq!(registry.selected_id(), Some(second.as_str()));

        assert!(registry.delete(&second));
        assert_eq!(registry.selected_id(), None);
    }

    #[test]
    fn test_delete_unselected_keeps_selection() {
        let mut registry = BuildingRegistry::new();
        let first = registry.add(input("A")).id.clone();
        let second = registry.add(input("B")).id.clone();

        assert!(registry.delete(&second));
        assert_eq!(registry.selected_id(), Some(first.as_str()));
    }

    #[test]
    fn test_adjust_occupancy_clamps_at_zero() {
        let mut registry = BuildingRegistry::with_buildings(vec![sample_building("1", 1)]);
        registry.adjust_occupancy("1", -1);
        registry.adjust_occupancy("1", -1);
        assert_eq!(registry.get("1").unwrap().occupied_spots, 0);

        registry.adjust_occupancy("1", 3);
        assert_eq!(registry.get("1").unwrap().occupied_spots, 3);
    }

    #[test]
    fn test_generated_ids_skip_seeded_ones() {
        let mut registry = BuildingRegistry::with_buildings(vec![
            sample_building("1", 0),
            sample_building("2", 0),
        ]);
        let id = registry.add(input("New")).id.clone();
        assert_eq!(id, "3");
    }
}
