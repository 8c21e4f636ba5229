use serde::{Deserialize, Serialize};

/// A parking structure. Counters are denormalized totals maintained by the
/// registries; `crate::report` recomputes them from the layout when exact
/// numbers matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub floor_count: u32,
    #[serde(default)]
    pub total_spots: u32,
    #[serde(default)]
    pub occupied_spots: u32,
}

/// Fields required to register a new building. Counters start at zero.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingInput {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildingUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub floor_count: Option<u32>,
    pub total_spots: Option<u32>,
    pub occupied_spots: Option<u32>,
}

impl Building {
    pub(crate) fn apply(&mut self, updates: BuildingUpdate) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(address) = updates.address {
            self.address = address;
        }
        if let Some(description) = updates.description {
            self.description = Some(description);
        }
        if let Some(floor_count) = updates.floor_count {
            self.floor_count = floor_count;
        }
        if let Some(total_spots) = updates.total_spots {
            self.total_spots = total_spots;
        }
        if let Some(occupied_spots) = updates.occupied_spots {
            self.occupied_spots = occupied_spots;
        }
    }
}
