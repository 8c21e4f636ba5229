//! Filtered views over the layout registry's spot list, plus the manual
//! status-cycle toggle used by the spot management screen.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Spot, SpotFeature, SpotStatus, SpotType};
use crate::registry::LayoutRegistry;

/// Active filter state. `None` means "all" for status/type, "no feature
/// filter" for features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotFilters {
    pub status: Option<SpotStatus>,
    pub kind: Option<SpotType>,
    pub feature: Option<SpotFeature>,
    pub search: String,
}

/// Spot counts broken down by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub available: usize,
    pub occupied: usize,
    pub reserved: usize,
    pub maintenance: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.available + self.occupied + self.reserved + self.maintenance
    }

    /// Occupied ÷ total, as a percentage. Zero when there are no spots.
    #[must_use]
    pub fn occupancy_rate(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            ((self.occupied as f64 / total as f64) * 100.0).round() as u32
        }
    }

    fn tally<'a>(spots: impl Iterator<Item = &'a Spot>) -> Self {
        let mut counts = StatusCounts::default();
        for spot in spots {
            match spot.status {
                SpotStatus::Available => counts.available += 1,
                SpotStatus::Occupied => counts.occupied += 1,
                SpotStatus::Reserved => counts.reserved += 1,
                SpotStatus::Maintenance => counts.maintenance += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Default)]
pub struct SpotQueryService {
    filters: SpotFilters,
}

impl SpotQueryService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filters(&self) -> &SpotFilters {
        &self.filters
    }

    pub fn set_status_filter(&mut self, status: Option<SpotStatus>) {
        self.filters.status = status;
    }

    pub fn set_type_filter(&mut self, kind: Option<SpotType>) {
        self.filters.kind = kind;
    }

    pub fn set_feature_filter(&mut self, feature: Option<SpotFeature>) {
        self.filters.feature = feature;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.search = query.into();
    }

    pub fn reset_filters(&mut self) {
        self.filters = SpotFilters::default();
    }

    /// Spots passing every active filter, in list order. With a building id
    /// the scope is resolved building → floors → bays → spots first; the
    /// predicates then AND together.
    #[must_use]
    pub fn filtered_spots<'a>(
        &self,
        layout: &'a LayoutRegistry,
        building_id: Option<&str>,
    ) -> Vec<&'a Spot> {
        let bay_scope: Option<HashSet<&str>> = building_id.map(|bid| {
            let floor_ids: HashSet<&str> = layout
                .floors()
                .iter()
                .filter(|f| f.building_id == bid)
                .map(|f| f.id.as_str())
                .collect();
            layout
                .bays()
                .iter()
                .filter(|b| floor_ids.contains(b.floor_id.as_str()))
                .map(|b| b.id.as_str())
                .collect()
        });

        let query = self.filters.search.trim().to_lowercase();

        layout
            .spots()
            .iter()
            .filter(|spot| match &bay_scope {
                Some(scope) => scope.contains(spot.bay_id.as_str()),
                None => true,
            })
            .filter(|spot| self.filters.status.is_none_or(|s| spot.status == s))
            .filter(|spot| self.filters.kind.is_none_or(|k| spot.kind == k))
            .filter(|spot| {
                self.filters
                    .feature
                    .is_none_or(|f| spot.features.contains(&f))
            })
            .filter(|spot| {
                query.is_empty()
                    || spot.spot_number.to_string().contains(&query)
                    || spot.id.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Counts per status over the *filtered* view of the building. This is
    /// what the filter screen shows next to its chips; dashboards should use
    /// [`occupancy_counts`] instead.
    #[must_use]
    pub fn status_counts(&self, layout: &LayoutRegistry, building_id: &str) -> StatusCounts {
        StatusCounts::tally(
            self.filtered_spots(layout, Some(building_id))
                .into_iter(),
        )
    }

    /// Cycles the spot one step through available → occupied → reserved →
    /// maintenance → available. Returns `false` if the spot does not exist.
    pub fn toggle_spot_status(&self, layout: &mut LayoutRegistry, spot_id: &str) -> bool {
        let Some(status) = layout.get_spot(spot_id).map(|s| s.status) else {
            return false;
        };
        layout.update_spot_status(spot_id, status.next_in_cycle())
    }
}

/// Counts per status over the building's *full* spot set, independent of
/// any active filters.
#[must_use]
pub fn occupancy_counts(layout: &LayoutRegistry, building_id: &str) -> StatusCounts {
    StatusCounts::tally(
        layout
            .spots()
            .iter()
            .filter(|s| layout.spot_in_building(s, building_id)),
    )
}
