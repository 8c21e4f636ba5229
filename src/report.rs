//! Facility-level aggregates for the dashboard, reports view, and exports.
//!
//! Everything here is recomputed by scanning the registries on each call;
//! at this data scale that beats maintaining incremental counters.

use chrono::{DateTime, Days, Local, NaiveDate};
use serde::Serialize;

use crate::model::ParkingRecord;
use crate::registry::{BuildingRegistry, LayoutRegistry};
use crate::service::filter::{occupancy_counts, StatusCounts};
use crate::service::VehicleLedger;

/// Per-building rollup, computed over the full spot set (filters do not
/// apply here).
#[derive(Debug, Clone, Serialize)]
pub struct BuildingSummary {
    pub building_id: String,
    pub name: String,
    pub floors: usize,
    pub bays: usize,
    pub spots: StatusCounts,
    pub occupancy_rate: u32,
    pub check_ins_today: usize,
    pub active_cars: usize,
}

/// Full report snapshot, the unit the export module serializes.
#[derive(Debug, Clone, Serialize)]
pub struct FacilityReport {
    pub generated_at: DateTime<Local>,
    pub buildings: Vec<BuildingSummary>,
    pub total_revenue: u32,
    pub records: Vec<ParkingRecord>,
}

#[must_use]
pub fn building_summary(
    building_id: &str,
    name: &str,
    layout: &LayoutRegistry,
    ledger: &VehicleLedger,
    now: DateTime<Local>,
) -> BuildingSummary {
    let floors = layout.floors_by_building(building_id);
    let bays: usize = floors
        .iter()
        .map(|f| layout.bays_by_floor(&f.id).len())
        .sum();
    let spots = occupancy_counts(layout, building_id);
    let active_cars = ledger
        .active_cars()
        .iter()
        .filter(|c| c.building_id == building_id)
        .count();
    BuildingSummary {
        building_id: building_id.to_string(),
        name: name.to_string(),
        floors: floors.len(),
        bays,
        spots,
        occupancy_rate: spots.occupancy_rate(),
        check_ins_today: ledger.todays_check_ins_at(building_id, now).len(),
        active_cars,
    }
}

/// Snapshot across every registered building, with the complete ledger
/// attached for export.
#[must_use]
pub fn facility_report(
    buildings: &BuildingRegistry,
    layout: &LayoutRegistry,
    ledger: &VehicleLedger,
    now: DateTime<Local>,
) -> FacilityReport {
    let summaries: Vec<BuildingSummary> = buildings
        .buildings()
        .iter()
        .map(|b| building_summary(&b.id, &b.name, layout, ledger, now))
        .collect();
    FacilityReport {
        generated_at: now,
        buildings: summaries,
        total_revenue: ledger.records().iter().filter_map(|r| r.fee).sum(),
        records: ledger.records().to_vec(),
    }
}

/// Fees collected from sessions closed inside `[from, to)`. Open sessions
/// carry no fee and never count.
#[must_use]
pub fn revenue_between(
    ledger: &VehicleLedger,
    from: DateTime<Local>,
    to: DateTime<Local>,
) -> u32 {
    ledger
        .records()
        .iter()
        .filter(|r| {
            r.check_out_time
                .is_some_and(|out| out >= from && out < to)
        })
        .filter_map(|r| r.fee)
        .sum()
}

/// Check-in counts per day for the trailing `days` days (today included),
/// oldest day first. Drives the reports view's daily series.
#[must_use]
pub fn check_ins_by_day(
    ledger: &VehicleLedger,
    building_id: &str,
    days: u64,
    now: DateTime<Local>,
) -> Vec<(NaiveDate, usize)> {
    let today = now.date_naive();
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|day| {
            let count = ledger
                .records()
                .iter()
                .filter(|r| r.building_id == building_id && r.check_in_time.date_naive() == day)
                .count();
            (day, count)
        })
        .collect()
}
