pub mod filter;
pub mod ledger;

pub use filter::{occupancy_counts, SpotFilters, SpotQueryService, StatusCounts};
pub use ledger::{parking_fee, OccupancyAdjuster, SpotLookup, VehicleLedger, HOURLY_RATE};
