pub mod building;
pub mod layout;
pub mod vehicle;

pub use building::{Building, BuildingInput, BuildingUpdate};
pub use layout::{
    Bay, BayInput, BayUpdate, Floor, FloorInput, FloorUpdate, Spot, SpotFeature, SpotInput,
    SpotStatus, SpotType, SpotUpdate,
};
pub use vehicle::{ParkingRecord, Vehicle};
