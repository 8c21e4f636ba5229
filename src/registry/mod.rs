pub mod buildings;
pub mod layout;

pub use buildings::BuildingRegistry;
pub use layout::LayoutRegistry;
