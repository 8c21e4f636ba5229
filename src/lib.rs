//! # Park Console
//!
//! A terminal-based parking facility console: buildings, floors, bays, and
//! spots with live check-in/check-out and occupancy reporting.
//!
//! ## Features
//!
//! - Load a facility definition (buildings → floors → bays → spots) from JSON
//! - Browse and edit the layout, cycle spot statuses, filter and search spots
//! - Check vehicles in and out with hourly fees and a parking-record ledger
//! - Export occupancy reports to CSV and JSON
//!
//! ## Example
//!
//! ```no_run
//! use park_console::facility::Facility;
//!
//! let mut facility = Facility::load("facility.json").expect("Failed to load");
//! let car = facility.check_in("ABC123", "1").expect("Check-in failed");
//! println!("{} parked at {:?}", car.license_plate, car.spot_id);
//! ```

pub mod error;
pub mod export;
pub mod facility;
pub mod model;
pub mod registry;
pub mod report;
pub mod service;
pub mod ui;
