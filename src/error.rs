//! Error types for the parking console.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a facility file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the facility file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The facility JSON is invalid or malformed.
    #[error("invalid facility file: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// An entity references a parent that does not exist in the file.
    #[error("{kind} '{id}' references missing {missing}")]
    DanglingReference {
        kind: &'static str,
        id: String,
        missing: String,
    },
}

/// Errors that can occur when checking a vehicle in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckInError {
    /// The plate already has an open parking session.
    #[error("vehicle '{plate}' is already checked in")]
    AlreadyCheckedIn { plate: String },

    /// The building has no spot in `available` status.
    #[error("no available spots in building '{building_id}'")]
    NoAvailableSpot { building_id: String },
}

/// Errors that can occur when checking a vehicle out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckOutError {
    /// The plate has no open parking session.
    #[error("vehicle '{plate}' is not checked in")]
    NotCheckedIn { plate: String },

    /// The active vehicle has no open ledger record paired with it.
    #[error("no open parking record for car '{car_id}'")]
    RecordMissing { car_id: String },
}

/// Errors that can occur when exporting reports.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
