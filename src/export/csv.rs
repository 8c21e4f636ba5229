use crate::error::ExportError;
use crate::report::FacilityReport;
use std::fs::File;
use std::path::Path;

/// One row per building, with the occupancy breakdown flattened into
/// columns.
pub fn export_csv<P: AsRef<Path>>(report: &FacilityReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record([
        "Building",
        "Floors",
        "Bays",
        "Total Spots",
        "Available",
        "Occupied",
        "Reserved",
        "Maintenance",
        "Occupancy %",
        "Check-ins Today",
    ])?;

    for summary in &report.buildings {
        writer.write_record([
            summary.name.clone(),
            summary.floors.to_string(),
            summary.bays.to_string(),
            summary.spots.total().to_string(),
            summary.spots.available.to_string(),
            summary.spots.occupied.to_string(),
            summary.spots.reserved.to_string(),
            summary.spots.maintenance.to_string(),
            summary.occupancy_rate.to_string(),
            summary.check_ins_today.to_string(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
