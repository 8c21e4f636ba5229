use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

use park_console::export::{export_csv, export_json};
use park_console::facility::Facility;
use park_console::ui::App;

#[derive(Parser, Debug)]
#[command(name = "park-console")]
#[command(about = "Parking facility console - buildings, spots, and vehicle check-ins")]
#[command(version)]
struct Args {
    /// Path to facility definition file
    #[arg(required = true)]
    file: PathBuf,

    /// Export occupancy report to CSV (optional output path)
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export occupancy report to JSON (optional output path)
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let facility = Facility::load(&args.file)?;

    if args.csv.is_some() || args.json.is_some() {
        let report = facility.report();
        if let Some(csv_path) = &args.csv {
            export_csv(&report, csv_path)?;
            println!("Exported to CSV: {}", csv_path.display());
        }
        if let Some(json_path) = &args.json {
            export_json(&report, json_path)?;
            println!("Exported to JSON: {}", json_path.display());
        }
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = App::new(facility).run(terminal);
    ratatui::restore();
    result
}
