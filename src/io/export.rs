//! CSV export for production plans.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::dispatch::PlanEntry;

/// Column header for plan export.
const HEADER: [&str; 2] = ["name", "p"];

/// Exports a plan to a CSV file at the given path.
///
/// Writes a `name,p` header followed by one row per unit in plan order.
/// Outputs are written with one decimal place.
///
/// # Arguments
///
/// * `plan` - Dispatched outputs, one entry per unit
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(plan: &[PlanEntry], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(plan, buf)
}

/// Writes a plan as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(plan: &[PlanEntry], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;
    for entry in plan {
        let p = format!("{:.1}", entry.p);
        wtr.write_record([entry.name.as_str(), p.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
