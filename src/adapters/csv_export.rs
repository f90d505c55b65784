use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::domain::models::OutageInterval;
use crate::domain::report::OutageRow;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_outages_to<W: Write>(writer: W, intervals: &[OutageInterval]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for interval in intervals {
        csv_writer.serialize(OutageRow::from(interval))?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_outages(path: &Path, intervals: &[OutageInterval]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_outages_to(file, intervals)?;

    tracing::info!(path = %path.display(), rows = intervals.len(), "saved outage report");
    Ok(())
}
