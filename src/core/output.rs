use crate::error::Result;
use csv::Writer;
use std::path::Path;

/// Writes the per-epoch reported cost as `epoch,cost` rows, epochs 1-based.
pub fn write_cost_history<P: AsRef<Path>>(costs: &[f64], file_path: P) -> Result<()> {
    let mut wtr = Writer::from_path(file_path)?;
    wtr.write_record(["epoch", "cost"])?;

    for (epoch, cost) in costs.iter().enumerate() {
        wtr.write_record(&[(epoch + 1).to_string(), cost.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}
