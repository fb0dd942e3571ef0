//! Turns the alternating label/value list scraped from a property page into
//! a label -> value mapping and a two-row table.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{RecordError, Result};

fn check_even(fields: &[String]) -> std::result::Result<(), RecordError> {
    if fields.len() % 2 == 1 {
        return Err(RecordError::OddFieldCount {
            len: fields.len(),
            dangling: fields[fields.len() - 1].clone(),
        });
    }
    Ok(())
}

/// Split into labels (even positions) and values (odd positions), order kept.
pub fn partition(fields: &[String]) -> std::result::Result<(Vec<String>, Vec<String>), RecordError> {
    check_even(fields)?;

    let labels = fields.iter().step_by(2).cloned().collect();
    let values = fields.iter().skip(1).step_by(2).cloned().collect();
    Ok((labels, values))
}

/// Pair fields two at a time. A label seen again overwrites the earlier value.
pub fn to_mapping(fields: &[String]) -> std::result::Result<BTreeMap<String, String>, RecordError> {
    check_even(fields)?;

    let mut mapping = BTreeMap::new();
    for pair in fields.chunks_exact(2) {
        mapping.insert(pair[0].clone(), pair[1].clone());
    }
    Ok(mapping)
}

/// Write `labels` as the header row and `values` as the single data row.
/// Any existing file at `path` is truncated.
pub fn write_table(path: impl AsRef<Path>, labels: &[String], values: &[String]) -> Result<()> {
    let path = path.as_ref();
    if labels.len() != values.len() {
        return Err(RecordError::RowLengthMismatch {
            labels: labels.len(),
            values: values.len(),
        }
        .into());
    }

    debug!("Writing {} columns to {}", labels.len(), path.display());

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(labels)?;
    writer.write_record(values)?;
    writer.flush()?;

    info!("💾 Saved property data to {}", path.display());
    Ok(())
}
