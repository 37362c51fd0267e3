// tsv.rs - Delimited loader: `label<sep>sequence` rows

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::data::sequence::{Sequence, SequenceSet};
use crate::error::{Error, Result};

fn is_header(label: &str, sequence: &str) -> bool {
    matches!(label.to_lowercase().as_str(), "label" | "id" | "name")
        && sequence.eq_ignore_ascii_case("sequence")
}

/// Read delimited rows of `label`, `sequence`.
///
/// A first row of `label/id/name` + `sequence` is treated as a header. A row
/// with a single field is labelled by its own residues.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<SequenceSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut set = SequenceSet::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let sequence = match (record.get(0), record.get(1)) {
            (Some(label), Some(residues)) if record.len() == 2 => {
                if row == 0 && is_header(label, residues) {
                    continue;
                }
                if residues.is_empty() {
                    return Err(Error::invalid(format!(
                        "row {}: sequence '{}' is empty",
                        row + 1,
                        label
                    )));
                }
                Sequence::new(label, residues.as_bytes())
            }
            (Some(residues), None) if !residues.is_empty() => Sequence::from_residues(residues),
            (Some(""), None) | (None, _) => continue,
            _ => {
                return Err(Error::invalid(format!(
                    "row {} has {} columns, expected 2",
                    row + 1,
                    record.len()
                )))
            }
        };
        set.push(sequence)?;
    }
    Ok(set)
}

pub fn load_delimited(path: &Path, delimiter: u8) -> Result<SequenceSet> {
    read_delimited(File::open(path)?, delimiter)
}
