// text.rs - Plain text loader: one sequence per line

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::data::sequence::{Sequence, SequenceSet};
use crate::error::Result;

/// Read one sequence per line. Blank lines and `#` comments are skipped;
/// each sequence is labelled by its own residues.
pub fn read_text<R: Read>(reader: R) -> Result<SequenceSet> {
    let mut set = SequenceSet::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let residues = line.trim();
        if residues.is_empty() || residues.starts_with('#') {
            continue;
        }
        set.push(Sequence::from_residues(residues))?;
    }
    Ok(set)
}

pub fn load_text(path: &Path) -> Result<SequenceSet> {
    read_text(File::open(path)?)
}
