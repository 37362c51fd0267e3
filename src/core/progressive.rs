// progressive.rs - Progressive multiple alignment against a running consensus

use std::fmt;

use tracing::{debug, info};

use crate::core::alignment::{AlignmentMode, GAP};
use crate::core::matrix::{fill, Cell, Direction};
use crate::data::Sequence;
use crate::error::{Error, Result};
use crate::scoring::ScoringModel;

/// Rendered symbol for a column without a strict majority
pub const CONFLICT: u8 = b'N';

/// Summary of one alignment column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusSymbol {
    /// More than half of the rows carry this residue
    Residue(u8),
    /// At least one row has a gap
    Gap,
    /// No residue reaches a strict majority
    Conflict,
}

impl ConsensusSymbol {
    pub fn to_byte(self) -> u8 {
        match self {
            ConsensusSymbol::Residue(b) => b,
            ConsensusSymbol::Gap => GAP,
            ConsensusSymbol::Conflict => CONFLICT,
        }
    }
}

/// Column-wise consensus of equal-width rows
pub fn consensus<R: AsRef<[u8]>>(rows: &[R]) -> Vec<ConsensusSymbol> {
    let width = rows.first().map_or(0, |r| r.as_ref().len());
    (0..width)
        .map(|k| {
            let column: Vec<u8> = rows.iter().map(|r| r.as_ref()[k]).collect();
            if column.contains(&GAP) {
                return ConsensusSymbol::Gap;
            }
            let mut counts = [0usize; 256];
            for &b in &column {
                counts[b as usize] += 1;
            }
            column
                .iter()
                .find(|&&b| counts[b as usize] * 2 > column.len())
                .map_or(ConsensusSymbol::Conflict, |&b| ConsensusSymbol::Residue(b))
        })
        .collect()
}

/// Gapped rows of equal width, one per input sequence, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleAlignment {
    labels: Vec<String>,
    rows: Vec<Vec<u8>>,
    consensus: Vec<ConsensusSymbol>,
}

impl MultipleAlignment {
    fn new(labels: Vec<String>, rows: Vec<Vec<u8>>) -> Self {
        let consensus = consensus(&rows);
        Self {
            labels,
            rows,
            consensus,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect()
    }

    pub fn row(&self, index: usize) -> Option<&[u8]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn consensus(&self) -> &[ConsensusSymbol] {
        &self.consensus
    }

    /// Consensus with gaps as `-` and conflicts as `N`
    pub fn consensus_string(&self) -> String {
        self.consensus.iter().map(|c| c.to_byte() as char).collect()
    }

    pub fn width(&self) -> usize {
        self.consensus.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for MultipleAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self.labels.iter().map(String::len).max().unwrap_or(0);
        for (label, row) in self.labels.iter().zip(&self.rows) {
            writeln!(
                f,
                "{:<width$}  {}",
                label,
                String::from_utf8_lossy(row),
                width = label_width
            )?;
        }
        write!(
            f,
            "{:<width$}  {}",
            "",
            self.consensus_string(),
            width = label_width
        )
    }
}

/// Globally align `next` against the consensus of `rows` and splice it in
fn add_to_profile<S>(rows: Vec<Vec<u8>>, next: &[u8], scoring: &S) -> Result<Vec<Vec<u8>>>
where
    S: ScoringModel + ?Sized,
{
    let profile = consensus(&rows);
    let gap = scoring.gap_penalty();

    let matrix = fill(profile.len(), next.len(), gap, AlignmentMode::Global, |j, i| {
        match profile[j] {
            ConsensusSymbol::Residue(r) => scoring.score(r, next[i]),
            ConsensusSymbol::Gap | ConsensusSymbol::Conflict => {
                scoring.unresolved_score(next[i])
            }
        }
    })?;

    let path = matrix.trace_matrix().path(matrix.end_cell())?;
    if path.end != Cell::new(0, 0) {
        return Err(Error::corrupt(
            path.end.row,
            path.end.col,
            "profile traceback stopped before the origin",
        ));
    }

    let width = path.steps.len();
    let mut merged: Vec<Vec<u8>> = rows.iter().map(|_| Vec::with_capacity(width)).collect();
    let mut added = Vec::with_capacity(width);
    let (mut k, mut i) = (0, 0);

    for &step in &path.steps {
        match step {
            Direction::Diagonal => {
                for (out, row) in merged.iter_mut().zip(&rows) {
                    out.push(row[k]);
                }
                added.push(next[i]);
                k += 1;
                i += 1;
            }
            Direction::Left => {
                for (out, row) in merged.iter_mut().zip(&rows) {
                    out.push(row[k]);
                }
                added.push(GAP);
                k += 1;
            }
            Direction::Up => {
                for out in merged.iter_mut() {
                    out.push(GAP);
                }
                added.push(next[i]);
                i += 1;
            }
            Direction::None => {
                return Err(Error::corrupt(i, k, "None step inside a profile path"));
            }
        }
    }

    debug!(
        profile_width = profile.len(),
        sequence_len = next.len(),
        width,
        score = matrix.score(),
        "added sequence to profile"
    );

    merged.push(added);
    Ok(merged)
}

/// Progressive alignment in input order.
///
/// The first sequence seeds the profile; each later sequence is aligned
/// globally against the current consensus and gaps are propagated to every
/// existing row.
pub fn align_progressive<S>(sequences: &[Sequence], scoring: &S) -> Result<MultipleAlignment>
where
    S: ScoringModel + ?Sized,
{
    let (first, rest) = sequences
        .split_first()
        .ok_or_else(|| Error::invalid("cannot align zero sequences"))?;
    if let Some(empty) = sequences.iter().find(|s| s.is_empty()) {
        return Err(Error::invalid(format!("sequence '{}' is empty", empty.id)));
    }

    let mut rows = vec![first.sequence.clone()];
    for sequence in rest {
        rows = add_to_profile(rows, &sequence.sequence, scoring)?;
    }

    let labels = sequences.iter().map(|s| s.id.clone()).collect();
    let alignment = MultipleAlignment::new(labels, rows);
    info!(
        sequences = alignment.len(),
        width = alignment.width(),
        "progressive alignment complete"
    );
    Ok(alignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Blosum62, MatchMismatch, NucleotideMatrix};

    fn sequences(residues: &[&str]) -> Vec<Sequence> {
        residues.iter().map(|s| Sequence::from_residues(s)).collect()
    }

    fn unit() -> MatchMismatch {
        MatchMismatch::new(1, -1, -1)
    }

    #[test]
    fn test_consensus_rules() {
        let rows = ["AC-T", "ACGT", "AGGA"];
        assert_eq!(
            consensus(&rows),
            vec![
                ConsensusSymbol::Residue(b'A'),
                ConsensusSymbol::Residue(b'C'),
                ConsensusSymbol::Gap,
                ConsensusSymbol::Residue(b'T'),
            ]
        );

        let tied = ["AC", "AG"];
        assert_eq!(consensus(&tied)[1], ConsensusSymbol::Conflict);
    }

    #[test]
    fn test_three_sequences() {
        let msa = align_progressive(&sequences(&["ACTG", "ACG", "ACT"]), &unit()).unwrap();
        assert_eq!(msa.rows(), vec!["ACTG", "AC-G", "AC-T"]);
        assert_eq!(msa.consensus_string(), "AC-G");
    }

    #[test]
    fn test_gap_goes_into_new_row() {
        let msa = align_progressive(&sequences(&["ACT", "ACGT"]), &unit()).unwrap();
        assert_eq!(msa.rows(), vec!["AC-T", "ACGT"]);
    }

    #[test]
    fn test_gaps_propagate_to_existing_rows() {
        let msa = align_progressive(
            &sequences(&["GATTACA", "GATACA", "GATTTACA", "GCTTACA"]),
            &unit(),
        )
        .unwrap();
        assert_eq!(
            msa.rows(),
            vec!["GA-TTACA", "GA--TACA", "GATTTACA", "G-CTTACA"]
        );
        assert_eq!(msa.consensus_string(), "G---TACA");
    }

    #[test]
    fn test_rows_share_width_and_keep_residues() {
        let input = ["GATTACA", "GATACA", "GATTTACA", "GCTTACA"];
        let msa = align_progressive(&sequences(&input), &NucleotideMatrix::default()).unwrap();
        for (i, original) in input.iter().enumerate() {
            let row = msa.row(i).unwrap();
            assert_eq!(row.len(), msa.width());
            let residues: Vec<u8> = row.iter().copied().filter(|&b| b != GAP).collect();
            assert_eq!(residues, original.as_bytes());
        }
    }

    #[test]
    fn test_single_sequence_returned_as_is() {
        let msa = align_progressive(&sequences(&["ACGT"]), &unit()).unwrap();
        assert_eq!(msa.rows(), vec!["ACGT"]);
        assert_eq!(msa.consensus_string(), "ACGT");
    }

    #[test]
    fn test_no_sequences_rejected() {
        assert!(matches!(
            align_progressive(&[], &unit()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unresolved_columns_score_through_the_model() {
        // profile [A, conflict]: T under the conflict (X vs T = 0) ties T under A,
        // and the diagonal into the conflict column wins
        let msa = align_progressive(&sequences(&["AC", "AG", "T"]), &Blosum62::new()).unwrap();
        assert_eq!(msa.rows(), vec!["AC", "AG", "-T"]);
        assert_eq!(msa.consensus_string(), "-N");
    }

    #[test]
    fn test_conflict_renders_as_n() {
        let msa = align_progressive(&sequences(&["AC", "AG"]), &unit()).unwrap();
        assert_eq!(msa.rows(), vec!["AC", "AG"]);
        assert_eq!(msa.consensus_string(), "AN");
        assert_eq!(msa.to_string(), "AC  AC\nAG  AG\n    AN");
    }
}
