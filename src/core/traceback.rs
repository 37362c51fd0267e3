// traceback.rs - Reconstruct aligned sequences from a traceback matrix

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::core::alignment::{compute_alignment_stats, AlignmentMode, AlignmentStats, GAP};
use crate::core::matrix::{align, Cell, Direction, TraceMatrix};
use crate::error::{Error, Result};
use crate::scoring::ScoringModel;

/// One alignment of `seq1` (first row) against `seq2` (second row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedPair {
    pub aligned1: String,
    pub aligned2: String,
    /// Directions taken, in forward order
    pub path: Vec<Direction>,
    /// Cell the traceback began from
    pub start: Cell,
    /// Cell the traceback stopped at
    pub end: Cell,
}

impl AlignedPair {
    /// Number of alignment columns
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn stats(&self) -> AlignmentStats {
        compute_alignment_stats(self.aligned1.as_bytes(), self.aligned2.as_bytes())
    }

    /// `|` for identical columns, space elsewhere
    pub fn match_line(&self) -> String {
        self.aligned1
            .bytes()
            .zip(self.aligned2.bytes())
            .map(|(a, b)| {
                if a != GAP && a.eq_ignore_ascii_case(&b) {
                    '|'
                } else {
                    ' '
                }
            })
            .collect()
    }
}

impl fmt::Display for AlignedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.aligned1)?;
        writeln!(f, "{}", self.match_line())?;
        write!(f, "{}", self.aligned2)
    }
}

/// Walk `trace` back from `start` and emit the aligned rows.
///
/// `trace` must have `seq2.len() + 1` rows and `seq1.len() + 1` columns.
/// In global mode the walk has to finish at the origin.
pub fn reconstruct(
    seq1: &[u8],
    seq2: &[u8],
    trace: &TraceMatrix,
    start: Cell,
    mode: AlignmentMode,
) -> Result<AlignedPair> {
    if trace.rows() != seq2.len() + 1 || trace.cols() != seq1.len() + 1 {
        return Err(Error::corrupt(
            start.row,
            start.col,
            format!(
                "{}x{} trace does not fit sequences of length {} and {}",
                trace.rows(),
                trace.cols(),
                seq1.len(),
                seq2.len()
            ),
        ));
    }

    let path = trace.path(start)?;
    if mode == AlignmentMode::Global && path.end != Cell::new(0, 0) {
        return Err(Error::corrupt(
            path.end.row,
            path.end.col,
            "global traceback stopped before the origin",
        ));
    }

    let mut aligned1 = String::with_capacity(path.steps.len());
    let mut aligned2 = String::with_capacity(path.steps.len());
    let Cell { mut row, mut col } = path.end;

    for &step in &path.steps {
        match step {
            Direction::Diagonal => {
                aligned1.push(seq1[col] as char);
                aligned2.push(seq2[row] as char);
                row += 1;
                col += 1;
            }
            Direction::Left => {
                aligned1.push(seq1[col] as char);
                aligned2.push(GAP as char);
                col += 1;
            }
            Direction::Up => {
                aligned1.push(GAP as char);
                aligned2.push(seq2[row] as char);
                row += 1;
            }
            Direction::None => {
                return Err(Error::corrupt(row, col, "None step inside a trace path"))
            }
        }
    }

    Ok(AlignedPair {
        aligned1,
        aligned2,
        path: path.steps,
        start: path.start,
        end: path.end,
    })
}

/// Optimal score plus every reconstructed optimal alignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairwiseAlignment {
    pub mode: AlignmentMode,
    pub score: i32,
    pub alignments: Vec<AlignedPair>,
}

impl PairwiseAlignment {
    /// First optimal alignment, if any
    pub fn best(&self) -> Option<&AlignedPair> {
        self.alignments.first()
    }
}

/// Align two sequences and reconstruct all optimal alignments for `mode`.
///
/// Global mode yields exactly one alignment; local mode yields one per
/// maximal cell, possibly none.
pub fn pairwise_alignment<S>(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &S,
    mode: AlignmentMode,
) -> Result<PairwiseAlignment>
where
    S: ScoringModel + ?Sized,
{
    let matrix = align(seq1, seq2, scoring, mode)?;
    let score = matrix.score();
    let alignments = matrix
        .optimal_cells()
        .into_iter()
        .map(|cell| reconstruct(seq1, seq2, matrix.trace_matrix(), cell, mode))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        mode = ?mode,
        score,
        alignments = alignments.len(),
        "pairwise alignment complete"
    );

    Ok(PairwiseAlignment {
        mode,
        score,
        alignments,
    })
}

/// Needleman-Wunsch score and alignment
pub fn global_alignment<S>(seq1: &[u8], seq2: &[u8], scoring: &S) -> Result<(i32, AlignedPair)>
where
    S: ScoringModel + ?Sized,
{
    let result = pairwise_alignment(seq1, seq2, scoring, AlignmentMode::Global)?;
    let score = result.score;
    let pair = result
        .alignments
        .into_iter()
        .next()
        .ok_or_else(|| Error::corrupt(0, 0, "global alignment produced no traceback"))?;
    Ok((score, pair))
}

/// Smith-Waterman score and every optimal local alignment
pub fn local_alignments<S>(seq1: &[u8], seq2: &[u8], scoring: &S) -> Result<(i32, Vec<AlignedPair>)>
where
    S: ScoringModel + ?Sized,
{
    let result = pairwise_alignment(seq1, seq2, scoring, AlignmentMode::Local)?;
    Ok((result.score, result.alignments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::{align_global, align_local};
    use crate::scoring::{Blosum62, MatchMismatch};

    fn rows(pair: &AlignedPair) -> (&str, &str) {
        (pair.aligned1.as_str(), pair.aligned2.as_str())
    }

    #[test]
    fn test_global_protein_alignment() {
        let (score, pair) = global_alignment(b"HGWAG", b"PHSWG", &Blosum62::new()).unwrap();
        assert_eq!(score, 9);
        assert_eq!(rows(&pair), ("-HGWAG", "PHSW-G"));
        assert_eq!(pair.start, Cell::new(5, 5));
        assert_eq!(pair.end, Cell::new(0, 0));
        assert_eq!(pair.path.first(), Some(&Direction::Up));
    }

    #[test]
    fn test_global_alignment_is_symmetric() {
        let model = Blosum62::new();
        let (forward, pair) = global_alignment(b"HGWAG", b"PHSWG", &model).unwrap();
        let (reverse, swapped) = global_alignment(b"PHSWG", b"HGWAG", &model).unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(rows(&swapped), ("PHSW-G", "-HGWAG"));
        assert_eq!(pair.aligned1.replace('-', ""), "HGWAG");
        assert_eq!(pair.aligned2.replace('-', ""), "PHSWG");
    }

    #[test]
    fn test_global_inserts_gap_in_shorter_sequence() {
        let model = MatchMismatch::new(1, -1, -1);
        let (score, pair) = global_alignment(b"ACT", b"ACGT", &model).unwrap();
        assert_eq!(score, 2);
        assert_eq!(rows(&pair), ("AC-T", "ACGT"));
        assert_eq!(pair.to_string(), "AC-T\n|| |\nACGT");
    }

    #[test]
    fn test_local_reports_every_optimal_alignment() {
        let model = MatchMismatch::new(2, -1, -2);
        let (score, pairs) = local_alignments(b"ACACACTA", b"AGCACACA", &model).unwrap();
        assert_eq!(score, 10);
        let found: Vec<(&str, &str)> = pairs.iter().map(rows).collect();
        assert_eq!(
            found,
            vec![
                ("A-CACAC", "AGCACAC"),
                ("ACACA", "ACACA"),
                ("A-CACACTA", "AGCACAC-A"),
            ]
        );
        assert_eq!(pairs[0].start, Cell::new(7, 6));
        assert_eq!(pairs[0].end, Cell::new(0, 0));
        assert_eq!(pairs[1].end, Cell::new(3, 0));
        assert_eq!(pairs[2].start, Cell::new(8, 8));
    }

    #[test]
    fn test_local_substrings() {
        let model = MatchMismatch::new(2, -1, -2);
        let (score, pairs) = local_alignments(b"GATTACA", b"GCATGCU", &model).unwrap();
        assert_eq!(score, 4);
        let found: Vec<(&str, &str)> = pairs.iter().map(rows).collect();
        assert_eq!(found, vec![("CA", "CA"), ("G-AT", "GCAT")]);
        assert_eq!(pairs[1].end, Cell::new(0, 0));
    }

    #[test]
    fn test_local_identical_sequences() {
        let model = MatchMismatch::new(2, -1, -2);
        let (score, pairs) = local_alignments(b"AGT", b"AGT", &model).unwrap();
        assert_eq!(score, 6);
        assert_eq!(pairs.len(), 1);
        assert_eq!(rows(&pairs[0]), ("AGT", "AGT"));
    }

    #[test]
    fn test_local_no_similarity() {
        let model = MatchMismatch::new(2, -1, -2);
        let (score, pairs) = local_alignments(b"AAA", b"TTT", &model).unwrap();
        assert_eq!(score, 0);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_local_alignment_never_contains_leading_or_trailing_gaps() {
        let model = MatchMismatch::new(2, -1, -2);
        let (_, pairs) = local_alignments(b"ACACACTA", b"AGCACACA", &model).unwrap();
        for pair in pairs {
            assert_eq!(pair.path.first(), Some(&Direction::Diagonal));
            assert_eq!(pair.path.last(), Some(&Direction::Diagonal));
            assert!(pair.stats().matches > 0);
        }
    }

    #[test]
    fn test_reconstruct_from_computed_matrix() {
        let model = MatchMismatch::new(2, -1, -2);
        let matrix = align_local(b"AGT", b"AGT", &model).unwrap();
        let pair = reconstruct(
            b"AGT",
            b"AGT",
            matrix.trace_matrix(),
            Cell::new(2, 2),
            AlignmentMode::Local,
        )
        .unwrap();
        assert_eq!(rows(&pair), ("AG", "AG"));
    }

    #[test]
    fn test_global_trace_must_reach_origin() {
        let trace = TraceMatrix::from_tags(&[".L", "U."]).unwrap();
        let err = reconstruct(b"A", b"A", &trace, Cell::new(1, 1), AlignmentMode::Global)
            .unwrap_err();
        assert!(matches!(err, Error::CorruptTraceback { row: 1, col: 1, .. }));

        // The same walk is a legal (empty) local alignment
        let pair = reconstruct(b"A", b"A", &trace, Cell::new(1, 1), AlignmentMode::Local).unwrap();
        assert!(pair.is_empty());
    }

    #[test]
    fn test_trace_dimension_mismatch() {
        let matrix = align_global(b"AC", b"AC", &MatchMismatch::new(1, -1, -1)).unwrap();
        let err = reconstruct(
            b"ACG",
            b"AC",
            matrix.trace_matrix(),
            Cell::new(2, 2),
            AlignmentMode::Global,
        )
        .unwrap_err();
        assert!(matches!(err, Error::CorruptTraceback { .. }));
    }

    #[test]
    fn test_pairwise_alignment_serializes() {
        let model = MatchMismatch::new(1, -1, -1);
        let result = pairwise_alignment(b"ACT", b"ACGT", &model, AlignmentMode::Global).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["mode"], "global");
        assert_eq!(json["score"], 2);
        assert_eq!(json["alignments"][0]["aligned1"], "AC-T");
        assert_eq!(json["alignments"][0]["path"][2], "Up");
    }
}
