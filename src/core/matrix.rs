// matrix.rs - Dynamic programming score and traceback matrices

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::alignment::AlignmentMode;
use crate::error::{Error, Result};
use crate::scoring::ScoringModel;

/// Which recurrence term produced a cell's score.
///
/// Rows of the matrices follow `seq2`, columns follow `seq1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Substitution: consume one symbol of each sequence
    Diagonal,
    /// Gap in `seq1`: consume `seq2` only
    Up,
    /// Gap in `seq2`: consume `seq1` only
    Left,
    /// Origin, local-alignment termination or unfilled cell
    None,
}

impl Direction {
    /// Single-character tag used when printing or parsing trace matrices
    pub fn tag(self) -> char {
        match self {
            Direction::Diagonal => 'D',
            Direction::Up => 'U',
            Direction::Left => 'L',
            Direction::None => '.',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'D' => Some(Direction::Diagonal),
            'U' => Some(Direction::Up),
            'L' => Some(Direction::Left),
            '.' | ' ' => Some(Direction::None),
            _ => None,
        }
    }
}

/// Position in a score/trace matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Dense row-major matrix of alignment scores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Largest value anywhere in the matrix
    pub fn max(&self) -> i32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Every cell holding `value`, in row-major order
    pub fn cells_with(&self, value: i32) -> Vec<Cell> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == value)
            .map(|(idx, _)| Cell::new(idx / self.cols, idx % self.cols))
            .collect()
    }
}

impl Index<(usize, usize)> for ScoreMatrix {
    type Output = i32;

    fn index(&self, (row, col): (usize, usize)) -> &i32 {
        &self.data[row * self.cols + col]
    }
}

impl fmt::Display for ScoreMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = self.row(row).iter().map(|v| format!("{:4}", v)).collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}

/// Dense row-major matrix of traceback directions, parallel to a [`ScoreMatrix`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Direction>,
}

/// Steps of a traceback walk in forward (left-to-right) order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracePath {
    /// Cell the walk began from, the bottom-right corner of the aligned region
    pub start: Cell,
    /// Cell the walk stopped at, the top-left corner of the aligned region
    pub end: Cell,
    pub steps: Vec<Direction>,
}

impl TraceMatrix {
    /// Matrix with every cell set to [`Direction::None`]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Direction::None; rows * cols],
        }
    }

    /// Parse one string of tags per row (`D`, `U`, `L`, `.` or space).
    ///
    /// An unknown tag or a ragged row is reported as a corrupt traceback.
    pub fn from_tags(rows: &[&str]) -> Result<Self> {
        let cols = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut matrix = Self::new(rows.len(), cols);
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(Error::corrupt(row, 0, "ragged trace row"));
            }
            for (col, tag) in line.chars().enumerate() {
                let direction = Direction::from_tag(tag).ok_or_else(|| {
                    Error::corrupt(row, col, format!("undefined direction tag '{}'", tag))
                })?;
                matrix.set(row, col, direction);
            }
        }
        Ok(matrix)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Direction {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, direction: Direction) {
        self.data[row * self.cols + col] = direction;
    }

    /// Walk from `start` until a [`Direction::None`] cell.
    ///
    /// Fails when `start` is outside the matrix or a direction would step
    /// past row 0 / column 0.
    pub fn path(&self, start: Cell) -> Result<TracePath> {
        if start.row >= self.rows || start.col >= self.cols {
            return Err(Error::corrupt(
                start.row,
                start.col,
                format!("start cell outside {}x{} matrix", self.rows, self.cols),
            ));
        }

        let mut steps = Vec::with_capacity(start.row + start.col);
        let Cell { mut row, mut col } = start;

        loop {
            let direction = self.get(row, col);
            match direction {
                Direction::None => break,
                Direction::Diagonal if row > 0 && col > 0 => {
                    row -= 1;
                    col -= 1;
                }
                Direction::Up if row > 0 => row -= 1,
                Direction::Left if col > 0 => col -= 1,
                _ => {
                    return Err(Error::corrupt(
                        row,
                        col,
                        format!("{:?} step leaves the matrix", direction),
                    ))
                }
            }
            steps.push(direction);
        }

        steps.reverse();
        Ok(TracePath {
            start,
            end: Cell::new(row, col),
            steps,
        })
    }
}

impl Index<(usize, usize)> for TraceMatrix {
    type Output = Direction;

    fn index(&self, (row, col): (usize, usize)) -> &Direction {
        &self.data[row * self.cols + col]
    }
}

impl fmt::Display for TraceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.cols)
                .map(|col| self.get(row, col).tag().to_string())
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Filled score and traceback matrices for one pair of sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    mode: AlignmentMode,
    score: ScoreMatrix,
    trace: TraceMatrix,
}

impl AlignmentMatrix {
    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    pub fn score_matrix(&self) -> &ScoreMatrix {
        &self.score
    }

    pub fn trace_matrix(&self) -> &TraceMatrix {
        &self.trace
    }

    pub fn into_parts(self) -> (ScoreMatrix, TraceMatrix) {
        (self.score, self.trace)
    }

    /// Bottom-right cell
    pub fn end_cell(&self) -> Cell {
        Cell::new(self.score.rows() - 1, self.score.cols() - 1)
    }

    /// Optimal score: the bottom-right cell for global alignment, the
    /// matrix-wide maximum for local alignment
    pub fn score(&self) -> i32 {
        match self.mode {
            AlignmentMode::Global => {
                let end = self.end_cell();
                self.score.get(end.row, end.col)
            }
            AlignmentMode::Local => self.score.max(),
        }
    }

    /// Traceback start cells for every optimal alignment.
    ///
    /// Global: the bottom-right cell. Local: every cell holding the maximum,
    /// in row-major order; empty when nothing scores above zero.
    pub fn optimal_cells(&self) -> Vec<Cell> {
        match self.mode {
            AlignmentMode::Global => vec![self.end_cell()],
            AlignmentMode::Local => {
                let best = self.score.max();
                if best <= 0 {
                    Vec::new()
                } else {
                    self.score.cells_with(best)
                }
            }
        }
    }
}

/// Pick the best of the three recurrence terms.
///
/// Ties prefer Diagonal, then Up, then Left.
fn best_direction(diagonal: i32, up: i32, left: i32) -> (i32, Direction) {
    let best = diagonal.max(up).max(left);
    let direction = if best == diagonal {
        Direction::Diagonal
    } else if best == up {
        Direction::Up
    } else {
        Direction::Left
    };
    (best, direction)
}

/// Fill both matrices for `cols_len` columns (`seq1`) by `rows_len` rows (`seq2`).
///
/// `substitution(j, i)` scores column symbol `j` against row symbol `i`.
pub(crate) fn fill<F>(
    cols_len: usize,
    rows_len: usize,
    gap: i32,
    mode: AlignmentMode,
    mut substitution: F,
) -> Result<AlignmentMatrix>
where
    F: FnMut(usize, usize) -> Result<i32>,
{
    let rows = rows_len + 1;
    let cols = cols_len + 1;
    let mut score = ScoreMatrix::new(rows, cols);
    let mut trace = TraceMatrix::new(rows, cols);

    if mode == AlignmentMode::Global {
        for j in 1..cols {
            score.set(0, j, j as i32 * gap);
            trace.set(0, j, Direction::Left);
        }
        for i in 1..rows {
            score.set(i, 0, i as i32 * gap);
            trace.set(i, 0, Direction::Up);
        }
    }

    for i in 1..rows {
        for j in 1..cols {
            let diagonal = score.get(i - 1, j - 1) + substitution(j - 1, i - 1)?;
            let up = score.get(i - 1, j) + gap;
            let left = score.get(i, j - 1) + gap;

            // A direction reaching exactly 0 still beats the zero floor
            let (best, direction) = best_direction(diagonal, up, left);
            match mode {
                AlignmentMode::Local if best < 0 => {
                    score.set(i, j, 0);
                    trace.set(i, j, Direction::None);
                }
                _ => {
                    score.set(i, j, best);
                    trace.set(i, j, direction);
                }
            }
        }
    }

    let matrix = AlignmentMatrix { mode, score, trace };
    debug!(
        rows,
        cols,
        mode = ?mode,
        score = matrix.score(),
        "filled alignment matrix"
    );
    Ok(matrix)
}

fn require_non_empty(seq1: &[u8], seq2: &[u8]) -> Result<()> {
    if seq1.is_empty() || seq2.is_empty() {
        return Err(Error::invalid("input sequences cannot be empty"));
    }
    Ok(())
}

/// Needleman-Wunsch global alignment matrices
pub fn align_global<S>(seq1: &[u8], seq2: &[u8], scoring: &S) -> Result<AlignmentMatrix>
where
    S: ScoringModel + ?Sized,
{
    require_non_empty(seq1, seq2)?;
    fill(
        seq1.len(),
        seq2.len(),
        scoring.gap_penalty(),
        AlignmentMode::Global,
        |j, i| scoring.score(seq1[j], seq2[i]),
    )
}

/// Smith-Waterman local alignment matrices
pub fn align_local<S>(seq1: &[u8], seq2: &[u8], scoring: &S) -> Result<AlignmentMatrix>
where
    S: ScoringModel + ?Sized,
{
    require_non_empty(seq1, seq2)?;
    fill(
        seq1.len(),
        seq2.len(),
        scoring.gap_penalty(),
        AlignmentMode::Local,
        |j, i| scoring.score(seq1[j], seq2[i]),
    )
}

/// Dispatch on [`AlignmentMode`]
pub fn align<S>(seq1: &[u8], seq2: &[u8], scoring: &S, mode: AlignmentMode) -> Result<AlignmentMatrix>
where
    S: ScoringModel + ?Sized,
{
    match mode {
        AlignmentMode::Global => align_global(seq1, seq2, scoring),
        AlignmentMode::Local => align_local(seq1, seq2, scoring),
    }
}

/// Optimal global alignment score
pub fn global_score<S>(seq1: &[u8], seq2: &[u8], scoring: &S) -> Result<i32>
where
    S: ScoringModel + ?Sized,
{
    Ok(align_global(seq1, seq2, scoring)?.score())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Blosum62, MatchMismatch, NucleotideMatrix};

    #[test]
    fn test_global_dimensions_and_boundaries() {
        let matrix = align_global(b"HGWAG", b"PHSWG", &Blosum62::new()).unwrap();
        let score = matrix.score_matrix();
        let trace = matrix.trace_matrix();

        assert_eq!(score.rows(), 6);
        assert_eq!(score.cols(), 6);
        assert_eq!(trace.get(0, 0), Direction::None);
        for j in 1..6 {
            assert_eq!(score[(0, j)], j as i32 * -8);
            assert_eq!(trace[(0, j)], Direction::Left);
        }
        for i in 1..6 {
            assert_eq!(score[(i, 0)], i as i32 * -8);
            assert_eq!(trace[(i, 0)], Direction::Up);
        }
    }

    #[test]
    fn test_global_score_is_bottom_right() {
        let matrix = align_global(b"HGWAG", b"PHSWG", &Blosum62::new()).unwrap();
        assert_eq!(matrix.score(), 9);
        assert_eq!(matrix.score_matrix().get(5, 5), 9);
        assert_eq!(global_score(b"HGWAG", b"PHSWG", &Blosum62::new()).unwrap(), 9);
    }

    #[test]
    fn test_global_gap_penalty_changes_score() {
        let strict = global_score(b"HGWAG", b"PHSWG", &Blosum62::with_gap_penalty(-8)).unwrap();
        let lenient = global_score(b"HGWAG", b"PHSWG", &Blosum62::with_gap_penalty(-4)).unwrap();
        assert_eq!(lenient, 17);
        assert_ne!(strict, lenient);
    }

    #[test]
    fn test_global_substitution_scores() {
        let model = Blosum62::new();
        assert_eq!(global_score(b"HG", b"HG", &model).unwrap(), 14);
        assert_eq!(global_score(b"HG", b"PG", &model).unwrap(), 4);
        assert_eq!(global_score(b"HG", b"HH", &model).unwrap(), 6);
    }

    #[test]
    fn test_global_score_may_be_negative() {
        let score = global_score(b"AAAA", b"TT", &NucleotideMatrix::default()).unwrap();
        assert!(score < 0);
    }

    #[test]
    fn test_tie_break_prefers_diagonal_then_up() {
        let model = MatchMismatch::new(1, -2, -1);
        let matrix = align_global(b"A", b"C", &model).unwrap();
        // diagonal = -2, up = -1 + -1 = -2, left = -2: diagonal wins
        assert_eq!(matrix.trace_matrix().get(1, 1), Direction::Diagonal);

        let model = MatchMismatch::new(1, -3, -1);
        let matrix = align_global(b"A", b"C", &model).unwrap();
        // diagonal = -3, up = left = -2: up wins over left
        assert_eq!(matrix.trace_matrix().get(1, 1), Direction::Up);
    }

    #[test]
    fn test_empty_sequences_rejected() {
        let model = NucleotideMatrix::default();
        assert!(matches!(
            align_global(b"", b"ACGT", &model),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            align_global(b"ACGT", b"", &model),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            align_local(b"", b"", &model),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_symbol_propagates() {
        let err = align_global(b"ACGN", b"ACGT", &NucleotideMatrix::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol { symbol: 'N', .. }));
    }

    #[test]
    fn test_local_matrix_never_negative() {
        let model = MatchMismatch::new(2, -1, -2);
        let matrix = align_local(b"GATTACA", b"GCATGCU", &model).unwrap();
        let score = matrix.score_matrix();
        for row in 0..score.rows() {
            assert!(score.row(row).iter().all(|&v| v >= 0));
        }
        for j in 0..score.cols() {
            assert_eq!(matrix.trace_matrix().get(0, j), Direction::None);
        }
        assert_eq!(matrix.score(), 4);
    }

    #[test]
    fn test_local_exposes_every_maximal_cell() {
        let model = MatchMismatch::new(2, -1, -2);
        let matrix = align_local(b"ACACACTA", b"AGCACACA", &model).unwrap();
        assert_eq!(matrix.score(), 10);
        assert_eq!(
            matrix.optimal_cells(),
            vec![Cell::new(7, 6), Cell::new(8, 5), Cell::new(8, 8)]
        );
    }

    #[test]
    fn test_local_without_positive_score() {
        let model = MatchMismatch::new(2, -1, -2);
        let matrix = align_local(b"AAA", b"TTT", &model).unwrap();
        assert_eq!(matrix.score(), 0);
        assert!(matrix.optimal_cells().is_empty());
    }

    #[test]
    fn test_local_zero_terminates_trace() {
        let model = MatchMismatch::new(2, -1, -2);
        let matrix = align_local(b"AGT", b"AGT", &model).unwrap();
        let trace = matrix.trace_matrix();
        assert_eq!(trace.get(1, 1), Direction::Diagonal);
        assert_eq!(trace.get(2, 2), Direction::Diagonal);
        // A vs T: diagonal -1, up -2, left -2
        assert_eq!(trace.get(1, 3), Direction::None);
        assert_eq!(matrix.score_matrix().get(1, 3), 0);
        assert_eq!(matrix.score_matrix().get(3, 3), 6);
    }

    #[test]
    fn test_local_zero_tie_keeps_direction() {
        let model = MatchMismatch::new(2, -1, -2);
        let matrix = align_local(b"AGT", b"AGT", &model).unwrap();
        let trace = matrix.trace_matrix();
        // A vs G: up = 2 - 2 = 0 ties the floor and wins over it
        assert_eq!(matrix.score_matrix().get(2, 1), 0);
        assert_eq!(trace.get(2, 1), Direction::Up);
        assert_eq!(trace.get(1, 2), Direction::Left);
        for j in 0..4 {
            assert_eq!(trace.get(0, j), Direction::None);
        }
    }

    #[test]
    fn test_trace_from_tags_rejects_unknown_tag() {
        let err = TraceMatrix::from_tags(&[".LL", "UDX"]).unwrap_err();
        assert!(matches!(err, Error::CorruptTraceback { row: 1, col: 2, .. }));

        let trace = TraceMatrix::from_tags(&[".LL", "UDL"]).unwrap();
        assert_eq!(trace.get(1, 1), Direction::Diagonal);
        assert_eq!(trace.to_string(), ". L L\nU D L\n");
    }

    #[test]
    fn test_path_rejects_steps_off_the_matrix() {
        let trace = TraceMatrix::from_tags(&["DL", "UD"]).unwrap();
        let err = trace.path(Cell::new(0, 1)).unwrap_err();
        assert!(matches!(err, Error::CorruptTraceback { row: 0, col: 0, .. }));

        assert!(trace.path(Cell::new(5, 0)).is_err());
    }
}
