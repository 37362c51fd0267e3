// nucleotide.rs - Nucleotide scoring models

use super::traits::ScoringModel;
use crate::error::{Error, Result};

/// Row/column order of a [`NucleotideMatrix`] table
pub const NUCLEOTIDES: &[u8] = b"ACGT";

/// 4x4 substitution table over `ACGT` with a linear gap penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NucleotideMatrix {
    table: [[i32; 4]; 4],
    gap_penalty: i32,
}

impl NucleotideMatrix {
    pub fn new(table: [[i32; 4]; 4], gap_penalty: i32) -> Self {
        Self { table, gap_penalty }
    }

    /// Uniform table: `match_score` on the diagonal, `mismatch_score` elsewhere
    pub fn uniform(match_score: i32, mismatch_score: i32, gap_penalty: i32) -> Self {
        let mut table = [[mismatch_score; 4]; 4];
        for (i, row) in table.iter_mut().enumerate() {
            row[i] = match_score;
        }
        Self::new(table, gap_penalty)
    }
}

impl Default for NucleotideMatrix {
    fn default() -> Self {
        Self::uniform(2, -1, -2)
    }
}

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

impl ScoringModel for NucleotideMatrix {
    fn score(&self, a: u8, b: u8) -> Result<i32> {
        let i = base_index(a).ok_or_else(|| Error::unknown_symbol(a, "not a nucleotide"))?;
        let j = base_index(b).ok_or_else(|| Error::unknown_symbol(b, "not a nucleotide"))?;
        Ok(self.table[i][j])
    }

    fn gap_penalty(&self) -> i32 {
        self.gap_penalty
    }

    /// Worst substitution for `residue`
    fn unresolved_score(&self, residue: u8) -> Result<i32> {
        let i = base_index(residue)
            .ok_or_else(|| Error::unknown_symbol(residue, "not a nucleotide"))?;
        Ok(self.table[i].iter().copied().min().unwrap_or(self.gap_penalty))
    }

    fn name(&self) -> &'static str {
        "nucleotide"
    }

    fn description(&self) -> &'static str {
        "4x4 substitution table over A, C, G, T"
    }

    fn alphabet(&self) -> Option<&'static [u8]> {
        Some(NUCLEOTIDES)
    }
}

/// Flat match/mismatch scoring over any byte alphabet.
///
/// Symbols are compared byte for byte, so this model also scores rendered
/// consensus columns and mixed-case input without complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchMismatch {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_penalty: i32,
}

impl MatchMismatch {
    pub fn new(match_score: i32, mismatch_score: i32, gap_penalty: i32) -> Self {
        Self {
            match_score,
            mismatch_score,
            gap_penalty,
        }
    }
}

impl ScoringModel for MatchMismatch {
    fn score(&self, a: u8, b: u8) -> Result<i32> {
        Ok(if a == b {
            self.match_score
        } else {
            self.mismatch_score
        })
    }

    fn gap_penalty(&self) -> i32 {
        self.gap_penalty
    }

    fn unresolved_score(&self, _residue: u8) -> Result<i32> {
        Ok(self.mismatch_score)
    }

    fn name(&self) -> &'static str {
        "match-mismatch"
    }

    fn description(&self) -> &'static str {
        "Flat match/mismatch scores over any alphabet"
    }
}
