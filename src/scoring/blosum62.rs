// blosum62.rs - BLOSUM62 amino acid substitution model

use super::traits::ScoringModel;
use crate::error::{Error, Result};

/// Row/column order of [`BLOSUM62`]
pub const AMINO_ACIDS: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX*";

const AA_DIM: usize = 24;

/// Gap penalty used when none is given
pub const DEFAULT_PROTEIN_GAP: i32 = -8;

/// BLOSUM62 substitution model with a linear gap penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blosum62 {
    gap_penalty: i32,
}

impl Blosum62 {
    pub fn new() -> Self {
        Self::with_gap_penalty(DEFAULT_PROTEIN_GAP)
    }

    pub fn with_gap_penalty(gap_penalty: i32) -> Self {
        Self { gap_penalty }
    }
}

impl Default for Blosum62 {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an amino acid letter to its row in [`BLOSUM62`]. Case-insensitive.
fn aa_index(aa: u8) -> Option<usize> {
    let upper = aa.to_ascii_uppercase();
    AMINO_ACIDS.iter().position(|&c| c == upper)
}

impl ScoringModel for Blosum62 {
    fn score(&self, a: u8, b: u8) -> Result<i32> {
        let i = aa_index(a).ok_or_else(|| Error::unknown_symbol(a, "not scored by BLOSUM62"))?;
        let j = aa_index(b).ok_or_else(|| Error::unknown_symbol(b, "not scored by BLOSUM62"))?;
        Ok(BLOSUM62[i * AA_DIM + j])
    }

    fn gap_penalty(&self) -> i32 {
        self.gap_penalty
    }

    /// Scored as the unknown residue `X`
    fn unresolved_score(&self, residue: u8) -> Result<i32> {
        self.score(b'X', residue)
    }

    fn name(&self) -> &'static str {
        "BLOSUM62"
    }

    fn description(&self) -> &'static str {
        "BLOSUM62 amino acid substitution matrix (NCBI), linear gap penalty"
    }

    fn alphabet(&self) -> Option<&'static [u8]> {
        Some(AMINO_ACIDS)
    }
}

/// BLOSUM62, 24x24 flattened, NCBI reference.
#[rustfmt::skip]
const BLOSUM62: [i32; AA_DIM * AA_DIM] = [
//   A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blosum62_lookup() {
        let model = Blosum62::new();
        assert_eq!(model.score(b'W', b'W').unwrap(), 11);
        assert_eq!(model.score(b'H', b'P').unwrap(), -2);
        assert_eq!(model.score(b'a', b'A').unwrap(), 4);
        assert_eq!(model.gap_penalty(), -8);
    }

    #[test]
    fn test_blosum62_is_symmetric() {
        let model = Blosum62::new();
        for &a in AMINO_ACIDS {
            for &b in AMINO_ACIDS {
                assert_eq!(model.score(a, b).unwrap(), model.score(b, a).unwrap());
            }
        }
    }

    #[test]
    fn test_blosum62_unknown_symbol() {
        let model = Blosum62::new();
        let err = model.score(b'J', b'A').unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol { symbol: 'J', .. }));
        assert!(model.validate_sequence(b"HGWAG").is_ok());
        assert!(model.validate_sequence(b"HG-AG").is_err());
    }

    #[test]
    fn test_blosum62_unresolved_column_uses_x() {
        let model = Blosum62::new();
        assert_eq!(model.unresolved_score(b'W').unwrap(), -2);
        assert_eq!(model.unresolved_score(b'T').unwrap(), 0);
        assert!(model.unresolved_score(b'J').is_err());
    }
}
