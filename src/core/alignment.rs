// alignment.rs - Alignment configuration and utilities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Gap symbol inserted into aligned sequences
pub const GAP: u8 = b'-';

/// Configuration for pairwise alignment scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Registry name of the scoring model (`blosum62`, `nucleotide`, `match-mismatch`)
    pub scoring: String,
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_penalty: i32,
    pub description: Option<String>,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            scoring: "nucleotide".to_string(),
            match_score: 2,
            mismatch_score: -1,
            gap_penalty: -2,
            description: Some("Default DNA alignment parameters".to_string()),
        }
    }
}

impl AlignmentConfig {
    /// Create configuration from mode string
    pub fn from_mode(mode: &str) -> Result<Self, Error> {
        match mode {
            "dna" => Ok(Self {
                description: Some("Standard DNA alignment".to_string()),
                ..Self::default()
            }),
            "dna-strict" => Ok(Self {
                scoring: "nucleotide".to_string(),
                match_score: 3,
                mismatch_score: -2,
                gap_penalty: -4,
                description: Some("Strict DNA alignment (higher penalties)".to_string()),
            }),
            // BLOSUM62 ignores match/mismatch; they are kept for reporting only
            "protein" => Ok(Self {
                scoring: "blosum62".to_string(),
                match_score: 0,
                mismatch_score: 0,
                gap_penalty: -8,
                description: Some("Protein alignment with BLOSUM62".to_string()),
            }),
            "unit" => Ok(Self {
                scoring: "match-mismatch".to_string(),
                match_score: 1,
                mismatch_score: -1,
                gap_penalty: -1,
                description: Some("Unit scores over any alphabet".to_string()),
            }),
            _ => Err(Error::invalid(format!(
                "unknown alignment mode: {}. Use: dna, dna-strict, protein, unit",
                mode
            ))),
        }
    }

    /// Create custom configuration
    pub fn custom(scoring: &str, match_score: i32, mismatch_score: i32, gap_penalty: i32) -> Self {
        Self {
            scoring: scoring.to_string(),
            match_score,
            mismatch_score,
            gap_penalty,
            description: Some("Custom alignment parameters".to_string()),
        }
    }
}

/// Which dynamic programming variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    /// Needleman-Wunsch, end to end
    Global,
    /// Smith-Waterman, best-scoring substrings
    Local,
}

impl FromStr for AlignmentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" | "nw" | "needleman-wunsch" => Ok(AlignmentMode::Global),
            "local" | "sw" | "smith-waterman" => Ok(AlignmentMode::Local),
            _ => Err(Error::invalid(format!(
                "invalid alignment mode: {}. Use: global, local",
                s
            ))),
        }
    }
}

impl AlignmentMode {
    pub fn description(&self) -> &str {
        match self {
            AlignmentMode::Global => "global (Needleman-Wunsch)",
            AlignmentMode::Local => "local (Smith-Waterman)",
        }
    }
}

/// Column counts for an aligned pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub matches: usize,
    pub mismatches: usize,
    pub gap_events: usize,
    pub gap_columns: usize,
    pub length: usize,
    pub identity_percent: f64,
}

/// Compute alignment statistics from two aligned rows
pub fn compute_alignment_stats(first: &[u8], second: &[u8]) -> AlignmentStats {
    let mut matches = 0;
    let mut mismatches = 0;
    let mut gap_events = 0;
    let mut gap_columns = 0;
    let mut in_gap = false;

    for (&a, &b) in first.iter().zip(second) {
        if a == GAP || b == GAP {
            if !in_gap {
                gap_events += 1;
                in_gap = true;
            }
            gap_columns += 1;
        } else {
            in_gap = false;
            if a.eq_ignore_ascii_case(&b) {
                matches += 1;
            } else {
                mismatches += 1;
            }
        }
    }

    let length = first.len().min(second.len());
    let identity_percent = if length == 0 {
        0.0
    } else {
        matches as f64 / length as f64 * 100.0
    };

    AlignmentStats {
        matches,
        mismatches,
        gap_events,
        gap_columns,
        length,
        identity_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(AlignmentConfig::from_mode("dna").unwrap().gap_penalty, -2);
        assert_eq!(
            AlignmentConfig::from_mode("protein").unwrap().scoring,
            "blosum62"
        );
        assert!(AlignmentConfig::from_mode("rna").is_err());
    }

    #[test]
    fn test_alignment_mode_parsing() {
        assert_eq!("Global".parse::<AlignmentMode>().unwrap(), AlignmentMode::Global);
        assert_eq!("sw".parse::<AlignmentMode>().unwrap(), AlignmentMode::Local);
        assert!("semi".parse::<AlignmentMode>().is_err());
    }

    #[test]
    fn test_alignment_stats() {
        let stats = compute_alignment_stats(b"AC--TGA", b"ACGGTCA");
        assert_eq!(stats.matches, 4);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.gap_events, 1);
        assert_eq!(stats.gap_columns, 2);
        assert_eq!(stats.length, 7);
    }

    #[test]
    fn test_alignment_stats_separate_gap_runs() {
        let stats = compute_alignment_stats(b"-A-C", b"TATC");
        assert_eq!(stats.gap_events, 2);
        assert_eq!(stats.matches, 2);
    }
}
