// sequence.rs - Labelled sequences and sequence collections

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scoring::blosum62::AMINO_ACIDS;
use crate::scoring::nucleotide::NUCLEOTIDES;

/// A single labelled sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    /// Sequence labelled by its own residues
    pub fn from_residues(residues: &str) -> Self {
        Self::new(residues, residues.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.sequence)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.as_str())
    }
}

/// Residue alphabet of an input set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceType {
    Dna,
    Protein,
}

impl FromStr for SequenceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dna" | "nucleotide" => Ok(SequenceType::Dna),
            "protein" | "aa" => Ok(SequenceType::Protein),
            _ => Err(Error::invalid(format!(
                "invalid sequence type: {}. Use: dna, protein",
                s
            ))),
        }
    }
}

impl SequenceType {
    pub fn alphabet(&self) -> &'static [u8] {
        match self {
            SequenceType::Dna => NUCLEOTIDES,
            SequenceType::Protein => AMINO_ACIDS,
        }
    }

    /// Alignment preset matching this alphabet
    pub fn default_mode(&self) -> &'static str {
        match self {
            SequenceType::Dna => "dna",
            SequenceType::Protein => "protein",
        }
    }

    /// Reject empty sequences and symbols outside the alphabet (case-insensitive)
    pub fn validate(&self, sequence: &Sequence) -> Result<()> {
        if sequence.is_empty() {
            return Err(Error::invalid(format!("sequence '{}' is empty", sequence.id)));
        }
        let alphabet = self.alphabet();
        match sequence
            .sequence
            .iter()
            .find(|b| !alphabet.contains(&b.to_ascii_uppercase()))
        {
            Some(&symbol) => Err(Error::unknown_symbol(
                symbol,
                format!("sequence '{}' is not {:?}", sequence.id, self),
            )),
            None => Ok(()),
        }
    }
}

/// Ordered collection of sequences with unique labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceSet {
    sequences: Vec<Sequence>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails on a label that is already present
    pub fn push(&mut self, sequence: Sequence) -> Result<()> {
        if self.sequences.iter().any(|s| s.id == sequence.id) {
            return Err(Error::invalid(format!("duplicate sequence label '{}'", sequence.id)));
        }
        self.sequences.push(sequence);
        Ok(())
    }

    pub fn from_sequences(sequences: Vec<Sequence>) -> Result<Self> {
        let mut set = Self::new();
        for sequence in sequences {
            set.push(sequence)?;
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn as_slice(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn into_vec(self) -> Vec<Sequence> {
        self.sequences
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.id == id)
    }

    pub fn validate(&self, sequence_type: SequenceType) -> Result<()> {
        self.sequences
            .iter()
            .try_for_each(|s| sequence_type.validate(s))
    }

    /// Keep sequences whose label matches `include` (if any) and not `exclude` (if any)
    pub fn filter_labels(self, include: Option<&Regex>, exclude: Option<&Regex>) -> Self {
        let sequences = self
            .sequences
            .into_iter()
            .filter(|s| include.map_or(true, |re| re.is_match(&s.id)))
            .filter(|s| exclude.map_or(true, |re| !re.is_match(&s.id)))
            .collect();
        Self { sequences }
    }

    /// Keep only the listed labels, preserving input order
    pub fn retain_labels(self, keep: &HashSet<String>) -> Self {
        let sequences = self
            .sequences
            .into_iter()
            .filter(|s| keep.contains(&s.id))
            .collect();
        Self { sequences }
    }

    /// Drop the listed labels
    pub fn remove_labels(self, drop: &HashSet<String>) -> Self {
        let sequences = self
            .sequences
            .into_iter()
            .filter(|s| !drop.contains(&s.id))
            .collect();
        Self { sequences }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_type_parsing() {
        assert_eq!("DNA".parse::<SequenceType>().unwrap(), SequenceType::Dna);
        assert_eq!("protein".parse::<SequenceType>().unwrap(), SequenceType::Protein);
        assert!("rna".parse::<SequenceType>().is_err());
    }

    #[test]
    fn test_validate_alphabet() {
        assert!(SequenceType::Dna.validate(&Sequence::from_residues("acgT")).is_ok());
        let err = SequenceType::Dna
            .validate(&Sequence::from_residues("ACGU"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol { symbol: 'U', .. }));
        assert!(SequenceType::Protein.validate(&Sequence::from_residues("HGWAG")).is_ok());
        assert!(SequenceType::Protein.validate(&Sequence::new("empty", "")).is_err());
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let result = SequenceSet::from_sequences(vec![
            Sequence::from_residues("ACGT"),
            Sequence::from_residues("ACGT"),
        ]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_label_filters() {
        let set = SequenceSet::from_sequences(vec![
            Sequence::new("human_1", "ACGT"),
            Sequence::new("human_2", "ACGA"),
            Sequence::new("mouse_1", "ACGG"),
        ])
        .unwrap();
        let include = Regex::new("^human").unwrap();
        let exclude = Regex::new("_2$").unwrap();
        let filtered = set.filter_labels(Some(&include), Some(&exclude));
        assert_eq!(filtered.len(), 1);
        assert!(filtered.get("human_1").is_some());
    }
}
