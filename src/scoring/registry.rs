// registry.rs - Scoring model registry for managing available models

use std::collections::BTreeMap;

use super::traits::ScoringModel;
use super::{Blosum62, MatchMismatch, NucleotideMatrix};
use crate::core::AlignmentConfig;
use crate::error::{Error, Result};

/// Builds a model from the score parameters of an [`AlignmentConfig`]
pub type ScoringFactory = fn(&AlignmentConfig) -> Box<dyn ScoringModel>;

/// Registry of scoring models addressable by name
pub struct ScoringRegistry {
    factories: BTreeMap<String, ScoringFactory>,
}

impl ScoringRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };

        // Register built-in models
        registry.register_model("blosum62", |config| {
            Box::new(Blosum62::with_gap_penalty(config.gap_penalty))
        });
        registry.register_model("nucleotide", |config| {
            Box::new(NucleotideMatrix::uniform(
                config.match_score,
                config.mismatch_score,
                config.gap_penalty,
            ))
        });
        registry.register_model("match-mismatch", |config| {
            Box::new(MatchMismatch::new(
                config.match_score,
                config.mismatch_score,
                config.gap_penalty,
            ))
        });

        registry
    }

    /// Register a new model factory, replacing any previous one with the same name
    pub fn register_model(&mut self, name: &str, factory: ScoringFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Build the model named in `config.scoring`
    pub fn build(&self, config: &AlignmentConfig) -> Result<Box<dyn ScoringModel>> {
        let factory = self.factories.get(&config.scoring).ok_or_else(|| {
            Error::invalid(format!(
                "unknown scoring model '{}'. Available: {}",
                config.scoring,
                self.model_names().join(", ")
            ))
        })?;
        Ok(factory(config))
    }

    /// Check if a model exists
    pub fn has_model(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Get all model names, sorted
    pub fn model_names(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ScoringRegistry {
    fn default() -> Self {
        Self::new()
    }
}
