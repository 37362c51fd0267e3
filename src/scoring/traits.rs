// traits.rs - Core trait for substitution scoring

use crate::error::{Error, Result};
use std::fmt::Debug;

/// Substitution scores by symbol pair plus a linear gap penalty.
///
/// Implementations are immutable once built and shared read-only by every
/// alignment computation, so they must be `Send + Sync`.
pub trait ScoringModel: Send + Sync + Debug {
    /// Score for aligning `a` against `b`.
    ///
    /// Fails with [`Error::UnknownSymbol`] when either symbol is outside the
    /// model's alphabet.
    fn score(&self, a: u8, b: u8) -> Result<i32>;

    /// Score added for each gap column (usually negative)
    fn gap_penalty(&self) -> i32;

    /// Score of `residue` against a consensus column with no single residue
    /// (a gap or a conflict). Defaults to the gap penalty.
    fn unresolved_score(&self, _residue: u8) -> Result<i32> {
        Ok(self.gap_penalty())
    }

    /// Get a human-readable name for this model
    fn name(&self) -> &'static str;

    /// Get a description of this model
    fn description(&self) -> &'static str;

    /// Symbols this model can score, or `None` when any byte is accepted
    fn alphabet(&self) -> Option<&'static [u8]> {
        None
    }

    /// Check every symbol of `sequence` against the model's alphabet
    fn validate_sequence(&self, sequence: &[u8]) -> Result<()> {
        if let Some(alphabet) = self.alphabet() {
            if let Some(&bad) = sequence
                .iter()
                .find(|s| !alphabet.contains(&s.to_ascii_uppercase()))
            {
                return Err(Error::unknown_symbol(
                    bad,
                    format!("not in the {} alphabet", self.name()),
                ));
            }
        }
        Ok(())
    }
}
