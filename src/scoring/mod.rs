// mod.rs - Scoring models module root

pub mod blosum62;
pub mod nucleotide;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use blosum62::Blosum62;
pub use nucleotide::{MatchMismatch, NucleotideMatrix};
pub use registry::ScoringRegistry;
pub use traits::ScoringModel;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AlignmentConfig;

    #[test]
    fn test_registry_builtin_models() {
        let registry = ScoringRegistry::new();
        assert_eq!(
            registry.model_names(),
            vec!["blosum62", "match-mismatch", "nucleotide"]
        );
        assert!(registry.has_model("blosum62"));
        assert!(!registry.has_model("pam250"));
    }

    #[test]
    fn test_registry_builds_from_config() {
        let registry = ScoringRegistry::new();

        let protein = registry
            .build(&AlignmentConfig::from_mode("protein").unwrap())
            .unwrap();
        assert_eq!(protein.name(), "BLOSUM62");
        assert_eq!(protein.gap_penalty(), -8);

        let dna = registry.build(&AlignmentConfig::default()).unwrap();
        assert_eq!(dna.name(), "nucleotide");
        assert_eq!(dna.score(b'A', b'A').unwrap(), 2);
        assert_eq!(dna.score(b'A', b'C').unwrap(), -1);
        assert_eq!(dna.gap_penalty(), -2);
    }

    #[test]
    fn test_registry_unknown_model() {
        let registry = ScoringRegistry::new();
        let config = AlignmentConfig::custom("pam250", 1, -1, -1);
        let err = registry.build(&config).unwrap_err();
        assert!(err.to_string().contains("pam250"));
    }

    #[test]
    fn test_custom_model_registration() {
        let mut registry = ScoringRegistry::new();
        registry.register_model("identity", |config| {
            Box::new(MatchMismatch::new(1, 0, config.gap_penalty))
        });
        let config = AlignmentConfig::custom("identity", 0, 0, -3);
        let model = registry.build(&config).unwrap();
        assert_eq!(model.score(b'Q', b'Q').unwrap(), 1);
        assert_eq!(model.score(b'Q', b'R').unwrap(), 0);
        assert_eq!(model.gap_penalty(), -3);
    }
}
