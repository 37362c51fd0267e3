// lib.rs - phyloalign library root

//! # phyloalign - Sequence alignment and distance-based phylogeny
//!
//! Pairwise alignment, edit-distance matrices, UPGMA clustering and
//! progressive multiple alignment over DNA or protein sequences.
//!
//! ## Features
//!
//! - **Pairwise alignment**: Needleman-Wunsch (global) and Smith-Waterman (local)
//!   with every co-optimal local alignment reported
//! - **Pluggable scoring**: BLOSUM62, nucleotide tables and flat match/mismatch
//!   through a named registry
//! - **Distance matrices**: parallel Levenshtein distances written as TSV, CSV,
//!   PHYLIP or NEXUS
//! - **UPGMA trees**: stepwise clustering with bracketed, Newick and JSON output
//! - **Progressive MSA**: sequences added one at a time against a majority consensus
//!
//! ## Basic Usage
//!
//! ```rust
//! use phyloalign::prelude::*;
//!
//! let scoring = Blosum62::new();
//! let (score, pair) = global_alignment(b"HGWAG", b"PHSWG", &scoring)?;
//! assert_eq!(score, 9);
//! assert_eq!(pair.aligned1, "-HGWAG");
//!
//! let sequences: Vec<Sequence> = ["AGT", "ACT", "GCT", "GTT"]
//!     .iter()
//!     .map(|s| Sequence::from_residues(s))
//!     .collect();
//! let tree = build_tree_from_sequences(&sequences)?;
//! assert_eq!(tree.to_string(), "((AGT, ACT), (GCT, GTT))");
//! # Ok::<(), phyloalign::Error>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;
pub mod scoring;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{align, align_global, align_local, align_progressive, edit_distance};
    pub use crate::core::{build_tree, build_tree_from_sequences, build_tree_with_progress};
    pub use crate::core::{global_alignment, local_alignments, pairwise_alignment};
    pub use crate::core::{AlignedPair, AlignmentConfig, AlignmentMode, PairwiseAlignment};
    pub use crate::core::{ClusterTree, ClusterTreeBuilder, DistanceMatrix, MultipleAlignment};
    pub use crate::data::{Sequence, SequenceSet, SequenceType};
    pub use crate::error::{Error, Result};
    pub use crate::output::{open_output, write_matrix, write_multiple, write_pairwise, write_tree};
    pub use crate::scoring::{Blosum62, MatchMismatch, NucleotideMatrix};
    pub use crate::scoring::{ScoringModel, ScoringRegistry};
    pub use crate::VERSION;
}

// Re-export main types at the root level for convenience
pub use crate::core::{AlignmentConfig, AlignmentMode, ClusterTree, DistanceMatrix, MultipleAlignment};
pub use crate::data::{Sequence, SequenceType};
pub use crate::error::{Error, Result};
pub use crate::scoring::{ScoringModel, ScoringRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "phyloalign v{} - Sequence alignment and distance-based phylogeny",
        VERSION
    )
}
