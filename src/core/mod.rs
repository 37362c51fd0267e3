// mod.rs - Core logic module

pub mod alignment;
pub mod cluster;
pub mod distance;
pub mod matrix;
pub mod progressive;
pub mod traceback;

// Re-export main types for convenience
pub use alignment::{compute_alignment_stats, AlignmentConfig, AlignmentMode, AlignmentStats, GAP};
pub use cluster::{
    build_tree, build_tree_from_sequences, build_tree_with_progress, ClusterNode, ClusterTree,
    ClusterTreeBuilder, MergeStep,
};
pub use distance::{edit_distance, ClusterId, DistanceMatrix};
pub use matrix::{
    align, align_global, align_local, global_score, AlignmentMatrix, Cell, Direction, ScoreMatrix,
    TraceMatrix, TracePath,
};
pub use progressive::{align_progressive, consensus, ConsensusSymbol, MultipleAlignment, CONFLICT};
pub use traceback::{
    global_alignment, local_alignments, pairwise_alignment, reconstruct, AlignedPair,
    PairwiseAlignment,
};
