// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub input: Option<String>,
    pub input_format: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,

    // Core settings
    pub task: Option<String>,
    pub mode: Option<String>,
    pub sequence_type: Option<String>,

    // Performance
    pub threads: Option<usize>,
    pub progress: Option<bool>,

    // Sequence filtering
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub include_list: Option<String>,
    pub exclude_list: Option<String>,

    // Alignment settings
    pub alignment_mode: Option<String>,
    pub scoring: Option<String>,
    pub match_score: Option<i32>,
    pub mismatch_score: Option<i32>,
    pub gap_penalty: Option<i32>,

    // Flags
    pub show_matrix: Option<bool>,
    pub dry_run: Option<bool>,
    pub log_level: Option<String>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid TOML: {}", e)))
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;

        let config = Self::from_toml(&content).map_err(|e| {
            Error::Config(format!("failed to parse config file '{}': {}", path.display(), e))
        })?;

        eprintln!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;

        fs::write(path, content)?;

        eprintln!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# phyloalign.toml - Configuration file for phyloalign
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Sequence file: one sequence per line, or label/sequence rows (.tsv, .csv)
input = "sequences.tsv"

# Input format: text, tsv, csv (omit to detect from the extension)
# input_format = "tsv"

# Output file (omit for stdout)
output = "tree.nwk"

# Output format
#   align, msa: text, json
#   distance:   tsv, csv, phylip, nexus
#   tree:       bracket, newick, json
format = "newick"

# =============================================================================
# CORE SETTINGS
# =============================================================================

# Task: align, distance, tree, msa
task = "tree"

# Pairwise alignment mode: global, local (align task only)
mode = "global"

# Check every sequence against an alphabet: dna, protein
# sequence_type = "dna"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# Show a progress bar while computing distances
progress = false

# =============================================================================
# SEQUENCE FILTERING
# =============================================================================

# Include only sequences whose label matches regex pattern
# include = "^human_.*"

# Exclude sequences whose label matches regex pattern
# exclude = "control.*"

# Include only labels listed in a file (one label per line)
# include_list = "keep.txt"

# Exclude labels listed in a file (one label per line)
# exclude_list = "drop.txt"

# =============================================================================
# ALIGNMENT SETTINGS
# =============================================================================

# Scoring preset: dna, dna-strict, protein, unit
alignment_mode = "dna"

# Custom scoring (overrides preset)
# scoring = "match-mismatch"
# match_score = 1
# mismatch_score = -1
# gap_penalty = -1

# =============================================================================
# FLAGS
# =============================================================================

# Print score and traceback matrices (align task)
show_matrix = false

# Validate inputs without computation (dry run)
dry_run = false

# Log filter when RUST_LOG is unset
# log_level = "info"
"#
        .to_string()
    }
}
