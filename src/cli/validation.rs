// validation.rs - Input validation utilities

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::str::FromStr;

use regex::Regex;

use crate::cli::args::Args;
use crate::core::{AlignmentConfig, AlignmentMode};
use crate::data::{InputFormat, SequenceType};
use crate::error::{Error, Result};
use crate::output::{AlignmentFormat, MatrixFormat, TreeFormat};
use crate::scoring::ScoringRegistry;

/// What the binary should compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Pairwise alignment of exactly two sequences
    Align,
    /// Edit-distance matrix
    Distance,
    /// UPGMA tree over edit distances
    Tree,
    /// Progressive multiple alignment
    Msa,
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "align" | "pairwise" => Ok(Task::Align),
            "distance" | "distances" => Ok(Task::Distance),
            "tree" | "upgma" => Ok(Task::Tree),
            "msa" | "progressive" => Ok(Task::Msa),
            _ => Err(Error::Config(format!(
                "invalid task: {}. Use: align, distance, tree, msa",
                s
            ))),
        }
    }
}

/// Output format resolved for the chosen task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Alignment(AlignmentFormat),
    Matrix(MatrixFormat),
    Tree(TreeFormat),
}

impl OutputFormat {
    fn for_task(task: Task, format: Option<&str>) -> Result<Self> {
        Ok(match task {
            Task::Align | Task::Msa => {
                OutputFormat::Alignment(format.unwrap_or("text").parse()?)
            }
            Task::Distance => OutputFormat::Matrix(format.unwrap_or("tsv").parse()?),
            Task::Tree => OutputFormat::Tree(format.unwrap_or("bracket").parse()?),
        })
    }
}

#[derive(Debug)]
pub struct ValidationResult {
    pub task: Task,
    pub mode: AlignmentMode,
    pub alignment_config: AlignmentConfig,
    pub output_format: OutputFormat,
    pub input_format: Option<InputFormat>,
    pub sequence_type: Option<SequenceType>,
    pub include_regex: Option<Regex>,
    pub exclude_regex: Option<Regex>,
    pub include_set: Option<HashSet<String>>,
    pub exclude_set: Option<HashSet<String>>,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult> {
    if args.input.is_none() && args.sequences.is_empty() {
        return Err(Error::Config(
            "no sequences given: use --input or pass sequences as arguments".to_string(),
        ));
    }
    if args.input.is_some() && !args.sequences.is_empty() {
        return Err(Error::Config(
            "--input cannot be combined with inline sequences".to_string(),
        ));
    }

    let task = Task::from_str(&args.task)?;
    let mode = AlignmentMode::from_str(&args.mode)?;
    let output_format = OutputFormat::for_task(task, args.format.as_deref())?;
    let input_format = args
        .input_format
        .as_deref()
        .map(InputFormat::from_str)
        .transpose()?;
    let sequence_type = args
        .sequence_type
        .as_deref()
        .map(SequenceType::from_str)
        .transpose()?;

    if task == Task::Align && args.input.is_none() && args.sequences.len() != 2 {
        return Err(Error::Config(format!(
            "the align task needs exactly 2 sequences, got {}",
            args.sequences.len()
        )));
    }

    // Preset first, then individual overrides
    let mut alignment_config = AlignmentConfig::from_mode(&args.alignment_mode)?;
    let customised = args.scoring.is_some()
        || args.match_score.is_some()
        || args.mismatch_score.is_some()
        || args.gap_penalty.is_some();
    if customised {
        alignment_config = AlignmentConfig::custom(
            args.scoring.as_deref().unwrap_or(&alignment_config.scoring),
            args.match_score.unwrap_or(alignment_config.match_score),
            args.mismatch_score.unwrap_or(alignment_config.mismatch_score),
            args.gap_penalty.unwrap_or(alignment_config.gap_penalty),
        );
    }
    let registry = ScoringRegistry::new();
    if !registry.has_model(&alignment_config.scoring) {
        return Err(Error::Config(format!(
            "invalid scoring model '{}'. Available: {}",
            alignment_config.scoring,
            registry.model_names().join(", ")
        )));
    }

    if args.threads == Some(0) {
        return Err(Error::Config("--threads must be at least 1".to_string()));
    }

    let include_regex = compile_regex(args.include.as_deref(), "include")?;
    let exclude_regex = compile_regex(args.exclude.as_deref(), "exclude")?;
    let include_set = args.include_list.as_deref().map(load_set_from_file).transpose()?;
    let exclude_set = args.exclude_list.as_deref().map(load_set_from_file).transpose()?;

    Ok(ValidationResult {
        task,
        mode,
        alignment_config,
        output_format,
        input_format,
        sequence_type,
        include_regex,
        exclude_regex,
        include_set,
        exclude_set,
    })
}

fn compile_regex(pattern: Option<&str>, name: &str) -> Result<Option<Regex>> {
    pattern
        .map(|p| Regex::new(p).map_err(|e| Error::Config(format!("invalid {} regex: {}", name, e))))
        .transpose()
}

/// Load a set of strings from a file (one per line)
fn load_set_from_file(file_path: &str) -> Result<HashSet<String>> {
    let file = File::open(file_path).map_err(|e| {
        Error::Config(format!("failed to open filter file '{}': {}", file_path, e))
    })?;

    let reader = BufReader::new(file);
    let mut set = HashSet::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            set.insert(trimmed.to_string());
        }
    }

    eprintln!("📋 Loaded {} items from filter file '{}'", set.len(), file_path);
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["phyloalign"], args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let result = validate_args(&parse(&["AGT", "ACT"])).unwrap();
        assert_eq!(result.task, Task::Tree);
        assert_eq!(result.mode, AlignmentMode::Global);
        assert_eq!(result.output_format, OutputFormat::Tree(TreeFormat::Bracket));
        assert_eq!(result.alignment_config, AlignmentConfig::from_mode("dna").unwrap());
    }

    #[test]
    fn test_requires_sequences() {
        assert!(matches!(validate_args(&parse(&[])), Err(Error::Config(_))));
    }

    #[test]
    fn test_align_needs_two_sequences() {
        let args = parse(&["--task", "align", "ACGT"]);
        assert!(validate_args(&args).is_err());
        let args = parse(&["--task", "align", "--mode", "local", "ACGT", "AGT"]);
        assert_eq!(validate_args(&args).unwrap().mode, AlignmentMode::Local);
    }

    #[test]
    fn test_custom_scores_override_preset() {
        let args = parse(&["--alignment-mode", "protein", "--gap-penalty", "-4", "HG", "PG"]);
        let config = validate_args(&args).unwrap().alignment_config;
        assert_eq!(config.scoring, "blosum62");
        assert_eq!(config.gap_penalty, -4);
    }

    #[test]
    fn test_rejects_bad_values() {
        for bad in [
            vec!["--task", "cluster", "A"],
            vec!["--mode", "semi", "A"],
            vec!["--scoring", "pam250", "A"],
            vec!["--include", "(", "A"],
            vec!["--task", "distance", "--format", "newick", "A"],
            vec!["--threads", "0", "A"],
        ] {
            assert!(validate_args(&parse(&bad)).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn test_label_list_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha\n\n beta \n").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let args = parse(&["--include-list", &path, "A"]);
        let set = validate_args(&args).unwrap().include_set.unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("beta"));
    }
}
