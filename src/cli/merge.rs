// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::error::Result;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.input_format.is_none() {
            self.input_format = config.input_format;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.format.is_none() {
            self.format = config.format;
        }

        // Core settings (only override defaults, not explicit CLI values)
        if let Some(task) = config.task.filter(|_| self.task == "tree") {
            self.task = task;
        }
        if let Some(mode) = config.mode.filter(|_| self.mode == "global") {
            self.mode = mode;
        }
        if self.sequence_type.is_none() {
            self.sequence_type = config.sequence_type;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }
        if !self.progress && config.progress.unwrap_or(false) {
            self.progress = true;
        }

        // Sequence filtering
        if self.include.is_none() {
            self.include = config.include;
        }
        if self.exclude.is_none() {
            self.exclude = config.exclude;
        }
        if self.include_list.is_none() {
            self.include_list = config.include_list;
        }
        if self.exclude_list.is_none() {
            self.exclude_list = config.exclude_list;
        }

        // Alignment settings (only override default "dna")
        if let Some(preset) = config.alignment_mode.filter(|_| self.alignment_mode == "dna") {
            self.alignment_mode = preset;
        }
        if self.scoring.is_none() {
            self.scoring = config.scoring;
        }
        if self.match_score.is_none() {
            self.match_score = config.match_score;
        }
        if self.mismatch_score.is_none() {
            self.mismatch_score = config.mismatch_score;
        }
        if self.gap_penalty.is_none() {
            self.gap_penalty = config.gap_penalty;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.show_matrix && config.show_matrix.unwrap_or(false) {
            self.show_matrix = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }
        if self.log_level.is_none() {
            self.log_level = config.log_level;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
