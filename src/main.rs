// main.rs - CLI entry point

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use phyloalign::cli::{Config, OutputFormat, Task};
use phyloalign::data::{load_sequences, SequenceSet};
use phyloalign::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `--log-level`, otherwise warnings only
fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("warn")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_main() -> Result<()> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        eprintln!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    init_logging(args.log_level.as_deref());
    let validation = validate_args(&args)?;

    eprintln!("🚀 phyloalign v{}", VERSION);

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| Error::Config(format!("failed to configure thread pool: {}", e)))?;
        eprintln!("🧵 Threads: {}", n);
    } else {
        eprintln!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let total_start = Instant::now();
    let sequences = load_input(&args, &validation)?;
    eprintln!("🧬 Sequences: {}", sequences.len());

    let registry = ScoringRegistry::new();
    let scoring = registry.build(&validation.alignment_config)?;
    eprintln!(
        "🎯 Scoring: {} (gap {})",
        scoring.name(),
        scoring.gap_penalty()
    );

    if args.dry_run {
        eprintln!("✅ Dry run completed successfully");
        return Ok(());
    }

    let mut writer = open_output(args.output.as_deref().map(Path::new))?;
    let sequences = sequences.as_slice();

    match (validation.task, validation.output_format) {
        (Task::Align, OutputFormat::Alignment(format)) => {
            let [first, second] = sequences else {
                return Err(Error::Config(format!(
                    "the align task needs exactly 2 sequences, got {}",
                    sequences.len()
                )));
            };
            eprintln!("🔄 Aligning {} vs {} ({})", first.id, second.id, validation.mode.description());

            if args.show_matrix {
                let matrix = align(&first.sequence, &second.sequence, &*scoring, validation.mode)?;
                writeln!(writer, "# Score matrix")?;
                write!(writer, "{}", matrix.score_matrix())?;
                writeln!(writer, "# Traceback matrix")?;
                write!(writer, "{}", matrix.trace_matrix())?;
            }

            let result =
                pairwise_alignment(&first.sequence, &second.sequence, &*scoring, validation.mode)?;
            write_pairwise(&mut writer, format, &result)?;
        }
        (Task::Distance, OutputFormat::Matrix(format)) => {
            let matrix = DistanceMatrix::from_sequences_with_progress(sequences, args.progress)?;
            write_matrix(&mut writer, format, &matrix, &command_line)?;
        }
        (Task::Tree, OutputFormat::Tree(format)) => {
            let tree = build_tree_with_progress(sequences, args.progress)?;
            eprintln!("🌳 Tree height: {}", tree.height());
            write_tree(&mut writer, format, &tree)?;
        }
        (Task::Msa, OutputFormat::Alignment(format)) => {
            let alignment = align_progressive(sequences, &*scoring)?;
            eprintln!("📏 Alignment width: {}", alignment.width());
            write_multiple(&mut writer, format, &alignment)?;
        }
        (task, format) => {
            return Err(Error::Config(format!(
                "output format {:?} does not apply to task {:?}",
                format, task
            )));
        }
    }

    writer.flush()?;
    if let Some(path) = &args.output {
        eprintln!("✅ Output written to: {}", path);
    }
    eprintln!(
        "⏱️  Total execution time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Read sequences from `--input` or the positional arguments, then apply label filters
fn load_input(args: &Args, validation: &ValidationResult) -> Result<SequenceSet> {
    let mut set = match &args.input {
        Some(path) => load_sequences(Path::new(path), validation.input_format)?,
        None => SequenceSet::from_sequences(
            args.sequences
                .iter()
                .map(|s| Sequence::from_residues(s))
                .collect(),
        )?,
    };
    let loaded = set.len();

    set = set.filter_labels(
        validation.include_regex.as_ref(),
        validation.exclude_regex.as_ref(),
    );
    if let Some(keep) = &validation.include_set {
        set = set.retain_labels(keep);
    }
    if let Some(drop) = &validation.exclude_set {
        set = set.remove_labels(drop);
    }
    if set.len() != loaded {
        eprintln!("🔍 Label filters kept {} of {} sequences", set.len(), loaded);
    }
    debug!(kept = set.len(), loaded, "applied label filters");

    if set.is_empty() {
        return Err(Error::InvalidInput(
            "no sequences left after filtering".to_string(),
        ));
    }
    if let Some(sequence_type) = validation.sequence_type {
        set.validate(sequence_type)?;
    }
    Ok(set)
}
