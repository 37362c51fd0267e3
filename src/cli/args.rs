// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// phyloalign - Pairwise alignment, distance matrices, UPGMA trees and progressive MSA
pub struct Args {
    /// sequences given inline (labelled by their own residues)
    #[argh(positional)]
    pub sequences: Vec<String>,

    /// task: align, distance, tree, msa (default: tree)
    #[argh(option, default = "String::from(\"tree\")")]
    pub task: String,

    /// sequence file: one sequence per line, or label/sequence rows (.tsv, .csv)
    #[argh(option)]
    pub input: Option<String>,

    /// input format: text, tsv, csv (default: detect from extension)
    #[argh(option)]
    pub input_format: Option<String>,

    /// output file (default: stdout)
    #[argh(option)]
    pub output: Option<String>,

    /// output format; align/msa: text, json; distance: tsv, csv, phylip, nexus; tree: bracket, newick, json
    #[argh(option)]
    pub format: Option<String>,

    /// pairwise alignment mode: global, local (default: global)
    #[argh(option, default = "String::from(\"global\")")]
    pub mode: String,

    /// scoring preset: dna, dna-strict, protein, unit (default: dna)
    #[argh(option, default = "String::from(\"dna\")")]
    pub alignment_mode: String,

    /// scoring model: blosum62, nucleotide, match-mismatch (overrides preset)
    #[argh(option)]
    pub scoring: Option<String>,

    /// custom match score (overrides preset)
    #[argh(option)]
    pub match_score: Option<i32>,

    /// custom mismatch score (overrides preset)
    #[argh(option)]
    pub mismatch_score: Option<i32>,

    /// custom linear gap penalty, usually negative (overrides preset)
    #[argh(option)]
    pub gap_penalty: Option<i32>,

    /// check every sequence against an alphabet: dna, protein
    #[argh(option)]
    pub sequence_type: Option<String>,

    /// include only sequences whose label matches regex pattern
    #[argh(option)]
    pub include: Option<String>,

    /// exclude sequences whose label matches regex pattern
    #[argh(option)]
    pub exclude: Option<String>,

    /// include only labels listed in a file (one label per line)
    #[argh(option)]
    pub include_list: Option<String>,

    /// exclude labels listed in a file (one label per line)
    #[argh(option)]
    pub exclude_list: Option<String>,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// show a progress bar while computing distances
    #[argh(switch)]
    pub progress: bool,

    /// print score and traceback matrices (align task)
    #[argh(switch)]
    pub show_matrix: bool,

    /// validate inputs without computation (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// log filter when RUST_LOG is unset, e.g. info, debug (default: warn)
    #[argh(option)]
    pub log_level: Option<String>,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
