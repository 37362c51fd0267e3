// mod.rs - Output formatters module

use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde_json::json;

use crate::core::{ClusterTree, DistanceMatrix, MultipleAlignment, PairwiseAlignment};
use crate::error::{Error, Result};

/// Distance matrix layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Tsv,
    Csv,
    Phylip,
    Nexus,
}

impl FromStr for MatrixFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(MatrixFormat::Tsv),
            "csv" => Ok(MatrixFormat::Csv),
            "phylip" => Ok(MatrixFormat::Phylip),
            "nexus" => Ok(MatrixFormat::Nexus),
            _ => Err(Error::invalid(format!(
                "unsupported matrix format: {}. Use: tsv, csv, phylip, nexus",
                s
            ))),
        }
    }
}

/// Tree layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    /// `((A, B), C)`
    Bracket,
    Newick,
    Json,
}

impl FromStr for TreeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bracket" | "text" => Ok(TreeFormat::Bracket),
            "newick" | "nwk" => Ok(TreeFormat::Newick),
            "json" => Ok(TreeFormat::Json),
            _ => Err(Error::invalid(format!(
                "unsupported tree format: {}. Use: bracket, newick, json",
                s
            ))),
        }
    }
}

/// Alignment layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    Text,
    Json,
}

impl FromStr for AlignmentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(AlignmentFormat::Text),
            "json" => Ok(AlignmentFormat::Json),
            _ => Err(Error::invalid(format!(
                "unsupported alignment format: {}. Use: text, json",
                s
            ))),
        }
    }
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Buffered writer for `path`, or stdout for `None` / `-`
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if p != Path::new("-") => {
            ensure_parent_dir(p)?;
            Ok(Box::new(BufWriter::new(File::create(p)?)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn generated() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn distance_cell(value: Option<f64>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), |d| d.to_string())
}

/// Square matrix with a label header row, `#` comment header
pub fn write_delimited<W: Write>(
    writer: &mut W,
    matrix: &DistanceMatrix,
    command_line: &str,
    delimiter: char,
) -> Result<()> {
    writeln!(writer, "# Command: {}", command_line)?;
    writeln!(writer, "# Generated: {}", generated())?;
    writeln!(writer, "# phyloalign v{}", env!("CARGO_PKG_VERSION"))?;

    let rows = matrix.to_rows();
    write!(writer, "Label")?;
    for (label, _) in &rows {
        write!(writer, "{}{}", delimiter, label)?;
    }
    writeln!(writer)?;

    for (label, row) in &rows {
        write!(writer, "{}", label)?;
        for &value in row {
            write!(writer, "{}{}", delimiter, distance_cell(value, "NA"))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Lower-triangle PHYLIP; command info trails the matrix
pub fn write_phylip<W: Write>(
    writer: &mut W,
    matrix: &DistanceMatrix,
    command_line: &str,
) -> Result<()> {
    let rows = matrix.to_rows();
    writeln!(writer, "    {}", rows.len())?;
    for (i, (label, row)) in rows.iter().enumerate() {
        write!(writer, "{:<10}", label)?;
        for &value in &row[..=i] {
            write!(writer, "  {}", distance_cell(value, "NA"))?;
        }
        writeln!(writer)?;
    }

    writeln!(writer)?;
    writeln!(writer, "# Command: {}", command_line)?;
    writeln!(writer, "# Generated: {}", generated())?;
    writeln!(writer, "# phyloalign v{}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

/// NEXUS DISTANCES block, lower triangle
pub fn write_nexus<W: Write>(
    writer: &mut W,
    matrix: &DistanceMatrix,
    command_line: &str,
) -> Result<()> {
    let rows = matrix.to_rows();
    writeln!(writer, "#NEXUS")?;
    writeln!(writer, "[Command: {}]", command_line)?;
    writeln!(writer, "[Generated: {}]", generated())?;
    writeln!(writer, "[phyloalign v{}]", env!("CARGO_PKG_VERSION"))?;
    writeln!(writer, "BEGIN DISTANCES;")?;
    writeln!(writer, "    DIMENSIONS NTAX={};", rows.len())?;
    writeln!(writer, "    FORMAT LABELS LOWER DIAGONAL;")?;
    writeln!(writer, "    MATRIX")?;
    for (i, (label, row)) in rows.iter().enumerate() {
        write!(writer, "        {}", label)?;
        for &value in &row[..i] {
            write!(writer, " {}", distance_cell(value, "?"))?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "    ;")?;
    writeln!(writer, "END;")?;
    Ok(())
}

/// Write a distance matrix in `format`
pub fn write_matrix<W: Write>(
    writer: &mut W,
    format: MatrixFormat,
    matrix: &DistanceMatrix,
    command_line: &str,
) -> Result<()> {
    match format {
        MatrixFormat::Tsv => write_delimited(writer, matrix, command_line, '\t'),
        MatrixFormat::Csv => write_delimited(writer, matrix, command_line, ','),
        MatrixFormat::Phylip => write_phylip(writer, matrix, command_line),
        MatrixFormat::Nexus => write_nexus(writer, matrix, command_line),
    }
}

pub fn write_tree<W: Write>(writer: &mut W, format: TreeFormat, tree: &ClusterTree) -> Result<()> {
    match format {
        TreeFormat::Bracket => writeln!(writer, "{}", tree)?,
        TreeFormat::Newick => writeln!(writer, "{}", tree.to_newick())?,
        TreeFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, &tree.to_json())?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Pairwise result: score line then one block per optimal alignment
pub fn write_pairwise<W: Write>(
    writer: &mut W,
    format: AlignmentFormat,
    result: &PairwiseAlignment,
) -> Result<()> {
    match format {
        AlignmentFormat::Text => {
            writeln!(writer, "# Mode: {}", result.mode.description())?;
            writeln!(writer, "Score: {}", result.score)?;
            if result.alignments.is_empty() {
                writeln!(writer, "No alignment scores above zero")?;
            }
            for (n, pair) in result.alignments.iter().enumerate() {
                let stats = pair.stats();
                writeln!(writer)?;
                writeln!(
                    writer,
                    "# Alignment {} (cells {},{} -> {},{}; identity {:.1}%)",
                    n + 1,
                    pair.end.row,
                    pair.end.col,
                    pair.start.row,
                    pair.start.col,
                    stats.identity_percent
                )?;
                writeln!(writer, "{}", pair)?;
            }
        }
        AlignmentFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, result)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

pub fn write_multiple<W: Write>(
    writer: &mut W,
    format: AlignmentFormat,
    alignment: &MultipleAlignment,
) -> Result<()> {
    match format {
        AlignmentFormat::Text => writeln!(writer, "{}", alignment)?,
        AlignmentFormat::Json => {
            let rows: Vec<_> = alignment
                .labels()
                .iter()
                .zip(alignment.rows())
                .map(|(label, row)| json!({ "label": label, "aligned": row }))
                .collect();
            let value = json!({
                "width": alignment.width(),
                "rows": rows,
                "consensus": alignment.consensus_string(),
            });
            serde_json::to_writer_pretty(&mut *writer, &value)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{align_progressive, build_tree, pairwise_alignment, AlignmentMode};
    use crate::data::Sequence;
    use crate::scoring::MatchMismatch;

    fn sample_matrix() -> DistanceMatrix {
        DistanceMatrix::from_pairs(&[("AG", "CT", 3.0), ("AG", "GTA", 4.0), ("CT", "GTA", 2.5)])
            .unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PHYLIP".parse::<MatrixFormat>().unwrap(), MatrixFormat::Phylip);
        assert_eq!("nwk".parse::<TreeFormat>().unwrap(), TreeFormat::Newick);
        assert!("xml".parse::<AlignmentFormat>().is_err());
    }

    #[test]
    fn test_tsv_matrix() {
        let out = render(|w| write_matrix(w, MatrixFormat::Tsv, &sample_matrix(), "test"));
        let body: Vec<&str> = out.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(
            body,
            vec!["Label\tAG\tCT\tGTA", "AG\t0\t3\t4", "CT\t3\t0\t2.5", "GTA\t4\t2.5\t0"]
        );
        assert!(out.starts_with("# Command: test\n"));
    }

    #[test]
    fn test_phylip_lower_triangle() {
        let out = render(|w| write_matrix(w, MatrixFormat::Phylip, &sample_matrix(), "test"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "    3");
        assert_eq!(lines[1], "AG          0");
        assert_eq!(lines[3], "GTA         4  2.5  0");
    }

    #[test]
    fn test_nexus_block() {
        let out = render(|w| write_matrix(w, MatrixFormat::Nexus, &sample_matrix(), "test"));
        assert!(out.starts_with("#NEXUS\n"));
        assert!(out.contains("DIMENSIONS NTAX=3;"));
        assert!(out.contains("        GTA 4 2.5\n"));
        assert!(out.ends_with("END;\n"));
    }

    #[test]
    fn test_tree_formats() {
        let tree = build_tree(sample_matrix()).unwrap();
        assert_eq!(
            render(|w| write_tree(w, TreeFormat::Bracket, &tree)),
            "(AG, (CT, GTA))\n"
        );
        let newick = render(|w| write_tree(w, TreeFormat::Newick, &tree));
        assert!(newick.starts_with("(AG:"));
        let json: serde_json::Value =
            serde_json::from_str(&render(|w| write_tree(w, TreeFormat::Json, &tree))).unwrap();
        assert_eq!(json["children"][0]["label"], "AG");
    }

    #[test]
    fn test_pairwise_text() {
        let result = pairwise_alignment(
            b"ACT",
            b"ACGT",
            &MatchMismatch::new(1, -1, -1),
            AlignmentMode::Global,
        )
        .unwrap();
        let out = render(|w| write_pairwise(w, AlignmentFormat::Text, &result));
        assert!(out.contains("Score: 2\n"));
        assert!(out.contains("AC-T\n|| |\nACGT\n"));
    }

    #[test]
    fn test_local_without_alignment_text() {
        let result = pairwise_alignment(
            b"AAA",
            b"TTT",
            &MatchMismatch::new(2, -1, -2),
            AlignmentMode::Local,
        )
        .unwrap();
        let out = render(|w| write_pairwise(w, AlignmentFormat::Text, &result));
        assert!(out.contains("Score: 0\nNo alignment scores above zero\n"));
    }

    #[test]
    fn test_multiple_json() {
        let sequences = vec![Sequence::from_residues("ACT"), Sequence::from_residues("ACGT")];
        let msa = align_progressive(&sequences, &MatchMismatch::new(1, -1, -1)).unwrap();
        let out = render(|w| write_multiple(w, AlignmentFormat::Json, &msa));
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["rows"][0]["aligned"], "AC-T");
        assert_eq!(json["consensus"], "AC-T");
        assert_eq!(json["width"], 4);
    }
}
