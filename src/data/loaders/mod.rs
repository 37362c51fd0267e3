// mod.rs - Sequence file loaders

pub mod text;
pub mod tsv;

use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::data::sequence::SequenceSet;
use crate::error::{Error, Result};

/// On-disk layout of a sequence file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// One sequence per line, labelled by itself
    Text,
    /// `label<TAB>sequence` rows
    Tsv,
    /// `label,sequence` rows
    Csv,
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(InputFormat::Text),
            "tsv" => Ok(InputFormat::Tsv),
            "csv" => Ok(InputFormat::Csv),
            _ => Err(Error::invalid(format!(
                "invalid input format: {}. Use: text, tsv, csv",
                s
            ))),
        }
    }
}

impl InputFormat {
    /// Guess from the file extension, falling back to plain text
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("tab") => InputFormat::Tsv,
            Some("csv") => InputFormat::Csv,
            _ => InputFormat::Text,
        }
    }
}

/// Load sequences from `path`; `format` of `None` means detect from the extension
pub fn load_sequences(path: &Path, format: Option<InputFormat>) -> Result<SequenceSet> {
    let format = format.unwrap_or_else(|| InputFormat::detect(path));
    let set = match format {
        InputFormat::Text => text::load_text(path)?,
        InputFormat::Tsv => tsv::load_delimited(path, b'\t')?,
        InputFormat::Csv => tsv::load_delimited(path, b',')?,
    };
    info!(path = %path.display(), ?format, sequences = set.len(), "loaded sequences");
    Ok(set)
}
