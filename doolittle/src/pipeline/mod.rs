mod msa;
pub use msa::{run_msa, run_tree};

mod pairwise;
pub use pairwise::{run_gotoh, run_nw};

mod score;
pub use score::run_score;

mod triple;
pub use triple::run_triple;

use std::path::Path;

use anyhow::Context;
use libdoolittle::structs::Sequence;
use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("no sequences found in: {path}")]
pub struct NoSequencesError {
    pub path: String,
}

/// Validates a sequence given on the command line.
pub fn parse_sequence(text: &str, name: &str) -> anyhow::Result<Sequence> {
    Ok(Sequence::from_utf8(text.trim().as_bytes())
        .with_context(|| format!("invalid sequence {name}: {text}"))?
        .named(name))
}

/// Reads every record of a fasta file.
pub fn read_fasta(path: &Path) -> anyhow::Result<Vec<Sequence>> {
    let seqs = Sequence::amino_from_fasta(path)
        .with_context(|| format!("failed to parse fasta file: {}", path.to_string_lossy()))?;

    if seqs.is_empty() {
        return Err(NoSequencesError {
            path: path.to_string_lossy().to_string(),
        }
        .into());
    }

    info!("read {} sequences from {}", seqs.len(), path.to_string_lossy());
    Ok(seqs)
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::path::PathBuf;

    /// Writes `text` to a uniquely named file in the temp directory.
    pub fn write_temp_fasta(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "doolittle-{}-{name}.fasta",
            std::process::id()
        ));
        std::fs::write(&path, text).unwrap();
        path
    }
}
