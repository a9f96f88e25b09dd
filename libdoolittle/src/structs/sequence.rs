use std::fmt::{Debug, Display, Formatter};
use std::path::Path;

use crate::align::PairStep;
use crate::alphabet::{
    digital_amino, AMINO_INVERSE_MAP, DIGITAL_GAP, PAD_BYTE, UTF8_GAP, UTF8_GREATER_THAN,
    UTF8_SEMICOLON, UTF8_SPACE, UTF8_STAR,
};
use anyhow::{Context, Result};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("unknown UTF8 sequence byte: {byte}")]
pub struct UnknownUtf8SequenceByteError {
    pub byte: u8,
}

#[derive(Error, Debug)]
#[error("unknown digital sequence byte: {byte}")]
pub struct UnknownDigitalSequenceByteError {
    pub byte: u8,
}

#[derive(Error, Debug)]
#[error("line {line}: {reason}")]
pub struct FastaFormatError {
    /// The 1-based line number of the offending line
    pub line: usize,
    pub reason: String,
}

/// Which of the two sequences in a pairwise trace a sequence is projected through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceSide {
    First,
    Second,
}

/// This holds the both the "digital" data and string data of a protein sequence.
///
/// Both byte vectors are padded with one leading byte so that
/// residue `i` of the sequence is found at index `i`.
#[derive(Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The name of the sequence
    pub name: String,
    /// The sequence details. If the sequence comes from a fasta, this
    /// is the information following the sequence name in the header
    pub details: Option<String>,
    /// The length of the sequence
    pub length: usize,
    /// The "digital" data of the sequence. These are
    /// the string bytes, but mapped to [0u8..23u8]
    pub digital_bytes: Vec<u8>,
    /// The string data of the sequence. These are the UTF8 bytes
    /// that make up the sequence in the "normal" alphabet
    pub utf8_bytes: Vec<u8>,
}

impl Sequence {
    pub fn from_utf8(bytes: &[u8]) -> Result<Self> {
        let mut utf8_bytes: Vec<u8> = vec![PAD_BYTE; bytes.len() + 1];
        let mut digital_bytes: Vec<u8> = vec![PAD_BYTE; bytes.len() + 1];

        for (idx, utf8_byte) in bytes.iter().enumerate() {
            let digital_byte = match digital_amino(*utf8_byte) {
                Some(b) => b,
                None => return Err(UnknownUtf8SequenceByteError { byte: *utf8_byte }.into()),
            };
            digital_bytes[idx + 1] = digital_byte;
            // all gaps are stored with the canonical gap symbol
            utf8_bytes[idx + 1] = if digital_byte == DIGITAL_GAP {
                UTF8_GAP
            } else {
                *utf8_byte
            };
        }

        Ok(Sequence {
            name: "".to_string(),
            details: None,
            length: bytes.len(),
            digital_bytes,
            utf8_bytes,
        })
    }

    pub fn from_digital(bytes: &[u8]) -> Result<Self> {
        let mut digital_bytes: Vec<u8> = vec![PAD_BYTE; bytes.len() + 1];
        digital_bytes[1..].copy_from_slice(bytes);
        let mut utf8_bytes: Vec<u8> = vec![PAD_BYTE; digital_bytes.len()];

        for (idx, digital_byte) in digital_bytes[1..].iter().enumerate() {
            let utf8_byte = match AMINO_INVERSE_MAP.get(digital_byte) {
                Some(b) if *digital_byte != PAD_BYTE => *b,
                _ => {
                    return Err(UnknownDigitalSequenceByteError {
                        byte: *digital_byte,
                    }
                    .into())
                }
            };
            utf8_bytes[idx + 1] = utf8_byte;
        }

        Ok(Sequence {
            name: "".to_string(),
            details: None,
            length: bytes.len(),
            digital_bytes,
            utf8_bytes,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The UTF8 residues without the leading padding byte.
    pub fn residues(&self) -> &[u8] {
        &self.utf8_bytes[1..]
    }

    /// The residues as a string slice.
    pub fn as_str(&self) -> &str {
        // every byte was validated against the (ASCII) alphabet
        std::str::from_utf8(self.residues()).unwrap_or_default()
    }

    pub fn gap_count(&self) -> usize {
        self.digital_bytes[1..]
            .iter()
            .filter(|&&b| b == DIGITAL_GAP)
            .count()
    }

    /// Produces a copy of this sequence with a gap inserted for every
    /// step of `trace` that doesn't advance the given side.
    ///
    /// The sequence must have exactly as many positions as the side of the trace consumes.
    pub fn project(&self, trace: &[PairStep], side: TraceSide) -> Sequence {
        let mut utf8_bytes = Vec::with_capacity(trace.len() + 1);
        let mut digital_bytes = Vec::with_capacity(trace.len() + 1);
        utf8_bytes.push(PAD_BYTE);
        digital_bytes.push(PAD_BYTE);

        let mut idx = 0;
        for step in trace {
            let advances = match side {
                TraceSide::First => step.advances_first(),
                TraceSide::Second => step.advances_second(),
            };

            if advances {
                idx += 1;
                utf8_bytes.push(self.utf8_bytes[idx]);
                digital_bytes.push(self.digital_bytes[idx]);
            } else {
                utf8_bytes.push(UTF8_GAP);
                digital_bytes.push(DIGITAL_GAP);
            }
        }
        debug_assert_eq!(idx, self.length);

        Sequence {
            name: self.name.clone(),
            details: self.details.clone(),
            length: trace.len(),
            digital_bytes,
            utf8_bytes,
        }
    }

    pub fn amino_from_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Self>> {
        let path = path.as_ref();
        debug!("Parsing fasta file {path:?}");

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fasta file: {}", path.to_string_lossy()))?;

        Self::amino_from_fasta_str(&text)
    }

    /// Parses FASTA-like text: `;` comment lines, `>name details` headers and
    /// body lines that may be terminated with a `*`.
    pub fn amino_from_fasta_str(text: &str) -> Result<Vec<Self>> {
        struct Record {
            header_line: usize,
            name: String,
            details: Option<String>,
            body: Vec<u8>,
            terminated: bool,
        }

        fn finish(record: Record) -> Result<Sequence> {
            if record.body.is_empty() {
                return Err(FastaFormatError {
                    line: record.header_line,
                    reason: format!("record '{}' has no sequence", record.name),
                }
                .into());
            }

            let mut seq = match Sequence::from_utf8(&record.body) {
                Ok(seq) => seq,
                Err(err) => {
                    let byte = err
                        .downcast_ref::<UnknownUtf8SequenceByteError>()
                        .map(|e| e.byte)
                        .unwrap_or(0);
                    return Err(FastaFormatError {
                        line: record.header_line,
                        reason: format!(
                            "record '{}' contains an invalid residue: '{}'",
                            record.name,
                            char::from(byte)
                        ),
                    }
                    .into());
                }
            };
            seq.name = record.name;
            seq.details = record.details;
            Ok(seq)
        }

        let mut seqs: Vec<Self> = vec![];
        let mut current: Option<Record> = None;

        for (line_idx, raw_line) in text.lines().enumerate() {
            let line_number = line_idx + 1;
            let line = raw_line.trim();
            let bytes = line.as_bytes();

            match bytes.first() {
                None => continue,
                Some(&UTF8_SEMICOLON) => continue,
                Some(&UTF8_GREATER_THAN) => {
                    if let Some(record) = current.take() {
                        seqs.push(finish(record)?);
                    }

                    let header = line[1..].trim();
                    let (name, details) = match header.find(char::from(UTF8_SPACE)) {
                        Some(idx) => (
                            header[..idx].to_string(),
                            Some(header[(idx + 1)..].trim().to_string()),
                        ),
                        None => (header.to_string(), None),
                    };

                    current = Some(Record {
                        header_line: line_number,
                        name,
                        details,
                        body: vec![],
                        terminated: false,
                    });
                }
                Some(_) => {
                    let record = match current.as_mut() {
                        Some(record) => record,
                        None => {
                            return Err(FastaFormatError {
                                line: line_number,
                                reason: "sequence data found before any header".to_string(),
                            }
                            .into())
                        }
                    };

                    if record.terminated {
                        return Err(FastaFormatError {
                            line: line_number,
                            reason: format!(
                                "sequence data found after the terminator of record '{}'",
                                record.name
                            ),
                        }
                        .into());
                    }

                    let body = match bytes.last() {
                        Some(&UTF8_STAR) => {
                            record.terminated = true;
                            &bytes[..bytes.len() - 1]
                        }
                        _ => bytes,
                    };

                    if let Some(&byte) = body.iter().find(|&&b| digital_amino(b).is_none()) {
                        return Err(FastaFormatError {
                            line: line_number,
                            reason: format!(
                                "record '{}' contains an invalid residue: '{}'",
                                record.name,
                                char::from(byte)
                            ),
                        }
                        .into());
                    }

                    record.body.extend_from_slice(body);
                }
            }
        }

        if let Some(record) = current.take() {
            seqs.push(finish(record)?);
        }

        Ok(seqs)
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, ">{}", self.name)?;

        if let Some(ref details) = self.details {
            write!(f, " {details}")?
        };

        writeln!(f)?;

        let mut iter = self.residues().chunks(80).peekable();

        while let Some(byte_chunk) = iter.next() {
            match std::str::from_utf8(byte_chunk) {
                Ok(seq_line) => {
                    write!(f, "{}", seq_line)?;
                    if iter.peek().is_some() {
                        // if we're not on the last
                        // line, add a linebreak
                        writeln!(f)?;
                    }
                }
                Err(_) => return Err(std::fmt::Error),
            }
        }
        Ok(())
    }
}

impl Debug for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
