use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use libdoolittle::align::structs::BacktraceMode;
use libdoolittle::align::{AffineGap, Regime, ScoreMatrix};
use libdoolittle::cluster::Linkage;
use libdoolittle::output::ReportFormat;
use log::LevelFilter;
use strum::{Display, EnumIter, EnumString};

#[derive(Subcommand)]
pub enum SubCommands {
    #[command(about = "Globally align two sequences with a linear gap cost (Needleman-Wunsch)")]
    Nw(PairwiseArgs),
    #[command(about = "Globally align two sequences with an affine gap cost (Gotoh)")]
    Gotoh(GotohArgs),
    #[command(about = "Exactly align three sequences under the sum-of-pairs score")]
    Triple(TripleArgs),
    #[command(about = "Progressively align the sequences of a fasta file along a guide tree")]
    Msa(MsaArgs),
    #[command(about = "Build the UPGMA/WPGMA guide tree of the sequences of a fasta file")]
    Tree(TreeArgs),
    #[command(about = "Compute the sum-of-pairs score of an aligned fasta file")]
    Score(ScoreArgs),
}

#[derive(Parser)]
#[command(name = "doolittle")]
#[command(
    about = "Dynamic programming pairwise, three-way and progressive protein sequence alignment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,

    /// Arguments that are common across all doolittle subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// The log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long = "log-level", default_value = "warn", global = true)]
    pub log_level: LevelFilter,

    /// Write the report as JSON instead of text
    #[arg(long = "json", default_value_t = false, global = true)]
    pub json: bool,
}

impl CommonArgs {
    pub fn format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MatrixArg {
    #[default]
    Pam250,
    Blosum62,
}

impl From<MatrixArg> for Regime {
    fn from(value: MatrixArg) -> Self {
        match value {
            MatrixArg::Pam250 => Regime::Pam250,
            MatrixArg::Blosum62 => Regime::Blosum62,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LinkageArg {
    #[default]
    Upgma,
    Wpgma,
}

impl From<LinkageArg> for Linkage {
    fn from(value: LinkageArg) -> Self {
        match value {
            LinkageArg::Upgma => Linkage::Unweighted,
            LinkageArg::Wpgma => Linkage::Weighted,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScoringArgs {
    /// The substitution matrix (pam250 or blosum62)
    #[arg(short = 'm', long = "matrix", default_value_t = MatrixArg::Pam250, value_name = "NAME")]
    pub matrix: MatrixArg,

    /// The score of aligning a residue against a gap
    #[arg(
        short = 'g',
        long = "gap",
        default_value_t = -4.0,
        allow_negative_numbers = true,
        value_name = "F"
    )]
    pub gap: f64,
}

impl ScoringArgs {
    pub fn scoring(&self) -> ScoreMatrix {
        ScoreMatrix::new(self.matrix.into(), self.gap)
    }
}

#[derive(Args, Debug, Clone)]
pub struct BacktraceArgs {
    /// Report a single optimal alignment chosen at random among ties
    /// instead of every optimal alignment
    #[arg(short = 'r', long = "random", default_value_t = false)]
    pub random: bool,

    /// The seed for random tie breaking
    #[arg(short = 's', long = "seed", default_value_t = 0u64, value_name = "N")]
    pub seed: u64,
}

impl BacktraceArgs {
    pub fn mode(&self) -> BacktraceMode {
        if self.random {
            BacktraceMode::Random { seed: self.seed }
        } else {
            BacktraceMode::Exhaustive
        }
    }
}

#[derive(Debug, Args)]
pub struct PairwiseArgs {
    /// The first sequence
    #[arg(value_name = "SEQ1")]
    pub seq_1: String,

    /// The second sequence
    #[arg(value_name = "SEQ2")]
    pub seq_2: String,

    /// Print the filled DP matrix
    #[arg(long = "dump-matrix", default_value_t = false)]
    pub dump_matrix: bool,

    /// Arguments that control scoring
    #[command(flatten)]
    pub scoring_args: ScoringArgs,

    /// Arguments that control backtracking
    #[command(flatten)]
    pub backtrace_args: BacktraceArgs,
}

#[derive(Debug, Args)]
pub struct GotohArgs {
    /// The first sequence
    #[arg(value_name = "SEQ1")]
    pub seq_1: String,

    /// The second sequence
    #[arg(value_name = "SEQ2")]
    pub seq_2: String,

    /// The substitution matrix (pam250 or blosum62)
    #[arg(short = 'm', long = "matrix", default_value_t = MatrixArg::Pam250, value_name = "NAME")]
    pub matrix: MatrixArg,

    /// The score charged once for opening a gap run
    #[arg(
        short = 'o',
        long = "gap-open",
        default_value_t = -4.0,
        allow_negative_numbers = true,
        value_name = "F"
    )]
    pub gap_open: f64,

    /// The score charged for every position of a gap run
    #[arg(
        short = 'e',
        long = "gap-extend",
        default_value_t = -1.0,
        allow_negative_numbers = true,
        value_name = "F"
    )]
    pub gap_extend: f64,

    /// Arguments that control backtracking
    #[command(flatten)]
    pub backtrace_args: BacktraceArgs,
}

impl GotohArgs {
    pub fn scoring(&self) -> ScoreMatrix {
        // the linear gap score isn't used by the affine recurrence
        ScoreMatrix::new(self.matrix.into(), self.gap_open + self.gap_extend)
    }

    pub fn gap(&self) -> AffineGap {
        AffineGap::new(self.gap_open, self.gap_extend)
    }
}

#[derive(Debug, Args)]
pub struct TripleArgs {
    /// The first sequence
    #[arg(value_name = "SEQ1")]
    pub seq_1: String,

    /// The second sequence
    #[arg(value_name = "SEQ2")]
    pub seq_2: String,

    /// The third sequence
    #[arg(value_name = "SEQ3")]
    pub seq_3: String,

    /// Arguments that control scoring
    #[command(flatten)]
    pub scoring_args: ScoringArgs,

    /// Arguments that control backtracking
    #[command(flatten)]
    pub backtrace_args: BacktraceArgs,
}

#[derive(Debug, Args)]
pub struct MsaArgs {
    /// The sequences to align
    #[arg(value_name = "SEQUENCES.fasta")]
    pub fasta_path: PathBuf,

    /// The guide tree linkage (upgma or wpgma)
    #[arg(long = "linkage", default_value_t = LinkageArg::Upgma, value_name = "NAME")]
    pub linkage: LinkageArg,

    /// The seed for random tie breaking in the pairwise alignments
    #[arg(short = 's', long = "seed", default_value_t = 0u64, value_name = "N")]
    pub seed: u64,

    /// Arguments that control scoring
    #[command(flatten)]
    pub scoring_args: ScoringArgs,
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// The sequences to cluster
    #[arg(value_name = "SEQUENCES.fasta")]
    pub fasta_path: PathBuf,

    /// The guide tree linkage (upgma or wpgma)
    #[arg(long = "linkage", default_value_t = LinkageArg::Upgma, value_name = "NAME")]
    pub linkage: LinkageArg,

    /// Arguments that control scoring
    #[command(flatten)]
    pub scoring_args: ScoringArgs,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// The aligned sequences to score
    #[arg(value_name = "ALIGNMENT.fasta")]
    pub fasta_path: PathBuf,

    /// Arguments that control scoring
    #[command(flatten)]
    pub scoring_args: ScoringArgs,
}
