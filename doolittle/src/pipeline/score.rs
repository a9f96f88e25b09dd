use crate::args::ScoreArgs;
use crate::pipeline::read_fasta;

use libdoolittle::align::{sum_of_pairs, Scoring};
use libdoolittle::output::{Report, ReportFormat};
use libdoolittle::structs::Alignment;

pub fn run_score(args: &ScoreArgs, format: ReportFormat) -> anyhow::Result<String> {
    let seqs = read_fasta(&args.fasta_path)?;
    let scoring = args.scoring_args.scoring();

    let mut alignment = Alignment::from_sequences(&seqs)?;
    let score = sum_of_pairs(&alignment, &scoring)?;
    alignment = alignment.with_score(score);

    Report::new(format!(
        "sum-of-pairs ({}, gap {})",
        scoring.regime,
        scoring.gap()
    ))
    .with_score(score)
    .with_alignments(vec![alignment])
    .render(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{MatrixArg, ScoringArgs};
    use crate::pipeline::test_util::write_temp_fasta;
    use assert2::{check, let_assert};
    use libdoolittle::structs::alignment::RowLengthMismatchError;

    fn score_args(name: &str, fasta: &str) -> ScoreArgs {
        ScoreArgs {
            fasta_path: write_temp_fasta(name, fasta),
            scoring_args: ScoringArgs {
                matrix: MatrixArg::Pam250,
                gap: -4.0,
            },
        }
    }

    #[test]
    fn test_score_report() -> anyhow::Result<()> {
        // A/A scores 2 and C against a gap -4
        let report = run_score(&score_args("score", ">a\nAC\n>b\nA-\n"), ReportFormat::Text)?;
        check!(report.starts_with("== sum-of-pairs (PAM250, gap -4)\n"));
        check!(report.contains("maximal score: -2\n"));
        check!(report.contains("b A_\n"));
        Ok(())
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let args = score_args("ragged", ">a\nACC\n>b\nA-\n");
        let_assert!(Err(err) = run_score(&args, ReportFormat::Text));
        check!(err.downcast_ref::<RowLengthMismatchError>().is_some());
    }
}
