use crate::args::TripleArgs;
use crate::pipeline::parse_sequence;

use libdoolittle::align::structs::Backtracer;
use libdoolittle::align::{triple_align_all, Scoring};
use libdoolittle::output::{Report, ReportFormat};

pub fn run_triple(args: &TripleArgs, format: ReportFormat) -> anyhow::Result<String> {
    let seqs = [
        parse_sequence(&args.seq_1, "seq1")?,
        parse_sequence(&args.seq_2, "seq2")?,
        parse_sequence(&args.seq_3, "seq3")?,
    ];
    let scoring = args.scoring_args.scoring();

    let mut backtracer = Backtracer::new(args.backtrace_args.mode());
    let alignments = triple_align_all(&seqs, &scoring, &mut backtracer)?;

    let mut report = Report::new(format!(
        "three-way sum-of-pairs ({}, gap {})",
        scoring.regime,
        scoring.gap()
    ))
    .with_ties(backtracer.ties());

    if let Some(score) = alignments.first().and_then(|a| a.score) {
        report = report.with_score(score);
    }

    report.with_alignments(alignments).render(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{BacktraceArgs, MatrixArg, ScoringArgs};
    use assert2::{check, let_assert};
    use libdoolittle::align::EmptySequenceError;

    fn triple_args(seqs: [&str; 3]) -> TripleArgs {
        TripleArgs {
            seq_1: seqs[0].to_string(),
            seq_2: seqs[1].to_string(),
            seq_3: seqs[2].to_string(),
            scoring_args: ScoringArgs {
                matrix: MatrixArg::Pam250,
                gap: -4.0,
            },
            backtrace_args: BacktraceArgs {
                random: false,
                seed: 0,
            },
        }
    }

    #[test]
    fn test_triple_report() -> anyhow::Result<()> {
        let report = run_triple(&triple_args(["AAA", "AAA", "AAA"]), ReportFormat::Text)?;
        check!(report.starts_with("== three-way sum-of-pairs (PAM250, gap -4)\n"));
        check!(report.contains("maximal score: 18\n"));
        check!(report.contains("number of alignments: 1\n"));
        check!(report.contains("seq3 AAA\n"));
        Ok(())
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        let_assert!(Err(err) = run_triple(&triple_args(["AC", "", "A"]), ReportFormat::Text));
        let_assert!(Some(err) = err.downcast_ref::<EmptySequenceError>());
        check!(err.index == 1);
    }
}
