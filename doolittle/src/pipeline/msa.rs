use crate::args::{MsaArgs, TreeArgs};
use crate::pipeline::read_fasta;

use libdoolittle::align::{feng_doolittle, Scoring};
use libdoolittle::cluster::{build_guide_tree, Linkage};
use libdoolittle::output::{Report, ReportFormat};
use log::info;

pub fn run_msa(args: &MsaArgs, format: ReportFormat) -> anyhow::Result<String> {
    let seqs = read_fasta(&args.fasta_path)?;
    let scoring = args.scoring_args.scoring();
    let linkage = Linkage::from(args.linkage);

    let result = feng_doolittle(&seqs, &scoring, linkage, args.seed)?;
    info!("guide tree: {}", result.tree);

    let mut report = Report::new(format!(
        "progressive alignment ({linkage}, {}, gap {})",
        scoring.regime,
        scoring.gap()
    ))
    .with_guide_tree(&result.tree);

    if let Some(score) = result.alignment.score {
        report = report.with_score(score);
    }

    report.with_alignments(vec![result.alignment]).render(format)
}

pub fn run_tree(args: &TreeArgs, format: ReportFormat) -> anyhow::Result<String> {
    let seqs = read_fasta(&args.fasta_path)?;
    let scoring = args.scoring_args.scoring();
    let linkage = Linkage::from(args.linkage);

    let tree = build_guide_tree(&seqs, &scoring, linkage)?;
    for (index, seq) in seqs.iter().enumerate() {
        info!("leaf {index}: {}", seq.name);
    }

    Report::new(format!(
        "guide tree ({linkage}, {}, gap {})",
        scoring.regime,
        scoring.gap()
    ))
    .with_guide_tree(&tree)
    .render(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{LinkageArg, MatrixArg, ScoringArgs};
    use crate::pipeline::test_util::write_temp_fasta;
    use assert2::{check, let_assert};
    use libdoolittle::structs::alignment::TooFewSequencesError;

    const FASTA: &str = ">a\nWWCCHHKK\n>b\nWWCCHHKK\n>c\nWWKK\n";

    fn scoring_args() -> ScoringArgs {
        ScoringArgs {
            matrix: MatrixArg::Pam250,
            gap: -4.0,
        }
    }

    #[test]
    fn test_msa_report() -> anyhow::Result<()> {
        let args = MsaArgs {
            fasta_path: write_temp_fasta("msa", FASTA),
            linkage: LinkageArg::Upgma,
            seed: 0,
            scoring_args: scoring_args(),
        };

        let report = run_msa(&args, ReportFormat::Text)?;
        check!(report.starts_with("== progressive alignment (UPGMA, PAM250, gap -4)\n"));
        check!(report.contains("guide tree: ((0,1),2)\n"));
        check!(report.contains("number of alignments: 1\n"));
        check!(report.contains("a WWCCHHKK\n"));
        Ok(())
    }

    #[test]
    fn test_tree_report() -> anyhow::Result<()> {
        let args = TreeArgs {
            fasta_path: write_temp_fasta("tree", FASTA),
            linkage: LinkageArg::Wpgma,
            scoring_args: scoring_args(),
        };

        let json: serde_json::Value =
            serde_json::from_str(&run_tree(&args, ReportFormat::Json)?)?;
        check!(json["guide_tree"] == "((0,1),2)");
        check!(json["score"].is_null());
        check!(json["alignments"].as_array().map(|a| a.len()) == Some(0));
        Ok(())
    }

    #[test]
    fn test_single_sequence_is_rejected() {
        let args = TreeArgs {
            fasta_path: write_temp_fasta("single", ">a\nWWKK\n"),
            linkage: LinkageArg::Upgma,
            scoring_args: scoring_args(),
        };

        let_assert!(Err(err) = run_tree(&args, ReportFormat::Text));
        check!(err.downcast_ref::<TooFewSequencesError>().is_some());
    }
}
