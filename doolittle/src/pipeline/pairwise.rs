use crate::args::{GotohArgs, PairwiseArgs};
use crate::pipeline::parse_sequence;

use libdoolittle::align::structs::Backtracer;
use libdoolittle::align::{gotoh_align_all, nw_align_all, nw_fill, Scoring};
use libdoolittle::output::{Report, ReportFormat};
use log::warn;

pub fn run_nw(args: &PairwiseArgs, format: ReportFormat) -> anyhow::Result<String> {
    let seq_1 = parse_sequence(&args.seq_1, "seq1")?;
    let seq_2 = parse_sequence(&args.seq_2, "seq2")?;
    let scoring = args.scoring_args.scoring();

    let mut backtracer = Backtracer::new(args.backtrace_args.mode());
    let alignments = nw_align_all(&seq_1, &seq_2, &scoring, &mut backtracer)?;

    let mut report = Report::new(format!(
        "needleman-wunsch ({}, gap {})",
        scoring.regime,
        scoring.gap()
    ))
    .with_ties(backtracer.ties());

    if let Some(score) = alignments.first().and_then(|a| a.score) {
        report = report.with_score(score);
    }

    let mut out = String::new();
    if args.dump_matrix {
        match format {
            ReportFormat::Text => {
                let grid = nw_fill(&seq_1, &seq_2, &scoring)?;
                let mut dump: Vec<u8> = vec![];
                grid.dump_with_labels(&mut dump, seq_1.residues(), seq_2.residues())?;
                out.push_str(&String::from_utf8_lossy(&dump));
                out.push('\n');
            }
            ReportFormat::Json => warn!("the DP matrix is only dumped in text reports"),
        }
    }

    out.push_str(&report.with_alignments(alignments).render(format)?);
    Ok(out)
}

pub fn run_gotoh(args: &GotohArgs, format: ReportFormat) -> anyhow::Result<String> {
    let seq_1 = parse_sequence(&args.seq_1, "seq1")?;
    let seq_2 = parse_sequence(&args.seq_2, "seq2")?;
    let scoring = args.scoring();
    let gap = args.gap();

    let mut backtracer = Backtracer::new(args.backtrace_args.mode());
    let alignments = gotoh_align_all(&seq_1, &seq_2, &scoring, &gap, &mut backtracer)?;

    let mut report = Report::new(format!(
        "gotoh ({}, gap open {}, gap extend {})",
        scoring.regime, gap.open, gap.extend
    ))
    .with_ties(backtracer.ties());

    if let Some(score) = alignments.first().and_then(|a| a.score) {
        report = report.with_score(score);
    }

    report.with_alignments(alignments).render(format)
}
