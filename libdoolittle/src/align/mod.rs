pub mod structs;

mod scoring;
pub use scoring::{MatchMismatch, Regime, ScoreMatrix, Scoring};

mod needleman_wunsch;
pub use needleman_wunsch::{
    nw_align, nw_align_all, nw_fill, nw_score, nw_trace, nw_trace_with, trace_to_alignment, PairStep,
    PairTrace,
};

mod gotoh;
pub use gotoh::{gotoh_align, gotoh_align_all, gotoh_fill, gotoh_score, AffineGap, GotohGrids};

mod triple;
pub use triple::{
    triple_align, triple_align_all, triple_fill, triple_score, EmptySequenceError,
    SequenceCountError, TripleStep,
};

mod sum_of_pairs;
pub use sum_of_pairs::sum_of_pairs;

mod progressive;
pub use progressive::{feng_doolittle, progressive_align, ProgressiveResult};
