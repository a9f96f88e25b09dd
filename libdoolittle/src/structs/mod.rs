pub mod alignment;
pub use alignment::Alignment;

pub mod sequence;
pub use sequence::{Sequence, TraceSide};
