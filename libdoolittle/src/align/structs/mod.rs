mod backtracer;
pub use backtracer::{BacktraceError, BacktraceMode, Backtracer};

mod dp_grid;
pub use dp_grid::{DpGrid, DpGrid2, DpGrid3, GridIndexError, InvalidDimensionError};
