mod report;
pub use report::{Report, ReportFormat};
