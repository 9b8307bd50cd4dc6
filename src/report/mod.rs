pub mod pdf;
pub mod summary;

pub use pdf::build_report;
pub use summary::SummaryStats;
