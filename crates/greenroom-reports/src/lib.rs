mod store;
mod types;

pub use store::ReportStore;
pub use types::{ReportFilter, ReportRecord, ReportSummary};
