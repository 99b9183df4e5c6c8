pub mod bill;
pub mod price;
pub mod result;

pub use bill::{DocumentModality, RawLineRecord};
pub use price::{PriceEntry, PriceRecord, PriceRow};
pub use result::{AnalysisReport, AnalysisSummary, ReconciledRecord, RecordStatus};
