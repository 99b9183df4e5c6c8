pub mod auditor;
pub mod export;
pub mod normalize;
pub mod price_store;
pub mod reconciler;

pub use auditor::BillAuditService;
pub use normalize::normalize;
pub use price_store::{PriceBook, PriceStore};
pub use reconciler::{reconcile, reconcile_entries, summarize};
