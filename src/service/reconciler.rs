use bigdecimal::{BigDecimal, Zero};

use super::price_store::PriceBook;
use crate::models::{AnalysisSummary, PriceEntry, RawLineRecord, ReconciledRecord, RecordStatus};

/// 逐条核对账单明细, 输出与输入等长同序
///
/// 纯函数: 相同输入总是得到相同输出。
pub fn reconcile(records: &[RawLineRecord], prices: &PriceBook) -> Vec<ReconciledRecord> {
    records
        .iter()
        .map(|r| ReconciledRecord::from_raw(r, prices.reference_price(&r.item_name)))
        .collect()
}

/// 直接对参考价条目核对 (重复名称后写覆盖)
pub fn reconcile_entries(records: &[RawLineRecord], prices: &[PriceEntry]) -> Vec<ReconciledRecord> {
    reconcile(records, &PriceBook::from_entries(prices.iter().cloned()))
}

/// 汇总核对结果, 多收总额只累计正的超额金额
pub fn summarize(records: &[ReconciledRecord]) -> AnalysisSummary {
    let total_items = records.len();
    let mut fraud_count = 0;
    let mut price_not_found_count = 0;
    let mut total_excess = BigDecimal::zero();

    for record in records {
        match record.status {
            RecordStatus::FraudDetected => {
                fraud_count += 1;
                if let Some(excess) = &record.excess_amount {
                    total_excess += excess.clone();
                }
            }
            RecordStatus::PriceNotFound => price_not_found_count += 1,
            RecordStatus::Valid => {}
        }
    }

    let fraud_percent = if total_items == 0 {
        0.0
    } else {
        fraud_count as f64 / total_items as f64 * 100.0
    };

    AnalysisSummary {
        total_items,
        fraud_count,
        price_not_found_count,
        fraud_percent,
        total_excess,
    }
}
