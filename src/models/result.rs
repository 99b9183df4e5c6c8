use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{DocumentModality, RawLineRecord};

/// 核对结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordStatus {
    Valid,
    FraudDetected,
    PriceNotFound,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Valid => "Valid",
            RecordStatus::FraudDetected => "FraudDetected",
            RecordStatus::PriceNotFound => "PriceNotFound",
        }
    }
}

/// 核对结果 (每条账单明细对应一条)
///
/// 只能通过 [`ReconciledRecord::from_raw`] 构造, `status` 总是由参考价是否存在
/// 和超额金额的符号推导出来。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    pub item_name: String,
    pub quantity: i64,
    pub billed_price: BigDecimal,
    pub reference_price: Option<BigDecimal>,
    pub expected_price: Option<BigDecimal>, // 参考价 × 数量
    pub excess_amount: Option<BigDecimal>,  // 账单金额 - 应收金额
    pub status: RecordStatus,
}

impl ReconciledRecord {
    pub fn from_raw(record: &RawLineRecord, reference_price: Option<&BigDecimal>) -> Self {
        let Some(reference) = reference_price else {
            return Self {
                item_name: record.item_name.clone(),
                quantity: record.quantity,
                billed_price: record.billed_price.clone(),
                reference_price: None,
                expected_price: None,
                excess_amount: None,
                status: RecordStatus::PriceNotFound,
            };
        };

        let expected = reference * BigDecimal::from(record.quantity);
        let excess = &record.billed_price - &expected;
        let status = if excess > BigDecimal::zero() {
            RecordStatus::FraudDetected
        } else {
            RecordStatus::Valid
        };

        Self {
            item_name: record.item_name.clone(),
            quantity: record.quantity,
            billed_price: record.billed_price.clone(),
            reference_price: Some(reference.clone()),
            expected_price: Some(expected),
            excess_amount: Some(excess),
            status,
        }
    }
}

/// 结果汇总 (总条数、疑似多收条数、占比、多收总额)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total_items: usize,
    pub fraud_count: usize,
    pub price_not_found_count: usize,
    pub fraud_percent: f64,
    pub total_excess: BigDecimal,
}

/// 单次账单分析的完整输出
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub modality: DocumentModality,
    pub analyzed_at: DateTime<Utc>,
    pub records: Vec<ReconciledRecord>,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    /// 空结果统一展示为 "未识别到有效明细"
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
