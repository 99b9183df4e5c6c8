use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// MRP 参考价 (按规范化名称唯一)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub item_name: String,       // 规范化后的名称, 匹配主键
    pub display_name: String,    // 表中原始写法
    pub reference_price: BigDecimal,
}

/// mrp_reference 表原始行, 价格以文本读出再转十进制
#[derive(Debug, Clone, FromRow)]
pub struct PriceRecord {
    pub item: String,
    pub mrp_price: Option<String>,
}

/// 参考价 CSV 的一行 (item,mrp_price)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRow {
    pub item: String,
    pub mrp_price: f64,
}
