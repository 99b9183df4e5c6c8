use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 账单明细行 (单行文本切分得到的候选记录)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLineRecord {
    pub item_name: String,    // 药品名称 (已去首尾空白)
    pub quantity: i64,        // 数量
    pub billed_price: BigDecimal, // 账单金额
}

/// 上传文档的类型, 只用于选择抽取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentModality {
    Pdf,
    /// 图片上传和摄像头拍照都走 OCR
    #[serde(alias = "camera")]
    Image,
}

impl DocumentModality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentModality::Pdf => "pdf",
            DocumentModality::Image => "image",
        }
    }
}

impl fmt::Display for DocumentModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
