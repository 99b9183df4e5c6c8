//! 错误类型

use thiserror::Error;

/// 文档抽取失败 (PDF 损坏、图片无法识别等)
///
/// 只在抽取器内部流转, `DocumentExtractor::extract` 会把它降级为空结果。
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("OCR processing failed: {0}")]
    Ocr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

/// MRP 参考表错误, 对当次核对是致命的
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("reference price store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("failed to seed reference prices: {0}")]
    Seed(String),
}

/// 进程级错误 (启动、配置、维护任务)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
