//! 账单文档抽取: 原始字节 -> 候选明细
//!
//! PDF 走逐页文本, 图片走 OCR, 两者共用同一个行切分器。抽取步骤本身失败
//! (文件损坏、图片无法识别) 时只记录 warn 日志并返回空序列, 调用方把空序列
//! 统一当作 "没有可核对的明细"。

pub mod ocr;
pub mod pdf;
pub mod tokenizer;

pub use ocr::TesseractCli;
pub use pdf::LopdfTextSource;
pub use tokenizer::{tokenize_line, tokenize_text};

use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::models::{DocumentModality, RawLineRecord};

/// 图片文字识别能力
pub trait OcrEngine {
    fn extract_text(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF 文本层抽取能力, 每页一段文本
pub trait PdfTextSource {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

pub struct DocumentExtractor {
    pdf: Box<dyn PdfTextSource + Send + Sync>,
    ocr: Box<dyn OcrEngine + Send + Sync>,
}

impl DocumentExtractor {
    pub fn new(
        pdf: impl PdfTextSource + Send + Sync + 'static,
        ocr: impl OcrEngine + Send + Sync + 'static,
    ) -> Self {
        Self {
            pdf: Box::new(pdf),
            ocr: Box::new(ocr),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(LopdfTextSource, TesseractCli::from_config(config))
    }

    /// 抽取整份文档的候选明细, 失败时返回空序列
    pub fn extract(&self, bytes: &[u8], modality: DocumentModality) -> Vec<RawLineRecord> {
        let result = match modality {
            DocumentModality::Pdf => self.extract_pdf(bytes),
            DocumentModality::Image => self.extract_image(bytes),
        };

        match result {
            Ok(records) => {
                tracing::info!("{} document: {} line items extracted", modality, records.len());
                records
            }
            Err(e) => {
                tracing::warn!("{} extraction failed, treating as empty: {}", modality, e);
                Vec::new()
            }
        }
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<Vec<RawLineRecord>, ExtractionError> {
        let pages = self.pdf.page_texts(bytes)?;
        let mut records = Vec::new();
        for (idx, text) in pages.iter().enumerate() {
            if text.trim().is_empty() {
                tracing::debug!("PDF page {} has no text, skipping", idx + 1);
                continue;
            }
            records.extend(tokenize_text(text));
        }
        Ok(records)
    }

    fn extract_image(&self, bytes: &[u8]) -> Result<Vec<RawLineRecord>, ExtractionError> {
        let text = self.ocr.extract_text(bytes)?;
        Ok(tokenize_text(&text))
    }
}
