use lopdf::Document;

use super::PdfTextSource;
use crate::error::ExtractionError;

/// 基于 lopdf 的逐页文本抽取 (只处理带文本层的 PDF)
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfTextSource;

impl PdfTextSource for LopdfTextSource {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let document =
            Document::load_mem(pdf_bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let pages = document.get_pages();
        let mut texts = Vec::with_capacity(pages.len());
        for &page_num in pages.keys() {
            match document.extract_text(&[page_num]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    // 无法取出文本的页面按空页处理
                    tracing::debug!("PDF page {} has no extractable text: {}", page_num, e);
                    texts.push(String::new());
                }
            }
        }

        Ok(texts)
    }
}
