use chrono::Utc;
use std::sync::Arc;

use super::price_store::PriceStore;
use super::reconciler::{reconcile, summarize};
use crate::error::{ExtractionError, StoreError};
use crate::extract::DocumentExtractor;
use crate::models::{AnalysisReport, DocumentModality, PriceEntry, RawLineRecord, ReconciledRecord};

/// 账单核对服务: 抽取 -> 加载参考价 -> 核对 -> 汇总
pub struct BillAuditService {
    extractor: Arc<DocumentExtractor>,
    store: PriceStore,
}

impl BillAuditService {
    pub fn new(extractor: DocumentExtractor, store: PriceStore) -> Self {
        Self {
            extractor: Arc::new(extractor),
            store,
        }
    }

    /// 抽取候选明细, 识别是阻塞调用, 放到阻塞线程池执行
    pub async fn extract(&self, bytes: Vec<u8>, modality: DocumentModality) -> Vec<RawLineRecord> {
        let extractor = Arc::clone(&self.extractor);
        match tokio::task::spawn_blocking(move || extractor.extract(&bytes, modality)).await {
            Ok(records) => records,
            Err(e) => {
                let err = ExtractionError::Aborted(e.to_string());
                tracing::warn!("{} extraction failed, treating as empty: {}", modality, err);
                Vec::new()
            }
        }
    }

    /// 核对一组明细; 空输入直接返回空结果, 不访问参考表
    pub async fn reconcile(
        &self,
        records: &[RawLineRecord],
    ) -> Result<Vec<ReconciledRecord>, StoreError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let prices = self.store.load().await.map_err(|e| {
            tracing::error!("Reconciliation aborted: {}", e);
            e
        })?;
        Ok(reconcile(records, &prices))
    }

    /// 分析单份账单
    pub async fn analyze(
        &self,
        bytes: Vec<u8>,
        modality: DocumentModality,
    ) -> Result<AnalysisReport, StoreError> {
        let start_time = std::time::Instant::now();
        let raw = self.extract(bytes, modality).await;
        let records = self.reconcile(&raw).await?;
        let summary = summarize(&records);

        tracing::info!(
            "Bill analyzed: {} items, {} flagged, {} without reference price, took {:?}",
            summary.total_items,
            summary.fraud_count,
            summary.price_not_found_count,
            start_time.elapsed()
        );

        Ok(AnalysisReport {
            modality,
            analyzed_at: Utc::now(),
            records,
            summary,
        })
    }

    /// 药品参考价搜索
    pub async fn search_medicines(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PriceEntry>, StoreError> {
        let prices = self.store.load().await?;
        Ok(prices.search(query, limit).into_iter().cloned().collect())
    }
}
