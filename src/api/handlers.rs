use crate::models::{AnalysisReport, DocumentModality, PriceEntry};
use crate::service::{export, BillAuditService};
use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 上传参数: 文档类型
#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub modality: DocumentModality,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    5
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub message: String,
    pub report: Option<AnalysisReport>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub medicines: Vec<PriceEntry>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 账单分析接口 (原始文件字节作为请求体)
pub async fn analyze_bill(
    State(service): State<Arc<BillAuditService>>,
    Query(params): Query<AnalyzeParams>,
    body: Bytes,
) -> Response {
    match service.analyze(body.to_vec(), params.modality).await {
        Ok(report) => {
            let message = if report.is_empty() {
                "No valid items detected.".to_string()
            } else {
                format!(
                    "Checked {} items, {} flagged for overcharge",
                    report.summary.total_items, report.summary.fraud_count
                )
            };
            let response = AnalyzeResponse {
                success: true,
                message,
                report: Some(report),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = AnalyzeResponse {
                success: false,
                message: format!("Error: {}", e),
                report: None,
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}

/// 账单分析并以 CSV 下载结果
pub async fn analyze_bill_csv(
    State(service): State<Arc<BillAuditService>>,
    Query(params): Query<AnalyzeParams>,
    body: Bytes,
) -> Response {
    let report = match service.analyze(body.to_vec(), params.modality).await {
        Ok(report) => report,
        Err(e) => {
            return (StatusCode::SERVICE_UNAVAILABLE, format!("Error: {}", e)).into_response();
        }
    };

    match export::to_csv_bytes(&report.records) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"bill_audit.csv\""),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("CSV export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}

/// 药品参考价搜索
pub async fn search_medicines(
    State(service): State<Arc<BillAuditService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match service.search_medicines(&params.q, params.limit).await {
        Ok(medicines) => {
            let response = SearchResponse {
                success: true,
                message: format!("{} medicines found", medicines.len()),
                medicines,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            let response = SearchResponse {
                success: false,
                message: format!("Error: {}", e),
                medicines: Vec::new(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}
