use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use bigdecimal::BigDecimal;
use bill_audit::api::{self, AnalyzeParams, SearchParams};
use bill_audit::extract::{OcrEngine, PdfTextSource};
use bill_audit::models::{DocumentModality, RecordStatus};
use bill_audit::{create_pool, BillAuditService, DocumentExtractor, ExtractionError, PriceStore, StoreError};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;

/// 把上传字节原样当作识别文本
struct FixtureOcr;

impl OcrEngine for FixtureOcr {
    fn extract_text(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        std::str::from_utf8(image_bytes)
            .map(str::to_string)
            .map_err(|e| ExtractionError::Ocr(e.to_string()))
    }
}

/// 每页之间以换页符分隔的 "PDF"
struct FixturePdf;

impl PdfTextSource for FixturePdf {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let text = std::str::from_utf8(pdf_bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        Ok(text.split('\u{0c}').map(str::to_string).collect())
    }
}

const MRP_CSV: &str = "item,mrp_price\nParacetamol,25\nAmoxicillin,110\nDolo 650,30\nCrocin,28\nPantoprazole,70.5\n";

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn db_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

async fn seeded_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("mrp_master.csv");
    std::fs::write(&csv_path, MRP_CSV).unwrap();
    let db_path = dir.path().join("fraud_detection.db");

    let pool = create_pool(&db_url(&db_path)).await.unwrap();
    let written = PriceStore::new(pool.clone()).seed_from_csv(&csv_path).await.unwrap();
    assert_eq!(written, 5);
    pool.close().await;

    (dir, db_path)
}

fn service_for(db_path: &Path) -> BillAuditService {
    let store = PriceStore::open(&db_url(db_path)).unwrap();
    BillAuditService::new(DocumentExtractor::new(FixturePdf, FixtureOcr), store)
}

#[tokio::test]
async fn image_bill_is_reconciled_against_reference_table() {
    let (_dir, db_path) = seeded_db().await;
    let service = service_for(&db_path);

    let bill = "SUNRISE HOSPITAL PHARMACY\nItem Qty Amount\nParacetamol 2 60.0\nparacetamol  2  40.0\nXYZ-Tab 1 15\nGrand total 115\n";
    let report = service
        .analyze(bill.as_bytes().to_vec(), DocumentModality::Image)
        .await
        .unwrap();

    assert_eq!(report.records.len(), 3);

    let overcharged = &report.records[0];
    assert_eq!(overcharged.item_name, "Paracetamol");
    assert_eq!(overcharged.reference_price, Some(dec("25")));
    assert_eq!(overcharged.expected_price, Some(dec("50")));
    assert_eq!(overcharged.excess_amount, Some(dec("10")));
    assert_eq!(overcharged.status, RecordStatus::FraudDetected);

    assert_eq!(report.records[1].status, RecordStatus::Valid);
    assert_eq!(report.records[1].excess_amount, Some(dec("-10")));

    let unknown = &report.records[2];
    assert_eq!(unknown.item_name, "XYZ-Tab");
    assert_eq!(unknown.status, RecordStatus::PriceNotFound);
    assert!(unknown.expected_price.is_none());
    assert!(unknown.excess_amount.is_none());

    assert_eq!(report.summary.total_items, 3);
    assert_eq!(report.summary.fraud_count, 1);
    assert_eq!(report.summary.price_not_found_count, 1);
    assert_eq!(report.summary.total_excess, dec("10"));
}

#[tokio::test]
async fn pdf_pages_flow_through_the_same_reconciler() {
    let (_dir, db_path) = seeded_db().await;
    let service = service_for(&db_path);

    let pdf = "Dolo 650 1 35.50\n\u{0c}\n\u{0c}Pantoprazole, 2, 141.00\nCrocin 1 28";
    let report = service
        .analyze(pdf.as_bytes().to_vec(), DocumentModality::Pdf)
        .await
        .unwrap();

    let statuses: Vec<_> = report.records.iter().map(|r| (r.item_name.as_str(), r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("Dolo 650", RecordStatus::FraudDetected),
            ("Pantoprazole", RecordStatus::Valid),
            ("Crocin", RecordStatus::Valid),
        ]
    );
    assert_eq!(report.records[0].excess_amount, Some(dec("5.5")));
    assert_eq!(report.records[1].expected_price, Some(dec("141")));
}

#[tokio::test]
async fn unreadable_document_yields_empty_report() {
    let (_dir, db_path) = seeded_db().await;
    let service = service_for(&db_path);

    let report = service
        .analyze(vec![0xff, 0xd8, 0xff, 0xe0], DocumentModality::Image)
        .await
        .unwrap();
    assert!(report.is_empty());
    assert_eq!(report.summary.total_items, 0);
}

#[tokio::test]
async fn missing_store_is_fatal_for_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_for(&dir.path().join("absent.db"));

    let err = service
        .analyze(b"Paracetamol 2 60".to_vec(), DocumentModality::Image)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn empty_document_never_touches_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_for(&dir.path().join("absent.db"));

    let report = service
        .analyze(b"no parseable lines here".to_vec(), DocumentModality::Image)
        .await
        .unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn missing_table_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("empty.db");
    let pool = create_pool(&db_url(&db_path)).await.unwrap();
    sqlx::query("CREATE TABLE unrelated (id INTEGER)")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let store = PriceStore::open(&db_url(&db_path)).unwrap();
    assert!(matches!(store.load().await, Err(StoreError::Unavailable(_))));
}

#[tokio::test]
async fn seeding_replaces_previous_table() {
    let (dir, db_path) = seeded_db().await;
    let csv_path = dir.path().join("revised.csv");
    std::fs::write(&csv_path, "item,mrp_price\nParacetamol,20\nparacetamol,22\n").unwrap();

    let pool = create_pool(&db_url(&db_path)).await.unwrap();
    PriceStore::new(pool.clone()).seed_from_csv(&csv_path).await.unwrap();
    pool.close().await;

    let book = PriceStore::open(&db_url(&db_path)).unwrap().load().await.unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book.reference_price("PARACETAMOL"), Some(&dec("22")));
}

#[tokio::test]
async fn malformed_seed_csv_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("bad.csv");
    std::fs::write(&csv_path, "item,mrp_price\nParacetamol,twenty\n").unwrap();

    let pool = create_pool(&db_url(&dir.path().join("bad.db"))).await.unwrap();
    let err = PriceStore::new(pool).seed_from_csv(&csv_path).await.unwrap_err();
    assert!(matches!(err, StoreError::Seed(_)));
}

#[tokio::test]
async fn medicine_search_returns_table_spelling() {
    let (_dir, db_path) = seeded_db().await;
    let service = service_for(&db_path);

    let hits = service.search_medicines("DOLO", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].display_name, "Dolo 650");
    assert_eq!(hits[0].item_name, "dolo 650");
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn analyze_endpoint_reports_store_outage_as_503() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(service_for(&dir.path().join("absent.db")));

    let response = api::analyze_bill(
        State(service.clone()),
        Query(AnalyzeParams { modality: DocumentModality::Image }),
        Bytes::from_static(b"Paracetamol 2 60"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);

    let response = api::analyze_bill(
        State(service),
        Query(AnalyzeParams { modality: DocumentModality::Image }),
        Bytes::from_static(b"blurry photo"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "No valid items detected.");
    assert_eq!(body["report"]["records"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn analyze_endpoint_emits_canonical_fields() {
    let (_dir, db_path) = seeded_db().await;
    let service = Arc::new(service_for(&db_path));

    let response = api::analyze_bill(
        State(service.clone()),
        Query(AnalyzeParams { modality: DocumentModality::Image }),
        Bytes::from_static(b"Crocin 2 70\n"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let record = &body["report"]["records"][0];
    assert_eq!(record["item_name"], "Crocin");
    assert_eq!(record["quantity"], 2);
    assert_eq!(record["status"], "FraudDetected");
    for field in ["billed_price", "reference_price", "expected_price", "excess_amount"] {
        assert!(!record[field].is_null(), "{field} missing");
    }

    let response = api::analyze_bill_csv(
        State(service.clone()),
        Query(AnalyzeParams { modality: DocumentModality::Image }),
        Bytes::from_static(b"Crocin 2 70\n"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("item_name,quantity,billed_price"));
    assert!(csv.contains("Crocin,2,70,"));
    assert!(csv.trim_end().ends_with("FraudDetected"));

    let response = api::search_medicines(
        State(service),
        Query(SearchParams { q: "cillin".to_string(), limit: 5 }),
    )
    .await;
    let body = json_body(response).await;
    assert_eq!(body["medicines"][0]["display_name"], "Amoxicillin");
}

#[tokio::test]
async fn seed_write_failure_is_a_seed_error() {
    let (dir, db_path) = seeded_db().await;
    let csv_path = dir.path().join("revised.csv");
    std::fs::write(&csv_path, "item,mrp_price\nCrocin,30\n").unwrap();

    // 只读连接无法重建表
    let store = PriceStore::open(&db_url(&db_path)).unwrap();
    let err = store.seed_from_csv(&csv_path).await.unwrap_err();
    assert!(matches!(err, StoreError::Seed(_)), "got {err:?}");

    let book = store.load().await.unwrap();
    assert_eq!(book.reference_price("crocin"), Some(&dec("28")));
}
