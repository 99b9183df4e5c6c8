use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use bill_audit::{
    api, create_pool, AppConfig, AppError, BillAuditService, DocumentExtractor, PriceStore,
    StoreError,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 按需重建参考价表
    if let Some(seed_csv) = &config.database.seed_csv {
        let pool = create_pool(&config.database.url)
            .await
            .map_err(StoreError::from)?;
        let rows = PriceStore::new(pool.clone())
            .seed_from_csv(Path::new(seed_csv))
            .await?;
        pool.close().await;
        info!("Reference table seeded with {} rows", rows);
    }

    // 核对服务: 参考表只读, 外部识别工具路径来自配置
    let store = PriceStore::open(&config.database.url)?;
    let extractor = DocumentExtractor::from_config(&config.extraction);
    let service = Arc::new(BillAuditService::new(extractor, store));

    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/bills/analyze", post(api::analyze_bill))
        .route("/api/bills/analyze/csv", post(api::analyze_bill_csv))
        .route("/api/medicines/search", get(api::search_medicines))
        .with_state(service)
        .layer(
            ServiceBuilder::new().layer(DefaultBodyLimit::max(config.server.max_upload_bytes)),
        );

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/bills/analyze?modality=pdf|image      - JSON report");
    info!("  POST /api/bills/analyze/csv?modality=pdf|image  - CSV download");
    info!("  GET  /api/medicines/search?q=...                - MRP lookup");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
