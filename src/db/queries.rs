use crate::models::{PriceRecord, PriceRow};
use futures::TryStreamExt;
use sqlx::{SqliteConnection, SqlitePool};
use std::path::Path;

/// SQLite 单条语句变量上限 999, 每行 2 个绑定参数
const INSERT_CHUNK_ROWS: usize = 400;

/// 全表读取 MRP 参考价 (价格按文本读出, 避免浮点转十进制的误差)
pub async fn list_price_records(
    conn: &mut SqliteConnection,
) -> Result<Vec<PriceRecord>, sqlx::Error> {
    let mut rows = sqlx::query_as::<_, PriceRecord>(
        r#"
        SELECT item, CAST(mrp_price AS TEXT) AS mrp_price
        FROM mrp_reference
        ORDER BY rowid
        "#,
    )
    .fetch(conn);

    let mut records = Vec::new();
    while let Some(record) = rows.try_next().await? {
        records.push(record);
    }
    Ok(records)
}

/// 重建参考价表并批量写入 (单事务)
pub async fn rebuild_price_table(pool: &SqlitePool, rows: &[PriceRow]) -> Result<u64, sqlx::Error> {
    let start_time = std::time::Instant::now();
    let mut tx = pool.begin().await?;

    sqlx::query("DROP TABLE IF EXISTS mrp_reference")
        .execute(&mut *tx)
        .await?;
    sqlx::query("CREATE TABLE mrp_reference (item TEXT PRIMARY KEY, mrp_price REAL)")
        .execute(&mut *tx)
        .await?;

    let mut inserted = 0;
    for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
        // 重复名称后写覆盖
        let mut query_builder =
            sqlx::QueryBuilder::new("INSERT OR REPLACE INTO mrp_reference (item, mrp_price) ");
        query_builder.push_values(chunk, |mut b, row| {
            b.push_bind(&row.item).push_bind(row.mrp_price);
        });
        inserted += query_builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    tracing::info!(
        "mrp_reference rebuilt: {} rows written, took {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

/// 读取参考价 CSV (表头 item,mrp_price, 多余列忽略)
pub fn read_price_csv(path: &Path) -> Result<Vec<PriceRow>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
