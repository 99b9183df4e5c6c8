use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

use super::normalize::normalize;
use crate::db::{self, queries};
use crate::error::StoreError;
use crate::models::{PriceEntry, PriceRecord};

/// 参考价查找表 (键为规范化名称, 保留表中顺序)
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    entries: IndexMap<String, PriceEntry>,
}

impl PriceBook {
    /// 按规范化名称建表, 名称重复时后写覆盖
    pub fn from_entries(entries: impl IntoIterator<Item = PriceEntry>) -> Self {
        let mut book = IndexMap::new();
        for mut entry in entries {
            let key = normalize(&entry.item_name);
            entry.item_name = key.clone();
            book.insert(key, entry);
        }
        Self { entries: book }
    }

    fn from_records(records: Vec<PriceRecord>) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let item_name = normalize(&record.item);
            if item_name.is_empty() {
                tracing::warn!("Skipping reference row with empty item name");
                continue;
            }

            let price = record
                .mrp_price
                .as_deref()
                .and_then(|p| BigDecimal::from_str(p.trim()).ok());
            match price {
                Some(price) if price >= BigDecimal::zero() => entries.push(PriceEntry {
                    item_name,
                    display_name: record.item.trim().to_string(),
                    reference_price: price,
                }),
                _ => {
                    tracing::warn!(
                        "Skipping reference row {:?}: invalid price {:?}",
                        record.item,
                        record.mrp_price
                    );
                }
            }
        }
        Self::from_entries(entries)
    }

    pub fn get(&self, item_name: &str) -> Option<&PriceEntry> {
        self.entries.get(&normalize(item_name))
    }

    pub fn reference_price(&self, item_name: &str) -> Option<&BigDecimal> {
        self.get(item_name).map(|e| &e.reference_price)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &PriceEntry> {
        self.entries.values()
    }

    /// 药品名模糊搜索: 不区分大小写的子串匹配, 按表中顺序最多返回 `limit` 条
    pub fn search(&self, query: &str, limit: usize) -> Vec<&PriceEntry> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .values()
            .filter(|e| e.item_name.contains(&needle))
            .take(limit)
            .collect()
    }
}

/// MRP 参考价存储 (只读)
#[derive(Clone)]
pub struct PriceStore {
    pool: SqlitePool,
}

impl PriceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 以只读方式打开参考表, 连接在每次 load 时才建立
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(db::read_only_pool(database_url)?))
    }

    /// 全表加载一次参考价
    ///
    /// 每次调用独占一个连接, 返回时 (含出错路径) 连接随作用域归还。
    pub async fn load(&self) -> Result<PriceBook, StoreError> {
        let records = {
            let mut conn = self.pool.acquire().await?;
            queries::list_price_records(&mut conn).await?
        };
        let total_rows = records.len();
        let book = PriceBook::from_records(records);
        tracing::info!(
            "Loaded {} reference prices ({} rows read)",
            book.len(),
            total_rows
        );
        Ok(book)
    }

    /// 用 CSV 重建参考表 (维护路径, 核对流程从不写表)
    pub async fn seed_from_csv(&self, path: &Path) -> Result<u64, StoreError> {
        let rows = queries::read_price_csv(path)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Seeding reference prices from {} ({} rows)", path.display(), rows.len());
        queries::rebuild_price_table(&self.pool, &rows)
            .await
            .map_err(|e| StoreError::Seed(format!("writing mrp_reference: {}", e)))
    }
}
