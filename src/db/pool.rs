use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    let connect_options = SqliteConnectOptions::from_str(database_url)?;

    // 设置慢查询日志阈值为 5秒
    Ok(connect_options.log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(5)))
}

/// 创建可写连接池 (维护任务用, 文件不存在时自动创建)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let connect_options = connect_options(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}

/// 创建只读连接池
///
/// 延迟建立连接: 参考表不可用时在每次核对取连接时报错, 而不是启动时。
pub fn read_only_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let connect_options = connect_options(database_url)?
        .read_only(true)
        .create_if_missing(false);

    Ok(SqlitePoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy_with(connect_options))
}
