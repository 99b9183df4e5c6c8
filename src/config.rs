use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 上传文件大小上限 (字节)
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// 启动时用于重建 MRP 参考表的 CSV (item,mrp_price)
    #[serde(default)]
    pub seed_csv: Option<String>,
}

/// 外部识别工具配置, 构造 DocumentExtractor 时注入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub tesseract_cmd: String,
    pub ocr_language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_upload_bytes: 20 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "sqlite://fraud_detection.db".to_string(),
                seed_csv: None,
            },
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> billaudit.toml (可选) -> 环境变量
    ///
    /// 环境变量以 `BILLAUDIT__` 为前缀, 层级用 `__` 分隔,
    /// 例如 `BILLAUDIT__SERVER__PORT=9090`。
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("billaudit")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix("BILLAUDIT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
