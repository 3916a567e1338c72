use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 与环境变量加载，启动时使用一次）
///
/// 包含：
/// - server: HTTP 服务器地址和端口
/// - storage: 记录存储后端
/// - service: 短码服务本身的设置（表名、基础 URL、跨域域名）
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 优先级高于 `SC__` 前缀变量的裸环境变量
const LEGACY_ENV_KEYS: [(&str, &str); 4] = [
    ("DB_TABLE_NAME", "service.db_table_name"),
    ("API_BASE_URL", "service.api_base_url"),
    ("SERVICE_BASE_URL", "service.service_base_url"),
    ("CROSS_ORIGIN_DOMAIN", "service.cross_origin_domain"),
];

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：DB_TABLE_NAME 等裸变量 > SC__ 前缀变量 > config.toml > 默认值
    /// 示例：SC__SERVER__PORT=9999
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &str) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SC")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_KEYS {
            if let Ok(value) = std::env::var(var)
                && !value.is_empty()
            {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize::<StaticConfig>()
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// 存储后端配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// `memory` 或 `file`
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

/// 短码资源本身依赖的设置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default = "default_db_table_name")]
    pub db_table_name: String,
    /// 创建成功时 `Location` 头的基础 URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// 对外短链接（`generated_link`）的基础 URL
    #[serde(default = "default_service_base_url")]
    pub service_base_url: String,
    #[serde(default = "default_cross_origin_domain")]
    pub cross_origin_domain: String,
    #[serde(default = "default_suggestion_length")]
    pub suggestion_length: usize,
    #[serde(default)]
    pub qr: QrConfig,
}

/// 二维码渲染配置（`[service.qr]`）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QrConfig {
    /// 静区宽度（像素）
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_qr_color")]
    pub color: String,
    /// 背景色；不设置则不输出背景矩形
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default = "default_qr_module_size")]
    pub module_size: usize,
    #[serde(default = "default_qr_shape_rendering")]
    pub shape_rendering: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` 或 `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
}

// ============================================================
// 默认值函数
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_db_table_name() -> String {
    "shortcodes".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost".to_string()
}

fn default_service_base_url() -> String {
    "http://change.me".to_string()
}

fn default_cross_origin_domain() -> String {
    "*".to_string()
}

fn default_suggestion_length() -> usize {
    6
}

fn default_qr_color() -> String {
    "#000000".to_string()
}

fn default_qr_module_size() -> usize {
    11
}

fn default_qr_shape_rendering() -> String {
    "crispEdges".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// ============================================================
// Default 实现
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_table_name: default_db_table_name(),
            api_base_url: default_api_base_url(),
            service_base_url: default_service_base_url(),
            cross_origin_domain: default_cross_origin_domain(),
            suggestion_length: default_suggestion_length(),
            qr: QrConfig::default(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            offset: 0,
            color: default_qr_color(),
            fill: None,
            module_size: default_qr_module_size(),
            shape_rendering: default_qr_shape_rendering(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_defaults() {
        let service = ServiceConfig::default();
        assert_eq!(service.db_table_name, "shortcodes");
        assert_eq!(service.api_base_url, "http://localhost");
        assert_eq!(service.service_base_url, "http://change.me");
        assert_eq!(service.cross_origin_domain, "*");
        assert_eq!(service.suggestion_length, 6);
    }

    #[test]
    fn test_values_can_be_overridden() {
        let mut service = ServiceConfig::default();
        service.db_table_name = "smartcodes".to_string();
        service.api_base_url = "https://api.link.me".to_string();
        service.service_base_url = "http://link.me".to_string();
        service.cross_origin_domain = "http://link.it".to_string();
        assert_eq!(service.db_table_name, "smartcodes");
        assert_eq!(service.api_base_url, "https://api.link.me");
        assert_eq!(service.service_base_url, "http://link.me");
        assert_eq!(service.cross_origin_domain, "http://link.it");
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[service]"));
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config should parse");
        assert_eq!(parsed, StaticConfig::default());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [service]
            service_base_url = "https://sho.rt"
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(parsed.service.service_base_url, "https://sho.rt");
        assert_eq!(parsed.service.db_table_name, "shortcodes");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.service.qr, QrConfig::default());
    }

    #[test]
    fn test_qr_section_is_nested_under_service() {
        let parsed: StaticConfig = toml::from_str(
            r##"
            [service.qr]
            module_size = 4
            fill = "#ffffff"
            "##,
        )
        .expect("qr section should parse");
        assert_eq!(parsed.service.qr.module_size, 4);
        assert_eq!(parsed.service.qr.fill.as_deref(), Some("#ffffff"));
        assert_eq!(parsed.service.qr.color, "#000000");
        assert_eq!(parsed.service.suggestion_length, 6);
    }
}
