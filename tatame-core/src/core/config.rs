use std::str::FromStr;

/// 应用配置 - 学院核心的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（支持 `.env` 文件）：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./tatame-data | 工作目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | PERSIST_DEBOUNCE_MS | 500 | 持久化防抖间隔(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 5000 | 关闭超时(毫秒) |
/// | SEED_DEMO_DATA | false | 空数据时写入演示学员 |
/// | TIP_API_KEY | - | 每日提示 API key |
/// | TIP_MODEL | gemini-2.5-flash | 每日提示模型 |
/// | TIP_ENDPOINT | https://generativelanguage.googleapis.com/v1beta | 每日提示 API 地址 |
/// | TIP_TIMEOUT_MS | 8000 | 每日提示请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/tatame LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据文件和日志
    pub work_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 持久化防抖间隔 (毫秒)
    pub persist_debounce_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// 学员数据为空时写入演示数据
    pub seed_demo_data: bool,
    pub tip_api_key: Option<String>,
    pub tip_model: String,
    pub tip_endpoint: String,
    pub tip_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 使用默认值并指定工作目录，不读取环境变量
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_lookup(|_| None);
        config.work_dir = work_dir.into();
        config
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Self {
            work_dir: get("WORK_DIR").unwrap_or_else(|| "./tatame-data".into()),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parsed(&get, "LOG_JSON").unwrap_or(false),
            log_dir: non_empty("LOG_DIR"),
            persist_debounce_ms: parsed(&get, "PERSIST_DEBOUNCE_MS")
                .unwrap_or(crate::persistence::DEFAULT_DEBOUNCE_MS),
            shutdown_timeout_ms: parsed(&get, "SHUTDOWN_TIMEOUT_MS").unwrap_or(5000),
            seed_demo_data: parsed(&get, "SEED_DEMO_DATA").unwrap_or(false),
            tip_api_key: non_empty("TIP_API_KEY"),
            tip_model: get("TIP_MODEL").unwrap_or_else(|| "gemini-2.5-flash".into()),
            tip_endpoint: get("TIP_ENDPOINT")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".into()),
            tip_timeout_ms: parsed(&get, "TIP_TIMEOUT_MS").unwrap_or(8000),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// 解析环境变量，无法解析时返回 None
fn parsed<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    get(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
