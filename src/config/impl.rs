use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, builder::DefaultState};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    ///
    /// 优先级从低到高：`config.toml`、`config.{APP_ENV}.toml`、`STUDENTS_*` 环境变量、常用环境变量覆盖。
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{app_env}")).required(false))
            .add_source(
                Environment::with_prefix("STUDENTS")
                    .separator("_")
                    .try_parsing(true),
            );

        let builder = Self::apply_env_overrides(builder)?;
        Self::finish(builder)
    }

    /// 从 TOML 字符串加载配置（不读取文件与环境变量）
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from_str(content, FileFormat::Toml));
        Self::finish(builder)
    }

    fn apply_env_overrides(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("cache.default_ttl", std::env::var("CACHE_TTL").ok())
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // 工作线程数为 0 时按 CPU 核心数推断
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config
            .grading
            .validate()
            .map_err(|msg| ConfigError::Message(format!("Invalid grading policy: {msg}")))?;

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
[app]
system_name = "Student Records"
environment = "production"
log_level = "info"

[server]
host = "127.0.0.1"
port = 8080
unix_socket_path = ""
workers = 0
max_workers = 2

[server.timeouts]
client_request = 5000
client_disconnect = 1000
keep_alive = 30

[server.limits]
max_payload_size = 1048576

[database]
url = "students.db"
pool_size = 4
timeout = 10

[cache]
type = "moka"
default_ttl = 60

[cache.redis]
url = "redis://127.0.0.1/"
key_prefix = "students:"
pool_size = 4

[cache.memory]
max_capacity = 1000

[cors]
allowed_origins = ["*"]
allowed_methods = ["GET"]
allowed_headers = ["*"]
max_age = 3600
"#;

    #[test]
    fn test_grading_defaults_when_section_missing() {
        let config = AppConfig::from_toml_str(BASE).unwrap();
        assert_eq!(config.grading.thresholds.a, 90.0);
        assert_eq!(config.grading.reference_total, 475.0);
        assert!(!config.grading.enforce_track_maxima);
    }

    #[test]
    fn test_workers_capped_by_max_workers() {
        let config = AppConfig::from_toml_str(BASE).unwrap();
        assert!(config.server.workers >= 1);
        assert!(config.server.workers <= 2);
        assert!(config.is_production());
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_grading_section_overrides() {
        let content = format!(
            "{BASE}\n[grading]\nreference_total = 500.0\n\n[grading.thresholds]\na = 85.0\nb = 75.0\nc = 65.0\nd = 55.0\ne = 45.0\n"
        );
        let config = AppConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.grading.reference_total, 500.0);
        assert_eq!(config.grading.thresholds.e, 45.0);
        assert_eq!(config.grading.foreign_language_midpoint, 25.0);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let content = format!(
            "{BASE}\n[grading.thresholds]\na = 60.0\nb = 80.0\nc = 70.0\nd = 60.0\ne = 50.0\n"
        );
        assert!(AppConfig::from_toml_str(&content).is_err());
    }
}
