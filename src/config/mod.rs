mod structs;

pub use structs::{
    AnalyticsConfig, DatabaseConfig, DomainConfig, LoggingConfig, ObjectStoreConfig, ServerConfig,
    StaticConfig,
};

use std::sync::OnceLock;

static CONFIG: OnceLock<StaticConfig> = OnceLock::new();

/// 初始化全局配置（只允许初始化一次）
pub fn init_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::load)
}

/// 获取全局配置
///
/// # Panics
/// 在 `init_config` 之前调用会 panic
pub fn get_config() -> &'static StaticConfig {
    CONFIG.get().expect("Config not initialized")
}
