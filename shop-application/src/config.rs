//! 应用配置
//!
//! 支持 YAML 文件与环境变量覆盖。
//!
//! 优先级（高到低）：
//! 1. 环境变量（`SHOP_DEFAULT_PAGE_SIZE`、`SHOP_MAX_PAGE_SIZE`、`SHOP_LOG`）
//! 2. 配置文件（路径取自 `SHOP_CONFIG`，默认 `shop.yaml`，文件不存在时跳过）
//! 3. 默认值

use std::path::Path;

use serde::Deserialize;

/// 订单历史默认页大小
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// 单页最大条数
pub const DEFAULT_MAX_PAGE_SIZE: usize = 50;

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// 分页配置
    pub paging: PagingConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 分页配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// 未指定页大小时使用的默认值
    pub default_size: usize,
    /// 页大小上限，超出时截断
    pub max_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` 语法的过滤指令
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl ShopConfig {
    /// 从配置文件与环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("SHOP_CONFIG").unwrap_or_else(|_| "shop.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// 从 YAML 文件加载配置
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 应用覆盖项，`lookup` 按变量名返回取值
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(size) = lookup("SHOP_DEFAULT_PAGE_SIZE") {
            self.paging.default_size = parse_size("SHOP_DEFAULT_PAGE_SIZE", &size)?;
        }

        if let Some(size) = lookup("SHOP_MAX_PAGE_SIZE") {
            self.paging.max_size = parse_size("SHOP_MAX_PAGE_SIZE", &size)?;
        }

        if let Some(filter) = lookup("SHOP_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paging.default_size == 0 {
            return Err(ConfigError::Invalid(
                "paging.default_size must be > 0".to_string(),
            ));
        }
        if self.paging.max_size < self.paging.default_size {
            return Err(ConfigError::Invalid(format!(
                "paging.max_size ({}) must be >= paging.default_size ({})",
                self.paging.max_size, self.paging.default_size
            )));
        }
        Ok(())
    }
}

fn parse_size(key: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key} is not a page size: {raw}")))
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ShopConfig::default();
        assert_eq!(config.paging.default_size, 4);
        assert_eq!(config.paging.max_size, 50);
        assert_eq!(config.logging.filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
paging:
  default_size: 10
  max_size: 20

logging:
  filter: "shop_application=debug,info"
"#;

        let config = ShopConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.paging.default_size, 10);
        assert_eq!(config.paging.max_size, 20);
        assert_eq!(config.logging.filter, "shop_application=debug,info");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ShopConfig::from_yaml("paging:\n  max_size: 8\n").unwrap();
        assert_eq!(config.paging.default_size, 4);
        assert_eq!(config.paging.max_size, 8);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SHOP_DEFAULT_PAGE_SIZE", "6"),
            ("SHOP_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = ShopConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.paging.default_size, 6);
        assert_eq!(config.paging.max_size, 50);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ShopConfig::default();
        let err = config
            .apply_overrides(|key| (key == "SHOP_MAX_PAGE_SIZE").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        config.paging.default_size = 0;
        assert!(config.validate().is_err());

        config.paging.default_size = 10;
        config.paging.max_size = 5;
        assert!(config.validate().is_err());

        assert!(matches!(
            ShopConfig::from_yaml("paging: [1, 2]").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
