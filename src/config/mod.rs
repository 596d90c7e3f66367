use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{ConfigError, Mode};

/// 编译器选项
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompilerOptions {
    /// `prepare_default` 使用的模式
    pub default_mode: Mode,
    /// 计划树允许的最大深度，根节点深度为 0
    pub max_plan_depth: usize,
    /// 是否在 debug 级别记录每个节点选中的策略
    pub trace_strategies: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            default_mode: Mode::Strict,
            max_plan_depth: 512,
            trace_strategies: false,
        }
    }
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "partiql-compiler".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub compiler: CompilerOptions,
    pub log: LogConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
