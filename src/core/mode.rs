//! 编译模式
//!
//! 模式是一个枚举值而不是可变对象，按值传入 `prepare`。
//! 编译器本身只负责把模式标记到 Statement 上，具体语义由各策略与求值器决定。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 编译模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 严格模式：类型错误与数据缺失在求值时直接报错
    #[default]
    Strict,
    /// 宽松模式：类型错误在求值时转换为 MISSING
    Permissive,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Strict => "strict",
            Mode::Permissive => "permissive",
        }
    }

    pub fn is_permissive(self) -> bool {
        matches!(self, Mode::Permissive)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Mode::Strict),
            "permissive" => Ok(Mode::Permissive),
            other => Err(format!("未知的编译模式: {}", other)),
        }
    }
}
