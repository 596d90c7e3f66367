//! 统一错误处理
//!
//! ## 设计理念
//!
//! 1. 编译期错误集中在 `CompileError`，任何一种错误都会中止本次 `prepare`，不会返回部分结果
//! 2. 每个错误都携带出错节点的类型名与其在计划树中的位置
//! 3. 配置与日志相关的外部错误通过 `#[from]` 自动转换为 `ConfigError`

use crate::query::tree::NodePath;
use std::fmt;
use thiserror::Error;

/// 计划编译错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// 没有任何已注册策略能匹配该逻辑算子
    #[error("不支持的算子 {kind}（位置 {path}）：没有匹配的策略")]
    UnsupportedOperator { kind: String, path: NodePath },

    /// 节点属性与其子节点视图不一致，属于计划构建方的编程错误
    #[error("畸形计划节点 {kind}（位置 {path}）：{reason}")]
    MalformedPlan {
        kind: String,
        path: NodePath,
        reason: String,
    },

    /// 策略自身的转换失败，原样上抛
    #[error("策略 {strategy} 转换 {kind} 失败（位置 {path}）：{reason}")]
    ConversionFailure {
        strategy: String,
        kind: String,
        path: NodePath,
        reason: String,
    },

    /// 计划树深度超过配置上限
    #[error("计划深度 {depth} 超过上限 {limit}：节点 {kind}（位置 {path}）")]
    PlanTooDeep {
        kind: String,
        path: NodePath,
        depth: usize,
        limit: usize,
    },
}

impl CompileError {
    pub fn unsupported_operator(kind: impl fmt::Display, path: NodePath) -> Self {
        Self::UnsupportedOperator {
            kind: kind.to_string(),
            path,
        }
    }

    pub fn malformed_plan(kind: impl fmt::Display, path: NodePath, reason: impl Into<String>) -> Self {
        Self::MalformedPlan {
            kind: kind.to_string(),
            path,
            reason: reason.into(),
        }
    }

    pub fn conversion_failure(
        strategy: impl Into<String>,
        kind: impl fmt::Display,
        path: NodePath,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConversionFailure {
            strategy: strategy.into(),
            kind: kind.to_string(),
            path,
            reason: reason.into(),
        }
    }

    pub fn plan_too_deep(kind: impl fmt::Display, path: NodePath, limit: usize) -> Self {
        Self::PlanTooDeep {
            kind: kind.to_string(),
            depth: path.depth(),
            path,
            limit,
        }
    }

    /// 出错节点的类型名
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::UnsupportedOperator { kind, .. }
            | Self::MalformedPlan { kind, .. }
            | Self::ConversionFailure { kind, .. }
            | Self::PlanTooDeep { kind, .. } => Some(kind),
        }
    }

    /// 出错节点在计划树中的位置
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::UnsupportedOperator { path, .. }
            | Self::MalformedPlan { path, .. }
            | Self::ConversionFailure { path, .. }
            | Self::PlanTooDeep { path, .. } => Some(path),
        }
    }

    pub fn is_unsupported_operator(&self) -> bool {
        matches!(self, Self::UnsupportedOperator { .. })
    }
}

/// 编译结果类型
pub type CompileResult<T> = Result<T, CompileError>;

/// 配置与日志初始化错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("序列化配置失败: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("日志初始化失败: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}
