//! 语法树与逻辑计划共享的标量属性类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 集合量词（SELECT ALL / SELECT DISTINCT，UNION ALL / UNION DISTINCT）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SetQuantifier {
    #[default]
    All,
    Distinct,
}

impl SetQuantifier {
    pub fn is_distinct(self) -> bool {
        matches!(self, SetQuantifier::Distinct)
    }
}

/// 集合运算类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

impl fmt::Display for SetOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOpKind::Union => write!(f, "UNION"),
            SetOpKind::Intersect => write!(f, "INTERSECT"),
            SetOpKind::Except => write!(f, "EXCEPT"),
        }
    }
}

/// 连接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

/// 排序方向与空值位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    AscNullsLast,
    AscNullsFirst,
    DescNullsLast,
    DescNullsFirst,
}

/// 集合构造类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Array,
    Bag,
}

/// 子查询的强制转换方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coercion {
    Scalar,
    Row,
}

/// EXCLUDE 路径的单步
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExcludeStep {
    StructField(String),
    CollIndex(usize),
    StructWildcard,
    CollWildcard,
}

/// EXCLUDE 路径：根变量偏移加若干步
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExcludePath {
    pub root: usize,
    pub steps: Vec<ExcludeStep>,
}

impl ExcludePath {
    pub fn new(root: usize, steps: Vec<ExcludeStep>) -> Self {
        Self { root, steps }
    }
}
