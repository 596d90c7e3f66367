//! 逻辑算子载荷
//!
//! 关系算子与标量算子共用一个 `Operator` 枚举，子节点统一以 `Operator` 表示。
//! `children()` 按字段声明顺序返回；`Sort`、`Case`、`Struct` 的复合字段按元素展开。

use serde::{Deserialize, Serialize};

use super::{Operator, OperatorKind};
use crate::core::{
    Coercion, CollectionKind, ExcludePath, JoinType, SetOpKind, SetQuantifier, SortOrder, Value,
};
use crate::query::tree::NodeView;

fn boxed(op: Operator) -> Box<Operator> {
    Box::new(op)
}

macro_rules! impl_node_view {
    ($payload:ty, |$this:ident| $children:expr) => {
        impl NodeView<Operator> for $payload {
            fn kind(&self) -> OperatorKind {
                Self::KIND
            }

            fn children(&self) -> Vec<&Operator> {
                let $this = self;
                $children
            }
        }
    };
    ($payload:ty, |$this:ident| $children:expr, check: |$chk:ident| $check:expr) => {
        impl NodeView<Operator> for $payload {
            fn kind(&self) -> OperatorKind {
                Self::KIND
            }

            fn children(&self) -> Vec<&Operator> {
                let $this = self;
                $children
            }

            fn check(&self) -> Result<(), String> {
                let $chk = self;
                $check
            }
        }
    };
}

// ==================== 关系算子 ====================

/// 全表扫描
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub rex: Box<Operator>,
}

impl Scan {
    pub fn new(rex: Operator) -> Self {
        Self { rex: boxed(rex) }
    }
}

impl_node_view!(Scan, |s| vec![s.rex.as_ref()]);

/// 带位置的扫描（`FROM t AT i`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanIndexed {
    pub rex: Box<Operator>,
}

impl ScanIndexed {
    pub fn new(rex: Operator) -> Self {
        Self { rex: boxed(rex) }
    }
}

impl_node_view!(ScanIndexed, |s| vec![s.rex.as_ref()]);

/// UNPIVOT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unpivot {
    pub rex: Box<Operator>,
}

impl Unpivot {
    pub fn new(rex: Operator) -> Self {
        Self { rex: boxed(rex) }
    }
}

impl_node_view!(Unpivot, |s| vec![s.rex.as_ref()]);

/// 过滤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub input: Box<Operator>,
    pub predicate: Box<Operator>,
}

impl Filter {
    pub fn new(input: Operator, predicate: Operator) -> Self {
        Self {
            input: boxed(input),
            predicate: boxed(predicate),
        }
    }
}

impl_node_view!(Filter, |s| vec![s.input.as_ref(), s.predicate.as_ref()]);

/// 投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub input: Box<Operator>,
    pub projections: Vec<Operator>,
}

impl Project {
    pub fn new(input: Operator, projections: Vec<Operator>) -> Self {
        Self {
            input: boxed(input),
            projections,
        }
    }
}

impl_node_view!(
    Project,
    |s| {
        let mut kids = vec![s.input.as_ref()];
        kids.extend(s.projections.iter());
        kids
    },
    check: |s| {
        if s.projections.is_empty() {
            return Err("投影列表为空".to_string());
        }
        Ok(())
    }
);

/// 投影全部列（`SELECT *`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAll {
    pub input: Box<Operator>,
    #[serde(default)]
    pub quantifier: SetQuantifier,
}

impl ProjectAll {
    pub fn new(input: Operator, quantifier: SetQuantifier) -> Self {
        Self {
            input: boxed(input),
            quantifier,
        }
    }
}

impl_node_view!(ProjectAll, |s| vec![s.input.as_ref()]);

/// LIMIT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub input: Box<Operator>,
    pub limit: Box<Operator>,
}

impl Limit {
    pub fn new(input: Operator, limit: Operator) -> Self {
        Self {
            input: boxed(input),
            limit: boxed(limit),
        }
    }
}

impl_node_view!(Limit, |s| vec![s.input.as_ref(), s.limit.as_ref()]);

/// OFFSET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub input: Box<Operator>,
    pub offset: Box<Operator>,
}

impl Offset {
    pub fn new(input: Operator, offset: Operator) -> Self {
        Self {
            input: boxed(input),
            offset: boxed(offset),
        }
    }
}

impl_node_view!(Offset, |s| vec![s.input.as_ref(), s.offset.as_ref()]);

/// 去重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distinct {
    pub input: Box<Operator>,
}

impl Distinct {
    pub fn new(input: Operator) -> Self {
        Self { input: boxed(input) }
    }
}

impl_node_view!(Distinct, |s| vec![s.input.as_ref()]);

/// 排序键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub rex: Operator,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(rex: Operator, order: SortOrder) -> Self {
        Self { rex, order }
    }
}

/// 排序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub input: Box<Operator>,
    pub specs: Vec<SortSpec>,
}

impl Sort {
    pub fn new(input: Operator, specs: Vec<SortSpec>) -> Self {
        Self {
            input: boxed(input),
            specs,
        }
    }
}

impl_node_view!(
    Sort,
    |s| {
        let mut kids = vec![s.input.as_ref()];
        kids.extend(s.specs.iter().map(|spec| &spec.rex));
        kids
    },
    check: |s| {
        if s.specs.is_empty() {
            return Err("排序键为空".to_string());
        }
        Ok(())
    }
);

/// 连接
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub lhs: Box<Operator>,
    pub rhs: Box<Operator>,
    pub condition: Box<Operator>,
    pub join_type: JoinType,
}

impl Join {
    pub fn new(lhs: Operator, rhs: Operator, condition: Operator, join_type: JoinType) -> Self {
        Self {
            lhs: boxed(lhs),
            rhs: boxed(rhs),
            condition: boxed(condition),
            join_type,
        }
    }
}

impl_node_view!(Join, |s| vec![
    s.lhs.as_ref(),
    s.rhs.as_ref(),
    s.condition.as_ref()
]);

/// EXCLUDE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclude {
    pub input: Box<Operator>,
    pub paths: Vec<ExcludePath>,
}

impl Exclude {
    pub fn new(input: Operator, paths: Vec<ExcludePath>) -> Self {
        Self {
            input: boxed(input),
            paths,
        }
    }
}

impl_node_view!(
    Exclude,
    |s| vec![s.input.as_ref()],
    check: |s| {
        if s.paths.is_empty() {
            return Err("EXCLUDE 路径为空".to_string());
        }
        Ok(())
    }
);

/// 集合运算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOp {
    pub kind: SetOpKind,
    #[serde(default)]
    pub quantifier: SetQuantifier,
    pub lhs: Box<Operator>,
    pub rhs: Box<Operator>,
}

impl SetOp {
    pub fn new(kind: SetOpKind, quantifier: SetQuantifier, lhs: Operator, rhs: Operator) -> Self {
        Self {
            kind,
            quantifier,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        }
    }
}

impl_node_view!(SetOp, |s| vec![s.lhs.as_ref(), s.rhs.as_ref()]);

// ==================== 标量算子 ====================

/// 字面量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lit {
    pub value: Value,
}

impl Lit {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl_node_view!(Lit, |_s| Vec::new());

/// 变量引用，`depth` 为向外跨越的作用域层数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    #[serde(default)]
    pub depth: usize,
    pub offset: usize,
}

impl Var {
    pub fn new(depth: usize, offset: usize) -> Self {
        Self { depth, offset }
    }

    pub fn local(offset: usize) -> Self {
        Self::new(0, offset)
    }
}

impl_node_view!(Var, |_s| Vec::new());

/// 全局变量（目录中的表）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub name: String,
}

impl Global {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl_node_view!(Global, |_s| Vec::new());

/// 按键访问：`root[key]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathKey {
    pub root: Box<Operator>,
    pub key: Box<Operator>,
}

impl PathKey {
    pub fn new(root: Operator, key: Operator) -> Self {
        Self {
            root: boxed(root),
            key: boxed(key),
        }
    }
}

impl_node_view!(PathKey, |s| vec![s.root.as_ref(), s.key.as_ref()]);

/// 按符号访问：`root.symbol`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSymbol {
    pub root: Box<Operator>,
    pub symbol: String,
}

impl PathSymbol {
    pub fn new(root: Operator, symbol: impl Into<String>) -> Self {
        Self {
            root: boxed(root),
            symbol: symbol.into(),
        }
    }
}

impl_node_view!(PathSymbol, |s| vec![s.root.as_ref()]);

/// 按下标访问：`root[index]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathIndex {
    pub root: Box<Operator>,
    pub index: Box<Operator>,
}

impl PathIndex {
    pub fn new(root: Operator, index: Operator) -> Self {
        Self {
            root: boxed(root),
            index: boxed(index),
        }
    }
}

impl_node_view!(PathIndex, |s| vec![s.root.as_ref(), s.index.as_ref()]);

/// 函数调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub function: String,
    #[serde(default)]
    pub args: Vec<Operator>,
}

impl Call {
    pub fn new(function: impl Into<String>, args: Vec<Operator>) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }
}

impl_node_view!(
    Call,
    |s| s.args.iter().collect(),
    check: |s| {
        if s.function.trim().is_empty() {
            return Err("函数名为空".to_string());
        }
        Ok(())
    }
);

/// CASE 分支
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBranch {
    pub condition: Operator,
    pub result: Operator,
}

impl CaseBranch {
    pub fn new(condition: Operator, result: Operator) -> Self {
        Self { condition, result }
    }
}

/// CASE WHEN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub branches: Vec<CaseBranch>,
    pub default: Box<Operator>,
}

impl Case {
    pub fn new(branches: Vec<CaseBranch>, default: Operator) -> Self {
        Self {
            branches,
            default: boxed(default),
        }
    }
}

impl_node_view!(
    Case,
    |s| {
        let mut kids = Vec::with_capacity(s.branches.len() * 2 + 1);
        for branch in &s.branches {
            kids.push(&branch.condition);
            kids.push(&branch.result);
        }
        kids.push(s.default.as_ref());
        kids
    },
    check: |s| {
        if s.branches.is_empty() {
            return Err("CASE 至少需要一个分支".to_string());
        }
        Ok(())
    }
);

/// 类型转换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub arg: Box<Operator>,
    pub target: String,
}

impl Cast {
    pub fn new(arg: Operator, target: impl Into<String>) -> Self {
        Self {
            arg: boxed(arg),
            target: target.into(),
        }
    }
}

impl_node_view!(Cast, |s| vec![s.arg.as_ref()]);

/// 数组或包构造
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub kind: CollectionKind,
    #[serde(default)]
    pub values: Vec<Operator>,
}

impl Collection {
    pub fn new(kind: CollectionKind, values: Vec<Operator>) -> Self {
        Self { kind, values }
    }
}

impl_node_view!(Collection, |s| s.values.iter().collect());

/// 结构体字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub key: Operator,
    pub value: Operator,
}

impl StructField {
    pub fn new(key: Operator, value: Operator) -> Self {
        Self { key, value }
    }
}

/// 结构体构造
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    #[serde(default)]
    pub fields: Vec<StructField>,
}

impl Struct {
    pub fn new(fields: Vec<StructField>) -> Self {
        Self { fields }
    }
}

impl_node_view!(Struct, |s| {
    let mut kids = Vec::with_capacity(s.fields.len() * 2);
    for field in &s.fields {
        kids.push(&field.key);
        kids.push(&field.value);
    }
    kids
});

/// 元组合并（`SELECT a.*, b.*`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleUnion {
    #[serde(default)]
    pub args: Vec<Operator>,
}

impl TupleUnion {
    pub fn new(args: Vec<Operator>) -> Self {
        Self { args }
    }
}

impl_node_view!(TupleUnion, |s| s.args.iter().collect());

/// SELECT 表达式：关系加上每行的构造器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub rel: Box<Operator>,
    pub constructor: Box<Operator>,
}

impl Select {
    pub fn new(rel: Operator, constructor: Operator) -> Self {
        Self {
            rel: boxed(rel),
            constructor: boxed(constructor),
        }
    }
}

impl_node_view!(Select, |s| vec![s.rel.as_ref(), s.constructor.as_ref()]);

/// 子查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subquery {
    pub rel: Box<Operator>,
    pub constructor: Box<Operator>,
    pub coercion: Coercion,
}

impl Subquery {
    pub fn new(rel: Operator, constructor: Operator, coercion: Coercion) -> Self {
        Self {
            rel: boxed(rel),
            constructor: boxed(constructor),
            coercion,
        }
    }
}

impl_node_view!(Subquery, |s| vec![s.rel.as_ref(), s.constructor.as_ref()]);

/// PIVOT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub rel: Box<Operator>,
    pub key: Box<Operator>,
    pub value: Box<Operator>,
}

impl Pivot {
    pub fn new(rel: Operator, key: Operator, value: Operator) -> Self {
        Self {
            rel: boxed(rel),
            key: boxed(key),
            value: boxed(value),
        }
    }
}

impl_node_view!(Pivot, |s| vec![
    s.rel.as_ref(),
    s.key.as_ref(),
    s.value.as_ref()
]);

/// 计划构建阶段遗留的错误标记，出现即视为畸形计划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrOp {
    pub message: String,
}

impl ErrOp {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl_node_view!(
    ErrOp,
    |_s| Vec::new(),
    check: |s| Err(format!("计划中包含错误节点: {}", s.message))
);
