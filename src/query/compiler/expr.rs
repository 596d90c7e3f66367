//! 物理表达式
//!
//! 标准策略集的输出词汇，是与求值器之间的约定。
//! 宽松模式下扫描类算子带 `permissive` 标记，投影与构造出的值包裹在 `Permissive` 中。

use serde::{Deserialize, Serialize};

use crate::core::{
    Coercion, CollectionKind, ExcludePath, JoinType, Mode, SetOpKind, SortOrder, Value,
};

/// 物理排序键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub expr: Expr,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(expr: Expr, order: SortOrder) -> Self {
        Self { expr, order }
    }
}

/// 物理表达式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    // ==================== 关系 ====================
    Scan {
        rex: Box<Expr>,
        permissive: bool,
    },
    ScanIndexed {
        rex: Box<Expr>,
        permissive: bool,
    },
    Unpivot {
        rex: Box<Expr>,
        permissive: bool,
    },
    Filter {
        input: Box<Expr>,
        predicate: Box<Expr>,
    },
    Project {
        input: Box<Expr>,
        projections: Vec<Expr>,
    },
    ProjectAll {
        input: Box<Expr>,
        distinct: bool,
    },
    Limit {
        input: Box<Expr>,
        limit: Box<Expr>,
    },
    Offset {
        input: Box<Expr>,
        offset: Box<Expr>,
    },
    /// LIMIT 直接作用在 SORT 上时合并出的堆排序
    TopN {
        input: Box<Expr>,
        specs: Vec<SortKey>,
        limit: u64,
    },
    Distinct {
        input: Box<Expr>,
    },
    Sort {
        input: Box<Expr>,
        specs: Vec<SortKey>,
    },
    Join {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        condition: Box<Expr>,
        join_type: JoinType,
    },
    Exclude {
        input: Box<Expr>,
        paths: Vec<ExcludePath>,
    },
    SetOp {
        kind: SetOpKind,
        distinct: bool,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    // ==================== 标量 ====================
    Literal(Value),
    VarLocal {
        offset: usize,
    },
    VarOuter {
        depth: usize,
        offset: usize,
    },
    Global {
        name: String,
    },
    PathKey {
        root: Box<Expr>,
        key: Box<Expr>,
    },
    PathSymbol {
        root: Box<Expr>,
        symbol: String,
    },
    PathIndex {
        root: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        function: String,
        args: Vec<Expr>,
    },
    Case {
        branches: Vec<(Expr, Expr)>,
        default: Box<Expr>,
    },
    Cast {
        arg: Box<Expr>,
        target: String,
    },
    Collection {
        kind: CollectionKind,
        values: Vec<Expr>,
    },
    Struct {
        fields: Vec<(Expr, Expr)>,
    },
    TupleUnion {
        args: Vec<Expr>,
    },
    Select {
        rel: Box<Expr>,
        constructor: Box<Expr>,
        ordered: bool,
    },
    Subquery {
        rel: Box<Expr>,
        constructor: Box<Expr>,
        coercion: Coercion,
    },
    Pivot {
        rel: Box<Expr>,
        key: Box<Expr>,
        value: Box<Expr>,
        permissive: bool,
    },
    /// 宽松模式下的值包装：求值出错时返回 MISSING
    Permissive(Box<Expr>),
}

impl Expr {
    /// 按模式包装值表达式，严格模式原样返回
    pub fn mode_handled(self, mode: Mode) -> Self {
        match mode {
            Mode::Strict => self,
            Mode::Permissive => match self {
                already @ Expr::Permissive(_) => already,
                other => Expr::Permissive(Box::new(other)),
            },
        }
    }

    /// 去掉宽松模式包装
    pub fn unwrap_permissive(&self) -> &Expr {
        match self {
            Expr::Permissive(inner) => inner.unwrap_permissive(),
            other => other,
        }
    }

    /// 物理算子名称，用于日志与错误信息
    pub fn name(&self) -> &'static str {
        match self {
            Expr::Scan { .. } => "Scan",
            Expr::ScanIndexed { .. } => "ScanIndexed",
            Expr::Unpivot { .. } => "Unpivot",
            Expr::Filter { .. } => "Filter",
            Expr::Project { .. } => "Project",
            Expr::ProjectAll { .. } => "ProjectAll",
            Expr::Limit { .. } => "Limit",
            Expr::Offset { .. } => "Offset",
            Expr::TopN { .. } => "TopN",
            Expr::Distinct { .. } => "Distinct",
            Expr::Sort { .. } => "Sort",
            Expr::Join { .. } => "Join",
            Expr::Exclude { .. } => "Exclude",
            Expr::SetOp { .. } => "SetOp",
            Expr::Literal(_) => "Literal",
            Expr::VarLocal { .. } => "VarLocal",
            Expr::VarOuter { .. } => "VarOuter",
            Expr::Global { .. } => "Global",
            Expr::PathKey { .. } => "PathKey",
            Expr::PathSymbol { .. } => "PathSymbol",
            Expr::PathIndex { .. } => "PathIndex",
            Expr::Call { .. } => "Call",
            Expr::Case { .. } => "Case",
            Expr::Cast { .. } => "Cast",
            Expr::Collection { .. } => "Collection",
            Expr::Struct { .. } => "Struct",
            Expr::TupleUnion { .. } => "TupleUnion",
            Expr::Select { .. } => "Select",
            Expr::Subquery { .. } => "Subquery",
            Expr::Pivot { .. } => "Pivot",
            Expr::Permissive(_) => "Permissive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_mode_leaves_expr_untouched() {
        let lit = Expr::Literal(Value::Int(1));
        assert_eq!(lit.clone().mode_handled(Mode::Strict), lit);
    }

    #[test]
    fn test_permissive_wraps_once() {
        let lit = Expr::Literal(Value::Int(1));
        let wrapped = lit.clone().mode_handled(Mode::Permissive);
        assert_eq!(wrapped, Expr::Permissive(Box::new(lit.clone())));
        assert_eq!(wrapped.clone().mode_handled(Mode::Permissive), wrapped);
        assert_eq!(wrapped.unwrap_permissive(), &lit);
        assert_eq!(wrapped.name(), "Permissive");
    }
}
