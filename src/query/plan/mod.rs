//! 逻辑计划
//!
//! `Operator` 是编译器默认的输入树；`Plan<N>` 只是对根节点的不可变包装，
//! 编译过程从不修改计划。

pub mod operator;
pub mod validate;

pub use operator::{
    Call, Case, CaseBranch, Cast, Collection, Distinct, ErrOp, Exclude, Filter, Global, Join, Limit,
    Lit, Offset, PathIndex, PathKey, PathSymbol, Pivot, Project, ProjectAll, Scan, ScanIndexed,
    Select, SetOp, Sort, SortSpec, Struct, StructField, Subquery, TupleUnion, Unpivot, Var,
};
pub use validate::PlanValidator;

use serde::{Deserialize, Serialize};

use crate::core::Value;
use crate::query::tree::{NodeView, TreeNode};
use crate::query::visitor::PlanVisitor;

crate::define_node_enum! {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum Operator: OperatorKind, PlanVisitor {
        Scan(Scan) => visit_scan,
        ScanIndexed(ScanIndexed) => visit_scan_indexed,
        Unpivot(Unpivot) => visit_unpivot,
        Filter(Filter) => visit_filter,
        Project(Project) => visit_project,
        ProjectAll(ProjectAll) => visit_project_all,
        Limit(Limit) => visit_limit,
        Offset(Offset) => visit_offset,
        Distinct(Distinct) => visit_distinct,
        Sort(Sort) => visit_sort,
        Join(Join) => visit_join,
        Exclude(Exclude) => visit_exclude,
        SetOp(SetOp) => visit_set_op,
        Lit(Lit) => visit_lit,
        Var(Var) => visit_var,
        Global(Global) => visit_global,
        PathKey(PathKey) => visit_path_key,
        PathSymbol(PathSymbol) => visit_path_symbol,
        PathIndex(PathIndex) => visit_path_index,
        Call(Call) => visit_call,
        Case(Case) => visit_case,
        Cast(Cast) => visit_cast,
        Collection(Collection) => visit_collection,
        Struct(Struct) => visit_struct,
        TupleUnion(TupleUnion) => visit_tuple_union,
        Select(Select) => visit_select,
        Subquery(Subquery) => visit_subquery,
        Pivot(Pivot) => visit_pivot,
        Err(ErrOp) => visit_err,
    }
}

impl Operator {
    pub fn lit(value: impl Into<Value>) -> Self {
        Lit::new(value.into()).into()
    }

    pub fn global(name: impl Into<String>) -> Self {
        Global::new(name).into()
    }

    pub fn var(depth: usize, offset: usize) -> Self {
        Var::new(depth, offset).into()
    }

    /// 是否为关系算子
    pub fn is_relational(&self) -> bool {
        matches!(
            self.kind(),
            OperatorKind::Scan
                | OperatorKind::ScanIndexed
                | OperatorKind::Unpivot
                | OperatorKind::Filter
                | OperatorKind::Project
                | OperatorKind::ProjectAll
                | OperatorKind::Limit
                | OperatorKind::Offset
                | OperatorKind::Distinct
                | OperatorKind::Sort
                | OperatorKind::Join
                | OperatorKind::Exclude
                | OperatorKind::SetOp
        )
    }
}

/// 待编译的计划
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<N: TreeNode = Operator> {
    root: N,
}

impl<N: TreeNode> Plan<N> {
    pub fn new(root: N) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &N {
        &self.root
    }

    pub fn into_root(self) -> N {
        self.root
    }
}

impl<N: TreeNode> From<N> for Plan<N> {
    fn from(root: N) -> Self {
        Self::new(root)
    }
}

impl Plan<Operator> {
    /// 从 JSON 加载逻辑计划
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let root: Operator = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.root)
    }

    /// 计划引用的全局变量名，按首次出现的顺序去重
    pub fn globals(&self) -> Vec<String> {
        let mut names = Vec::new();
        GlobalCollector.visit(&self.root, &mut names);
        names
    }
}

struct GlobalCollector;

impl PlanVisitor<(), Vec<String>> for GlobalCollector {
    fn default_return(&mut self, _node: &dyn NodeView<Operator>, _names: &mut Vec<String>) {}

    fn visit_global(&mut self, node: &Global, names: &mut Vec<String>) {
        if !names.contains(&node.name) {
            names.push(node.name.clone());
        }
    }
}
