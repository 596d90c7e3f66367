//! 语法树
//!
//! `AstNode` 是语法层的节点枚举。策略编译器并不限定输入必须是逻辑计划，
//! 任何实现了 `TreeNode` 的树都可以作为输入，语法树就是其中之一。

pub mod analysis;
pub mod nodes;

pub use analysis::IdentifierCollector;
pub use nodes::{
    Exclude, ExcludePath, ExprAnd, ExprCall, ExprLit, ExprNot, ExprOperator, ExprOr, ExprPath,
    ExprVarRef, From, FromExpr, GroupBy, GroupByKey, Identifier, IdentifierChain, Let,
    LetBinding, PathStepElement, PathStepField, Query, QueryBodySetOp, QueryBodySfw, SelectItemExpr,
    SelectList, SelectStar, SelectValue, SetOp,
};

use crate::query::visitor::AstVisitor;

crate::define_node_enum! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum AstNode: AstKind, AstVisitor {
        Query(Query) => visit_query,
        QueryBodySfw(QueryBodySfw) => visit_query_body_sfw,
        QueryBodySetOp(QueryBodySetOp) => visit_query_body_set_op,
        SetOp(SetOp) => visit_set_op,
        SelectStar(SelectStar) => visit_select_star,
        SelectList(SelectList) => visit_select_list,
        SelectItemExpr(SelectItemExpr) => visit_select_item_expr,
        SelectValue(SelectValue) => visit_select_value,
        Exclude(Exclude) => visit_exclude,
        ExcludePath(ExcludePath) => visit_exclude_path,
        From(From) => visit_from,
        FromExpr(FromExpr) => visit_from_expr,
        Let(Let) => visit_let,
        LetBinding(LetBinding) => visit_let_binding,
        GroupBy(GroupBy) => visit_group_by,
        GroupByKey(GroupByKey) => visit_group_by_key,
        Identifier(Identifier) => visit_identifier,
        IdentifierChain(IdentifierChain) => visit_identifier_chain,
        ExprLit(ExprLit) => visit_expr_lit,
        ExprVarRef(ExprVarRef) => visit_expr_var_ref,
        ExprCall(ExprCall) => visit_expr_call,
        ExprOperator(ExprOperator) => visit_expr_operator,
        ExprAnd(ExprAnd) => visit_expr_and,
        ExprOr(ExprOr) => visit_expr_or,
        ExprNot(ExprNot) => visit_expr_not,
        ExprPath(ExprPath) => visit_expr_path,
        PathStepField(PathStepField) => visit_path_step_field,
        PathStepElement(PathStepElement) => visit_path_step_element,
    }
}

impl AstNode {
    /// 以 `name` 为普通标识符的变量引用
    pub fn var(name: &str) -> Self {
        ExprVarRef::named(name).into()
    }

    pub fn lit(value: impl Into<crate::core::Value>) -> Self {
        ExprLit::new(value.into()).into()
    }

    pub fn id(name: &str) -> Self {
        Identifier::regular(name).into()
    }
}
