//! 集成测试共享工具模块
//!
//! 提供计划与语法树构造函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;

use partiql_compiler::core::{SetQuantifier, SortOrder, Value};
use partiql_compiler::query::ast::{
    AstNode, From, FromExpr, QueryBodySfw, SelectStar,
};
use partiql_compiler::query::plan::{
    Call, Filter, Limit, Operator, PathSymbol, Plan, Scan, Select, Sort, SortSpec, Struct,
    StructField,
};

/// `orders` 全表扫描
pub fn orders_scan() -> Operator {
    Scan::new(Operator::global("orders")).into()
}

/// 当前行的 `total` 字段
pub fn total() -> Operator {
    PathSymbol::new(Operator::var(0, 0), "total").into()
}

/// `SELECT ... FROM orders WHERE total > 100`
pub fn filtered_orders() -> Operator {
    Filter::new(
        orders_scan(),
        Call::new("gt", vec![total(), Operator::lit(100i64)]).into(),
    )
    .into()
}

/// 按 `total` 降序排列的订单
pub fn sorted_orders() -> Operator {
    Sort::new(
        filtered_orders(),
        vec![SortSpec::new(total(), SortOrder::DescNullsLast)],
    )
    .into()
}

/// `ORDER BY total DESC LIMIT n`
pub fn top_n_plan(limit: impl Into<Value>) -> Plan {
    Plan::new(Limit::new(sorted_orders(), Operator::lit(limit)).into())
}

/// `SELECT VALUE {'total': total} FROM orders ... ORDER BY total DESC`
pub fn select_orders() -> Plan {
    let constructor = Struct::new(vec![StructField::new(Operator::lit("total"), total())]);
    Plan::new(Select::new(sorted_orders(), constructor.into()).into())
}

/// 嵌套 `depth` 层 Scan 的计划
pub fn scan_chain(depth: usize) -> Operator {
    let mut op = Operator::global("t");
    for _ in 0..depth {
        op = Scan::new(op).into();
    }
    op
}

/// `SELECT [DISTINCT] * FROM t [WHERE cond]`
pub fn sfw_star(setq: Option<SetQuantifier>, condition: Option<AstNode>) -> AstNode {
    let from = From::new(vec![FromExpr::new(AstNode::var("t")).with_as(AstNode::id("x")).into()]);
    let sfw = QueryBodySfw::new(SelectStar::new(setq).into(), from.into());
    match condition {
        Some(condition) => sfw.with_where(condition).into(),
        None => sfw.into(),
    }
}
