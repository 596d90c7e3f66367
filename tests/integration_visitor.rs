//! 访问者集成测试
//!
//! 测试范围:
//! - visitor::AstVisitor - 按类型分派与默认遍历
//! - visitor::PlanVisitor - 逻辑计划上的分析访问者
//! - visitor::TreeVisitor - 通用结构化遍历与统计

mod common;

use common::{filtered_orders, select_orders, sfw_star};
use partiql_compiler::core::{JoinType, SetQuantifier};
use partiql_compiler::query::ast::{
    self, AstKind, AstNode, ExcludePath, ExprOperator, GroupBy, GroupByKey, IdentifierCollector, Let,
    LetBinding, Query, QueryBodySfw, SelectItemExpr, SelectList, SelectStar,
};
use partiql_compiler::query::plan::{Join, Operator, Plan, Scan};
use partiql_compiler::query::tree::{NodeView, TreeNode};
use partiql_compiler::query::visitor::{AstVisitor, PlanStats, PlanVisitor, TreeVisitor};

/// 统计访问次数的语法树访问者
#[derive(Default)]
struct CountingVisitor {
    visits: usize,
}

impl AstVisitor<(), ()> for CountingVisitor {
    fn visit(&mut self, node: &AstNode, ctx: &mut ()) {
        self.visits += 1;
        node.accept(self, ctx)
    }

    fn default_return(&mut self, _node: &dyn NodeView<AstNode>, _ctx: &mut ()) {}
}

/// 前序记录节点类型
struct PreOrder;

impl TreeVisitor<AstNode> for PreOrder {
    type Result = ();
    type Context = Vec<AstKind>;

    fn visit(&mut self, node: &AstNode, kinds: &mut Vec<AstKind>) {
        kinds.push(node.kind());
        self.default_visit(node, kinds)
    }

    fn default_return(&mut self, _node: &AstNode, _kinds: &mut Vec<AstKind>) {}
}

fn full_sfw() -> AstNode {
    let select = SelectList::new(
        None,
        vec![SelectItemExpr::new(AstNode::var("x"), Some(AstNode::id("a"))).into()],
    );
    let from = ast::From::new(vec![ast::FromExpr::new(AstNode::var("t")).into()]);
    QueryBodySfw::new(select.into(), from.into())
        .with_exclude(
            ast::Exclude::new(vec![ExcludePath::new(AstNode::var("t"), vec![]).into()]).into(),
        )
        .with_let(Let::new(vec![LetBinding::new(AstNode::lit(1i64), AstNode::id("one")).into()]).into())
        .with_where(AstNode::lit(true))
        .with_group_by(GroupBy::new(vec![GroupByKey::new(AstNode::var("x"), None).into()]).into())
        .with_having(ExprOperator::binary(">", AstNode::var("x"), AstNode::lit(0i64)).into())
        .into()
}

#[test]
fn test_every_node_visited_exactly_once() {
    let query: AstNode = Query::new(full_sfw()).into();
    let mut counter = CountingVisitor::default();
    counter.visit(&query, &mut ());

    let stats = PlanStats::collect(&query);
    assert_eq!(counter.visits, stats.node_count);
    assert_eq!(stats.count_of("Query"), 1);
    assert_eq!(stats.count_of("QueryBodySfw"), 1);
}

#[test]
fn test_sfw_clauses_visited_in_declaration_order() {
    let mut kinds = Vec::new();
    PreOrder.visit(&full_sfw(), &mut kinds);

    let clause_kinds = [
        AstKind::SelectList,
        AstKind::Exclude,
        AstKind::From,
        AstKind::Let,
        AstKind::GroupBy,
        AstKind::ExprOperator,
    ];
    let clauses: Vec<AstKind> = kinds
        .iter()
        .copied()
        .filter(|k| clause_kinds.contains(k))
        .collect();
    assert_eq!(kinds[0], AstKind::QueryBodySfw);
    assert_eq!(clauses, clause_kinds.to_vec());

    let direct: Vec<AstKind> = full_sfw().children().iter().map(|c| c.kind()).collect();
    assert_eq!(
        direct,
        vec![
            AstKind::SelectList,
            AstKind::Exclude,
            AstKind::From,
            AstKind::Let,
            AstKind::ExprLit,
            AstKind::GroupBy,
            AstKind::ExprOperator,
        ]
    );
}

/// 只关心 SELECT * 的访问者
struct DistinctStarFinder;

impl AstVisitor<(), Vec<bool>> for DistinctStarFinder {
    fn default_return(&mut self, _node: &dyn NodeView<AstNode>, _found: &mut Vec<bool>) {}

    fn visit_select_star(&mut self, node: &SelectStar, found: &mut Vec<bool>) {
        found.push(node.setq == Some(SetQuantifier::Distinct));
    }
}

#[test]
fn test_overridden_callback_receives_typed_payload() {
    let mut found = Vec::new();
    DistinctStarFinder.visit(&sfw_star(Some(SetQuantifier::Distinct), None), &mut found);
    DistinctStarFinder.visit(&sfw_star(None, Some(AstNode::lit(true))), &mut found);
    assert_eq!(found, vec![true, false]);
}

/// 统计扫描次数，其他节点保持默认遍历
struct ScanCounter;

impl PlanVisitor<(), usize> for ScanCounter {
    fn default_return(&mut self, _node: &dyn NodeView<Operator>, _count: &mut usize) {}

    fn visit_scan(&mut self, node: &Scan, count: &mut usize) {
        *count += 1;
        self.default_visit(node, count)
    }
}

#[test]
fn test_plan_visitor_descends_through_default_visit() {
    let join: Operator = Join::new(
        Scan::new(Scan::new(Operator::global("a")).into()).into(),
        filtered_orders(),
        Operator::lit(true),
        JoinType::Left,
    )
    .into();
    let mut count = 0;
    ScanCounter.visit(&join, &mut count);
    assert_eq!(count, 3);
}

#[test]
fn test_plan_globals_and_stats() {
    let plan = select_orders();
    assert_eq!(plan.globals(), vec!["orders"]);

    let stats = PlanStats::collect(plan.root());
    assert_eq!(stats.count_of("Select"), 1);
    assert_eq!(stats.count_of("Scan"), 1);
    assert!(stats.max_depth >= 4);

    let joined = Plan::new(Operator::from(Join::new(
        Operator::global("b"),
        Operator::global("a"),
        Operator::lit(true),
        JoinType::Inner,
    )));
    assert_eq!(joined.globals(), vec!["b", "a"]);
}

#[test]
fn test_identifier_collector_on_full_query() {
    let names = IdentifierCollector::collect(&Query::new(full_sfw()).into());
    assert_eq!(names, vec!["x", "t", "t", "x", "x"]);
}
