//! 计划编译器集成测试
//!
//! 测试范围:
//! - compiler::pattern - 精确类型匹配与子节点数量约束
//! - compiler::plan_compiler - 策略选择顺序、自底向上编译、错误传播
//! - compiler::standard - 标准策略集与模式处理
//! - 语法树作为输入的端到端编译

mod common;

use std::sync::Arc;
use std::thread;

use common::assertions::{assert_err_with, assert_malformed, assert_ok, assert_unsupported};
use common::{filtered_orders, orders_scan, scan_chain, select_orders, sfw_star, top_n_plan};
use partiql_compiler::config::CompilerOptions;
use partiql_compiler::core::{CompileError, JoinType, Mode, SetQuantifier, Value};
use partiql_compiler::query::ast::{AstKind, AstNode};
use partiql_compiler::query::compiler::{
    standard_strategies, Expr, Match, Pattern, PartiQLCompiler, Strategy, StrategyFn,
};
use partiql_compiler::query::plan::{
    ErrOp, Filter, Join, Operator, OperatorKind, Pivot, Plan, Project, ScanIndexed, Select, Sort,
};
use partiql_compiler::query::tree::TreeNode;

fn label(name: &'static str, kind: OperatorKind) -> StrategyFn<Operator, String> {
    StrategyFn::new(name, Pattern::new(kind), move |_m| Ok(name.to_string()))
}

// ==================== 策略选择 ====================

#[test]
fn test_first_registered_strategy_wins() {
    let node = Operator::global("t");

    let ab = PartiQLCompiler::builder()
        .add_strategy(label("S1", OperatorKind::Global))
        .add_strategy(label("S2", OperatorKind::Global))
        .build();
    assert_eq!(ab.select(&node).map(|s| s.name()), Some("S1"));

    let ba = PartiQLCompiler::builder()
        .add_strategy(label("S2", OperatorKind::Global))
        .add_strategy(label("S1", OperatorKind::Global))
        .build();
    assert_eq!(ba.select(&node).map(|s| s.name()), Some("S2"));

    let plan = Plan::new(node);
    assert_eq!(assert_ok(ab.prepare(&plan, Mode::Strict)).into_root(), "S1");
    assert_eq!(assert_ok(ba.prepare(&plan, Mode::Strict)).into_root(), "S2");
}

#[test]
fn test_exact_kind_matching() {
    let compiler = PartiQLCompiler::builder()
        .add_strategy(label("ScanOnly", OperatorKind::Scan))
        .build();
    let indexed: Operator =
        ScanIndexed::new(Operator::global("t")).into();
    assert!(compiler.select(&indexed).is_none());
    assert!(compiler.select(&orders_scan()).is_some());

    let sfw = Pattern::<AstNode>::new(AstKind::QueryBodySfw);
    assert!(sfw.matches(&sfw_star(None, None)));
    assert!(!sfw.matches(&AstNode::var("t")));
}

#[test]
fn test_child_count_mismatch_is_hard_failure() {
    let two_children = |kind: OperatorKind| {
        Pattern::<Operator>::new(kind)
            .with_predicate(|_| true)
            .with_children(vec![
                Pattern::new(OperatorKind::Global).with_predicate(|_| true),
                Pattern::new(OperatorKind::Global).with_predicate(|_| true),
            ])
    };

    // 一个子节点
    let scan = orders_scan();
    assert_eq!(scan.children().len(), 1);
    assert!(!two_children(OperatorKind::Scan).matches(&scan));

    // 三个子节点
    let join: Operator = Join::new(
        Operator::global("a"),
        Operator::global("b"),
        Operator::lit(true),
        JoinType::Inner,
    )
    .into();
    assert_eq!(join.children().len(), 3);
    assert!(!two_children(OperatorKind::Join).matches(&join));

    // 空的子节点模式列表不约束子节点
    let unconstrained = |kind: OperatorKind| Pattern::<Operator>::new(kind).with_children(vec![]);
    assert!(unconstrained(OperatorKind::Scan).matches(&scan));
    assert!(unconstrained(OperatorKind::Join).matches(&join));
}

// ==================== 编译结果 ====================

#[test]
fn test_prepare_is_deterministic() {
    let compiler = PartiQLCompiler::standard();
    let plan = select_orders();
    let first = assert_ok(compiler.prepare(&plan, Mode::Strict));
    let second = assert_ok(compiler.prepare(&plan, Mode::Strict));
    assert_eq!(first, second);
}

#[test]
fn test_standard_lowering_of_filter_scan() {
    let stmt = assert_ok(PartiQLCompiler::standard().prepare(&Plan::new(filtered_orders()), Mode::Strict));
    match stmt.root() {
        Expr::Filter { input, predicate } => {
            assert_eq!(
                input.as_ref(),
                &Expr::Scan {
                    rex: Box::new(Expr::Global { name: "orders".into() }),
                    permissive: false,
                }
            );
            match predicate.as_ref() {
                Expr::Call { function, args } => {
                    assert_eq!(function, "gt");
                    assert_eq!(args.len(), 2);
                    assert_eq!(args[1], Expr::Literal(Value::Int(100)));
                }
                other => panic!("unexpected predicate {:?}", other),
            }
        }
        other => panic!("unexpected root {:?}", other),
    }
}

#[test]
fn test_limit_over_sort_fuses_into_top_n() {
    let stmt = assert_ok(PartiQLCompiler::standard().prepare(&top_n_plan(10i64), Mode::Strict));
    match stmt.root() {
        Expr::TopN { input, specs, limit } => {
            assert_eq!(*limit, 10);
            assert_eq!(specs.len(), 1);
            assert!(matches!(input.as_ref(), Expr::Filter { .. }));
        }
        other => panic!("expected TopN, got {:?}", other),
    }
}

#[test]
fn test_negative_limit_is_not_fused() {
    let stmt = assert_ok(PartiQLCompiler::standard().prepare(&top_n_plan(-1i64), Mode::Strict));
    match stmt.root() {
        Expr::Limit { input, .. } => assert!(matches!(input.as_ref(), Expr::Sort { .. })),
        other => panic!("expected Limit, got {:?}", other),
    }
}

#[test]
fn test_registering_top_n_last_disables_fusion() {
    let mut strategies = standard_strategies();
    let top_n = strategies.remove(0);
    strategies.push(top_n);

    let mut builder = PartiQLCompiler::builder();
    for strategy in strategies {
        builder = builder.add_boxed_strategy(strategy);
    }
    let compiler = builder.build();

    let stmt = assert_ok(compiler.prepare(&top_n_plan(10i64), Mode::Strict));
    assert!(matches!(stmt.root(), Expr::Limit { .. }));
}

#[test]
fn test_select_over_sort_is_ordered() {
    let stmt = assert_ok(PartiQLCompiler::standard().prepare(&select_orders(), Mode::Strict));
    match stmt.root() {
        Expr::Select { ordered, rel, .. } => {
            assert!(*ordered);
            assert!(matches!(rel.as_ref(), Expr::Sort { .. }));
        }
        other => panic!("expected Select, got {:?}", other),
    }

    let unordered = Plan::new(
        Select::new(orders_scan(), Operator::var(0, 0)).into(),
    );
    let stmt = assert_ok(PartiQLCompiler::standard().prepare(&unordered, Mode::Strict));
    assert!(matches!(stmt.root(), Expr::Select { ordered: false, .. }));
}

#[test]
fn test_permissive_mode_lowering() {
    let plan = Plan::new(Project::new(orders_scan(), vec![Operator::var(0, 0)]).into());

    let strict = assert_ok(PartiQLCompiler::standard().prepare(&plan, Mode::Strict));
    assert_eq!(strict.mode(), Mode::Strict);
    match strict.root() {
        Expr::Project { input, projections } => {
            assert!(matches!(input.as_ref(), Expr::Scan { permissive: false, .. }));
            assert_eq!(projections, &vec![Expr::VarLocal { offset: 0 }]);
        }
        other => panic!("expected Project, got {:?}", other),
    }

    let permissive = assert_ok(PartiQLCompiler::standard().prepare(&plan, Mode::Permissive));
    assert_eq!(permissive.mode(), Mode::Permissive);
    match permissive.root() {
        Expr::Project { input, projections } => {
            assert!(matches!(input.as_ref(), Expr::Scan { permissive: true, .. }));
            assert_eq!(
                projections,
                &vec![Expr::Permissive(Box::new(Expr::VarLocal { offset: 0 }))]
            );
        }
        other => panic!("expected Project, got {:?}", other),
    }
}

#[test]
fn test_plan_loaded_from_json() {
    let json = r#"{
        "Limit": {
            "input": {
                "Sort": {
                    "input": { "Scan": { "rex": { "Global": { "name": "orders" } } } },
                    "specs": [ { "rex": { "Var": { "offset": 0 } }, "order": "DescNullsFirst" } ]
                }
            },
            "limit": { "Lit": { "value": { "Int": 3 } } }
        }
    }"#;
    let plan = assert_ok(Plan::from_json(json));
    assert_eq!(plan.globals(), vec!["orders"]);
    let stmt = assert_ok(PartiQLCompiler::standard().prepare(&plan, Mode::Strict));
    assert!(matches!(stmt.root(), Expr::TopN { limit: 3, .. }));
}

// ==================== 错误处理 ====================

#[test]
fn test_empty_registry_fails_on_root_kind() {
    let compiler = PartiQLCompiler::<Operator, Expr>::builder().build();
    assert!(compiler.is_empty());
    let path = assert_unsupported(compiler.prepare(&Plan::new(filtered_orders()), Mode::Strict), "Filter");
    assert_eq!(path, "/");
}

#[test]
fn test_missing_strategy_names_kind_and_position() {
    let mut builder = PartiQLCompiler::builder();
    for strategy in standard_strategies() {
        if strategy.pattern().kind() != OperatorKind::Pivot {
            builder = builder.add_boxed_strategy(strategy);
        }
    }
    let compiler = builder.build();

    let pivot: Operator = Pivot::new(orders_scan(), Operator::var(0, 0), Operator::var(0, 1)).into();
    let plan = Plan::new(Filter::new(orders_scan(), pivot).into());
    let path = assert_unsupported(compiler.prepare(&plan, Mode::Strict), "Pivot");
    assert_eq!(path, "/1");
}

#[test]
fn test_malformed_plan_fails_before_any_strategy() {
    let empty_sort: Operator = Sort::new(orders_scan(), vec![]).into();
    assert_malformed(
        PartiQLCompiler::standard().prepare(&Plan::new(empty_sort), Mode::Strict),
        "Sort",
    );

    // 即便注册表为空，校验也先于策略选择
    let with_marker = Plan::new(Filter::new(orders_scan(), ErrOp::new("unresolved x").into()).into());
    assert_malformed(
        PartiQLCompiler::<Operator, Expr>::builder().build().prepare(&with_marker, Mode::Strict),
        "Err",
    );
}

#[test]
fn test_conversion_failure_is_propagated_unchanged() {
    let failing = StrategyFn::new("Failing", Pattern::new(OperatorKind::Global), |m: Match<'_, Operator, Expr>| {
        Err(m.conversion_error("catalog lookup failed"))
    });
    let mut builder = PartiQLCompiler::builder().add_strategy(failing);
    for strategy in standard_strategies() {
        builder = builder.add_boxed_strategy(strategy);
    }
    let compiler = builder.build();

    let err = compiler
        .prepare(&Plan::new(filtered_orders()), Mode::Strict)
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::conversion_failure(
            "Failing",
            "Global",
            vec![0, 0].into(),
            "catalog lookup failed"
        )
    );
}

#[test]
fn test_plan_depth_limit() {
    let options = CompilerOptions {
        max_plan_depth: 4,
        ..CompilerOptions::default()
    };
    let compiler = PartiQLCompiler::<Operator, Expr>::builder()
        .with_standard_strategies()
        .options(options)
        .build();

    assert_ok(compiler.prepare(&Plan::new(scan_chain(4)), Mode::Strict));
    assert_err_with(compiler.prepare(&Plan::new(scan_chain(10)), Mode::Strict), "超过上限 4");

    let err = compiler
        .prepare(&Plan::new(scan_chain(10)), Mode::Strict)
        .unwrap_err();
    assert_eq!(err.kind(), Some("Scan"));
    assert_eq!(err.path().map(|p| p.to_string()).as_deref(), Some("/0/0/0/0/0"));
    assert!(err.to_string().contains("Scan"));
}

// ==================== 并发 ====================

#[test]
fn test_compiler_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PartiQLCompiler>();
    assert_send_sync::<Plan>();

    let compiler = PartiQLCompiler::standard();
    let plan = Arc::new(select_orders());
    let expected = assert_ok(compiler.prepare(&plan, Mode::Strict));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let compiler = compiler.clone();
            let plan = Arc::clone(&plan);
            thread::spawn(move || compiler.prepare(&plan, Mode::Strict))
        })
        .collect();

    for handle in handles {
        let stmt = assert_ok(handle.join().expect("编译线程不应 panic"));
        assert_eq!(stmt, expected);
    }
}

// ==================== 语法树输入 ====================

#[derive(Debug, Clone, PartialEq)]
enum Physical {
    ProjectAll { distinct: bool },
    Sfw {
        select: Box<Physical>,
        from: Box<Physical>,
        filter: Box<Physical>,
    },
    Literal(Value),
    Generic(AstKind, Vec<Physical>),
}

fn project_all() -> StrategyFn<AstNode, Physical> {
    StrategyFn::new("ProjectAll", Pattern::new(AstKind::SelectStar), |m| match m.node() {
        AstNode::SelectStar(star) => Ok(Physical::ProjectAll {
            distinct: star.setq == Some(SetQuantifier::Distinct),
        }),
        _ => Err(m.conversion_error("期望 SelectStar")),
    })
}

/// 任意类型节点的兜底策略，保留已转换的子节点
fn generic(kind: AstKind) -> StrategyFn<AstNode, Physical> {
    StrategyFn::new(format!("Generic{}", kind), Pattern::new(kind), move |m| {
        Ok(Physical::Generic(kind, m.into_inputs()))
    })
}

#[test]
fn test_select_star_distinct_lowers_to_project_all() {
    let compiler = PartiQLCompiler::builder().add_strategy(project_all()).build();
    let plan = Plan::new(AstNode::from(partiql_compiler::query::ast::SelectStar::new(Some(
        SetQuantifier::Distinct,
    ))));
    let stmt = assert_ok(compiler.prepare(&plan, Mode::Strict));
    assert_eq!(stmt.root(), &Physical::ProjectAll { distinct: true });
}

#[test]
fn test_nested_sfw_receives_lowered_children() {
    let sfw_pattern = Pattern::new(AstKind::QueryBodySfw)
        .with_predicate(|_| true)
        .with_children(vec![
            Pattern::new(AstKind::SelectStar),
            Pattern::new(AstKind::From),
            Pattern::new(AstKind::ExprLit),
        ]);
    let sfw = StrategyFn::new("Sfw", sfw_pattern, |mut m: Match<'_, AstNode, Physical>| {
        Ok(Physical::Sfw {
            select: Box::new(m.take_input(0)?),
            from: Box::new(m.take_input(1)?),
            filter: Box::new(m.take_input(2)?),
        })
    });
    let literal = StrategyFn::new("Literal", Pattern::new(AstKind::ExprLit), |m: Match<'_, AstNode, Physical>| match m.node() {
        AstNode::ExprLit(lit) => Ok(Physical::Literal(lit.value.clone())),
        _ => Err(m.conversion_error("期望 ExprLit")),
    });

    let mut builder = PartiQLCompiler::builder()
        .add_strategy(sfw)
        .add_strategy(project_all())
        .add_strategy(literal);
    for kind in AstKind::ALL {
        builder = builder.add_strategy(generic(*kind));
    }
    let compiler = builder.build();

    let plan = Plan::new(sfw_star(None, Some(AstNode::lit(true))));
    let stmt = assert_ok(compiler.prepare(&plan, Mode::Strict));

    let var_t = Physical::Generic(
        AstKind::ExprVarRef,
        vec![Physical::Generic(
            AstKind::IdentifierChain,
            vec![Physical::Generic(AstKind::Identifier, vec![])],
        )],
    );
    let from_expr = Physical::Generic(
        AstKind::FromExpr,
        vec![var_t, Physical::Generic(AstKind::Identifier, vec![])],
    );
    assert_eq!(
        stmt.into_root(),
        Physical::Sfw {
            select: Box::new(Physical::ProjectAll { distinct: false }),
            from: Box::new(Physical::Generic(AstKind::From, vec![from_expr])),
            filter: Box::new(Physical::Literal(Value::Bool(true))),
        }
    );
}

#[test]
fn test_sfw_without_where_falls_back_to_generic() {
    let sfw_pattern = Pattern::new(AstKind::QueryBodySfw).with_children(vec![
        Pattern::new(AstKind::SelectStar),
        Pattern::new(AstKind::From),
        Pattern::new(AstKind::ExprLit),
    ]);
    let sfw = StrategyFn::new("Sfw", sfw_pattern, |_m: Match<'_, AstNode, Physical>| {
        Ok(Physical::Literal(Value::Missing))
    });
    let mut builder = PartiQLCompiler::builder().add_strategy(sfw);
    for kind in AstKind::ALL {
        builder = builder.add_strategy(generic(*kind));
    }
    let compiler = builder.build();

    let stmt = assert_ok(compiler.prepare(&Plan::new(sfw_star(None, None)), Mode::Strict));
    assert!(matches!(stmt.root(), Physical::Generic(AstKind::QueryBodySfw, children) if children.len() == 2));
}
