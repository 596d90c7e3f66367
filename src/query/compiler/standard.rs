//! 标准策略集
//!
//! 注册顺序即优先级：融合策略（TopN）必须排在它所覆盖的单节点策略之前。
//! 之后每种逻辑算子各有一个一对一的降级策略。`Err` 节点没有对应策略，校验阶段就会被拒绝。

use crate::core::{CompileResult, Mode};
use crate::define_strategy;
use crate::query::compiler::expr::{Expr, SortKey};
use crate::query::compiler::pattern::Pattern;
use crate::query::compiler::strategy::{Match, Strategy};
use crate::query::plan::{self, Operator, OperatorKind};

type OpMatch<'a> = Match<'a, Operator, Expr>;

fn take_boxed(m: &mut OpMatch<'_>, index: usize) -> CompileResult<Box<Expr>> {
    m.take_input(index).map(Box::new)
}

/// 取走从 `start` 开始的全部子节点
fn take_rest(m: &mut OpMatch<'_>, start: usize) -> CompileResult<Vec<Expr>> {
    let end = m.input_count();
    m.take_inputs(start..end)
}

fn handled(exprs: Vec<Expr>, mode: Mode) -> Vec<Expr> {
    exprs.into_iter().map(|e| e.mode_handled(mode)).collect()
}

/// 模式：LIMIT 直接作用在 SORT 上，且上限是非负整数字面量
fn top_n_pattern() -> Pattern<Operator> {
    Pattern::new(OperatorKind::Limit).with_children(vec![
        Pattern::new(OperatorKind::Sort),
        Pattern::new(OperatorKind::Lit).with_predicate(|op| match op {
            Operator::Lit(lit) => lit.value.is_non_negative_int(),
            _ => false,
        }),
    ])
}

define_strategy! {
    /// LIMIT + SORT 融合为 TopN
    name: TopNStrategy,
    pattern: top_n_pattern(),
    node_type: Limit(plan::Limit),
    apply: |mut m, limit| {
        let bound = match limit.limit.as_ref() {
            Operator::Lit(lit) => lit.value.as_int().and_then(|n| u64::try_from(n).ok()),
            _ => None,
        };
        let Some(bound) = bound else {
            return Err(m.conversion_error("LIMIT 上限不是非负整数字面量"));
        };
        match m.take_input(0)? {
            Expr::Sort { input, specs } => Ok(Expr::TopN {
                input,
                specs,
                limit: bound,
            }),
            other => Err(m.conversion_error(format!("期望已转换的 Sort 输入，实际为 {}", other.name()))),
        }
    }
}

// ==================== 关系算子 ====================

define_strategy! {
    name: ScanStrategy,
    pattern: Pattern::new(OperatorKind::Scan),
    node_type: Scan(plan::Scan),
    apply: |mut m, _scan| {
        Ok(Expr::Scan {
            rex: take_boxed(&mut m, 0)?,
            permissive: m.mode().is_permissive(),
        })
    }
}

define_strategy! {
    name: ScanIndexedStrategy,
    pattern: Pattern::new(OperatorKind::ScanIndexed),
    node_type: ScanIndexed(plan::ScanIndexed),
    apply: |mut m, _scan| {
        Ok(Expr::ScanIndexed {
            rex: take_boxed(&mut m, 0)?,
            permissive: m.mode().is_permissive(),
        })
    }
}

define_strategy! {
    name: UnpivotStrategy,
    pattern: Pattern::new(OperatorKind::Unpivot),
    node_type: Unpivot(plan::Unpivot),
    apply: |mut m, _unpivot| {
        Ok(Expr::Unpivot {
            rex: take_boxed(&mut m, 0)?,
            permissive: m.mode().is_permissive(),
        })
    }
}

define_strategy! {
    name: FilterStrategy,
    pattern: Pattern::new(OperatorKind::Filter),
    node_type: Filter(plan::Filter),
    apply: |mut m, _filter| {
        Ok(Expr::Filter {
            input: take_boxed(&mut m, 0)?,
            predicate: take_boxed(&mut m, 1)?,
        })
    }
}

define_strategy! {
    name: ProjectStrategy,
    pattern: Pattern::new(OperatorKind::Project),
    node_type: Project(plan::Project),
    apply: |mut m, _project| {
        let input = take_boxed(&mut m, 0)?;
        let projections = take_rest(&mut m, 1)?;
        Ok(Expr::Project {
            input,
            projections: handled(projections, m.mode()),
        })
    }
}

define_strategy! {
    name: ProjectAllStrategy,
    pattern: Pattern::new(OperatorKind::ProjectAll),
    node_type: ProjectAll(plan::ProjectAll),
    apply: |mut m, project| {
        Ok(Expr::ProjectAll {
            input: take_boxed(&mut m, 0)?,
            distinct: project.quantifier.is_distinct(),
        })
    }
}

define_strategy! {
    name: LimitStrategy,
    pattern: Pattern::new(OperatorKind::Limit),
    node_type: Limit(plan::Limit),
    apply: |mut m, _limit| {
        Ok(Expr::Limit {
            input: take_boxed(&mut m, 0)?,
            limit: take_boxed(&mut m, 1)?,
        })
    }
}

define_strategy! {
    name: OffsetStrategy,
    pattern: Pattern::new(OperatorKind::Offset),
    node_type: Offset(plan::Offset),
    apply: |mut m, _offset| {
        Ok(Expr::Offset {
            input: take_boxed(&mut m, 0)?,
            offset: take_boxed(&mut m, 1)?,
        })
    }
}

define_strategy! {
    name: DistinctStrategy,
    pattern: Pattern::new(OperatorKind::Distinct),
    node_type: Distinct(plan::Distinct),
    apply: |mut m, _distinct| {
        Ok(Expr::Distinct {
            input: take_boxed(&mut m, 0)?,
        })
    }
}

define_strategy! {
    name: SortStrategy,
    pattern: Pattern::new(OperatorKind::Sort),
    node_type: Sort(plan::Sort),
    apply: |mut m, sort| {
        let input = take_boxed(&mut m, 0)?;
        let keys = take_rest(&mut m, 1)?;
        if keys.len() != sort.specs.len() {
            return Err(m.conversion_error("排序键数量与子节点数量不一致"));
        }
        let specs = keys
            .into_iter()
            .zip(&sort.specs)
            .map(|(expr, spec)| SortKey::new(expr, spec.order))
            .collect();
        Ok(Expr::Sort { input, specs })
    }
}

define_strategy! {
    name: JoinStrategy,
    pattern: Pattern::new(OperatorKind::Join),
    node_type: Join(plan::Join),
    apply: |mut m, join| {
        Ok(Expr::Join {
            lhs: take_boxed(&mut m, 0)?,
            rhs: take_boxed(&mut m, 1)?,
            condition: take_boxed(&mut m, 2)?,
            join_type: join.join_type,
        })
    }
}

define_strategy! {
    name: ExcludeStrategy,
    pattern: Pattern::new(OperatorKind::Exclude),
    node_type: Exclude(plan::Exclude),
    apply: |mut m, exclude| {
        Ok(Expr::Exclude {
            input: take_boxed(&mut m, 0)?,
            paths: exclude.paths.clone(),
        })
    }
}

define_strategy! {
    name: SetOpStrategy,
    pattern: Pattern::new(OperatorKind::SetOp),
    node_type: SetOp(plan::SetOp),
    apply: |mut m, set_op| {
        Ok(Expr::SetOp {
            kind: set_op.kind,
            distinct: set_op.quantifier.is_distinct(),
            lhs: take_boxed(&mut m, 0)?,
            rhs: take_boxed(&mut m, 1)?,
        })
    }
}

// ==================== 标量算子 ====================

define_strategy! {
    name: LitStrategy,
    pattern: Pattern::new(OperatorKind::Lit),
    node_type: Lit(plan::Lit),
    apply: |_m, lit| Ok(Expr::Literal(lit.value.clone()))
}

define_strategy! {
    /// 深度为 0 的变量在当前作用域内，其余需要向外查找
    name: VarStrategy,
    pattern: Pattern::new(OperatorKind::Var),
    node_type: Var(plan::Var),
    apply: |_m, var| {
        Ok(if var.depth == 0 {
            Expr::VarLocal { offset: var.offset }
        } else {
            Expr::VarOuter {
                depth: var.depth,
                offset: var.offset,
            }
        })
    }
}

define_strategy! {
    name: GlobalStrategy,
    pattern: Pattern::new(OperatorKind::Global),
    node_type: Global(plan::Global),
    apply: |_m, global| Ok(Expr::Global { name: global.name.clone() })
}

define_strategy! {
    name: PathKeyStrategy,
    pattern: Pattern::new(OperatorKind::PathKey),
    node_type: PathKey(plan::PathKey),
    apply: |mut m, _path| {
        Ok(Expr::PathKey {
            root: take_boxed(&mut m, 0)?,
            key: take_boxed(&mut m, 1)?,
        })
    }
}

define_strategy! {
    name: PathSymbolStrategy,
    pattern: Pattern::new(OperatorKind::PathSymbol),
    node_type: PathSymbol(plan::PathSymbol),
    apply: |mut m, path| {
        Ok(Expr::PathSymbol {
            root: take_boxed(&mut m, 0)?,
            symbol: path.symbol.clone(),
        })
    }
}

define_strategy! {
    name: PathIndexStrategy,
    pattern: Pattern::new(OperatorKind::PathIndex),
    node_type: PathIndex(plan::PathIndex),
    apply: |mut m, _path| {
        Ok(Expr::PathIndex {
            root: take_boxed(&mut m, 0)?,
            index: take_boxed(&mut m, 1)?,
        })
    }
}

define_strategy! {
    name: CallStrategy,
    pattern: Pattern::new(OperatorKind::Call),
    node_type: Call(plan::Call),
    apply: |m, call| {
        Ok(Expr::Call {
            function: call.function.clone(),
            args: m.into_inputs(),
        })
    }
}

define_strategy! {
    /// 子节点依次为各分支的 (条件, 结果)，最后一个是默认值
    name: CaseStrategy,
    pattern: Pattern::new(OperatorKind::Case),
    node_type: Case(plan::Case),
    apply: |mut m, case| {
        let count = case.branches.len();
        let mut branches = Vec::with_capacity(count);
        for i in 0..count {
            let condition = m.take_input(2 * i)?;
            let result = m.take_input(2 * i + 1)?;
            branches.push((condition, result));
        }
        Ok(Expr::Case {
            branches,
            default: take_boxed(&mut m, 2 * count)?,
        })
    }
}

define_strategy! {
    name: CastStrategy,
    pattern: Pattern::new(OperatorKind::Cast),
    node_type: Cast(plan::Cast),
    apply: |mut m, cast| {
        Ok(Expr::Cast {
            arg: take_boxed(&mut m, 0)?,
            target: cast.target.clone(),
        })
    }
}

define_strategy! {
    name: CollectionStrategy,
    pattern: Pattern::new(OperatorKind::Collection),
    node_type: Collection(plan::Collection),
    apply: |m, collection| {
        let mode = m.mode();
        Ok(Expr::Collection {
            kind: collection.kind,
            values: handled(m.into_inputs(), mode),
        })
    }
}

define_strategy! {
    /// 子节点依次为各字段的 (键, 值)
    name: StructStrategy,
    pattern: Pattern::new(OperatorKind::Struct),
    node_type: Struct(plan::Struct),
    apply: |mut m, st| {
        let mode = m.mode();
        let mut fields = Vec::with_capacity(st.fields.len());
        for i in 0..st.fields.len() {
            let key = m.take_input(2 * i)?;
            let value = m.take_input(2 * i + 1)?;
            fields.push((key, value.mode_handled(mode)));
        }
        Ok(Expr::Struct { fields })
    }
}

define_strategy! {
    name: TupleUnionStrategy,
    pattern: Pattern::new(OperatorKind::TupleUnion),
    node_type: TupleUnion(plan::TupleUnion),
    apply: |m, _union| Ok(Expr::TupleUnion { args: m.into_inputs() })
}

define_strategy! {
    /// 关系部分是 Sort 时结果有序
    name: SelectStrategy,
    pattern: Pattern::new(OperatorKind::Select),
    node_type: Select(plan::Select),
    apply: |mut m, select| {
        let rel = take_boxed(&mut m, 0)?;
        let constructor = m.take_input(1)?.mode_handled(m.mode());
        Ok(Expr::Select {
            rel,
            constructor: Box::new(constructor),
            ordered: matches!(select.rel.as_ref(), Operator::Sort(_)),
        })
    }
}

define_strategy! {
    name: SubqueryStrategy,
    pattern: Pattern::new(OperatorKind::Subquery),
    node_type: Subquery(plan::Subquery),
    apply: |mut m, subquery| {
        Ok(Expr::Subquery {
            rel: take_boxed(&mut m, 0)?,
            constructor: take_boxed(&mut m, 1)?,
            coercion: subquery.coercion,
        })
    }
}

define_strategy! {
    name: PivotStrategy,
    pattern: Pattern::new(OperatorKind::Pivot),
    node_type: Pivot(plan::Pivot),
    apply: |mut m, _pivot| {
        Ok(Expr::Pivot {
            rel: take_boxed(&mut m, 0)?,
            key: take_boxed(&mut m, 1)?,
            value: take_boxed(&mut m, 2)?,
            permissive: m.mode().is_permissive(),
        })
    }
}

/// 标准策略集，按注册顺序排列
pub fn standard_strategies() -> Vec<Box<dyn Strategy<Operator, Expr>>> {
    vec![
        Box::new(TopNStrategy::new()),
        Box::new(ScanStrategy::new()),
        Box::new(ScanIndexedStrategy::new()),
        Box::new(UnpivotStrategy::new()),
        Box::new(FilterStrategy::new()),
        Box::new(ProjectStrategy::new()),
        Box::new(ProjectAllStrategy::new()),
        Box::new(LimitStrategy::new()),
        Box::new(OffsetStrategy::new()),
        Box::new(DistinctStrategy::new()),
        Box::new(SortStrategy::new()),
        Box::new(JoinStrategy::new()),
        Box::new(ExcludeStrategy::new()),
        Box::new(SetOpStrategy::new()),
        Box::new(LitStrategy::new()),
        Box::new(VarStrategy::new()),
        Box::new(GlobalStrategy::new()),
        Box::new(PathKeyStrategy::new()),
        Box::new(PathSymbolStrategy::new()),
        Box::new(PathIndexStrategy::new()),
        Box::new(CallStrategy::new()),
        Box::new(CaseStrategy::new()),
        Box::new(CastStrategy::new()),
        Box::new(CollectionStrategy::new()),
        Box::new(StructStrategy::new()),
        Box::new(TupleUnionStrategy::new()),
        Box::new(SelectStrategy::new()),
        Box::new(SubqueryStrategy::new()),
        Box::new(PivotStrategy::new()),
    ]
}
