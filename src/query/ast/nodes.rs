//! 语法树节点载荷
//!
//! 每个结构体对应 `AstNode` 的一个变体。`children()` 严格按照字段声明顺序返回，
//! 未设置的可选字段直接跳过；标量属性（量词、符号、字面量）不出现在子节点中。

use super::{AstKind, AstNode};
use crate::core::{SetOpKind, SetQuantifier, Value};
use crate::query::tree::NodeView;

fn boxed(node: AstNode) -> Box<AstNode> {
    Box::new(node)
}

fn push_opt<'a>(kids: &mut Vec<&'a AstNode>, node: &'a Option<Box<AstNode>>) {
    if let Some(node) = node {
        kids.push(node.as_ref());
    }
}

/// 查询语句
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub body: Box<AstNode>,
}

impl Query {
    pub fn new(body: AstNode) -> Self {
        Self { body: boxed(body) }
    }
}

impl NodeView<AstNode> for Query {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.body.as_ref()]
    }
}

/// SELECT-FROM-WHERE 查询体
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBodySfw {
    pub select: Box<AstNode>,
    pub exclude: Option<Box<AstNode>>,
    pub from: Box<AstNode>,
    pub let_clause: Option<Box<AstNode>>,
    pub where_clause: Option<Box<AstNode>>,
    pub group_by: Option<Box<AstNode>>,
    pub having: Option<Box<AstNode>>,
}

impl QueryBodySfw {
    pub fn new(select: AstNode, from: AstNode) -> Self {
        Self {
            select: boxed(select),
            exclude: None,
            from: boxed(from),
            let_clause: None,
            where_clause: None,
            group_by: None,
            having: None,
        }
    }

    pub fn with_exclude(mut self, exclude: AstNode) -> Self {
        self.exclude = Some(boxed(exclude));
        self
    }

    pub fn with_let(mut self, let_clause: AstNode) -> Self {
        self.let_clause = Some(boxed(let_clause));
        self
    }

    pub fn with_where(mut self, condition: AstNode) -> Self {
        self.where_clause = Some(boxed(condition));
        self
    }

    pub fn with_group_by(mut self, group_by: AstNode) -> Self {
        self.group_by = Some(boxed(group_by));
        self
    }

    pub fn with_having(mut self, having: AstNode) -> Self {
        self.having = Some(boxed(having));
        self
    }
}

impl NodeView<AstNode> for QueryBodySfw {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.select.as_ref()];
        push_opt(&mut kids, &self.exclude);
        kids.push(self.from.as_ref());
        push_opt(&mut kids, &self.let_clause);
        push_opt(&mut kids, &self.where_clause);
        push_opt(&mut kids, &self.group_by);
        push_opt(&mut kids, &self.having);
        kids
    }
}

/// 集合运算查询体，运算符本身也是一个子节点
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBodySetOp {
    pub op: Box<AstNode>,
    pub is_outer: bool,
    pub lhs: Box<AstNode>,
    pub rhs: Box<AstNode>,
}

impl QueryBodySetOp {
    pub fn new(op: SetOp, lhs: AstNode, rhs: AstNode) -> Self {
        Self {
            op: boxed(op.into()),
            is_outer: false,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        }
    }

    pub fn outer(mut self) -> Self {
        self.is_outer = true;
        self
    }
}

impl NodeView<AstNode> for QueryBodySetOp {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.op.as_ref(), self.lhs.as_ref(), self.rhs.as_ref()]
    }
}

/// 集合运算符
#[derive(Debug, Clone, PartialEq)]
pub struct SetOp {
    pub kind: SetOpKind,
    pub quantifier: Option<SetQuantifier>,
}

impl SetOp {
    pub fn new(kind: SetOpKind, quantifier: Option<SetQuantifier>) -> Self {
        Self { kind, quantifier }
    }
}

impl NodeView<AstNode> for SetOp {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        Vec::new()
    }
}

/// SELECT *
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStar {
    pub setq: Option<SetQuantifier>,
}

impl SelectStar {
    pub fn new(setq: Option<SetQuantifier>) -> Self {
        Self { setq }
    }
}

impl NodeView<AstNode> for SelectStar {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        Vec::new()
    }
}

/// SELECT a, b AS c
#[derive(Debug, Clone, PartialEq)]
pub struct SelectList {
    pub setq: Option<SetQuantifier>,
    pub items: Vec<AstNode>,
}

impl SelectList {
    pub fn new(setq: Option<SetQuantifier>, items: Vec<AstNode>) -> Self {
        Self { setq, items }
    }
}

impl NodeView<AstNode> for SelectList {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        self.items.iter().collect()
    }

    fn check(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("SELECT 列表不能为空".to_string());
        }
        Ok(())
    }
}

/// SELECT 列表中的表达式项
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItemExpr {
    pub expr: Box<AstNode>,
    pub alias: Option<Box<AstNode>>,
}

impl SelectItemExpr {
    pub fn new(expr: AstNode, alias: Option<AstNode>) -> Self {
        Self {
            expr: boxed(expr),
            alias: alias.map(boxed),
        }
    }
}

impl NodeView<AstNode> for SelectItemExpr {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.expr.as_ref()];
        push_opt(&mut kids, &self.alias);
        kids
    }
}

/// SELECT VALUE
#[derive(Debug, Clone, PartialEq)]
pub struct SelectValue {
    pub setq: Option<SetQuantifier>,
    pub constructor: Box<AstNode>,
}

impl SelectValue {
    pub fn new(setq: Option<SetQuantifier>, constructor: AstNode) -> Self {
        Self {
            setq,
            constructor: boxed(constructor),
        }
    }
}

impl NodeView<AstNode> for SelectValue {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.constructor.as_ref()]
    }
}

/// EXCLUDE 子句
#[derive(Debug, Clone, PartialEq)]
pub struct Exclude {
    pub paths: Vec<AstNode>,
}

impl Exclude {
    pub fn new(paths: Vec<AstNode>) -> Self {
        Self { paths }
    }
}

impl NodeView<AstNode> for Exclude {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        self.paths.iter().collect()
    }
}

/// EXCLUDE 路径
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludePath {
    pub root: Box<AstNode>,
    pub steps: Vec<AstNode>,
}

impl ExcludePath {
    pub fn new(root: AstNode, steps: Vec<AstNode>) -> Self {
        Self {
            root: boxed(root),
            steps,
        }
    }
}

impl NodeView<AstNode> for ExcludePath {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.root.as_ref()];
        kids.extend(self.steps.iter());
        kids
    }
}

/// FROM 子句
#[derive(Debug, Clone, PartialEq)]
pub struct From {
    pub tables: Vec<AstNode>,
}

impl From {
    pub fn new(tables: Vec<AstNode>) -> Self {
        Self { tables }
    }
}

impl NodeView<AstNode> for From {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        self.tables.iter().collect()
    }

    fn check(&self) -> Result<(), String> {
        if self.tables.is_empty() {
            return Err("FROM 子句至少需要一个数据源".to_string());
        }
        Ok(())
    }
}

/// FROM 中的表达式数据源：`expr AS x AT i`
#[derive(Debug, Clone, PartialEq)]
pub struct FromExpr {
    pub expr: Box<AstNode>,
    pub as_alias: Option<Box<AstNode>>,
    pub at_alias: Option<Box<AstNode>>,
}

impl FromExpr {
    pub fn new(expr: AstNode) -> Self {
        Self {
            expr: boxed(expr),
            as_alias: None,
            at_alias: None,
        }
    }

    pub fn with_as(mut self, alias: AstNode) -> Self {
        self.as_alias = Some(boxed(alias));
        self
    }

    pub fn with_at(mut self, alias: AstNode) -> Self {
        self.at_alias = Some(boxed(alias));
        self
    }
}

impl NodeView<AstNode> for FromExpr {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.expr.as_ref()];
        push_opt(&mut kids, &self.as_alias);
        push_opt(&mut kids, &self.at_alias);
        kids
    }
}

/// LET 子句
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub bindings: Vec<AstNode>,
}

impl Let {
    pub fn new(bindings: Vec<AstNode>) -> Self {
        Self { bindings }
    }
}

impl NodeView<AstNode> for Let {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        self.bindings.iter().collect()
    }
}

/// LET 绑定：`expr AS alias`
#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub expr: Box<AstNode>,
    pub alias: Box<AstNode>,
}

impl LetBinding {
    pub fn new(expr: AstNode, alias: AstNode) -> Self {
        Self {
            expr: boxed(expr),
            alias: boxed(alias),
        }
    }
}

impl NodeView<AstNode> for LetBinding {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.expr.as_ref(), self.alias.as_ref()]
    }
}

/// GROUP BY 子句
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub keys: Vec<AstNode>,
}

impl GroupBy {
    pub fn new(keys: Vec<AstNode>) -> Self {
        Self { keys }
    }
}

impl NodeView<AstNode> for GroupBy {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        self.keys.iter().collect()
    }
}

/// GROUP BY 键
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByKey {
    pub expr: Box<AstNode>,
    pub alias: Option<Box<AstNode>>,
}

impl GroupByKey {
    pub fn new(expr: AstNode, alias: Option<AstNode>) -> Self {
        Self {
            expr: boxed(expr),
            alias: alias.map(boxed),
        }
    }
}

impl NodeView<AstNode> for GroupByKey {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.expr.as_ref()];
        push_opt(&mut kids, &self.alias);
        kids
    }
}

/// 标识符
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub symbol: String,
    pub case_sensitive: bool,
}

impl Identifier {
    pub fn new(symbol: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            symbol: symbol.into(),
            case_sensitive,
        }
    }

    pub fn regular(symbol: impl Into<String>) -> Self {
        Self::new(symbol, false)
    }
}

impl NodeView<AstNode> for Identifier {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        Vec::new()
    }
}

/// 限定标识符链：`a.b.c`
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierChain {
    pub root: Box<AstNode>,
    pub next: Option<Box<AstNode>>,
}

impl IdentifierChain {
    pub fn new(root: Identifier, next: Option<IdentifierChain>) -> Self {
        Self {
            root: boxed(root.into()),
            next: next.map(|chain| boxed(chain.into())),
        }
    }
}

impl NodeView<AstNode> for IdentifierChain {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.root.as_ref()];
        push_opt(&mut kids, &self.next);
        kids
    }
}

/// 字面量表达式
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLit {
    pub value: Value,
}

impl ExprLit {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl NodeView<AstNode> for ExprLit {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        Vec::new()
    }
}

/// 变量引用
#[derive(Debug, Clone, PartialEq)]
pub struct ExprVarRef {
    pub identifier: Box<AstNode>,
}

impl ExprVarRef {
    pub fn new(identifier: IdentifierChain) -> Self {
        Self {
            identifier: boxed(identifier.into()),
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(IdentifierChain::new(Identifier::regular(name), None))
    }
}

impl NodeView<AstNode> for ExprVarRef {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.identifier.as_ref()]
    }
}

/// 函数调用
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCall {
    pub function: Box<AstNode>,
    pub args: Vec<AstNode>,
}

impl ExprCall {
    pub fn new(function: IdentifierChain, args: Vec<AstNode>) -> Self {
        Self {
            function: boxed(function.into()),
            args,
        }
    }
}

impl NodeView<AstNode> for ExprCall {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.function.as_ref()];
        kids.extend(self.args.iter());
        kids
    }
}

/// 一元或二元运算符，一元时 `lhs` 为空
#[derive(Debug, Clone, PartialEq)]
pub struct ExprOperator {
    pub symbol: String,
    pub lhs: Option<Box<AstNode>>,
    pub rhs: Box<AstNode>,
}

impl ExprOperator {
    pub fn binary(symbol: impl Into<String>, lhs: AstNode, rhs: AstNode) -> Self {
        Self {
            symbol: symbol.into(),
            lhs: Some(boxed(lhs)),
            rhs: boxed(rhs),
        }
    }

    pub fn unary(symbol: impl Into<String>, operand: AstNode) -> Self {
        Self {
            symbol: symbol.into(),
            lhs: None,
            rhs: boxed(operand),
        }
    }
}

impl NodeView<AstNode> for ExprOperator {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = Vec::with_capacity(2);
        push_opt(&mut kids, &self.lhs);
        kids.push(self.rhs.as_ref());
        kids
    }
}

/// AND
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAnd {
    pub lhs: Box<AstNode>,
    pub rhs: Box<AstNode>,
}

impl ExprAnd {
    pub fn new(lhs: AstNode, rhs: AstNode) -> Self {
        Self {
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        }
    }
}

impl NodeView<AstNode> for ExprAnd {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.lhs.as_ref(), self.rhs.as_ref()]
    }
}

/// OR
#[derive(Debug, Clone, PartialEq)]
pub struct ExprOr {
    pub lhs: Box<AstNode>,
    pub rhs: Box<AstNode>,
}

impl ExprOr {
    pub fn new(lhs: AstNode, rhs: AstNode) -> Self {
        Self {
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        }
    }
}

impl NodeView<AstNode> for ExprOr {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.lhs.as_ref(), self.rhs.as_ref()]
    }
}

/// NOT
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNot {
    pub value: Box<AstNode>,
}

impl ExprNot {
    pub fn new(value: AstNode) -> Self {
        Self { value: boxed(value) }
    }
}

impl NodeView<AstNode> for ExprNot {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.value.as_ref()]
    }
}

/// 路径表达式：`root.a[0]`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprPath {
    pub root: Box<AstNode>,
    pub steps: Vec<AstNode>,
}

impl ExprPath {
    pub fn new(root: AstNode, steps: Vec<AstNode>) -> Self {
        Self {
            root: boxed(root),
            steps,
        }
    }
}

impl NodeView<AstNode> for ExprPath {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        let mut kids = vec![self.root.as_ref()];
        kids.extend(self.steps.iter());
        kids
    }
}

/// 路径步：字段访问
#[derive(Debug, Clone, PartialEq)]
pub struct PathStepField {
    pub field: Box<AstNode>,
}

impl PathStepField {
    pub fn new(field: Identifier) -> Self {
        Self {
            field: boxed(field.into()),
        }
    }
}

impl NodeView<AstNode> for PathStepField {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.field.as_ref()]
    }
}

/// 路径步：下标访问
#[derive(Debug, Clone, PartialEq)]
pub struct PathStepElement {
    pub element: Box<AstNode>,
}

impl PathStepElement {
    pub fn new(element: AstNode) -> Self {
        Self {
            element: boxed(element),
        }
    }
}

impl NodeView<AstNode> for PathStepElement {
    fn kind(&self) -> AstKind {
        Self::KIND
    }

    fn children(&self) -> Vec<&AstNode> {
        vec![self.element.as_ref()]
    }
}
