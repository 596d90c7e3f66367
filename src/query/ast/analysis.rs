//! 语法树分析
//!
//! 基于 `AstVisitor` 的只读分析工具。

use super::nodes::{ExprVarRef, IdentifierChain};
use super::AstNode;
use crate::query::tree::NodeView;
use crate::query::visitor::AstVisitor;

/// 收集查询中引用的变量名
///
/// 限定名按 `a.b.c` 拼接，结果按出现顺序排列，不去重。
#[derive(Debug, Default)]
pub struct IdentifierCollector;

impl IdentifierCollector {
    pub fn collect(root: &AstNode) -> Vec<String> {
        let mut names = Vec::new();
        IdentifierCollector.visit(root, &mut names);
        names
    }

    fn render_chain(chain: &IdentifierChain, parts: &mut Vec<String>) {
        if let AstNode::Identifier(id) = chain.root.as_ref() {
            parts.push(id.symbol.clone());
        }
        if let Some(next) = &chain.next {
            if let AstNode::IdentifierChain(next) = next.as_ref() {
                Self::render_chain(next, parts);
            }
        }
    }
}

impl AstVisitor<(), Vec<String>> for IdentifierCollector {
    fn default_return(&mut self, _node: &dyn NodeView<AstNode>, _names: &mut Vec<String>) {}

    fn visit_expr_var_ref(&mut self, node: &ExprVarRef, names: &mut Vec<String>) {
        if let AstNode::IdentifierChain(chain) = node.identifier.as_ref() {
            let mut parts = Vec::new();
            Self::render_chain(chain, &mut parts);
            names.push(parts.join("."));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::nodes::{
        ExprAnd, ExprOperator, From, FromExpr, Identifier, QueryBodySfw, SelectList,
    };
    use crate::query::ast::Query;

    #[test]
    fn test_collects_var_refs_in_clause_order() {
        let qualified: AstNode = ExprVarRef::new(IdentifierChain::new(
            Identifier::regular("o"),
            Some(IdentifierChain::new(Identifier::regular("total"), None)),
        ))
        .into();
        let sfw = QueryBodySfw::new(
            SelectList::new(None, vec![qualified]).into(),
            From::new(vec![FromExpr::new(AstNode::var("orders"))
                .with_as(AstNode::id("o"))
                .into()])
            .into(),
        )
        .with_where(
            ExprAnd::new(
                ExprOperator::binary(">", AstNode::var("x"), AstNode::lit(1i64)).into(),
                AstNode::var("y"),
            )
            .into(),
        );
        let query: AstNode = Query::new(sfw.into()).into();

        assert_eq!(
            IdentifierCollector::collect(&query),
            vec!["o.total", "orders", "x", "y"]
        );
    }

    #[test]
    fn test_alias_identifiers_are_not_references() {
        let from: AstNode = From::new(vec![FromExpr::new(AstNode::lit(1i64))
            .with_as(AstNode::id("alias"))
            .into()])
        .into();
        assert!(IdentifierCollector::collect(&from).is_empty());
    }
}
