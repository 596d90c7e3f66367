//! 语法树访问者 trait
//!
//! 每种语法节点对应一个 `visit_*` 回调，默认全部退化为 `default_visit`：
//! 按声明顺序访问子节点后返回 `default_return`。实现方只需覆盖关心的节点类型。

use crate::query::ast::nodes::*;
use crate::query::ast::AstNode;
use crate::query::tree::NodeView;

/// 语法树访问者
///
/// `R` 为返回值类型，`C` 为调用方提供的上下文。
pub trait AstVisitor<R, C> {
    /// 访问入口，通过 `accept` 分派到具体的 `visit_*`
    fn visit(&mut self, node: &AstNode, ctx: &mut C) -> R {
        node.accept(self, ctx)
    }

    /// 默认行为：依次访问子节点，丢弃其结果，最后返回 `default_return`
    fn default_visit(&mut self, node: &dyn NodeView<AstNode>, ctx: &mut C) -> R {
        for child in node.children() {
            let _ = self.visit(child, ctx);
        }
        self.default_return(node, ctx)
    }

    /// 基础返回值
    fn default_return(&mut self, node: &dyn NodeView<AstNode>, ctx: &mut C) -> R;

    /// 访问查询语句
    fn visit_query(&mut self, node: &Query, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 SELECT-FROM-WHERE 查询体
    fn visit_query_body_sfw(&mut self, node: &QueryBodySfw, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问集合运算查询体
    fn visit_query_body_set_op(&mut self, node: &QueryBodySetOp, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问集合运算符
    fn visit_set_op(&mut self, node: &SetOp, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 SELECT *
    fn visit_select_star(&mut self, node: &SelectStar, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 SELECT 列表
    fn visit_select_list(&mut self, node: &SelectList, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 SELECT 表达式项
    fn visit_select_item_expr(&mut self, node: &SelectItemExpr, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 SELECT VALUE
    fn visit_select_value(&mut self, node: &SelectValue, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 EXCLUDE 子句
    fn visit_exclude(&mut self, node: &Exclude, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 EXCLUDE 路径
    fn visit_exclude_path(&mut self, node: &ExcludePath, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 FROM 子句
    fn visit_from(&mut self, node: &From, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 FROM 数据源
    fn visit_from_expr(&mut self, node: &FromExpr, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 LET 子句
    fn visit_let(&mut self, node: &Let, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 LET 绑定
    fn visit_let_binding(&mut self, node: &LetBinding, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 GROUP BY 子句
    fn visit_group_by(&mut self, node: &GroupBy, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 GROUP BY 键
    fn visit_group_by_key(&mut self, node: &GroupByKey, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问标识符
    fn visit_identifier(&mut self, node: &Identifier, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问标识符链
    fn visit_identifier_chain(&mut self, node: &IdentifierChain, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问字面量
    fn visit_expr_lit(&mut self, node: &ExprLit, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问变量引用
    fn visit_expr_var_ref(&mut self, node: &ExprVarRef, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问函数调用
    fn visit_expr_call(&mut self, node: &ExprCall, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问运算符表达式
    fn visit_expr_operator(&mut self, node: &ExprOperator, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 AND
    fn visit_expr_and(&mut self, node: &ExprAnd, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 OR
    fn visit_expr_or(&mut self, node: &ExprOr, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 NOT
    fn visit_expr_not(&mut self, node: &ExprNot, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问路径表达式
    fn visit_expr_path(&mut self, node: &ExprPath, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问字段路径步
    fn visit_path_step_field(&mut self, node: &PathStepField, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问下标路径步
    fn visit_path_step_element(&mut self, node: &PathStepElement, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }
}
