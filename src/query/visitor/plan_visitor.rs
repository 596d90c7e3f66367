//! 逻辑计划访问者 trait
//!
//! 与 `AstVisitor` 同构：每种逻辑算子一个回调，默认退化为 `default_visit`。

use crate::query::plan::operator::*;
use crate::query::plan::Operator;
use crate::query::tree::NodeView;

/// 逻辑计划访问者
pub trait PlanVisitor<R, C> {
    fn visit(&mut self, node: &Operator, ctx: &mut C) -> R {
        node.accept(self, ctx)
    }

    /// 依次访问子节点后返回 `default_return`
    fn default_visit(&mut self, node: &dyn NodeView<Operator>, ctx: &mut C) -> R {
        for child in node.children() {
            let _ = self.visit(child, ctx);
        }
        self.default_return(node, ctx)
    }

    fn default_return(&mut self, node: &dyn NodeView<Operator>, ctx: &mut C) -> R;

    /// 访问扫描
    fn visit_scan(&mut self, node: &Scan, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问带位置扫描
    fn visit_scan_indexed(&mut self, node: &ScanIndexed, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 UNPIVOT
    fn visit_unpivot(&mut self, node: &Unpivot, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问过滤
    fn visit_filter(&mut self, node: &Filter, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问投影
    fn visit_project(&mut self, node: &Project, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问全列投影
    fn visit_project_all(&mut self, node: &ProjectAll, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 LIMIT
    fn visit_limit(&mut self, node: &Limit, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 OFFSET
    fn visit_offset(&mut self, node: &Offset, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问去重
    fn visit_distinct(&mut self, node: &Distinct, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问排序
    fn visit_sort(&mut self, node: &Sort, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问连接
    fn visit_join(&mut self, node: &Join, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 EXCLUDE
    fn visit_exclude(&mut self, node: &Exclude, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问集合运算
    fn visit_set_op(&mut self, node: &SetOp, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问字面量
    fn visit_lit(&mut self, node: &Lit, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问变量引用
    fn visit_var(&mut self, node: &Var, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问全局变量
    fn visit_global(&mut self, node: &Global, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问按键访问
    fn visit_path_key(&mut self, node: &PathKey, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问按符号访问
    fn visit_path_symbol(&mut self, node: &PathSymbol, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问按下标访问
    fn visit_path_index(&mut self, node: &PathIndex, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问函数调用
    fn visit_call(&mut self, node: &Call, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 CASE
    fn visit_case(&mut self, node: &Case, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问类型转换
    fn visit_cast(&mut self, node: &Cast, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问集合构造
    fn visit_collection(&mut self, node: &Collection, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问结构体构造
    fn visit_struct(&mut self, node: &Struct, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问元组合并
    fn visit_tuple_union(&mut self, node: &TupleUnion, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 SELECT 表达式
    fn visit_select(&mut self, node: &Select, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问子查询
    fn visit_subquery(&mut self, node: &Subquery, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问 PIVOT
    fn visit_pivot(&mut self, node: &Pivot, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }

    /// 访问错误标记
    fn visit_err(&mut self, node: &ErrOp, ctx: &mut C) -> R {
        self.default_visit(node, ctx)
    }
}
