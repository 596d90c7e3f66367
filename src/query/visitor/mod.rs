//! 访问者模块
//! 通用树访问者与语法树、逻辑计划的按类型访问者

mod ast_visitor;
mod plan_visitor;
mod tree_visitor;

pub use ast_visitor::AstVisitor;
pub use plan_visitor::PlanVisitor;
pub use tree_visitor::{PlanStats, TreeVisitor};
