//! 基于策略的计划编译器
//!
//! 逻辑计划经由有序的策略注册表降级为物理表达式。
//! 策略之间没有代价比较，注册顺序就是唯一的优先级。

pub mod expr;
pub mod macros;
pub mod pattern;
pub mod plan_compiler;
pub mod standard;
pub mod statement;
pub mod strategy;

pub use expr::{Expr, SortKey};
pub use pattern::{NodePredicate, Pattern};
pub use plan_compiler::{CompilerBuilder, PartiQLCompiler};
pub use standard::standard_strategies;
pub use statement::Statement;
pub use strategy::{ApplyFn, Match, Strategy, StrategyFn};
