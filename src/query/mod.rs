// Query module for the plan compiler
//
// This module provides the compilation pipeline:
// - Tree contract shared by syntax trees and logical plans
// - Visitors over both trees
// - Strategy-based lowering of logical plans into physical expressions

pub mod ast;
pub mod compiler;
pub mod plan;
pub mod tree;
pub mod visitor;

pub use crate::core::{CompileError, CompileResult};
pub use compiler::{PartiQLCompiler, Statement};
pub use plan::{Operator, Plan};
