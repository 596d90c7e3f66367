//! PartiQL plan compiler - rule-based lowering of logical query plans
//!
//! This crate turns a logical operator tree into a physical expression tree
//! using an ordered registry of pattern-matched strategies. The first strategy
//! whose pattern matches a node lowers it; registration order is the only
//! priority signal.
//!
//! ```
//! use partiql_compiler::core::Mode;
//! use partiql_compiler::query::plan::{Filter, Operator, Plan, Scan};
//! use partiql_compiler::query::PartiQLCompiler;
//!
//! let plan = Plan::new(Operator::from(Filter::new(
//!     Scan::new(Operator::global("orders")).into(),
//!     Operator::lit(true),
//! )));
//! let statement = PartiQLCompiler::standard().prepare(&plan, Mode::Strict).unwrap();
//! assert_eq!(statement.mode(), Mode::Strict);
//! ```

pub mod config;
pub mod core;
pub mod query;
pub mod utils;
