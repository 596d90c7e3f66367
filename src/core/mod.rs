pub mod error;
pub mod mode;
pub mod types;
pub mod value;

pub use error::{CompileError, CompileResult, ConfigError};
pub use mode::Mode;
pub use types::{
    Coercion, CollectionKind, ExcludePath, ExcludeStep, JoinType, SetOpKind, SetQuantifier,
    SortOrder,
};
pub use value::Value;
