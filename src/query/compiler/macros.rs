//! 策略宏定义
//!
//! 提供声明式宏用于简化标准策略的定义，减少样板代码。

/// 定义带节点类型解包的策略
///
/// 自动生成策略结构体、`new()`/`Default` 以及 `Strategy<Operator, Expr>` 实现。
/// 模式在 `new()` 中构造一次；`apply` 收到的节点已解包为对应的载荷类型。
///
/// # 示例
/// ```ignore
/// define_strategy! {
///     name: DistinctStrategy,
///     pattern: Pattern::new(OperatorKind::Distinct),
///     node_type: Distinct(Distinct),
///     apply: |mut m, _node| {
///         Ok(Expr::Distinct { input: Box::new(m.take_input(0)?) })
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_strategy {
    (
        $(#[$meta:meta])*
        name: $name:ident,
        pattern: $pattern:expr,
        node_type: $variant:ident($payload:ty),
        apply: $apply_closure:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            pattern: $crate::query::compiler::pattern::Pattern<$crate::query::plan::Operator>,
        }

        impl $name {
            /// 创建策略实例
            pub fn new() -> Self {
                Self { pattern: $pattern }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::query::compiler::strategy::Strategy<
            $crate::query::plan::Operator,
            $crate::query::compiler::expr::Expr,
        > for $name {
            fn name(&self) -> &str {
                stringify!($name)
            }

            fn pattern(&self) -> &$crate::query::compiler::pattern::Pattern<$crate::query::plan::Operator> {
                &self.pattern
            }

            fn apply(
                &self,
                m: $crate::query::compiler::strategy::Match<
                    '_,
                    $crate::query::plan::Operator,
                    $crate::query::compiler::expr::Expr,
                >,
            ) -> $crate::core::CompileResult<$crate::query::compiler::expr::Expr> {
                let typed_node = match m.node() {
                    $crate::query::plan::Operator::$variant(n) => n,
                    _ => {
                        return Err(m.conversion_error(concat!(
                            "期望 ",
                            stringify!($variant),
                            " 节点"
                        )))
                    }
                };

                let apply_fn: fn(
                    $crate::query::compiler::strategy::Match<
                        '_,
                        $crate::query::plan::Operator,
                        $crate::query::compiler::expr::Expr,
                    >,
                    &$payload,
                ) -> $crate::core::CompileResult<$crate::query::compiler::expr::Expr> = $apply_closure;
                apply_fn(m, typed_node)
            }
        }
    };
}
