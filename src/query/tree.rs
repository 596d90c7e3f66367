//! 通用树节点约定
//!
//! 语法树节点（`AstNode`）与逻辑计划算子（`Operator`）都实现 `TreeNode`。
//! 模式匹配、策略选择与编译驱动只依赖这里定义的约定：
//!
//! - `kind()`：节点的具体类型标签，类型匹配是标签相等，不存在父类型匹配
//! - `children()`：按声明顺序列出直接子节点，未设置的可选属性直接跳过，不以空值占位
//! - `check()`：属性与子节点视图的一致性检查

use std::fmt;
use std::hash::Hash;

/// 树节点约定
pub trait TreeNode: fmt::Debug + 'static {
    /// 节点类型标签
    type Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// 节点的具体类型
    fn kind(&self) -> Self::Kind;

    /// 直接子节点，顺序固定为声明顺序
    fn children(&self) -> Vec<&Self>;

    /// 属性与子节点是否一致，不一致时返回原因
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// 枚举变体载荷的节点视图
///
/// 访问者的默认遍历只需要类型标签与子节点，
/// 因此载荷结构体实现该 trait 后即可交给 `default_visit` / `default_return`。
pub trait NodeView<N: TreeNode> {
    fn kind(&self) -> N::Kind;

    fn children(&self) -> Vec<&N>;

    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// 节点在树中的位置：从根开始逐层的子节点下标
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    /// 返回第 `index` 个子节点的位置
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push(index);
        path
    }

    /// 在给定的树中定位该位置上的节点
    pub fn resolve<'n, N: TreeNode>(&self, root: &'n N) -> Option<&'n N> {
        let mut current = root;
        for &index in &self.0 {
            current = current.children().get(index).copied()?;
        }
        Some(current)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

/// 定义节点枚举
///
/// 自动生成节点枚举、类型标签枚举、`TreeNode` 实现、`accept` 双分派以及载荷到枚举的 `From` 转换。
/// 每个载荷类型需要自行实现 `NodeView`，访问者 trait 需要在调用处可见。
///
/// # 示例
/// ```ignore
/// define_node_enum! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum Operator: OperatorKind, PlanVisitor {
///         Scan(Scan) => visit_scan,
///         Filter(Filter) => visit_filter,
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_node_enum {
    (
        $(#[$meta:meta])*
        pub enum $node:ident: $kind:ident, $visitor:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($payload:ty) => $visit:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $node {
            $(
                $(#[$vmeta])*
                $variant($payload),
            )+
        }

        /// 节点类型标签
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $kind {
            $( $variant, )+
        }

        impl $kind {
            /// 全部类型标签，按声明顺序
            pub const ALL: &'static [$kind] = &[ $( $kind::$variant, )+ ];

            pub fn name(self) -> &'static str {
                match self {
                    $( $kind::$variant => stringify!($variant), )+
                }
            }
        }

        impl ::std::fmt::Display for $kind {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }

        $(
            impl $payload {
                pub const KIND: $kind = $kind::$variant;
            }

            impl ::std::convert::From<$payload> for $node {
                fn from(node: $payload) -> Self {
                    $node::$variant(node)
                }
            }
        )+

        impl $crate::query::tree::TreeNode for $node {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $( $node::$variant(_) => $kind::$variant, )+
                }
            }

            fn children(&self) -> ::std::vec::Vec<&$node> {
                match self {
                    $( $node::$variant(inner) => $crate::query::tree::NodeView::<$node>::children(inner), )+
                }
            }

            fn check(&self) -> ::std::result::Result<(), ::std::string::String> {
                match self {
                    $( $node::$variant(inner) => $crate::query::tree::NodeView::<$node>::check(inner), )+
                }
            }
        }

        impl $node {
            /// 双分派：调用访问者中与当前变体对应的回调
            pub fn accept<R, C, V: $visitor<R, C> + ?Sized>(&self, visitor: &mut V, ctx: &mut C) -> R {
                match self {
                    $( $node::$variant(inner) => visitor.$visit(inner, ctx), )+
                }
            }
        }
    };
}
