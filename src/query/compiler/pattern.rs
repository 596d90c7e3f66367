//! 模式匹配定义
//!
//! 模式由三部分组成：目标节点类型、可选的谓词、子节点模式列表。
//! 匹配规则：
//!
//! 1. 节点类型必须与目标类型完全相同，不存在父类型匹配；抽象类别只能用谓词表达
//! 2. 谓词（如果有）必须返回 true
//! 3. 子节点模式列表为空时不约束子节点，节点可以有任意数量的子节点
//! 4. 列表非空时，子节点数量必须与模式数量一致，且逐个匹配；数量不一致直接失败

use std::fmt;
use std::sync::Arc;

use crate::query::tree::TreeNode;

/// 节点谓词
pub type NodePredicate<N> = Arc<dyn Fn(&N) -> bool + Send + Sync>;

/// 模式结构体
pub struct Pattern<N: TreeNode> {
    kind: N::Kind,
    predicate: Option<NodePredicate<N>>,
    /// 为空表示不约束子节点
    children: Vec<Pattern<N>>,
}

impl<N: TreeNode> Pattern<N> {
    /// 匹配指定类型的节点，不约束子节点
    pub fn new(kind: N::Kind) -> Self {
        Self {
            kind,
            predicate: None,
            children: Vec::new(),
        }
    }

    /// 附加谓词，多次调用时所有谓词都必须满足
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        let combined: NodePredicate<N> = match self.predicate.take() {
            Some(previous) => Arc::new(move |node: &N| previous(node) && predicate(node)),
            None => Arc::new(predicate),
        };
        self.predicate = Some(combined);
        self
    }

    /// 追加一个子节点模式
    pub fn with_child(mut self, child: Pattern<N>) -> Self {
        self.children.push(child);
        self
    }

    /// 设置全部子节点模式，空列表等同于不约束
    pub fn with_children(mut self, children: Vec<Pattern<N>>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> N::Kind {
        self.kind
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn children(&self) -> &[Pattern<N>] {
        &self.children
    }

    /// 检查模式是否匹配给定节点
    pub fn matches(&self, node: &N) -> bool {
        if node.kind() != self.kind {
            return false;
        }

        if let Some(predicate) = &self.predicate {
            if !predicate(node) {
                return false;
            }
        }

        if self.children.is_empty() {
            return true;
        }

        let children = node.children();
        if children.len() != self.children.len() {
            return false;
        }
        self.children
            .iter()
            .zip(children)
            .all(|(pattern, child)| pattern.matches(child))
    }
}

impl<N: TreeNode> Clone for Pattern<N> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            predicate: self.predicate.clone(),
            children: self.children.clone(),
        }
    }
}

impl<N: TreeNode> fmt::Debug for Pattern<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("kind", &self.kind)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .field("children", &self.children)
            .finish()
    }
}

impl<N: TreeNode> fmt::Display for Pattern<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.predicate.is_some() {
            f.write_str("?")?;
        }
        if !self.children.is_empty() {
            f.write_str("[")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", child)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}
