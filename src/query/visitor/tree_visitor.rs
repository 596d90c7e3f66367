//! 通用树访问者
//!
//! 对任意 `TreeNode` 的结构化遍历：默认行为按声明顺序递归访问所有子节点，
//! 丢弃子节点的返回值，最后返回调用方提供的 `default_return`。
//! 需要子节点结果的访问者（例如编译驱动）覆盖 `visit` 自行收集。

use std::collections::BTreeMap;

use crate::query::tree::TreeNode;

/// 通用树访问者 trait
pub trait TreeVisitor<N: TreeNode> {
    /// 访问结果的类型
    type Result;
    /// 调用方提供的遍历上下文
    type Context;

    /// 访问节点，默认退化为结构化遍历
    fn visit(&mut self, node: &N, ctx: &mut Self::Context) -> Self::Result {
        self.default_visit(node, ctx)
    }

    /// 按声明顺序访问所有子节点，再返回 `default_return`
    fn default_visit(&mut self, node: &N, ctx: &mut Self::Context) -> Self::Result {
        for child in node.children() {
            let _ = self.visit(child, ctx);
        }
        self.default_return(node, ctx)
    }

    /// 子节点访问完之后的基础返回值
    fn default_return(&mut self, node: &N, ctx: &mut Self::Context) -> Self::Result;
}

/// 计划树统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// 节点总数
    pub node_count: usize,
    /// 最大深度（根节点深度为 0）
    pub max_depth: usize,
    /// 按类型名统计的节点数
    pub kinds: BTreeMap<String, usize>,
}

impl PlanStats {
    /// 收集一棵树的统计信息
    pub fn collect<N: TreeNode>(root: &N) -> Self {
        let mut collector = PlanStatsCollector::default();
        let mut depth = 0usize;
        collector.visit(root, &mut depth);
        collector.stats
    }

    pub fn count_of(&self, kind: &str) -> usize {
        self.kinds.get(kind).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct PlanStatsCollector {
    stats: PlanStats,
}

impl<N: TreeNode> TreeVisitor<N> for PlanStatsCollector {
    type Result = ();
    type Context = usize;

    fn visit(&mut self, node: &N, depth: &mut usize) {
        self.stats.node_count += 1;
        self.stats.max_depth = self.stats.max_depth.max(*depth);
        *self
            .stats
            .kinds
            .entry(node.kind().to_string())
            .or_insert(0) += 1;

        *depth += 1;
        self.default_visit(node, depth);
        *depth -= 1;
    }

    fn default_return(&mut self, _node: &N, _depth: &mut usize) {}
}
