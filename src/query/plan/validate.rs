//! 计划校验
//!
//! 在任何策略运行之前整体检查一遍输入树：深度不得超过上限，每个节点的 `check()` 必须通过。
//! 校验失败立即返回，不产生部分结果。

use crate::core::{CompileError, CompileResult};
use crate::query::tree::{NodePath, TreeNode};
use crate::query::visitor::TreeVisitor;

/// 计划校验器
#[derive(Debug, Clone, Copy)]
pub struct PlanValidator {
    max_depth: usize,
}

impl PlanValidator {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn validate<N: TreeNode>(&mut self, root: &N) -> CompileResult<()> {
        let mut path = NodePath::root();
        self.visit(root, &mut path)
    }
}

impl<N: TreeNode> TreeVisitor<N> for PlanValidator {
    type Result = CompileResult<()>;
    type Context = NodePath;

    fn visit(&mut self, node: &N, path: &mut NodePath) -> CompileResult<()> {
        if path.depth() > self.max_depth {
            return Err(CompileError::plan_too_deep(node.kind(), path.clone(), self.max_depth));
        }
        node.check()
            .map_err(|reason| CompileError::malformed_plan(node.kind(), path.clone(), reason))?;

        for (index, child) in node.children().into_iter().enumerate() {
            path.push(index);
            let result = self.visit(child, path);
            path.pop();
            result?;
        }
        self.default_return(node, path)
    }

    fn default_return(&mut self, _node: &N, _path: &mut NodePath) -> CompileResult<()> {
        Ok(())
    }
}
