//! 策略 trait 定义
//!
//! 策略把匹配到的逻辑节点转换为物理表达式。编译器自底向上驱动：
//! 调用 `apply` 时，节点的全部子节点都已完成转换，转换结果按 `children()` 的下标顺序放在 `Match` 中。
//! 策略本身必须是无状态的，同一个策略实例会被多个线程同时使用。

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::core::{CompileError, CompileResult, Mode};
use crate::query::compiler::pattern::Pattern;
use crate::query::tree::{NodePath, TreeNode};

/// 策略 trait
///
/// # 示例
/// ```ignore
/// #[derive(Debug)]
/// struct DistinctStrategy {
///     pattern: Pattern<Operator>,
/// }
///
/// impl Strategy<Operator, Expr> for DistinctStrategy {
///     fn name(&self) -> &str { "Distinct" }
///
///     fn pattern(&self) -> &Pattern<Operator> { &self.pattern }
///
///     fn apply(&self, mut m: Match<'_, Operator, Expr>) -> CompileResult<Expr> {
///         Ok(Expr::Distinct { input: Box::new(m.take_input(0)?) })
///     }
/// }
/// ```
pub trait Strategy<N: TreeNode, E>: fmt::Debug + Send + Sync {
    /// 策略名称
    fn name(&self) -> &str;

    /// 策略的模式
    fn pattern(&self) -> &Pattern<N>;

    /// 把匹配到的节点转换为物理表达式
    ///
    /// 返回的错误原样上抛给 `prepare` 的调用方
    fn apply(&self, m: Match<'_, N, E>) -> CompileResult<E>;

    /// 检查策略是否匹配
    fn matches(&self, node: &N) -> bool {
        self.pattern().matches(node)
    }
}

/// 一次匹配的上下文：逻辑节点、编译模式、节点位置，以及已转换完成的子节点
pub struct Match<'a, N: TreeNode, E> {
    node: &'a N,
    mode: Mode,
    path: &'a NodePath,
    strategy: &'a str,
    inputs: Vec<Option<E>>,
}

impl<'a, N: TreeNode, E> Match<'a, N, E> {
    pub fn new(node: &'a N, mode: Mode, path: &'a NodePath, strategy: &'a str, inputs: Vec<E>) -> Self {
        Self {
            node,
            mode,
            path,
            strategy,
            inputs: inputs.into_iter().map(Some).collect(),
        }
    }

    /// 匹配到的逻辑节点
    pub fn node(&self) -> &'a N {
        self.node
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn path(&self) -> &NodePath {
        self.path
    }

    pub fn strategy(&self) -> &str {
        self.strategy
    }

    /// 子节点数量（含已取走的）
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// 尚未取走的子节点转换结果
    pub fn inputs(&self) -> Vec<&E> {
        self.inputs.iter().flatten().collect()
    }

    /// 第 `index` 个子节点的转换结果
    pub fn input(&self, index: usize) -> Option<&E> {
        self.inputs.get(index).and_then(|input| input.as_ref())
    }

    /// 取走第 `index` 个子节点的转换结果
    pub fn take_input(&mut self, index: usize) -> CompileResult<E> {
        let taken = self.inputs.get_mut(index).and_then(Option::take);
        match taken {
            Some(input) => Ok(input),
            None => Err(self.conversion_error(format!(
                "子节点 {} 不存在或已被取走（共 {} 个）",
                index,
                self.inputs.len()
            ))),
        }
    }

    /// 按下标区间取走子节点的转换结果
    pub fn take_inputs(&mut self, range: Range<usize>) -> CompileResult<Vec<E>> {
        range.map(|index| self.take_input(index)).collect()
    }

    /// 取走全部剩余的子节点转换结果
    pub fn into_inputs(self) -> Vec<E> {
        self.inputs.into_iter().flatten().collect()
    }

    /// 构造带有策略名、节点类型与位置的转换失败错误
    pub fn conversion_error(&self, reason: impl Into<String>) -> CompileError {
        CompileError::conversion_failure(self.strategy, self.node.kind(), self.path.clone(), reason)
    }
}

impl<N: TreeNode, E: fmt::Debug> fmt::Debug for Match<'_, N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("kind", &self.node.kind())
            .field("mode", &self.mode)
            .field("path", &self.path)
            .field("strategy", &self.strategy)
            .field("inputs", &self.inputs)
            .finish()
    }
}

/// 转换函数
pub type ApplyFn<N, E> = Arc<dyn Fn(Match<'_, N, E>) -> CompileResult<E> + Send + Sync>;

/// 基于闭包的策略
pub struct StrategyFn<N: TreeNode, E> {
    name: String,
    pattern: Pattern<N>,
    apply: ApplyFn<N, E>,
}

impl<N: TreeNode, E> StrategyFn<N, E> {
    pub fn new<F>(name: impl Into<String>, pattern: Pattern<N>, apply: F) -> Self
    where
        F: Fn(Match<'_, N, E>) -> CompileResult<E> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            pattern,
            apply: Arc::new(apply),
        }
    }
}

impl<N: TreeNode, E> Clone for StrategyFn<N, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            pattern: self.pattern.clone(),
            apply: Arc::clone(&self.apply),
        }
    }
}

impl<N: TreeNode, E> fmt::Debug for StrategyFn<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyFn")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish()
    }
}

impl<N: TreeNode, E> Strategy<N, E> for StrategyFn<N, E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &Pattern<N> {
        &self.pattern
    }

    fn apply(&self, m: Match<'_, N, E>) -> CompileResult<E> {
        (self.apply)(m)
    }
}
