//! 计划编译器实现
//!
//! 管理有序的策略注册表，自底向上把逻辑计划降级为物理表达式。
//!
//! 编译流程：
//! 1. `PlanValidator` 检查整棵树（深度上限、节点一致性），失败立即返回
//! 2. 前序为每个节点选择第一个匹配的策略，没有匹配时报告该节点的类型与位置
//! 3. 按声明顺序转换全部子节点，结果按 `children()` 的下标放入 `Match`
//! 4. 调用策略的 `apply`，根节点的结果连同模式包装为 `Statement`
//!
//! 注册表在 `build()` 后冻结，由 `Arc` 共享；每次 `prepare` 的遍历状态都在调用栈上，
//! 多个线程可以同时使用同一个编译器。

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::CompilerOptions;
use crate::core::{CompileError, CompileResult, Mode};
use crate::query::compiler::expr::Expr;
use crate::query::compiler::standard::standard_strategies;
use crate::query::compiler::statement::Statement;
use crate::query::compiler::strategy::{Match, Strategy};
use crate::query::plan::{Operator, Plan, PlanValidator};
use crate::query::tree::{NodePath, TreeNode};
use crate::query::visitor::{PlanStats, TreeVisitor};

type Registry<N, E> = Vec<Box<dyn Strategy<N, E>>>;

/// 计划编译器
pub struct PartiQLCompiler<N: TreeNode = Operator, E = Expr> {
    strategies: Arc<Registry<N, E>>,
    options: CompilerOptions,
}

impl<N: TreeNode, E: 'static> PartiQLCompiler<N, E> {
    /// 创建构建器
    pub fn builder() -> CompilerBuilder<N, E> {
        CompilerBuilder::new()
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// 按注册顺序遍历策略
    pub fn strategies(&self) -> impl Iterator<Item = &dyn Strategy<N, E>> + '_ {
        self.strategies.iter().map(|s| s.as_ref())
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// 按注册顺序返回第一个模式匹配的策略
    pub fn select(&self, node: &N) -> Option<&dyn Strategy<N, E>> {
        self.strategies().find(|s| s.matches(node))
    }

    /// 编译计划
    pub fn prepare(&self, plan: &Plan<N>, mode: Mode) -> CompileResult<Statement<E>> {
        let root = plan.root();
        PlanValidator::new(self.options.max_plan_depth).validate(root)?;

        if log::log_enabled!(log::Level::Debug) {
            let stats = PlanStats::collect(root);
            debug!(
                "编译计划: 根节点 {}, 节点数 {}, 最大深度 {}, 模式 {}",
                root.kind(),
                stats.node_count,
                stats.max_depth,
                mode
            );
        }
        if self.is_empty() {
            warn!("策略注册表为空，无法编译 {} 节点", root.kind());
        }

        let mut lowering = Lowering {
            compiler: self,
            mode,
        };
        let mut path = NodePath::root();
        let physical = lowering.visit(root, &mut path)?;
        Ok(Statement::new(physical, mode))
    }

    /// 使用配置中的默认模式编译计划
    pub fn prepare_default(&self, plan: &Plan<N>) -> CompileResult<Statement<E>> {
        self.prepare(plan, self.options.default_mode)
    }
}

impl PartiQLCompiler<Operator, Expr> {
    /// 注册了标准策略集的编译器
    pub fn standard() -> Self {
        Self::builder().with_standard_strategies().build()
    }
}

impl<N: TreeNode, E> Clone for PartiQLCompiler<N, E> {
    fn clone(&self) -> Self {
        Self {
            strategies: Arc::clone(&self.strategies),
            options: self.options.clone(),
        }
    }
}

impl<N: TreeNode, E> fmt::Debug for PartiQLCompiler<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("PartiQLCompiler")
            .field("strategies", &names)
            .field("options", &self.options)
            .finish()
    }
}

/// 编译器构建器
///
/// 构建期间独占所有权，`build()` 之后注册表不可再修改。
pub struct CompilerBuilder<N: TreeNode = Operator, E = Expr> {
    strategies: Registry<N, E>,
    options: CompilerOptions,
}

impl<N: TreeNode, E: 'static> CompilerBuilder<N, E> {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            options: CompilerOptions::default(),
        }
    }

    /// 追加策略，先注册的优先
    pub fn add_strategy<S: Strategy<N, E> + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// 追加已装箱的策略
    pub fn add_boxed_strategy(mut self, strategy: Box<dyn Strategy<N, E>>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// 冻结注册表
    pub fn build(self) -> PartiQLCompiler<N, E> {
        info!(
            "构建计划编译器: {} 个策略, 最大深度 {}",
            self.strategies.len(),
            self.options.max_plan_depth
        );
        PartiQLCompiler {
            strategies: Arc::new(self.strategies),
            options: self.options,
        }
    }
}

impl CompilerBuilder<Operator, Expr> {
    /// 追加标准策略集
    pub fn with_standard_strategies(mut self) -> Self {
        self.strategies.extend(standard_strategies());
        self
    }
}

impl<N: TreeNode, E: 'static> Default for CompilerBuilder<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// 一次 `prepare` 的降级驱动
struct Lowering<'c, N: TreeNode, E> {
    compiler: &'c PartiQLCompiler<N, E>,
    mode: Mode,
}

impl<N: TreeNode, E: 'static> TreeVisitor<N> for Lowering<'_, N, E> {
    type Result = CompileResult<E>;
    type Context = NodePath;

    fn visit(&mut self, node: &N, path: &mut NodePath) -> CompileResult<E> {
        let compiler = self.compiler;
        let strategy = compiler
            .select(node)
            .ok_or_else(|| CompileError::unsupported_operator(node.kind(), path.clone()))?;

        let children = node.children();
        let mut inputs = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            path.push(index);
            let converted = self.visit(child, path);
            path.pop();
            inputs.push(converted?);
        }

        if compiler.options.trace_strategies {
            debug!("{} {} -> {}", path, node.kind(), strategy.name());
        }
        strategy.apply(Match::new(node, self.mode, path, strategy.name(), inputs))
    }

    fn default_return(&mut self, node: &N, path: &mut NodePath) -> CompileResult<E> {
        Err(CompileError::unsupported_operator(node.kind(), path.clone()))
    }
}
