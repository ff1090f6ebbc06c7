// In src/analyzer/mod.rs

// 1. 声明所有模块
pub mod annotation;
pub mod binder;
mod collect;
pub mod declaration;
pub mod frame;
mod resolve;
pub mod scope;
mod semantic_error;
pub mod units;


// 2. 导入依赖
use crate::builder::Event;
use crate::config::ResolverConfig;
use binder::Binder;

pub use annotation::{Annotation, AnnotationBody, EnclosingRef, FrameAssertion};
pub use binder::{Binding, Reference};
pub use declaration::{DeclId, DeclKind, Declaration, NewDeclaration};
pub use frame::{Classification, EnclosingEntity, Frame, FrameCheck, FrameResolver};
pub use scope::{Scope, ScopeGraph, ScopeId, ScopeKind};
pub use semantic_error::ResolveError;
pub use units::Unit;

/// 一个注解的完整解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub binding: Binding,
    pub frame: Frame,
    /// 引用说明的解析结果；frame 断言没有引用
    pub reference: Option<Reference>,
    /// frame 断言与计算结果的比较；引用说明没有断言
    pub check: Option<FrameCheck>,
}

/// 一个翻译单元的分析结果。
#[derive(Debug, Clone)]
pub struct Resolution {
    pub graph: ScopeGraph,
    /// 按注解在源代码中出现的顺序排列
    pub bindings: Vec<ResolvedBinding>,
    /// 非致命错误，按发现的顺序排列
    pub errors: Vec<ResolveError>,
}

impl Resolution {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// --- Analyzer 结构体与实现 ---
pub struct Analyzer {
    config: ResolverConfig,
    graph: scope::ScopeGraph,
    // 当前所在的作用域
    current: ScopeId,
    // 每个尚未关闭的声明或语句块进入之前的作用域
    open: Vec<ScopeId>,
    binder: Binder,
    errors: Vec<ResolveError>,
}

impl Analyzer {
    pub fn new(config: ResolverConfig) -> Self {
        let graph = ScopeGraph::new();
        let current = graph.global();
        Self {
            config,
            graph,
            current,
            open: Vec::new(),
            binder: Binder::new(),
            errors: Vec::new(),
        }
    }

    /// 分析一个翻译单元的事件流。
    ///
    /// 致命错误（重复声明、脱离全局作用域的作用域）直接返回 `Err`，不产生部分结果。
    pub fn run(mut self, events: &[Event]) -> Result<Resolution, ResolveError> {
        // PASS 1: 构建作用域图并绑定注解
        tracing::info!("building scope graph from {} events", events.len());
        collect::pass1_build_graph(&mut self, events)?;

        // PASS 2: 计算 frame、解析引用、检查断言
        let bindings = self.binder.finish();
        tracing::info!("resolving {} bindings", bindings.len());
        let resolved = resolve::pass2_resolve_bindings(
            &self.graph,
            self.config.namespace_policy,
            bindings,
            &mut self.errors,
        )?;

        Ok(Resolution {
            graph: self.graph,
            bindings: resolved,
            errors: self.errors,
        })
    }
}
