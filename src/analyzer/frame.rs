use super::annotation::{EnclosingRef, FrameAssertion};
use super::binder::Binding;
use super::declaration::DeclId;
use super::scope::{ScopeGraph, ScopeKind};
use super::semantic_error::ResolveError;
use crate::config::NamespacePolicy;
use std::fmt;
use std::str::FromStr;

/// 声明所在位置的分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Global,
    Local,
    Member,
    TemplateParam,
    /// 只在 `NamespacePolicy::Distinct` 下出现
    Namespace,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Global => "global",
            Classification::Local => "local",
            Classification::Member => "member",
            Classification::TemplateParam => "template-param",
            Classification::Namespace => "namespace",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Classification::Global),
            "local" => Ok(Classification::Local),
            "member" => Ok(Classification::Member),
            "template-param" => Ok(Classification::TemplateParam),
            "namespace" => Ok(Classification::Namespace),
            other => Err(format!("unknown frame classification `{}`", other)),
        }
    }
}

/// frame 中的外围实体。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnclosingEntity {
    /// 全局作用域，输出为 `::`
    Global,
    /// 匿名的函数体，输出为 `_`
    Anonymous,
    Named { name: String, qualified: String },
}

impl fmt::Display for EnclosingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnclosingEntity::Global => f.write_str("::"),
            EnclosingEntity::Anonymous => f.write_str("_"),
            EnclosingEntity::Named { name, .. } => f.write_str(name),
        }
    }
}

/// `(classification, enclosing-entity)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub classification: Classification,
    pub enclosing: EnclosingEntity,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.classification, self.enclosing)
    }
}

/// 计算 binding 目标声明的 frame。只读访问作用域图，可以重复调用。
pub struct FrameResolver<'g> {
    graph: &'g ScopeGraph,
    policy: NamespacePolicy,
}

impl<'g> FrameResolver<'g> {
    pub fn new(graph: &'g ScopeGraph, policy: NamespacePolicy) -> Self {
        Self { graph, policy }
    }

    pub fn resolve_frame(&self, binding: &Binding) -> Result<Frame, ResolveError> {
        self.frame_of(binding.target)
    }

    /// 按声明所在作用域的种类分类。命名空间在 Transparent 策略下不产生分类，继续看外层。
    pub fn frame_of(&self, decl: DeclId) -> Result<Frame, ResolveError> {
        let graph = self.graph;
        let scope = graph
            .decl(decl)
            .ok_or(ResolveError::DetachedScope { scope: graph.global() })?
            .scope;

        for id in graph.ancestors(scope)? {
            let Some(node) = graph.scope(id) else {
                break;
            };
            let frame = match node.kind {
                ScopeKind::Global => Frame {
                    classification: Classification::Global,
                    enclosing: EnclosingEntity::Global,
                },
                ScopeKind::FunctionLocal => Frame {
                    classification: Classification::Local,
                    enclosing: EnclosingEntity::Anonymous,
                },
                ScopeKind::Class => Frame {
                    classification: Classification::Member,
                    enclosing: self.named(node.owner, node.name.as_deref()),
                },
                ScopeKind::TemplateParam => Frame {
                    classification: Classification::TemplateParam,
                    enclosing: self.named(node.owner, node.name.as_deref()),
                },
                ScopeKind::Namespace => match self.policy {
                    NamespacePolicy::Transparent => continue,
                    NamespacePolicy::Distinct => Frame {
                        classification: Classification::Namespace,
                        enclosing: self.named(node.owner, node.name.as_deref()),
                    },
                },
            };
            return Ok(frame);
        }

        // ancestors() 保证链条以全局作用域结束，走到这里说明图已损坏
        Err(ResolveError::DetachedScope { scope })
    }

    fn named(&self, owner: Option<DeclId>, fallback: Option<&str>) -> EnclosingEntity {
        match owner.and_then(|owner| self.graph.decl(owner)) {
            Some(decl) => EnclosingEntity::Named {
                name: decl.name.clone(),
                qualified: self.graph.qualified_name(decl.id),
            },
            None => match fallback {
                Some(name) => EnclosingEntity::Named {
                    name: name.to_string(),
                    qualified: name.to_string(),
                },
                None => EnclosingEntity::Anonymous,
            },
        }
    }
}

/// 把 `frame(name) = (...)` 断言与计算结果比较的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCheck {
    pub expected: FrameAssertion,
    pub holds: bool,
}

impl FrameCheck {
    pub fn new(expected: &FrameAssertion, found: &Frame) -> Self {
        Self {
            expected: expected.clone(),
            holds: expected.matches(found),
        }
    }
}

impl FrameAssertion {
    /// 分类必须相同；`_` 匹配任意外围实体，否则名字需等于外围实体的名字或限定名。
    pub fn matches(&self, frame: &Frame) -> bool {
        if self.classification != frame.classification {
            return false;
        }
        match (&self.enclosing, &frame.enclosing) {
            (EnclosingRef::Wildcard, _) => true,
            (EnclosingRef::Global, EnclosingEntity::Global) => true,
            (EnclosingRef::Named(expected), EnclosingEntity::Named { name, qualified }) => {
                expected == name || expected == qualified
            }
            _ => false,
        }
    }
}
