// src/analyzer/binder.rs

use super::annotation::Annotation;
use super::declaration::DeclId;
use super::scope::{ScopeGraph, ScopeId};
use super::semantic_error::ResolveError;
use super::units::{self, Unit};

/// 注解与它所描述的声明之间的绑定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub annotation: Annotation,
    /// 被注解的标识符解析到的声明
    pub target: DeclId,
    /// 注释后面紧跟的那条声明语句所声明的实体
    pub subject: DeclId,
    /// 该声明语句所在的作用域，引用查找也从这里开始
    pub scope: ScopeId,
}

/// 一条声明语句能提供给注解的名字：声明的名字本身，或初始化表达式读取的名字。
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub resolved: Result<DeclId, ResolveError>,
}

impl Candidate {
    pub fn declared(name: impl Into<String>, decl: DeclId) -> Self {
        Self {
            name: name.into(),
            resolved: Ok(decl),
        }
    }

    pub fn read(name: impl Into<String>, resolved: Result<DeclId, ResolveError>) -> Self {
        Self {
            name: name.into(),
            resolved,
        }
    }
}

/// 注解绑定器：先缓存注解，遇到下一条声明语句时一次性消费。
#[derive(Debug, Default)]
pub struct Binder {
    pending: Vec<Annotation>,
    bindings: Vec<Binding>,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        tracing::debug!("buffer annotation for `{}` (line {})", annotation.target, annotation.line);
        self.pending.push(annotation);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// 用一条声明语句消费整个缓冲区，按注解出现的顺序处理。
    /// 返回无法绑定的注解对应的错误。
    pub fn consume(&mut self, candidates: &[Candidate], subject: DeclId, scope: ScopeId) -> Vec<ResolveError> {
        let mut errors = Vec::new();
        for annotation in self.pending.drain(..) {
            match candidates.iter().find(|c| c.name == annotation.target) {
                Some(Candidate { resolved: Ok(target), .. }) => {
                    tracing::debug!("bind `{}` to {:?} (subject {:?})", annotation.target, target, subject);
                    self.bindings.push(Binding {
                        target: *target,
                        subject,
                        scope,
                        annotation,
                    });
                }
                Some(Candidate { resolved: Err(err), .. }) => {
                    errors.push(err.clone().at(annotation.span.clone()));
                }
                None => errors.push(ResolveError::UnboundAnnotation {
                    target: annotation.target,
                    span: annotation.span,
                }),
            }
        }
        errors
    }

    /// 作用域结束或翻译单元结束时，仍在缓冲区中的注解都无法绑定。
    pub fn flush_unbound(&mut self) -> Vec<ResolveError> {
        self.pending
            .drain(..)
            .map(|annotation| ResolveError::UnboundAnnotation {
                target: annotation.target,
                span: annotation.span,
            })
            .collect()
    }

    pub fn finish(self) -> Vec<Binding> {
        self.bindings
    }
}

/// 引用说明 `<name>: <reference>` 中 `<reference>` 的解析结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Symbol { path: String, decl: DeclId },
    /// 不是符号路径的自由文本，原样保留
    Text(String),
    /// 解析为物理单位的引用，例如 `m`、`cm^2`、`m/s`
    Unit { text: String, unit: Unit },
    Unresolved(String),
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// 从 binding 所在的作用域解析引用。
///
/// 单段名字在普通查找失败时退回到全图唯一匹配，再尝试按单位解析；仍然失败则返回 `NotFound`。
/// 符号优先于单位，所以作用域里声明了 `cm` 时 `z: cm` 指向那个声明。
pub fn resolve_reference(graph: &ScopeGraph, binding: &Binding, reference: &str) -> Result<Reference, ResolveError> {
    let segments: Vec<&str> = reference.split("::").collect();
    if !segments.iter().all(|segment| is_identifier(segment)) {
        return Ok(unit_or_text(reference));
    }

    let span = binding.annotation.span.clone();
    match graph.resolve_path(binding.scope, &segments) {
        Ok(decl) => Ok(Reference::Symbol {
            path: reference.to_string(),
            decl,
        }),
        Err(ResolveError::NotFound { .. }) if segments.len() == 1 => match graph.find_unique(reference) {
            Some(decl) => {
                tracing::debug!("`{}` is not visible from {:?}, using the only declaration {:?}", reference, binding.scope, decl);
                Ok(Reference::Symbol {
                    path: reference.to_string(),
                    decl,
                })
            }
            None => match units::parse_unit(reference) {
                Some(unit) => Ok(Reference::Unit {
                    text: reference.to_string(),
                    unit,
                }),
                None => Err(ResolveError::NotFound {
                    name: reference.to_string(),
                    span,
                }),
            },
        },
        Err(err) => Err(err.at(span)),
    }
}

fn unit_or_text(reference: &str) -> Reference {
    match units::parse_unit(reference) {
        Some(unit) => Reference::Unit {
            text: reference.to_string(),
            unit,
        },
        None => Reference::Text(reference.to_string()),
    }
}
