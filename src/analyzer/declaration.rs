// src/analyzer/declaration.rs

use super::scope::ScopeId;
use crate::utils::Span;
use std::fmt;

/// 声明在 ScopeGraph 中的索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) usize);

/// 声明的种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Namespace,
    Class,
    TemplateClass,
    Function,
    TemplateFunction,
    Method,
    TemplateMethod,
    Field,
    Variable,
    Parameter,
    TemplateParam,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Namespace => "namespace",
            DeclKind::Class => "class",
            DeclKind::TemplateClass => "template-class",
            DeclKind::Function => "function",
            DeclKind::TemplateFunction => "template-function",
            DeclKind::Method => "method",
            DeclKind::TemplateMethod => "template-method",
            DeclKind::Field => "field",
            DeclKind::Variable => "variable",
            DeclKind::Parameter => "parameter",
            DeclKind::TemplateParam => "template-param",
        }
    }

    pub fn is_template(self) -> bool {
        matches!(
            self,
            DeclKind::TemplateClass | DeclKind::TemplateFunction | DeclKind::TemplateMethod
        )
    }

    pub fn is_callable(self) -> bool {
        matches!(
            self,
            DeclKind::Function
                | DeclKind::TemplateFunction
                | DeclKind::Method
                | DeclKind::TemplateMethod
        )
    }

    pub fn is_class(self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::TemplateClass)
    }

    /// 可以出现在限定名 `A::B::c` 前缀中的种类
    pub fn is_container(self) -> bool {
        matches!(
            self,
            DeclKind::Namespace | DeclKind::Class | DeclKind::TemplateClass
        )
    }

    /// 是否存在“前置声明 / 定义”的区分。没有这种区分的种类，同名即重复。
    pub fn has_forward_declarations(self) -> bool {
        self.is_class() || self.is_callable()
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个具名实体。所有权属于 ScopeGraph；`scope` 是它所在的作用域。
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub id: DeclId,
    pub kind: DeclKind,
    pub name: String,
    pub scope: ScopeId,
    /// 组合声明（命名空间、类、函数、模板）的子声明，包括模板参数，按声明顺序
    pub children: Vec<DeclId>,
    /// 模板的类型参数名，按层次展开
    pub type_params: Vec<String>,
    /// 每一层模板头的参数个数，例如 `template<T> template<U>` 为 `[1, 1]`
    pub template_arity: Vec<usize>,
    /// 可调用声明的参数个数
    pub param_count: usize,
    /// 是否已经见到定义（类体 / 函数体）
    pub defined: bool,
    /// 类体、命名空间体或函数体对应的作用域
    pub body_scope: Option<ScopeId>,
    pub span: Span,
    pub line: usize,
}

/// 插入 ScopeGraph 之前的声明描述。
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeclaration {
    pub kind: DeclKind,
    pub name: String,
    pub type_params: Vec<String>,
    pub template_arity: Vec<usize>,
    pub param_count: usize,
    pub defined: bool,
    pub span: Span,
    pub line: usize,
}

impl NewDeclaration {
    pub fn new(kind: DeclKind, name: impl Into<String>, span: Span, line: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            type_params: Vec::new(),
            template_arity: Vec::new(),
            param_count: 0,
            defined: true,
            span,
            line,
        }
    }

    pub fn with_templates(mut self, levels: &[Vec<String>]) -> Self {
        self.template_arity = levels.iter().map(Vec::len).collect();
        self.type_params = levels.iter().flatten().cloned().collect();
        self
    }

    pub fn with_param_count(mut self, param_count: usize) -> Self {
        self.param_count = param_count;
        self
    }

    pub fn defined(mut self, defined: bool) -> Self {
        self.defined = defined;
        self
    }
}
