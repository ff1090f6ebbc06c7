use crate::utils::Span;

/// 声明树构建器的输出：按源代码顺序排列的事件。
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Comment(CommentEvent),
    Declaration(DeclarationEvent),
    /// 函数体内的匿名语句块
    Block { span: Span },
    /// 关闭最近一个带体的声明或语句块
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    pub text: String,
    pub line: usize,
    pub span: Span,
}

/// 声明的大类；更细的种类（方法、字段、模板……）由所在作用域决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Namespace,
    Class,
    Function,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSpan {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationEvent {
    pub kind: DeclarationKind,
    pub name: String,
    /// 类外定义的限定前缀，例如 `C1<T>::c1m` 中的 `["C1"]`
    pub qualifier: Vec<String>,
    /// 每一层模板头的参数
    pub templates: Vec<Vec<NamedSpan>>,
    /// 有名字的函数参数
    pub params: Vec<NamedSpan>,
    /// 函数参数总数（包括无名参数）
    pub param_count: usize,
    /// 初始化表达式读取的名字
    pub reads: Vec<String>,
    /// 是否带体：带体的声明之后会有对应的 `End`
    pub has_body: bool,
    pub line: usize,
    pub span: Span,
}

impl DeclarationEvent {
    pub fn new(kind: DeclarationKind, name: impl Into<String>, line: usize, span: Span) -> Self {
        Self {
            kind,
            name: name.into(),
            qualifier: Vec::new(),
            templates: Vec::new(),
            params: Vec::new(),
            param_count: 0,
            reads: Vec::new(),
            has_body: false,
            line,
            span,
        }
    }

    pub fn template_names(&self) -> Vec<Vec<String>> {
        self.templates
            .iter()
            .map(|level| level.iter().map(|p| p.name.clone()).collect())
            .collect()
    }
}
