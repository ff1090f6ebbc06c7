use crate::utils::Span;

// --- 1. 标识符与名字 ---

/// 一个标识符，例如变量名、类名或模板参数名。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// 限定名中的一段，例如 `C1<T>::c1m` 中的 `C1<T>`。
#[derive(Debug, Clone, PartialEq)]
pub struct NameSegment {
    pub ident: Ident,
    /// 模板实参，例如 `C1<T>` 中的 `T`。
    pub template_args: Vec<TypeName>,
}

/// 可能带 `::` 限定的名字。
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName {
    pub segments: Vec<NameSegment>,
    pub span: Span,
}

impl QualifiedName {
    /// 最后一段，也就是真正被声明的名字。
    pub fn last(&self) -> &Ident {
        // parser 保证 segments 非空
        &self.segments[self.segments.len() - 1].ident
    }

    /// 除最后一段以外的限定前缀。
    pub fn qualifier(&self) -> impl Iterator<Item = &Ident> {
        self.segments[..self.segments.len() - 1]
            .iter()
            .map(|segment| &segment.ident)
    }

    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    /// 用 `::` 连接的文本形式（不含模板实参）。
    pub fn to_path(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.ident.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }
}

/// 类型名。语义分析不关心类型本身，只保留名字与修饰符。
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub is_const: bool,
    pub name: QualifiedName,
    /// `*` 与 `&` 的个数
    pub indirections: usize,
    pub span: Span,
}

// --- 2. 顶层结构 ---

/// AST 的根节点，代表一个完整的翻译单元。
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub items: Vec<Item>,
}

/// `///` 文档注释。
#[derive(Debug, Clone, PartialEq)]
pub struct DocComment {
    pub text: String,
    pub span: Span,
}

/// 命名空间、类体或翻译单元中的一项。
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    DocComment(DocComment),
    Namespace(NamespaceDef),
    Class(ClassDef),
    Function(FunctionDef),
    Variable(VarDecl),
}

// --- 3. 声明 ---

/// `template <typename T, typename U>` 头部。
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateHeader {
    pub params: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDef {
    pub name: Ident,
    pub items: Vec<Item>,
    pub span: Span,
}

/// `class`/`struct`。`body` 为 `None` 时是前置声明。
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub templates: Vec<TemplateHeader>,
    /// 夹在模板头之间或模板头之后的文档注释
    pub docs: Vec<DocComment>,
    pub name: Ident,
    pub body: Option<Vec<Item>>,
    pub span: Span,
}

/// 函数、方法或构造函数。`body` 为 `None` 时是前置声明。
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub templates: Vec<TemplateHeader>,
    /// 声明头部中的文档注释：模板头之后，以及参数列表末尾
    pub docs: Vec<DocComment>,
    /// 构造函数没有返回类型
    pub return_type: Option<TypeName>,
    pub name: QualifiedName,
    pub params: Vec<Param>,
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// 写在参数之前的文档注释
    pub docs: Vec<DocComment>,
    pub ty: TypeName,
    pub name: Option<Ident>,
    pub span: Span,
}

/// 变量或字段声明。
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeName,
    pub name: Ident,
    pub init: Option<Expression>,
    pub span: Span,
}

// --- 4. 语句 ---

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    DocComment(DocComment),
    VarDecl(VarDecl),
    Block(Block),
    Return {
        value: Option<Expression>,
        span: Span,
    },
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        span: Span,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
        span: Span,
    },
    Expr(Expression),
}

// --- 5. 表达式 ---

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(String),
    /// 对一个（可能带限定的）名字的读取
    Name(QualifiedName),
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    Member {
        object: Box<Expression>,
        member: Ident,
    },
    Unary {
        op: String,
        operand: Box<Expression>,
    },
    Postfix {
        op: String,
        operand: Box<Expression>,
    },
    Binary {
        op: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Assign {
        op: String,
        target: Box<Expression>,
        value: Box<Expression>,
    },
}

impl Expression {
    /// 收集表达式中读取的所有名字（按出现顺序，限定名以 `::` 连接）。
    /// 成员访问只记录对象部分，成员名不是独立可见的名字。
    pub fn collect_reads(&self, out: &mut Vec<String>) {
        match &self.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Name(name) => out.push(name.to_path()),
            ExprKind::Call { callee, args } => {
                callee.collect_reads(out);
                for arg in args {
                    arg.collect_reads(out);
                }
            }
            ExprKind::Member { object, .. } => object.collect_reads(out),
            ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
                operand.collect_reads(out)
            }
            ExprKind::Binary { left, right, .. } => {
                left.collect_reads(out);
                right.collect_reads(out);
            }
            ExprKind::Assign { target, value, .. } => {
                target.collect_reads(out);
                value.collect_reads(out);
            }
        }
    }
}
