// src/parser/parsers.rs

use crate::lexer::Token;
use crate::parser::ast::*;
use crate::utils::Span;
use chumsky::input::ValueInput;
use chumsky::prelude::*;

pub(super) type ParseError<'a> = extra::Err<Rich<'a, Token, SimpleSpan>>;

fn to_span(span: SimpleSpan) -> Span {
    span.into_range()
}

/// 后缀运算：调用、成员访问、自增自减
enum Postfix {
    Call(Vec<Expression>),
    Member(Ident),
    Op(String),
}

/// 构建完整的翻译单元解析器。
/// 此函数为内部实现细节，仅对父模块 `mod.rs` 可见。
pub(super) fn unit_parser<'a, I>() -> impl Parser<'a, I, TranslationUnit, ParseError<'a>>
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // --- 递归解析器声明 ---
    let mut type_name = Recursive::declare();
    let mut expr = Recursive::declare();
    let mut stmt = Recursive::declare();

    // --- 基础解析器 ---
    let ident = select! { Token::Ident(name) = e => Ident { name, span: to_span(e.span()) } }
        .labelled("identifier");
    let doc = select! { Token::DocComment(text) = e => DocComment { text, span: to_span(e.span()) } }
        .labelled("doc comment");

    // `C1<T>::c1m`：每一段可以带模板实参
    let segment = ident.clone()
        .then(
            type_name
                .clone()
                .separated_by(just(Token::Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(Token::Lt), just(Token::Gt))
                .or_not(),
        )
        .map(|(ident, args)| NameSegment {
            ident,
            template_args: args.unwrap_or_default(),
        });
    let qualified = segment
        .separated_by(just(Token::PathSep))
        .at_least(1)
        .collect::<Vec<_>>()
        .map_with(|segments, e| QualifiedName {
            segments,
            span: to_span(e.span()),
        })
        .labelled("name")
        .boxed();

    type_name.define(
        just(Token::Const)
            .or_not()
            .then(qualified.clone())
            .then(
                choice((just(Token::Star), just(Token::Ampersand), just(Token::And)))
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .map_with(|((is_const, name), indirections), e| TypeName {
                is_const: is_const.is_some(),
                name,
                indirections: indirections.len(),
                span: to_span(e.span()),
            })
            .labelled("type"),
    );

    // --- 表达式解析器 ---
    expr.define({
        let path = ident.clone()
            .separated_by(just(Token::PathSep))
            .at_least(1)
            .collect::<Vec<_>>()
            .map_with(|idents, e| QualifiedName {
                segments: idents
                    .into_iter()
                    .map(|ident| NameSegment {
                        ident,
                        template_args: Vec::new(),
                    })
                    .collect(),
                span: to_span(e.span()),
            });

        let literal = select! {
            Token::Integer(v) => v,
            Token::Float(v) => v,
            Token::String(s) => format!("{:?}", s),
            Token::Char(c) => c,
        };

        let atom = choice((
            literal.map_with(|value, e| Expression {
                kind: ExprKind::Literal(value),
                span: to_span(e.span()),
            }),
            path.map_with(|name, e| Expression {
                kind: ExprKind::Name(name),
                span: to_span(e.span()),
            }),
            expr.clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        ));

        let postfix_op = choice((
            expr.clone()
                .separated_by(just(Token::Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(Token::LParen), just(Token::RParen))
                .map(Postfix::Call),
            just(Token::Dot)
                .or(just(Token::Arrow))
                .ignore_then(ident.clone())
                .map(Postfix::Member),
            just(Token::Increment)
                .to("++".to_string())
                .or(just(Token::Decrement).to("--".to_string()))
                .map(Postfix::Op),
        ))
        .map_with(|op, e| (op, to_span(e.span())));

        let postfix = atom.foldl(postfix_op.repeated(), |operand, (op, op_span)| {
            let span = operand.span.start..op_span.end;
            let kind = match op {
                Postfix::Call(args) => ExprKind::Call {
                    callee: Box::new(operand),
                    args,
                },
                Postfix::Member(member) => ExprKind::Member {
                    object: Box::new(operand),
                    member,
                },
                Postfix::Op(op) => ExprKind::Postfix {
                    op,
                    operand: Box::new(operand),
                },
            };
            Expression { kind, span }
        });

        let prefix_op = select! {
            Token::Minus => "-",
            Token::Not => "!",
            Token::Star => "*",
            Token::Ampersand => "&",
            Token::Tilde => "~",
            Token::Increment => "++",
            Token::Decrement => "--",
        }
        .map_with(|op, e| (op.to_string(), to_span(e.span())));

        let unary = prefix_op.repeated().foldr(postfix, |(op, op_span), operand| {
            let span = op_span.start..operand.span.end;
            Expression {
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            }
        });

        // 运算符的优先级与语义无关，这里只需要找出读取了哪些名字
        let binary_op = select! {
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Lte => "<=",
            Token::Gte => ">=",
            Token::Eq => "==",
            Token::NotEq => "!=",
            Token::And => "&&",
            Token::Or => "||",
        };
        let binary = unary
            .clone()
            .foldl(binary_op.then(unary).repeated(), |left, (op, right)| {
                let span = left.span.start..right.span.end;
                Expression {
                    kind: ExprKind::Binary {
                        op: op.to_string(),
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                }
            });

        let assign_op = select! {
            Token::Assign => "=",
            Token::PlusAssign => "+=",
            Token::MinusAssign => "-=",
            Token::StarAssign => "*=",
            Token::SlashAssign => "/=",
        };

        binary
            .then(assign_op.then(expr.clone()).or_not())
            .map_with(|(target, rhs), e| match rhs {
                Some((op, value)) => Expression {
                    kind: ExprKind::Assign {
                        op: op.to_string(),
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    span: to_span(e.span()),
                },
                None => target,
            })
            .labelled("expression")
    });

    // --- 语句和代码块 ---
    let var_decl = type_name
        .clone()
        .then(ident.clone())
        .then(just(Token::Assign).ignore_then(expr.clone()).or_not())
        .then_ignore(just(Token::Semicolon))
        .map_with(|((ty, name), init), e| VarDecl {
            ty,
            name,
            init,
            span: to_span(e.span()),
        })
        .boxed();

    let block = stmt
        .clone()
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map_with(|stmts, e| Block {
            stmts,
            span: to_span(e.span()),
        })
        .labelled("block")
        .boxed();

    let paren_condition = expr
        .clone()
        .delimited_by(just(Token::LParen), just(Token::RParen));

    stmt.define(
        choice((
            doc.clone().map(Statement::DocComment),
            block.clone().map(Statement::Block),
            just(Token::Return)
                .ignore_then(expr.clone().or_not())
                .then_ignore(just(Token::Semicolon))
                .map_with(|value, e| Statement::Return {
                    value,
                    span: to_span(e.span()),
                }),
            just(Token::If)
                .ignore_then(paren_condition.clone())
                .then(stmt.clone())
                .then(just(Token::Else).ignore_then(stmt.clone()).or_not())
                .map_with(|((condition, then_branch), else_branch), e| Statement::If {
                    condition,
                    then_branch: Box::new(then_branch),
                    else_branch: else_branch.map(Box::new),
                    span: to_span(e.span()),
                }),
            just(Token::While)
                .ignore_then(paren_condition)
                .then(stmt.clone())
                .map_with(|(condition, body), e| Statement::While {
                    condition,
                    body: Box::new(body),
                    span: to_span(e.span()),
                }),
            var_decl.clone().map(Statement::VarDecl),
            expr.clone()
                .then_ignore(just(Token::Semicolon))
                .map(Statement::Expr),
        ))
        .labelled("statement"),
    );

    // --- 声明 ---
    let template_header = just(Token::Template)
        .ignore_then(
            just(Token::Typename)
                .or(just(Token::Class))
                .ignore_then(ident.clone())
                .separated_by(just(Token::Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(Token::Lt), just(Token::Gt)),
        )
        .map_with(|params, e| TemplateHeader {
            params,
            span: to_span(e.span()),
        })
        .labelled("template header");
    let docs = doc.clone().repeated().collect::<Vec<_>>();

    // 模板头之间、模板头与声明之间都可以夹着文档注释
    let templates = template_header
        .then(docs.clone())
        .repeated()
        .collect::<Vec<_>>()
        .map(|levels| {
            let mut headers = Vec::with_capacity(levels.len());
            let mut comments = Vec::new();
            for (header, docs) in levels {
                headers.push(header);
                comments.extend(docs);
            }
            (headers, comments)
        })
        .boxed();

    let param = docs
        .clone()
        .then(type_name.clone())
        .then(ident.clone().or_not())
        .map_with(|((docs, ty), name), e| Param {
            docs,
            ty,
            name,
            span: to_span(e.span()),
        });
    // 最后一个参数之后、`)` 之前的注释单独返回
    let params = param
        .separated_by(just(Token::Comma))
        .collect::<Vec<_>>()
        .then(docs.clone())
        .delimited_by(just(Token::LParen), just(Token::RParen));

    let access_specifier = choice((
        just(Token::Public),
        just(Token::Private),
        just(Token::Protected),
    ))
    .then_ignore(just(Token::Colon))
    .ignored();

    let item = recursive(|item| {
        let namespace = just(Token::Namespace)
            .ignore_then(ident.clone())
            .then(
                item.clone()
                    .repeated()
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::LBrace), just(Token::RBrace)),
            )
            .then_ignore(just(Token::Semicolon).or_not())
            .map_with(|(name, items), e| {
                Item::Namespace(NamespaceDef {
                    name,
                    items,
                    span: to_span(e.span()),
                })
            })
            .labelled("namespace");

        // 访问控制符不产生声明，直接丢弃
        let members = choice((item.clone().map(Some), access_specifier.to(None)))
            .repeated()
            .collect::<Vec<_>>()
            .map(|members| members.into_iter().flatten().collect::<Vec<_>>())
            .delimited_by(just(Token::LBrace), just(Token::RBrace));

        let class_def = templates
            .clone()
            .then_ignore(just(Token::Class).or(just(Token::Struct)))
            .then(ident.clone())
            .then(members.or_not())
            .then_ignore(just(Token::Semicolon))
            .map_with(|(((templates, docs), name), body), e| {
                Item::Class(ClassDef {
                    templates,
                    docs,
                    name,
                    body,
                    span: to_span(e.span()),
                })
            })
            .labelled("class");

        // 普通函数带返回类型；构造函数没有
        let signature = type_name
            .clone()
            .then(qualified.clone())
            .map(|(return_type, name)| (Some(return_type), name))
            .or(qualified.clone().map(|name| (None, name)));

        let function = templates
            .clone()
            .then(signature)
            .then(params)
            .then_ignore(just(Token::Const).or_not())
            .then(block.clone().map(Some).or(just(Token::Semicolon).to(None)))
            .map_with(|((((templates, mut docs), (return_type, name)), (params, trailing)), body), e| {
                docs.extend(trailing);
                Item::Function(FunctionDef {
                    templates,
                    docs,
                    return_type,
                    name,
                    params,
                    body,
                    span: to_span(e.span()),
                })
            })
            .labelled("function");

        choice((
            doc.clone().map(Item::DocComment),
            namespace,
            class_def,
            function,
            var_decl.clone().map(Item::Variable),
        ))
        .labelled("declaration")
        .boxed()
    });

    item.repeated()
        .collect::<Vec<_>>()
        .map(|items| TranslationUnit { items })
        .then_ignore(end())
}
