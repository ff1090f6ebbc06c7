// src/analyzer/collect.rs
//
// 第一遍：按源代码顺序应用事件，构建作用域图，同时把注解绑定到紧随其后的声明。

use super::Analyzer;
use super::annotation::{ParsedComment, parse_comment};
use super::binder::Candidate;
use super::declaration::{DeclId, DeclKind, NewDeclaration};
use super::scope::{ScopeId, ScopeKind};
use super::semantic_error::ResolveError;
use crate::builder::{CommentEvent, DeclarationEvent, DeclarationKind, Event, NamedSpan};

pub(super) fn pass1_build_graph(analyzer: &mut Analyzer, events: &[Event]) -> Result<(), ResolveError> {
    for event in events {
        match event {
            Event::Comment(comment) => analyzer.comment(comment),
            Event::Declaration(decl) => analyzer.declaration(decl)?,
            Event::Block { .. } => {
                let owner = analyzer.graph.scope(analyzer.current).and_then(|scope| scope.owner);
                let block = analyzer
                    .graph
                    .open_scope(ScopeKind::FunctionLocal, None, analyzer.current, owner);
                analyzer.enter(block);
            }
            Event::End => analyzer.leave()?,
        }
    }

    // 翻译单元结束
    let unbound = analyzer.binder.flush_unbound();
    analyzer.errors.extend(unbound);
    if !analyzer.open.is_empty() {
        tracing::warn!("{} scopes are still open at end of unit", analyzer.open.len());
        return Err(ResolveError::DetachedScope {
            scope: analyzer.current,
        });
    }
    Ok(())
}

impl Analyzer {
    fn enter(&mut self, scope: ScopeId) {
        self.open.push(self.current);
        self.current = scope;
    }

    fn leave(&mut self) -> Result<(), ResolveError> {
        let unbound = self.binder.flush_unbound();
        self.errors.extend(unbound);
        // 多余的 End 说明事件流与作用域结构不一致
        self.current = self.open.pop().ok_or(ResolveError::DetachedScope { scope: self.current })?;
        Ok(())
    }

    fn current_kind(&self) -> Option<ScopeKind> {
        self.graph.scope(self.current).map(|scope| scope.kind)
    }

    fn comment(&mut self, comment: &CommentEvent) {
        match parse_comment(&comment.text, comment.line, comment.span.clone()) {
            ParsedComment::Annotation(annotation) => self.binder.push(annotation),
            ParsedComment::Malformed(reason) => self.errors.push(ResolveError::MalformedAnnotation {
                reason,
                span: comment.span.clone(),
            }),
            ParsedComment::Documentation => {}
        }
    }

    /// 用一条声明语句消费缓冲区中的注解。`scope` 是该语句所在的作用域。
    fn bind_pending(&mut self, candidates: &[Candidate], subject: DeclId, scope: ScopeId) {
        if !self.binder.has_pending() {
            return;
        }
        let errors = self.binder.consume(candidates, subject, scope);
        self.errors.extend(errors);
    }

    fn declaration(&mut self, event: &DeclarationEvent) -> Result<(), ResolveError> {
        match event.kind {
            DeclarationKind::Namespace => self.declare_namespace(event),
            DeclarationKind::Class => self.declare_class(event),
            DeclarationKind::Function if !event.qualifier.is_empty() => self.declare_out_of_line(event),
            DeclarationKind::Function => self.declare_function(event),
            DeclarationKind::Variable => self.declare_variable(event),
        }
    }

    fn declare_namespace(&mut self, event: &DeclarationEvent) -> Result<(), ResolveError> {
        let scope = self.current;
        let new = NewDeclaration::new(DeclKind::Namespace, &event.name, event.span.clone(), event.line);
        let ns = self.graph.declare(scope, new)?;

        // 重新打开的命名空间复用已有的作用域
        let body = match self.graph.decl(ns).and_then(|decl| decl.body_scope) {
            Some(body) => body,
            None => {
                let body = self
                    .graph
                    .open_scope(ScopeKind::Namespace, Some(event.name.clone()), scope, Some(ns));
                self.graph.set_body_scope(ns, body);
                body
            }
        };

        self.bind_pending(&[Candidate::declared(&event.name, ns)], ns, scope);
        if event.has_body {
            self.enter(body);
        }
        Ok(())
    }

    fn declare_class(&mut self, event: &DeclarationEvent) -> Result<(), ResolveError> {
        let scope = self.current;
        let kind = if event.templates.is_empty() {
            DeclKind::Class
        } else {
            DeclKind::TemplateClass
        };
        let new = NewDeclaration::new(kind, &event.name, event.span.clone(), event.line)
            .with_templates(&event.template_names())
            .defined(event.has_body);
        let class = self.graph.declare(scope, new)?;

        // 前置声明也有自己的模板参数作用域，只是没有类体
        let mut candidates = vec![Candidate::declared(&event.name, class)];
        let owners = vec![class; event.templates.len()];
        let parent = self.open_template_scopes(&event.templates, &owners, scope, event.line, &mut candidates)?;
        if event.has_body {
            let body = self
                .graph
                .open_scope(ScopeKind::Class, Some(event.name.clone()), parent, Some(class));
            self.graph.set_body_scope(class, body);
            self.bind_pending(&candidates, class, scope);
            self.enter(body);
        } else {
            self.bind_pending(&candidates, class, scope);
        }
        Ok(())
    }

    fn declare_function(&mut self, event: &DeclarationEvent) -> Result<(), ResolveError> {
        let scope = self.current;
        let in_class = self.current_kind() == Some(ScopeKind::Class);
        let kind = match (in_class, event.templates.is_empty()) {
            (true, true) => DeclKind::Method,
            (true, false) => DeclKind::TemplateMethod,
            (false, true) => DeclKind::Function,
            (false, false) => DeclKind::TemplateFunction,
        };
        let new = NewDeclaration::new(kind, &event.name, event.span.clone(), event.line)
            .with_templates(&event.template_names())
            .with_param_count(event.param_count)
            .defined(event.has_body);
        let func = self.graph.declare(scope, new)?;

        let owners = vec![func; event.templates.len()];
        self.function_body(event, func, scope, scope, &owners)
    }

    /// 类外定义，例如 `template <typename T> template <typename U> void C1<T>::c1m() {}`。
    ///
    /// 先解析限定前缀找到目标类，再在类中按形状找到对应的前置声明并与之合并。
    fn declare_out_of_line(&mut self, event: &DeclarationEvent) -> Result<(), ResolveError> {
        let scope = self.current;
        let path = format!("{}::{}", event.qualifier.join("::"), event.name);

        let Some((containers, target_scope)) = self.resolve_qualifier(event) else {
            tracing::warn!("cannot resolve the qualifier of `{}`", path);
            self.errors.push(ResolveError::NotFound {
                name: path,
                span: event.span.clone(),
            });
            return self.declare_function(event);
        };

        let levels: Vec<usize> = event.templates.iter().map(Vec::len).collect();
        let Some(method) = self.find_forward_declaration(event, &containers, target_scope, &levels) else {
            tracing::warn!("no declaration of `{}` matches this definition", path);
            self.errors.push(ResolveError::NotFound {
                name: path,
                span: event.span.clone(),
            });
            return self.declare_function(event);
        };

        if event.has_body {
            if let Some(existing) = self.graph.decl(method).filter(|decl| decl.defined) {
                return Err(ResolveError::DuplicateDeclaration {
                    name: event.name.clone(),
                    kind: existing.kind,
                    span: event.span.clone(),
                    original_span: existing.span.clone(),
                });
            }
            self.graph.mark_defined(method);
        }
        tracing::debug!("merge out-of-line definition `{}` into {:?}", path, method);

        // 每一层模板头依次属于限定前缀中的模板类，最后剩下的属于方法本身
        let mut owners: Vec<DeclId> = containers
            .iter()
            .copied()
            .filter(|id| self.graph.decl(*id).is_some_and(|decl| decl.kind.is_template()))
            .collect();
        owners.resize(event.templates.len(), method);
        self.function_body(event, method, scope, target_scope, &owners)
    }

    /// 解析限定前缀，返回前缀中的各个容器声明，以及最后一个容器的体作用域。
    fn resolve_qualifier(&self, event: &DeclarationEvent) -> Option<(Vec<DeclId>, ScopeId)> {
        let mut containers = Vec::with_capacity(event.qualifier.len());
        let mut current = self.graph.lookup(self.current, event.qualifier.first()?).ok()?;
        containers.push(current);
        for segment in &event.qualifier[1..] {
            current = self.graph.lookup_member(current, segment)?;
            containers.push(current);
        }
        let target = self.graph.decl(current)?;
        if !target.kind.is_container() {
            return None;
        }
        Some((containers, target.body_scope?))
    }

    /// 在目标作用域中按（模板链、名字、参数个数）找到前置声明。
    fn find_forward_declaration(
        &self,
        event: &DeclarationEvent,
        containers: &[DeclId],
        target_scope: ScopeId,
        levels: &[usize],
    ) -> Option<DeclId> {
        let mut enclosing: Vec<usize> = Vec::new();
        for id in containers {
            enclosing.extend(self.graph.decl(*id)?.template_arity.iter().copied());
        }
        self.graph
            .scope(target_scope)?
            .bucket(&event.name)
            .iter()
            .copied()
            .find(|id| {
                self.graph.decl(*id).is_some_and(|decl| {
                    let mut shape = enclosing.clone();
                    shape.extend(decl.template_arity.iter().copied());
                    decl.kind.is_callable() && decl.param_count == event.param_count && shape == levels
                })
            })
    }

    /// 打开函数的模板参数作用域；有函数体时再打开函数体作用域并声明参数，然后绑定注解。
    ///
    /// `scope` 是声明语句所在的作用域，`parent` 是模板参数作用域链挂靠的位置：
    /// 普通声明两者相同，类外定义挂在目标类的体作用域下。
    fn function_body(
        &mut self,
        event: &DeclarationEvent,
        func: DeclId,
        scope: ScopeId,
        parent: ScopeId,
        owners: &[DeclId],
    ) -> Result<(), ResolveError> {
        let mut candidates = vec![Candidate::declared(&event.name, func)];
        let parent = self.open_template_scopes(&event.templates, owners, parent, event.line, &mut candidates)?;
        if !event.has_body {
            self.bind_pending(&candidates, func, scope);
            return Ok(());
        }

        let body = self.graph.open_scope(ScopeKind::FunctionLocal, None, parent, Some(func));
        self.graph.set_body_scope(func, body);
        for param in &event.params {
            let new = NewDeclaration::new(DeclKind::Parameter, &param.name, param.span.clone(), event.line);
            let id = self.graph.declare(body, new)?;
            candidates.push(Candidate::declared(&param.name, id));
        }
        self.bind_pending(&candidates, func, scope);
        self.enter(body);
        Ok(())
    }

    /// 每一层模板头打开一个 template-param 作用域，逐层嵌套，返回最内层。
    fn open_template_scopes(
        &mut self,
        levels: &[Vec<NamedSpan>],
        owners: &[DeclId],
        mut parent: ScopeId,
        line: usize,
        candidates: &mut Vec<Candidate>,
    ) -> Result<ScopeId, ResolveError> {
        for (params, owner) in levels.iter().zip(owners) {
            let scope = self
                .graph
                .open_scope(ScopeKind::TemplateParam, None, parent, Some(*owner));
            for param in params {
                let new = NewDeclaration::new(DeclKind::TemplateParam, &param.name, param.span.clone(), line);
                let id = self.graph.declare(scope, new)?;
                candidates.push(Candidate::declared(&param.name, id));
            }
            parent = scope;
        }
        Ok(parent)
    }

    fn declare_variable(&mut self, event: &DeclarationEvent) -> Result<(), ResolveError> {
        let scope = self.current;

        // 初始化表达式在声明之前求值，先查找它读取的名字
        let reads: Vec<Candidate> = event
            .reads
            .iter()
            .map(|name| {
                let segments: Vec<&str> = name.split("::").collect();
                let resolved = self
                    .graph
                    .resolve_path(scope, &segments)
                    .map_err(|err| err.at(event.span.clone()));
                Candidate::read(name, resolved)
            })
            .collect();

        let kind = if self.current_kind() == Some(ScopeKind::Class) {
            DeclKind::Field
        } else {
            DeclKind::Variable
        };
        let new = NewDeclaration::new(kind, &event.name, event.span.clone(), event.line);
        let var = self.graph.declare(scope, new)?;

        let mut candidates = vec![Candidate::declared(&event.name, var)];
        candidates.extend(reads);
        self.bind_pending(&candidates, var, scope);
        Ok(())
    }
}
