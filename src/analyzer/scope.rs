// src/analyzer/scope.rs

use super::declaration::{DeclId, DeclKind, Declaration, NewDeclaration};
use super::semantic_error::ResolveError;
use std::collections::HashMap;
use std::fmt;

/// 作用域在 ScopeGraph 中的索引。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Namespace,
    Class,
    FunctionLocal,
    TemplateParam,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::Global => "global",
            ScopeKind::Namespace => "namespace",
            ScopeKind::Class => "class",
            ScopeKind::FunctionLocal => "function-local",
            ScopeKind::TemplateParam => "template-param",
        };
        f.write_str(name)
    }
}

/// 一个词法作用域及其符号表。
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// 函数体与模板参数作用域是匿名的
    pub name: Option<String>,
    /// 非拥有的父指针；全局作用域为 None
    pub parent: Option<ScopeId>,
    /// 引入该作用域的声明（命名空间、类、函数或模板）
    pub owner: Option<DeclId>,
    /// 按打开顺序排列的子作用域
    pub children: Vec<ScopeId>,
    symbols: HashMap<String, Vec<DeclId>>,
    // 声明顺序，只用于诊断与遍历
    order: Vec<DeclId>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, name: Option<String>, parent: Option<ScopeId>, owner: Option<DeclId>) -> Self {
        Self {
            id,
            kind,
            name,
            parent,
            owner,
            children: Vec::new(),
            symbols: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// 本作用域中按声明顺序排列的所有声明。
    pub fn declarations(&self) -> &[DeclId] {
        &self.order
    }

    /// 本作用域中名为 `name` 的所有声明（不同种类、重载）。
    pub fn bucket(&self, name: &str) -> &[DeclId] {
        self.symbols.get(name).map_or(&[], Vec::as_slice)
    }

    /// 本作用域中最近一次声明的 `name`。
    pub fn get(&self, name: &str) -> Option<DeclId> {
        self.bucket(name).last().copied()
    }
}

/// 整个翻译单元的作用域树。
/// 所有 Scope 与 Declaration 都由它持有，节点之间只通过索引互相引用。
#[derive(Debug, Clone)]
pub struct ScopeGraph {
    scopes: Vec<Scope>,
    decls: Vec<Declaration>,
}

impl Default for ScopeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeGraph {
    /// 创建一个只有全局作用域的图。
    pub fn new() -> Self {
        let global = Scope::new(ScopeId(0), ScopeKind::Global, None, None, None);
        Self {
            scopes: vec![global],
            decls: Vec::new(),
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn decl(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get(id.0)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }

    /// 在 `parent` 之下打开一个新作用域。
    /// 这里不校验 `parent`：挂在无效父节点下的作用域会在解析 frame 时被发现。
    pub fn open_scope(
        &mut self,
        kind: ScopeKind,
        name: Option<String>,
        parent: ScopeId,
        owner: Option<DeclId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(id, kind, name, Some(parent), owner));
        match self.scopes.get_mut(parent.0) {
            Some(parent_scope) => parent_scope.children.push(id),
            None => tracing::warn!("scope {:?} opened under unknown parent {:?}", id, parent),
        }
        tracing::debug!("opened {} scope {:?} under {:?}", kind, id, parent);
        id
    }

    /// 在 `scope` 中插入一个声明。
    ///
    /// 同一作用域中同名同种类的声明只有以下情况是合法的：
    /// - 命名空间重新打开，返回已有的命名空间；
    /// - 前置声明与定义配对（类，或参数个数相同的函数），合并为同一个声明。
    ///
    /// 其余情况返回 `DuplicateDeclaration`。
    pub fn declare(&mut self, scope: ScopeId, new: NewDeclaration) -> Result<DeclId, ResolveError> {
        let existing = self
            .scope(scope)
            .ok_or(ResolveError::DetachedScope { scope })?
            .bucket(&new.name)
            .iter()
            .copied()
            .find(|id| {
                let decl = &self.decls[id.0];
                decl.kind == new.kind && (!new.kind.is_callable() || decl.param_count == new.param_count)
            });

        if let Some(existing) = existing {
            return self.merge(existing, new);
        }

        let id = DeclId(self.decls.len());
        let owner = self.scopes[scope.0].owner;
        tracing::debug!("declare {} `{}` as {:?} in {:?}", new.kind, new.name, id, scope);
        self.decls.push(Declaration {
            id,
            kind: new.kind,
            name: new.name.clone(),
            scope,
            children: Vec::new(),
            type_params: new.type_params,
            template_arity: new.template_arity,
            param_count: new.param_count,
            defined: new.defined,
            body_scope: None,
            span: new.span,
            line: new.line,
        });

        let target = &mut self.scopes[scope.0];
        target.symbols.entry(new.name).or_default().push(id);
        target.order.push(id);
        if let Some(owner) = owner {
            self.decls[owner.0].children.push(id);
        }
        Ok(id)
    }

    fn merge(&mut self, existing: DeclId, new: NewDeclaration) -> Result<DeclId, ResolveError> {
        let decl = &mut self.decls[existing.0];
        if decl.kind == DeclKind::Namespace {
            tracing::debug!("reopen namespace `{}`", decl.name);
            return Ok(existing);
        }
        if !decl.kind.has_forward_declarations() || (decl.defined && new.defined) {
            return Err(ResolveError::DuplicateDeclaration {
                name: new.name,
                kind: new.kind,
                span: new.span,
                original_span: decl.span.clone(),
            });
        }
        if new.defined {
            tracing::debug!("merge definition of `{}` into {:?}", decl.name, existing);
            decl.defined = true;
            decl.type_params = new.type_params;
            decl.template_arity = new.template_arity;
        }
        Ok(existing)
    }

    pub(crate) fn set_body_scope(&mut self, decl: DeclId, scope: ScopeId) {
        if let Some(decl) = self.decls.get_mut(decl.0) {
            decl.body_scope = Some(scope);
        }
    }

    pub(crate) fn mark_defined(&mut self, decl: DeclId) {
        if let Some(decl) = self.decls.get_mut(decl.0) {
            decl.defined = true;
        }
    }

    /// 从 `scope` 出发直到全局作用域的作用域链（包含两端）。
    /// 链条断开、出现环或者终点不是全局作用域时返回 `DetachedScope`。
    pub fn ancestors(&self, scope: ScopeId) -> Result<Vec<ScopeId>, ResolveError> {
        let mut chain = Vec::new();
        let mut current = scope;
        loop {
            let node = self.scope(current).ok_or(ResolveError::DetachedScope { scope })?;
            chain.push(current);
            match node.parent {
                Some(parent) if chain.len() <= self.scopes.len() => current = parent,
                Some(_) => return Err(ResolveError::DetachedScope { scope }),
                None if node.kind == ScopeKind::Global => return Ok(chain),
                None => return Err(ResolveError::DetachedScope { scope }),
            }
        }
    }

    /// 从 `scope` 开始由内向外查找 `name`，返回最近的声明。
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Result<DeclId, ResolveError> {
        for id in self.ancestors(scope)? {
            if let Some(found) = self.scopes[id.0].get(name) {
                return Ok(found);
            }
        }
        tracing::debug!("`{}` not found from {:?}", name, scope);
        Err(ResolveError::NotFound {
            name: name.to_string(),
            span: 0..0,
        })
    }

    /// 在组合声明的子声明中查找直接成员（包括模板参数），不向外层查找。
    pub fn lookup_member(&self, container: DeclId, name: &str) -> Option<DeclId> {
        self.decl(container)?
            .children
            .iter()
            .rev()
            .copied()
            .find(|child| self.decls[child.0].name == name)
    }

    /// 解析 `a::b::c` 形式的路径：第一段走普通查找，其余各段在前一段的体内查找成员。
    pub fn resolve_path(&self, scope: ScopeId, segments: &[&str]) -> Result<DeclId, ResolveError> {
        let not_found = || ResolveError::NotFound {
            name: segments.join("::"),
            span: 0..0,
        };
        let (first, rest) = segments.split_first().ok_or_else(not_found)?;
        let mut current = self.lookup(scope, first).map_err(|err| match err {
            ResolveError::NotFound { .. } => not_found(),
            other => other,
        })?;
        for segment in rest {
            current = self.lookup_member(current, segment).ok_or_else(not_found)?;
        }
        Ok(current)
    }

    /// 整个图中唯一名为 `name` 的声明；不存在或有歧义时返回 None。
    pub fn find_unique(&self, name: &str) -> Option<DeclId> {
        let mut matches = self.decls.iter().filter(|decl| decl.name == name);
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first.id),
        }
    }

    /// 沿拥有者链拼出的限定名，例如 `n1::C1::c1m::my_val`。
    pub fn qualified_name(&self, decl: DeclId) -> String {
        let Some(mut current) = self.decl(decl) else {
            return String::from("<unknown>");
        };
        let mut parts = vec![current.name.as_str()];
        // 拥有者链最长不超过声明总数
        for _ in 0..self.decls.len() {
            let owner = self
                .scope(current.scope)
                .and_then(|scope| scope.owner)
                .and_then(|owner| self.decl(owner));
            match owner {
                Some(owner) => {
                    parts.push(owner.name.as_str());
                    current = owner;
                }
                None => break,
            }
        }
        parts.reverse();
        parts.join("::")
    }
}
