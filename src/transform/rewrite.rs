//! Block-level rewrites for blocks opened by a tagged `local`.
//!
//! ```lua
//! -- @module util
//! local M = {}
//! function M.f() end     --> export function f(): void {}
//! ```
//!
//! ```lua
//! -- @classmod Account
//! local Account = {}
//! function Account:deposit() end     --> class Account { deposit(): void {} }
//! function Account.new() end         -->   static new(): void {}
//! ```

use tracing::debug;

use crate::backend::ts_ast::{ClassDecl, FunctionDecl, Method, Node, StmtKind, TsStmt};
use crate::syntax::ast::{Expr, Indexer, Stmt};
use crate::utils::Spanned;

use super::error::TransformError;
use super::tags::{DocTag, TagSlice};
use super::types::return_type;
use super::{Return, Scope, Transformer};

/// A function declaration named by a member path of any depth
fn is_member_decl(stmt: &Spanned<Stmt>) -> bool {
    matches!(
        &stmt.target,
        Stmt::Function { name, .. } if matches!(name.target, Expr::Member { .. })
    )
}

/// A function declaration named like `a.b.c`, two or more levels deep
fn is_nested_member_decl(stmt: &Spanned<Stmt>) -> bool {
    match &stmt.target {
        Stmt::Function { name, .. } => matches!(
            &name.target,
            Expr::Member { base, .. } if matches!(base.target, Expr::Member { .. })
        ),
        _ => false,
    }
}

/// The block's first statement and the rest, if that statement is a `local`
/// whose tags satisfy `marked`
fn marked_local<'a>(
    scope: Scope<'a>,
    marked: impl Fn(&[DocTag]) -> bool,
) -> Option<(&'a Spanned<Stmt>, &'a [Spanned<Stmt>])> {
    let (first, rest) = scope.block.stmts.split_first()?;
    if !matches!(first.target, Stmt::Local { .. }) {
        return None;
    }

    marked(&scope.tags_of(first)).then_some((first, rest))
}

impl Transformer {
    /// Module mode: the member functions after a `@module` local become
    /// exported functions, placed before the remaining statements. Declines
    /// when any member path is nested.
    pub(crate) fn rewrite_module(&mut self, scope: Scope) -> Return<Option<Vec<TsStmt>>> {
        let Some((_, rest)) = marked_local(scope, |tags| tags.module_marker().is_some()) else {
            return Ok(None);
        };

        if rest.iter().any(is_nested_member_decl) {
            debug!("module has nested member functions, leaving it untouched");
            return Ok(None);
        }

        let (members, remaining): (Vec<_>, Vec<_>) = rest.iter().partition(|s| is_member_decl(s));
        debug!(exported = members.len(), "lifting module functions");

        let mut stmts = Vec::with_capacity(rest.len());
        for stmt in members {
            stmts.push(self.export_function(scope, stmt)?);
        }
        for stmt in remaining {
            stmts.push(self.transform_stmt(scope, stmt)?);
        }

        Ok(Some(stmts))
    }

    /// Lift `function M.f() end` to `export function f() {}`
    pub(crate) fn export_function(&mut self, scope: Scope, stmt: &Spanned<Stmt>) -> Return<TsStmt> {
        let not_exportable = |reason| TransformError::NotExportable {
            reason,
            location: stmt.location,
        };

        let Stmt::Function { name, func, .. } = &stmt.target else {
            return Err(not_exportable("a statement that is not a function declaration"));
        };
        let Expr::Member {
            base,
            indexer,
            name: member,
        } = &name.target
        else {
            return Err(not_exportable("a function that is not a module member"));
        };
        if matches!(base.target, Expr::Member { .. }) {
            return Err(not_exportable("a nested member function"));
        }

        let tags = scope.tags_of(stmt);
        let return_type = return_type(&tags, stmt.location)?;
        let receiver = *indexer == Indexer::Colon;
        let func = self.transform_function(scope, &tags, func, receiver, Some(return_type))?;

        let decl = FunctionDecl {
            name: member.target.clone(),
            exported: true,
            func,
        };
        Ok(self.node(StmtKind::Function(decl), stmt.location))
    }

    /// Class mode: the member functions after a `@classmod` local become the
    /// methods of a class named after that local
    pub(crate) fn rewrite_class(&mut self, scope: Scope) -> Return<Option<Vec<TsStmt>>> {
        let Some((first, rest)) = marked_local(scope, |tags| tags.class_marker().is_some()) else {
            return Ok(None);
        };
        let Stmt::Local { names, .. } = &first.target else {
            return Ok(None);
        };
        let Some(class_name) = names.first() else {
            return Ok(None);
        };

        let (members, remaining): (Vec<_>, Vec<_>) = rest.iter().partition(|s| is_member_decl(s));
        debug!(
            class = %class_name.target,
            methods = members.len(),
            "rewriting block as a class"
        );

        let mut methods = Vec::with_capacity(members.len());
        for stmt in members {
            methods.push(self.transform_method(scope, stmt)?);
        }

        let class = ClassDecl {
            name: class_name.target.clone(),
            methods,
        };

        let mut stmts = Vec::with_capacity(rest.len() + 1);
        stmts.push(self.node(StmtKind::Class(class), first.location));
        for stmt in remaining {
            stmts.push(self.transform_stmt(scope, stmt)?);
        }

        Ok(Some(stmts))
    }

    /// `function C:m() end` is an instance method, `function C.m() end` a static one
    fn transform_method(&mut self, scope: Scope, stmt: &Spanned<Stmt>) -> Return<Node<Method>> {
        let unsupported = || TransformError::UnsupportedDeclarationTarget {
            location: stmt.location,
        };

        let Stmt::Function { name, func, .. } = &stmt.target else {
            return Err(unsupported());
        };
        let Expr::Member {
            indexer,
            name: member,
            ..
        } = &name.target
        else {
            return Err(unsupported());
        };

        let tags = scope.tags_of(stmt);
        let return_type = return_type(&tags, stmt.location)?;
        let func = self.transform_function(scope, &tags, func, false, Some(return_type))?;

        let method = Method {
            name: member.target.clone(),
            is_static: *indexer == Indexer::Dot,
            func,
        };
        Ok(self.node(method, stmt.location))
    }
}
