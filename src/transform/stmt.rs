//! Transformation of statements and blocks.

use tracing::trace;

use crate::backend::ts_ast::{
    AssignOp, BinaryOp, Binding, DeclKind, Else, ExprKind, FunctionDecl, PostfixOp, StmtKind,
    TsExpr, TsStmt, VarDecl,
};
use crate::syntax::ast::{Block, Expr, Indexer, Stmt};
use crate::syntax::lexer::SourceLoc;
use crate::utils::Spanned;

use super::error::TransformError;
use super::tags::{DocTag, TagSlice};
use super::types::{map_type, return_type};
use super::{Return, Scope, Transformer};

impl Transformer {
    /// Transform every statement of `scope.block`, after trying the module
    /// rewrite (top level only) and then the class rewrite
    pub(crate) fn transform_block(&mut self, scope: Scope) -> Return<Vec<TsStmt>> {
        if self.options.module && scope.is_top_level() {
            if let Some(stmts) = self.rewrite_module(scope)? {
                return Ok(stmts);
            }
        }

        if self.options.classmod {
            if let Some(stmts) = self.rewrite_class(scope)? {
                return Ok(stmts);
            }
        }

        scope
            .block
            .stmts
            .iter()
            .map(|stmt| self.transform_stmt(scope, stmt))
            .collect()
    }

    fn transform_nested(&mut self, scope: Scope, block: &Block) -> Return<Vec<TsStmt>> {
        self.transform_block(scope.nested(block))
    }

    /// `stmt` must belong to `scope.block`
    pub(crate) fn transform_stmt(&mut self, scope: Scope, stmt: &Spanned<Stmt>) -> Return<TsStmt> {
        let location = stmt.location;
        let tags = scope.tags_of(stmt);

        trace!(
            kind = stmt.target.kind_name(),
            depth = scope.depth,
            tags = tags.len(),
            "transforming statement"
        );

        let kind = match &stmt.target {
            Stmt::Local { names, init } => {
                let binding = match names.as_slice() {
                    [name] => Binding::Ident(name.target.clone()),
                    names => Binding::Array(names.iter().map(|n| n.target.clone()).collect()),
                };

                // Only a single variable can take a `@type`
                let ty = match (names.len(), tags.local_type()) {
                    (1, Some(ty)) => Some(map_type(ty, location)?),
                    _ => None,
                };

                StmtKind::Var(VarDecl {
                    kind: DeclKind::Let,
                    binding,
                    ty,
                    init: self.transform_values(scope, &tags, init)?,
                })
            }

            Stmt::Assign { targets, init } => {
                let mut lhs = targets
                    .iter()
                    .map(|target| self.transform_target(scope, &tags, target))
                    .collect::<Return<Vec<_>>>()?;

                let target = if lhs.len() == 1 {
                    lhs.remove(0)
                } else {
                    self.node(ExprKind::Array(lhs), span_of(targets, location))
                };

                let value = match self.transform_values(scope, &tags, init)? {
                    Some(value) => value,
                    None => self.node(ExprKind::Ident("undefined".to_string()), location),
                };

                let assign = ExprKind::Assign(Box::new(target), AssignOp::Assign, Box::new(value));
                StmtKind::Expr(self.node(assign, location))
            }

            Stmt::Call(call) => StmtKind::Expr(self.transform_expr(scope, &tags, call)?),

            Stmt::Function { name, func, .. } => {
                let return_type = return_type(&tags, location)?;

                match &name.target {
                    Expr::Ident(ident) => StmtKind::Function(FunctionDecl {
                        name: ident.clone(),
                        exported: false,
                        func: self.transform_function(
                            scope,
                            &tags,
                            func,
                            false,
                            Some(return_type),
                        )?,
                    }),

                    // `a.b.c:m` becomes `a.b.c.m = function (self, ...) {}`
                    Expr::Member { indexer, .. } => {
                        let target = self.transform_expr(scope, &tags, name)?;
                        let receiver = *indexer == Indexer::Colon;
                        let func =
                            self.transform_function(scope, &tags, func, receiver, Some(return_type))?;
                        let func = self.node(ExprKind::Function(func), location);

                        let assign =
                            ExprKind::Assign(Box::new(target), AssignOp::Assign, Box::new(func));
                        StmtKind::Expr(self.node(assign, location))
                    }

                    _ => {
                        return Err(TransformError::UnsupportedDeclarationTarget {
                            location: name.location,
                        })
                    }
                }
            }

            Stmt::Return(values) => match self.transform_values(scope, &tags, values)? {
                // A value returned from the chunk itself is what the module exports
                Some(value) if scope.is_top_level() => StmtKind::ExportAssign(value),
                value => StmtKind::Return(value),
            },

            Stmt::If {
                cond,
                then_block,
                elif_blocks,
                else_block,
            } => {
                let root_cond = self.transform_expr(scope, &tags, cond)?;
                let root_body = self.transform_nested(scope, then_block)?;

                let mut clauses = Vec::with_capacity(elif_blocks.len());
                for (cond, block) in elif_blocks {
                    let location = cond.location;
                    let cond = self.transform_expr(scope, &tags, cond)?;
                    let body = self.transform_nested(scope, block)?;
                    clauses.push((cond, body, location));
                }

                let else_branch = match else_block {
                    Some(block) => Some(Else::Block(self.transform_nested(scope, block)?)),
                    None => None,
                };

                // Build the chain from its last clause, so each `else` exists before its owner
                let else_branch = clauses.into_iter().rev().fold(
                    else_branch,
                    |else_branch, (cond, then_block, location)| {
                        let elif = StmtKind::If {
                            cond,
                            then_block,
                            else_branch,
                        };
                        Some(Else::If(Box::new(self.node(elif, location))))
                    },
                );

                StmtKind::If {
                    cond: root_cond,
                    then_block: root_body,
                    else_branch,
                }
            }

            Stmt::While { cond, block } => StmtKind::While {
                cond: self.transform_expr(scope, &tags, cond)?,
                body: self.transform_nested(scope, block)?,
            },

            Stmt::ForNumeric {
                var,
                start,
                end,
                step,
                block,
            } => {
                let start = self.transform_expr(scope, &tags, start)?;
                let end = self.transform_expr(scope, &tags, end)?;
                let step = match step {
                    Some(step) => Some(self.transform_expr(scope, &tags, step)?),
                    None => None,
                };

                let counter = self.node(ExprKind::Ident(var.target.clone()), var.location);
                let test = self.node(
                    ExprKind::Binary(Box::new(counter), BinaryOp::LessEq, Box::new(end)),
                    location,
                );

                let counter = self.node(ExprKind::Ident(var.target.clone()), var.location);
                let update = match step {
                    None => ExprKind::Postfix(Box::new(counter), PostfixOp::Increment),
                    Some(step) => {
                        ExprKind::Assign(Box::new(counter), AssignOp::AddAssign, Box::new(step))
                    }
                };
                let update = self.node(update, location);

                StmtKind::For {
                    init: VarDecl {
                        kind: DeclKind::Let,
                        binding: Binding::Ident(var.target.clone()),
                        ty: None,
                        init: Some(start),
                    },
                    test,
                    update,
                    body: self.transform_nested(scope, block)?,
                }
            }

            Stmt::ForGeneric {
                vars,
                iterators,
                block,
            } => {
                if let [_, extra, ..] = iterators.as_slice() {
                    return Err(TransformError::MultipleIterators {
                        count: iterators.len(),
                        location: extra.location,
                    });
                }

                let iterable = match iterators.first() {
                    Some(iterator) => self.transform_expr(scope, &tags, iterator)?,
                    None => self.node(ExprKind::Ident("undefined".to_string()), location),
                };

                StmtKind::ForOf {
                    binding: Binding::Array(vars.iter().map(|v| v.target.clone()).collect()),
                    iterable,
                    body: self.transform_nested(scope, block)?,
                }
            }

            Stmt::Break => StmtKind::Break,

            Stmt::Repeat { .. } | Stmt::Do(_) | Stmt::Goto(_) | Stmt::Label(_) => {
                return Err(TransformError::UnknownStatement {
                    kind: stmt.target.kind_name(),
                    location,
                })
            }
        };

        Ok(self.node(kind, location))
    }

    /// No value, the value itself, or an array literal of several values
    fn transform_values(
        &mut self,
        scope: Scope,
        tags: &[DocTag],
        values: &[Spanned<Expr>],
    ) -> Return<Option<TsExpr>> {
        match values {
            [] => Ok(None),
            [value] => self.transform_expr(scope, tags, value).map(Some),
            values => {
                let elements = values
                    .iter()
                    .map(|value| self.transform_expr(scope, tags, value))
                    .collect::<Return<Vec<_>>>()?;
                let location = span_of(values, SourceLoc::default());
                Ok(Some(self.node(ExprKind::Array(elements), location)))
            }
        }
    }

    fn transform_target(
        &mut self,
        scope: Scope,
        tags: &[DocTag],
        target: &Spanned<Expr>,
    ) -> Return<TsExpr> {
        match target.target {
            Expr::Ident(_) | Expr::Member { .. } | Expr::Index { .. } => {
                self.transform_expr(scope, tags, target)
            }
            _ => Err(TransformError::UnsupportedAssignmentTarget {
                location: target.location,
            }),
        }
    }
}

/// Location covering a whole list of nodes
fn span_of<T>(nodes: &[Spanned<T>], fallback: SourceLoc) -> SourceLoc {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => first.location.to(&last.location),
        _ => fallback,
    }
}
