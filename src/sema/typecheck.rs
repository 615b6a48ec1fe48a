//! Type checker pass over the generated TypeScript.
//!
//! Types come from the annotations the transformer attached (variables,
//! parameters and return types). Expression types are only inferred for
//! literals, annotated names and operators whose result is fixed, anything
//! else is unknown and assignable everywhere.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::backend::ts_ast::{
    AssignOp, BinaryOp, Binding, Else, ExprKind, Function, NodeId, PrefixOp, Provenance,
    StmtKind, TsExpr, TsStmt, TypeNode, VarDecl,
};
use crate::syntax::lexer::SourceLoc;

use super::sema_error::SemanticError;

/// `found` can be stored where `expected` is declared
pub fn is_assignable(found: &TypeNode, expected: &TypeNode) -> bool {
    match (found, expected) {
        _ if found == expected => true,
        (TypeNode::Union(members), _) => members.iter().all(|m| is_assignable(m, expected)),
        (_, TypeNode::Union(members)) => members.iter().any(|m| is_assignable(found, m)),
        (TypeNode::Tuple(found), TypeNode::Tuple(expected)) => {
            found.len() == expected.len()
                && found.iter().zip(expected).all(|(f, e)| is_assignable(f, e))
        }
        (TypeNode::Undefined, TypeNode::Void) => true,
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct Typechecker<'p> {
    provenance: &'p Provenance,

    // Declared names per block, `None` when the declaration carries no type
    scopes: Vec<HashMap<String, Option<TypeNode>>>,

    // Declared return type of each enclosing function
    returns: Vec<Option<TypeNode>>,

    errors: Vec<SemanticError>,
}

impl<'p> Typechecker<'p> {
    pub fn new(provenance: &'p Provenance) -> Self {
        Typechecker {
            provenance,
            scopes: vec![HashMap::new()],
            returns: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<SemanticError> {
        debug!(errors = self.errors.len(), "semantic check finished");
        self.errors
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        // The outermost scope lives as long as the checker
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn declare(&mut self, name: &str, ty: Option<TypeNode>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    fn declare_binding(&mut self, binding: &Binding, ty: Option<TypeNode>) {
        match binding {
            Binding::Ident(name) => self.declare(name, ty),
            Binding::Array(names) => {
                for name in names {
                    self.declare(name, None);
                }
            }
        }
    }

    /// The declared type of `name`. Outer `None` when the name is unknown.
    pub fn lookup_name(&self, name: &str) -> Option<&Option<TypeNode>> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn location(&self, id: NodeId) -> SourceLoc {
        self.provenance.get(id).copied().unwrap_or_default()
    }

    fn expect_type(&mut self, found: &TsExpr, expected: &TypeNode, location: SourceLoc) {
        let Some(found) = self.infer_expr(found) else {
            return;
        };

        if !is_assignable(&found, expected) {
            trace!(%found, %expected, "type mismatch");
            self.errors.push(SemanticError::TypeMismatch {
                expected: expected.clone(),
                found,
                location,
            });
        }
    }

    pub fn infer_expr(&self, expr: &TsExpr) -> Option<TypeNode> {
        match &expr.kind {
            ExprKind::Number(_) => Some(TypeNode::Number),
            ExprKind::String(_) => Some(TypeNode::String),
            ExprKind::Bool(_) => Some(TypeNode::Boolean),

            ExprKind::Ident(name) => match self.lookup_name(name) {
                Some(ty) => ty.clone(),
                None if name == "undefined" => Some(TypeNode::Undefined),
                None => None,
            },

            ExprKind::Binary(lhs, op, rhs) => match op {
                BinaryOp::Add => match (self.infer_expr(lhs)?, self.infer_expr(rhs)?) {
                    (TypeNode::Number, TypeNode::Number) => Some(TypeNode::Number),
                    (TypeNode::String, _) | (_, TypeNode::String) => Some(TypeNode::String),
                    _ => None,
                },
                BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::Pow => Some(TypeNode::Number),
                BinaryOp::StrictEq
                | BinaryOp::StrictNotEq
                | BinaryOp::Less
                | BinaryOp::LessEq
                | BinaryOp::Greater
                | BinaryOp::GreaterEq => Some(TypeNode::Boolean),
                BinaryOp::And | BinaryOp::Or => None,
            },

            ExprKind::Prefix(PrefixOp::Not, _) => Some(TypeNode::Boolean),
            ExprKind::Prefix(PrefixOp::Neg | PrefixOp::BitNot, _) => Some(TypeNode::Number),
            ExprKind::Postfix(..) => Some(TypeNode::Number),

            ExprKind::Assign(_, _, value) => self.infer_expr(value),

            // Several returned values travel as an array literal
            ExprKind::Array(elements) => elements
                .iter()
                .map(|e| self.infer_expr(e))
                .collect::<Option<Vec<_>>>()
                .map(TypeNode::Tuple),

            ExprKind::Member { .. }
            | ExprKind::Element { .. }
            | ExprKind::Spread(_)
            | ExprKind::Object(_)
            | ExprKind::Call { .. }
            | ExprKind::Function(_) => None,
        }
    }

    pub fn check_block(&mut self, stmts: &[TsStmt]) {
        for stmt in stmts {
            self.check_stmt(stmt);
        }
    }

    fn check_nested(&mut self, stmts: &[TsStmt]) {
        self.push_scope();
        self.check_block(stmts);
        self.pop_scope();
    }

    pub fn check_stmt(&mut self, stmt: &TsStmt) {
        match &stmt.kind {
            StmtKind::Var(decl) => self.check_var(decl, self.location(stmt.id)),

            StmtKind::Function(decl) => {
                self.declare(&decl.name, None);
                self.check_function(&decl.func);
            }
            StmtKind::Class(class) => {
                self.declare(&class.name, None);
                for method in &class.methods {
                    self.check_function(&method.kind.func);
                }
            }

            StmtKind::Expr(expr) | StmtKind::ExportAssign(expr) => self.check_expr(expr),

            StmtKind::Return(value) => {
                let Some(value) = value else {
                    return;
                };
                self.check_expr(value);

                if let Some(Some(expected)) = self.returns.last().cloned() {
                    self.expect_type(value, &expected, self.location(value.id));
                }
            }

            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => {
                self.check_expr(cond);
                self.check_nested(then_block);
                match else_branch {
                    Some(Else::If(elif)) => self.check_stmt(elif),
                    Some(Else::Block(block)) => self.check_nested(block),
                    None => {}
                }
            }

            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                self.push_scope();
                self.check_var(init, self.location(stmt.id));
                self.check_expr(test);
                self.check_expr(update);
                self.check_nested(body);
                self.pop_scope();
            }
            StmtKind::ForOf {
                binding,
                iterable,
                body,
            } => {
                self.check_expr(iterable);
                self.push_scope();
                self.declare_binding(binding, None);
                self.check_nested(body);
                self.pop_scope();
            }
            StmtKind::While { cond, body } => {
                self.check_expr(cond);
                self.check_nested(body);
            }

            StmtKind::Break => {}
        }
    }

    fn check_var(&mut self, decl: &VarDecl, location: SourceLoc) {
        if let Some(init) = &decl.init {
            self.check_expr(init);
            if let Some(ty) = &decl.ty {
                self.expect_type(init, ty, location);
            }
        }

        self.declare_binding(&decl.binding, decl.ty.clone());
    }

    fn check_function(&mut self, func: &Function) {
        self.push_scope();
        for param in &func.params {
            // A rest parameter holds an array of its annotated type
            let ty = if param.rest { None } else { param.ty.clone() };
            self.declare(&param.name, ty);
        }

        self.returns.push(func.return_type.clone());
        self.check_block(&func.body);
        self.returns.pop();

        self.pop_scope();
    }

    /// Walk an expression for assignments and nested functions
    fn check_expr(&mut self, expr: &TsExpr) {
        match &expr.kind {
            ExprKind::Assign(target, op, value) => {
                self.check_expr(value);

                if let (ExprKind::Ident(name), AssignOp::Assign) = (&target.kind, op) {
                    if let Some(Some(expected)) = self.lookup_name(name).cloned() {
                        self.expect_type(value, &expected, self.location(expr.id));
                    }
                } else {
                    self.check_expr(target);
                }
            }

            ExprKind::Function(func) => self.check_function(func),

            ExprKind::Member { object, .. } => self.check_expr(object),
            ExprKind::Element { object, index } => {
                self.check_expr(object);
                self.check_expr(index);
            }
            ExprKind::Binary(lhs, _, rhs) => {
                self.check_expr(lhs);
                self.check_expr(rhs);
            }
            ExprKind::Prefix(_, operand) | ExprKind::Postfix(operand, _) => {
                self.check_expr(operand)
            }
            ExprKind::Spread(value) => self.check_expr(value),
            ExprKind::Array(elements) => {
                for element in elements {
                    self.check_expr(element);
                }
            }
            ExprKind::Object(properties) => {
                for property in properties {
                    self.check_expr(&property.value);
                }
            }
            ExprKind::Call { callee, args } => {
                self.check_expr(callee);
                for arg in args {
                    self.check_expr(arg);
                }
            }

            ExprKind::Ident(_) | ExprKind::Number(_) | ExprKind::String(_) | ExprKind::Bool(_) => {}
        }
    }
}
