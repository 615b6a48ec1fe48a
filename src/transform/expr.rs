//! Transformation of expressions, and of the functions they may contain.

use crate::backend::ts_ast::{
    self, BinaryOp, ExprKind, Function, PrefixOp, Property, PropertyKey, TsExpr, TypeNode,
};
use crate::syntax::ast::{Expr, FunctionBody, Literal, Param, TableField};
use crate::syntax::lexer::{BinOp, LogicalOp, SourceLoc, UnOp};
use crate::utils::Spanned;

use super::error::TransformError;
use super::tags::{DocTag, TagSlice};
use super::types::{map_type, return_type};
use super::{Return, Scope, Transformer};

fn binary_op(op: BinOp, location: SourceLoc) -> Return<BinaryOp> {
    let op = match op {
        BinOp::Add => BinaryOp::Add,
        BinOp::Sub => BinaryOp::Sub,
        BinOp::Mul => BinaryOp::Mul,
        BinOp::Div => BinaryOp::Div,
        BinOp::Mod => BinaryOp::Mod,
        BinOp::Pow => BinaryOp::Pow,
        BinOp::Concat => BinaryOp::Add,
        BinOp::Eq => BinaryOp::StrictEq,
        BinOp::NotEq => BinaryOp::StrictNotEq,
        BinOp::Less => BinaryOp::Less,
        BinOp::LessEq => BinaryOp::LessEq,
        BinOp::Greater => BinaryOp::Greater,
        BinOp::GreaterEq => BinaryOp::GreaterEq,

        BinOp::FloorDiv | BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => {
            return Err(TransformError::UnknownOperator {
                op: op.to_str().to_string(),
                location,
            })
        }
    };
    Ok(op)
}

fn ident_name(name: &str) -> String {
    match name {
        "_G" => "globalThis".to_string(),
        _ => name.to_string(),
    }
}

impl Transformer {
    /// `tags` are those of the statement holding the expression. They type
    /// the parameters of any function expression inside it.
    pub(crate) fn transform_expr(
        &mut self,
        scope: Scope,
        tags: &[DocTag],
        expr: &Spanned<Expr>,
    ) -> Return<TsExpr> {
        let location = expr.location;

        let kind = match &expr.target {
            Expr::Ident(name) => ExprKind::Ident(ident_name(name)),
            Expr::Literal(literal) => match literal {
                Literal::Number(n) => ExprKind::Number(*n),
                Literal::String(s) => ExprKind::String(s.clone()),
                Literal::Bool(b) => ExprKind::Bool(*b),
                Literal::Nil => ExprKind::Ident("undefined".to_string()),
                Literal::Vararg => {
                    let vararg = self.node(ExprKind::Ident("vararg".to_string()), location);
                    ExprKind::Spread(Box::new(vararg))
                }
            },

            // `a:b` outside of a call is an ordinary property access
            Expr::Member { base, name, .. } => ExprKind::Member {
                object: Box::new(self.transform_expr(scope, tags, base)?),
                property: name.target.clone(),
            },
            Expr::Index { base, index } => ExprKind::Element {
                object: Box::new(self.transform_expr(scope, tags, base)?),
                index: Box::new(self.transform_expr(scope, tags, index)?),
            },

            Expr::Unary(op, operand) => {
                let operand = Box::new(self.transform_expr(scope, tags, operand)?);
                match op {
                    UnOp::Len => ExprKind::Member {
                        object: operand,
                        property: "length".to_string(),
                    },
                    UnOp::Not => ExprKind::Prefix(PrefixOp::Not, operand),
                    UnOp::Neg => ExprKind::Prefix(PrefixOp::Neg, operand),
                    UnOp::BitNot => ExprKind::Prefix(PrefixOp::BitNot, operand),
                }
            }
            Expr::Binary(lhs, op, rhs) => {
                let op = binary_op(*op, location)?;
                ExprKind::Binary(
                    Box::new(self.transform_expr(scope, tags, lhs)?),
                    op,
                    Box::new(self.transform_expr(scope, tags, rhs)?),
                )
            }
            Expr::Logical(lhs, op, rhs) => {
                let op = match op {
                    LogicalOp::And => BinaryOp::And,
                    LogicalOp::Or => BinaryOp::Or,
                };
                ExprKind::Binary(
                    Box::new(self.transform_expr(scope, tags, lhs)?),
                    op,
                    Box::new(self.transform_expr(scope, tags, rhs)?),
                )
            }

            Expr::Table(fields) => self.transform_table(scope, tags, fields, location)?,

            Expr::Call { base, args } => ExprKind::Call {
                callee: Box::new(self.transform_expr(scope, tags, base)?),
                args: args
                    .iter()
                    .map(|arg| self.transform_expr(scope, tags, arg))
                    .collect::<Return<_>>()?,
            },
            Expr::StringCall { base, argument } | Expr::TableCall { base, argument } => {
                ExprKind::Call {
                    callee: Box::new(self.transform_expr(scope, tags, base)?),
                    args: vec![self.transform_expr(scope, tags, argument)?],
                }
            }

            Expr::Function(func) => {
                let return_type = if tags.treturns().is_empty() {
                    None
                } else {
                    Some(return_type(tags, location)?)
                };
                ExprKind::Function(self.transform_function(scope, tags, func, false, return_type)?)
            }
        };

        Ok(self.node(kind, location))
    }

    /// A table is either all positional (an array) or all keyed (an object)
    fn transform_table(
        &mut self,
        scope: Scope,
        tags: &[DocTag],
        fields: &[Spanned<TableField>],
        location: SourceLoc,
    ) -> Return<ExprKind> {
        let positional = fields
            .iter()
            .filter(|f| matches!(f.target, TableField::Positional(_)))
            .count();

        if positional > 0 && positional < fields.len() {
            return Err(TransformError::MixedTableConstructor { location });
        }

        if positional > 0 {
            let mut elements = Vec::with_capacity(fields.len());
            for field in fields {
                if let TableField::Positional(value) = &field.target {
                    elements.push(self.transform_expr(scope, tags, value)?);
                }
            }
            return Ok(ExprKind::Array(elements));
        }

        let mut properties = Vec::with_capacity(fields.len());
        for field in fields {
            let property = match &field.target {
                TableField::Named { key, value } => Property {
                    key: PropertyKey::Ident(key.target.clone()),
                    value: self.transform_expr(scope, tags, value)?,
                },
                TableField::Keyed { key, value } => Property {
                    key: PropertyKey::Computed(Box::new(self.transform_expr(scope, tags, key)?)),
                    value: self.transform_expr(scope, tags, value)?,
                },
                TableField::Positional(_) => continue,
            };
            properties.push(property);
        }

        Ok(ExprKind::Object(properties))
    }

    /// Parameters and body of a function. With `receiver` an implicit `self`
    /// parameter comes first.
    pub(crate) fn transform_function(
        &mut self,
        scope: Scope,
        tags: &[DocTag],
        func: &FunctionBody,
        receiver: bool,
        return_type: Option<TypeNode>,
    ) -> Return<Function> {
        let mut params = Vec::with_capacity(func.params.len() + 1);
        if receiver {
            params.push(ts_ast::Param {
                name: "self".to_string(),
                rest: false,
                ty: None,
            });
        }

        for param in &func.params {
            params.push(self.transform_param(tags, param)?);
        }

        let body = self.transform_block(scope.nested(&func.body))?;

        Ok(Function {
            params,
            return_type,
            body,
        })
    }

    fn transform_param(&mut self, tags: &[DocTag], param: &Spanned<Param>) -> Return<ts_ast::Param> {
        let tag_name = param.target.tag_name();
        let types = tags.tparams_named(tag_name);

        match types.len() {
            1 => {}
            0 => self.diagnose(
                param.location,
                format!(
                    "Parameter {tag_name} does not have a type signature. \
                     Use \"@tparam <type> {tag_name}\" to define this."
                ),
            ),
            _ => self.diagnose(
                param.location,
                format!("Many @tparams found for parameter {tag_name}. Using the first one."),
            ),
        }

        let ty = match types.first() {
            Some(ty) => Some(map_type(ty, param.location)?),
            None => None,
        };

        let (name, rest) = match &param.target {
            Param::Name(name) => (name.clone(), false),
            Param::Vararg => ("vararg".to_string(), true),
        };

        Ok(ts_ast::Param { name, rest, ty })
    }
}
