//! Expression parsing using Lua's operator priorities.

use crate::syntax::ast::*;
use crate::syntax::errors::SyntaxError;
use crate::syntax::lexer::TokenKind;
use crate::utils::{spanned, Spanned};

use super::tidbits::{self, InfixOp, UNARY_PRIORITY};
use super::{Parser, Return};

impl<'src> Parser<'src> {
    pub fn parse_expr(&mut self) -> Return<Spanned<Expr>> {
        self.parse_subexpr(0)
    }

    /// Parse an expression whose binary operators all bind tighter than `limit`
    fn parse_subexpr(&mut self, limit: u8) -> Return<Spanned<Expr>> {
        let mut lhs = match self.peek_kind().and_then(|k| k.to_unop()) {
            Some(op) => {
                let start = self.next_location();
                self.advance();
                let operand = self.parse_subexpr(UNARY_PRIORITY)?;
                let location = start.to(&operand.location);
                spanned(Expr::Unary(op, Box::new(operand)), location)
            }
            None => self.parse_simple_expr()?,
        };

        while let Some(kind) = self.peek_kind() {
            let (Some(op), Some((left, right))) = (kind.to_infix(), kind.binary_priority()) else {
                break;
            };

            // If the operator binds no tighter than the limit, we're done
            if left <= limit {
                break;
            }

            // Consume the operator and parse the right-hand side
            self.advance();
            let rhs = self.parse_subexpr(right)?;
            let location = lhs.location.to(&rhs.location);

            lhs = match op {
                InfixOp::Logical(op) => {
                    spanned(Expr::Logical(Box::new(lhs), op, Box::new(rhs)), location)
                }
                InfixOp::Binary(op) => {
                    spanned(Expr::Binary(Box::new(lhs), op, Box::new(rhs)), location)
                }
            };
        }

        Ok(lhs)
    }

    fn parse_simple_expr(&mut self) -> Return<Spanned<Expr>> {
        let Some(token) = self.peek().cloned() else {
            return Err(SyntaxError::UnexpectedEof);
        };

        let literal = match token.kind {
            TokenKind::Number | TokenKind::HexNumber => {
                Literal::Number(tidbits::parse_number(&token)?)
            }
            TokenKind::String => Literal::String(tidbits::unescape(token.literal, token.location)?),
            TokenKind::LongString => {
                Literal::String(tidbits::long_string_value(token.literal).to_string())
            }
            TokenKind::KwNil => Literal::Nil,
            TokenKind::KwTrue => Literal::Bool(true),
            TokenKind::KwFalse => Literal::Bool(false),
            TokenKind::Ellipsis => Literal::Vararg,

            TokenKind::LCurly => return self.parse_table(),
            TokenKind::KwFunction => {
                self.advance();
                let func = self.parse_function_body()?;
                let location = self.finish(&token.location);
                return Ok(spanned(Expr::Function(func), location));
            }
            _ => return self.parse_suffixed_expr(),
        };

        self.advance();
        Ok(spanned(Expr::Literal(literal), token.location))
    }

    fn parse_primary_expr(&mut self) -> Return<Spanned<Expr>> {
        let Some(token) = self.peek().cloned() else {
            return Err(SyntaxError::UnexpectedEof);
        };

        match token.kind {
            TokenKind::Name => {
                self.advance();
                Ok(spanned(
                    Expr::Ident(token.literal.to_string()),
                    token.location,
                ))
            }

            // Sub-expressions keep the span of their parentheses
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(spanned(expr.target, self.finish(&token.location)))
            }

            found => Err(SyntaxError::ExpectedExpr {
                found,
                location: token.location,
            }),
        }
    }

    /// A primary expression followed by any chain of `.name`, `[index]`,
    /// `:method(args)` and call suffixes
    pub(crate) fn parse_suffixed_expr(&mut self) -> Return<Spanned<Expr>> {
        let mut expr = self.parse_primary_expr()?;

        loop {
            let start = expr.location;
            match self.peek_kind() {
                Some(TokenKind::Dot) => {
                    self.advance();
                    let name = self.parse_name()?;
                    expr = spanned(
                        Expr::Member {
                            base: Box::new(expr),
                            indexer: Indexer::Dot,
                            name,
                        },
                        self.finish(&start),
                    );
                }
                Some(TokenKind::LSquare) => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RSquare)?;
                    expr = spanned(
                        Expr::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        self.finish(&start),
                    );
                }
                Some(TokenKind::Colon) => {
                    self.advance();
                    let name = self.parse_name()?;
                    let member = spanned(
                        Expr::Member {
                            base: Box::new(expr),
                            indexer: Indexer::Colon,
                            name,
                        },
                        self.finish(&start),
                    );
                    expr = self.parse_call_args(member)?;
                }
                Some(
                    TokenKind::LParen | TokenKind::String | TokenKind::LongString | TokenKind::LCurly,
                ) => {
                    expr = self.parse_call_args(expr)?;
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_call_args(&mut self, base: Spanned<Expr>) -> Return<Spanned<Expr>> {
        let start = base.location;
        let base = Box::new(base);

        let call = match self.peek_kind() {
            Some(TokenKind::LParen) => {
                self.advance();
                let args = if self.check(TokenKind::RParen) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                self.expect(TokenKind::RParen)?;
                Expr::Call { base, args }
            }
            Some(TokenKind::String | TokenKind::LongString) => {
                let argument = Box::new(self.parse_simple_expr()?);
                Expr::StringCall { base, argument }
            }
            Some(TokenKind::LCurly) => {
                let argument = Box::new(self.parse_table()?);
                Expr::TableCall { base, argument }
            }
            _ => {
                return Err(self.unexpected(vec![
                    TokenKind::LParen,
                    TokenKind::String,
                    TokenKind::LCurly,
                ]))
            }
        };

        Ok(spanned(call, self.finish(&start)))
    }

    pub(crate) fn parse_expr_list(&mut self) -> Return<Vec<Spanned<Expr>>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma).is_some() {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    pub(crate) fn parse_name(&mut self) -> Return<Spanned<String>> {
        let token = self.expect(TokenKind::Name)?;
        Ok(spanned(token.literal.to_string(), token.location))
    }

    fn parse_table(&mut self) -> Return<Spanned<Expr>> {
        // { [key] = value, name = value, value; ... }
        let open = self.expect(TokenKind::LCurly)?;
        let mut fields = Vec::new();

        while !self.check(TokenKind::RCurly) {
            fields.push(self.parse_table_field()?);

            if self.eat(TokenKind::Comma).is_none() && self.eat(TokenKind::Semicolon).is_none() {
                break;
            }
        }

        self.expect(TokenKind::RCurly)?;
        Ok(spanned(Expr::Table(fields), self.finish(&open.location)))
    }

    fn parse_table_field(&mut self) -> Return<Spanned<TableField>> {
        let start = self.next_location();

        let field = match (self.peek_kind(), self.peek_nth(1)) {
            (Some(TokenKind::LSquare), _) => {
                self.advance();
                let key = self.parse_expr()?;
                self.expect(TokenKind::RSquare)?;
                self.expect(TokenKind::Equal)?;
                let value = self.parse_expr()?;
                TableField::Keyed { key, value }
            }
            (Some(TokenKind::Name), Some(TokenKind::Equal)) => {
                let key = self.parse_name()?;
                self.expect(TokenKind::Equal)?;
                let value = self.parse_expr()?;
                TableField::Named { key, value }
            }
            _ => TableField::Positional(self.parse_expr()?),
        };

        Ok(spanned(field, self.finish(&start)))
    }

    /// `(params) block end`, after the `function` keyword and name
    pub(crate) fn parse_function_body(&mut self) -> Return<FunctionBody> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();

        while !self.check(TokenKind::RParen) {
            if let Some(token) = self.eat(TokenKind::Ellipsis) {
                // A vararg must be the last parameter
                params.push(spanned(Param::Vararg, token.location));
                break;
            }

            let name = self.parse_name()?;
            params.push(name.map(Param::Name));

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        let close = self.expect(TokenKind::RParen)?;
        let body = self.parse_block(close.location.end)?;
        self.expect(TokenKind::KwEnd)?;

        Ok(FunctionBody { params, body })
    }
}
