//! Parsing of statements and blocks.
//! The expression parser is split into another file to keep the codebase clean and organized.

use crate::syntax::ast::*;
use crate::syntax::errors::SyntaxError;
use crate::syntax::lexer::TokenKind;
use crate::utils::{spanned, Spanned};

use super::{Parser, Return};

impl<'src> Parser<'src> {
    /// Parse statements until a block terminator (or end of file). The
    /// terminator itself is left for the caller. `start` is the byte offset
    /// right after the token that opened the block.
    pub(crate) fn parse_block(&mut self, start: usize) -> Return<Block> {
        let mut stmts = Vec::new();

        while let Some(token) = self.peek() {
            if token.kind.is_block_end() {
                break;
            }

            if token.kind == TokenKind::Semicolon {
                self.advance();
                continue;
            }

            if token.kind == TokenKind::KwReturn {
                stmts.push(self.parse_return()?);
                self.eat(TokenKind::Semicolon);

                match self.peek() {
                    Some(next) if !next.kind.is_block_end() => {
                        return Err(SyntaxError::ReturnNotLast {
                            location: next.location,
                        })
                    }
                    _ => break,
                }
            }

            stmts.push(self.parse_stmt()?);
        }

        Ok(Block::new(stmts, start))
    }

    pub(crate) fn parse_stmt(&mut self) -> Return<Spanned<Stmt>> {
        let Some(token) = self.peek().cloned() else {
            return Err(SyntaxError::UnexpectedEof);
        };

        let stmt = match token.kind {
            TokenKind::KwLocal => self.parse_local()?,
            TokenKind::KwFunction => self.parse_function_stmt()?,
            TokenKind::KwIf => self.parse_if()?,
            TokenKind::KwWhile => self.parse_while()?,
            TokenKind::KwFor => self.parse_for()?,
            TokenKind::KwRepeat => self.parse_repeat()?,
            TokenKind::KwDo => {
                let open = self.expect(TokenKind::KwDo)?;
                let block = self.parse_block(open.location.end)?;
                self.expect(TokenKind::KwEnd)?;
                Stmt::Do(block)
            }
            TokenKind::KwBreak => {
                self.advance();
                Stmt::Break
            }
            TokenKind::KwGoto => {
                self.advance();
                Stmt::Goto(self.parse_name()?.target)
            }
            TokenKind::DoubleColon => {
                // ::label::
                self.advance();
                let name = self.parse_name()?;
                self.expect(TokenKind::DoubleColon)?;
                Stmt::Label(name.target)
            }
            TokenKind::Name | TokenKind::LParen => self.parse_expr_stmt()?,

            found => {
                return Err(SyntaxError::ExpectedStmt {
                    found,
                    location: token.location,
                })
            }
        };

        Ok(spanned(stmt, self.finish(&token.location)))
    }

    fn parse_local(&mut self) -> Return<Stmt> {
        // local function name(...) ... end
        // local a, b = expr, expr
        self.expect(TokenKind::KwLocal)?;

        if self.eat(TokenKind::KwFunction).is_some() {
            let name = self.parse_name()?;
            let func = self.parse_function_body()?;
            return Ok(Stmt::Function {
                name: name.map(Expr::Ident),
                is_local: true,
                func,
            });
        }

        let mut names = vec![self.parse_name()?];
        while self.eat(TokenKind::Comma).is_some() {
            names.push(self.parse_name()?);
        }

        let init = if self.eat(TokenKind::Equal).is_some() {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        Ok(Stmt::Local { names, init })
    }

    fn parse_function_stmt(&mut self) -> Return<Stmt> {
        // function a.b.c:m(...) ... end
        self.expect(TokenKind::KwFunction)?;

        let mut name = self.parse_name()?.map(Expr::Ident);
        while let Some(indexer) = match self.peek_kind() {
            Some(TokenKind::Dot) => Some(Indexer::Dot),
            Some(TokenKind::Colon) => Some(Indexer::Colon),
            _ => None,
        } {
            self.advance();
            let start = name.location;
            let member = self.parse_name()?;
            name = spanned(
                Expr::Member {
                    base: Box::new(name),
                    indexer,
                    name: member,
                },
                self.finish(&start),
            );

            // The method part is always last
            if indexer == Indexer::Colon {
                break;
            }
        }

        let func = self.parse_function_body()?;
        Ok(Stmt::Function {
            name,
            is_local: false,
            func,
        })
    }

    fn parse_if(&mut self) -> Return<Stmt> {
        // if cond then block {elseif cond then block} [else block] end
        self.expect(TokenKind::KwIf)?;
        let cond = self.parse_expr()?;
        let then = self.expect(TokenKind::KwThen)?;
        let then_block = self.parse_block(then.location.end)?;

        let mut elif_blocks = Vec::new();
        while self.eat(TokenKind::KwElseif).is_some() {
            let cond = self.parse_expr()?;
            let then = self.expect(TokenKind::KwThen)?;
            let block = self.parse_block(then.location.end)?;
            elif_blocks.push((cond, block));
        }

        let else_block = match self.eat(TokenKind::KwElse) {
            Some(token) => Some(self.parse_block(token.location.end)?),
            None => None,
        };

        self.expect(TokenKind::KwEnd)?;

        Ok(Stmt::If {
            cond,
            then_block,
            elif_blocks,
            else_block,
        })
    }

    fn parse_while(&mut self) -> Return<Stmt> {
        // while condition do
        //  body
        // end
        self.expect(TokenKind::KwWhile)?;
        let cond = self.parse_expr()?;
        let open = self.expect(TokenKind::KwDo)?;
        let block = self.parse_block(open.location.end)?;
        self.expect(TokenKind::KwEnd)?;

        Ok(Stmt::While { cond, block })
    }

    fn parse_for(&mut self) -> Return<Stmt> {
        // for i = start, end [, step] do body end
        // for k, v in iterators do body end
        self.expect(TokenKind::KwFor)?;
        let first = self.parse_name()?;

        if self.eat(TokenKind::Equal).is_some() {
            let start = self.parse_expr()?;
            self.expect(TokenKind::Comma)?;
            let end = self.parse_expr()?;
            let step = match self.eat(TokenKind::Comma) {
                Some(_) => Some(self.parse_expr()?),
                None => None,
            };

            let open = self.expect(TokenKind::KwDo)?;
            let block = self.parse_block(open.location.end)?;
            self.expect(TokenKind::KwEnd)?;

            return Ok(Stmt::ForNumeric {
                var: first,
                start,
                end,
                step,
                block,
            });
        }

        let mut vars = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            vars.push(self.parse_name()?);
        }

        self.expect(TokenKind::KwIn)?;
        let iterators = self.parse_expr_list()?;
        let open = self.expect(TokenKind::KwDo)?;
        let block = self.parse_block(open.location.end)?;
        self.expect(TokenKind::KwEnd)?;

        Ok(Stmt::ForGeneric {
            vars,
            iterators,
            block,
        })
    }

    fn parse_repeat(&mut self) -> Return<Stmt> {
        let open = self.expect(TokenKind::KwRepeat)?;
        let block = self.parse_block(open.location.end)?;
        self.expect(TokenKind::KwUntil)?;
        let cond = self.parse_expr()?;

        Ok(Stmt::Repeat { block, cond })
    }

    fn parse_return(&mut self) -> Return<Spanned<Stmt>> {
        // return [exprlist]
        let token = self.expect(TokenKind::KwReturn)?;

        let values = match self.peek_kind() {
            None | Some(TokenKind::Semicolon) => Vec::new(),
            Some(kind) if kind.is_block_end() => Vec::new(),
            Some(_) => self.parse_expr_list()?,
        };

        Ok(spanned(Stmt::Return(values), self.finish(&token.location)))
    }

    fn parse_expr_stmt(&mut self) -> Return<Stmt> {
        // a, b.c, d[e] = exprs
        // f(args)
        let first = self.parse_suffixed_expr()?;

        if self.check(TokenKind::Equal) || self.check(TokenKind::Comma) {
            let mut targets = vec![first];
            while self.eat(TokenKind::Comma).is_some() {
                targets.push(self.parse_suffixed_expr()?);
            }

            if let Some(bad) = targets.iter().find(|t| !t.target.is_lvalue()) {
                return Err(SyntaxError::InvalidAssignmentTarget {
                    location: bad.location,
                });
            }

            self.expect(TokenKind::Equal)?;
            let init = self.parse_expr_list()?;
            return Ok(Stmt::Assign { targets, init });
        }

        if !first.target.is_call() {
            return Err(SyntaxError::ExpectedCall {
                location: first.location,
            });
        }

        Ok(Stmt::Call(first))
    }
}
