//! Recursive-descent parser.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | IDENT '(' expr ')' | IDENT | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus.

use crate::error::{ResiError, ResiResult};

use super::ast::{constant, BinaryOp, Function, Node};
use super::token::{tokenize, Token, TokenKind};

pub fn parse(text: &str, variable: &str) -> ResiResult<Node> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: text.len(),
        variable,
    };
    if tokens.is_empty() {
        return Err(parser.error_here("empty expression"));
    }
    let node = parser.expr()?;
    if let Some(token) = parser.peek() {
        let message = match token.kind {
            TokenKind::RParen => "unbalanced `)`".to_string(),
            _ => format!("unexpected {}", describe(&token.kind)),
        };
        return Err(parser.error_here(&message));
    }
    Ok(node)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    end: usize,
    variable: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| &t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error_here(&self, message: &str) -> ResiError {
        ResiError::Syntax {
            position: self.peek().map_or(self.end, |t| t.position),
            message: message.to_string(),
        }
    }

    fn expr(&mut self) -> ResiResult<Node> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> ResiResult<Node> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Node::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> ResiResult<Node> {
        if self.eat(&TokenKind::Minus) {
            return Ok(Node::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&TokenKind::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> ResiResult<Node> {
        let base = self.primary()?;
        if self.eat(&TokenKind::Caret) {
            let exponent = self.unary()?;
            return Ok(Node::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> ResiResult<Node> {
        let Some(token) = self.next() else {
            return Err(self.error_here("unexpected end of expression"));
        };
        match &token.kind {
            TokenKind::Number(v) => Ok(Node::Const((*v).into())),
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.close_paren()?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
                    let func = Function::from_name(name).ok_or_else(|| ResiError::Syntax {
                        position: token.position,
                        message: format!("unknown function `{name}`"),
                    })?;
                    self.pos += 1;
                    let arg = self.expr()?;
                    self.close_paren()?;
                    return Ok(Node::Call(func, Box::new(arg)));
                }
                if !self.variable.is_empty() && name == self.variable {
                    return Ok(Node::Variable);
                }
                if let Some(c) = constant(name) {
                    return Ok(Node::Const(c));
                }
                let message = if Function::from_name(name).is_some() {
                    format!("function `{name}` needs a parenthesized argument")
                } else {
                    format!("unknown identifier `{name}`")
                };
                Err(ResiError::Syntax {
                    position: token.position,
                    message,
                })
            }
            other => Err(ResiError::Syntax {
                position: token.position,
                message: format!("unexpected {}", describe(other)),
            }),
        }
    }

    fn close_paren(&mut self) -> ResiResult<()> {
        if self.eat(&TokenKind::RParen) {
            Ok(())
        } else {
            Err(self.error_here("expected `)`"))
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(v) => format!("number {v}"),
        TokenKind::Ident(name) => format!("`{name}`"),
        TokenKind::Plus => "`+`".into(),
        TokenKind::Minus => "`-`".into(),
        TokenKind::Star => "`*`".into(),
        TokenKind::Slash => "`/`".into(),
        TokenKind::Caret => "`^`".into(),
        TokenKind::LParen => "`(`".into(),
        TokenKind::RParen => "`)`".into(),
    }
}
