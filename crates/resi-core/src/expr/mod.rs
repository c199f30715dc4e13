//! Built-in expression evaluator over complex numbers.
//!
//! Supports `+ - * / ^`, unary signs, parentheses, the constants `I`, `pi`
//! and `e`, and the functions `sin cos tan Ln Arcsin Arccos Arctan exp sqrt`.
//! Names are case-sensitive.

mod ast;
mod parser;
pub(crate) mod token;

pub use ast::{CONSTANT_NAMES, Function};

use crate::complex::ComplexValue;
use crate::error::{ResiError, ResiResult};
use crate::evaluator::{Evaluator, Expression};

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinEvaluator;

impl BuiltinEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for BuiltinEvaluator {
    fn parse(&self, expression: &str, variable: &str) -> ResiResult<Box<dyn Expression>> {
        let root = parser::parse(expression, variable)?;
        Ok(Box::new(BuiltinExpression {
            constant: !root.uses_variable(),
            root,
        }))
    }
}

#[derive(Debug)]
struct BuiltinExpression {
    root: ast::Node,
    constant: bool,
}

impl Expression for BuiltinExpression {
    fn evaluate(&self, value: f64) -> ResiResult<ComplexValue> {
        self.root
            .eval(value)
            .map(ComplexValue::from)
            .map_err(|message| ResiError::Evaluation { theta: value, message })
    }

    fn is_constant(&self) -> bool {
        self.constant
    }
}

/// True if `name` is already taken by a function or constant.
pub fn is_reserved(name: &str) -> bool {
    Function::from_name(name).is_some() || CONSTANT_NAMES.contains(&name)
}
