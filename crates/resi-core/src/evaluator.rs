use crate::complex::ComplexValue;
use crate::error::{ResiError, ResiResult};

/// Turns expression text into something that can be evaluated repeatedly.
pub trait Evaluator: Send + Sync {
    /// Parse `expression`, binding `variable` as its single real input.
    fn parse(&self, expression: &str, variable: &str) -> ResiResult<Box<dyn Expression>>;
}

/// A parsed expression of one real variable.
pub trait Expression: Send + Sync {
    fn evaluate(&self, value: f64) -> ResiResult<ComplexValue>;

    /// True when the bound variable never occurs in the expression.
    fn is_constant(&self) -> bool;
}

/// Parse and evaluate a closed expression such as `1-2*I` or `Ln(2)`.
pub fn resolve_constant(evaluator: &dyn Evaluator, text: &str) -> ResiResult<ComplexValue> {
    // No identifier can be bound to an empty name, so any stray variable is
    // reported as an unknown identifier by the parser.
    let expression = evaluator.parse(text, "")?;
    if !expression.is_constant() {
        return Err(ResiError::Syntax {
            position: 0,
            message: format!("`{text}` is not a constant"),
        });
    }
    expression.evaluate(0.0)
}
