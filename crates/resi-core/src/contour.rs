//! Circular contour parametrization.
//!
//! A function of the complex variable `w` around `z0` with radius `r0` is
//! rewritten into an expression of the real angle `z` by the template
//!
//! ```text
//! (f[w := (z0 + r0*exp(I*z))])*exp(I*z)
//! ```
//!
//! Substitution works on whole identifier tokens, so `sinz` or `exp` are
//! left alone when the variable is `z`, and number literals such as `1e5`
//! are never split.

use crate::complex::ComplexValue;
use crate::error::{ResiError, ResiResult};
use crate::expr::{self, token::scan_number};

/// Name of the real angle parameter in a parametrized expression.
pub const CONTOUR_PARAMETER: &str = "z";

/// Default name of the complex variable in user function text.
pub const DEFAULT_VARIABLE: &str = "z";

#[derive(Debug, Clone)]
pub struct ContourTemplate {
    center: ComplexValue,
    radius: f64,
    variable: String,
}

impl ContourTemplate {
    pub fn new(center: ComplexValue, radius: f64, variable: impl Into<String>) -> ResiResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ResiError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(ResiError::InvalidCenter(center.to_string()));
        }
        let variable = variable.into();
        validate_variable(&variable)?;
        Ok(Self {
            center,
            radius,
            variable,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Point on the circle, `z0 + r0*exp(I*z)`, as expression text.
    fn point_text(&self) -> String {
        let re = self.center.real();
        let im = self.center.imaginary();
        let sign = if im.is_sign_negative() { '-' } else { '+' };
        format!(
            "({re}{sign}{}*I+{}*exp(I*{CONTOUR_PARAMETER}))",
            im.abs(),
            self.radius
        )
    }

    /// Build the parametrized expression text for `function`.
    pub fn parametrize(&self, function: &str) -> ResiResult<String> {
        if function.trim().is_empty() {
            return Err(ResiError::MalformedFunction {
                expression: function.to_string(),
                source: Box::new(ResiError::Syntax {
                    position: 0,
                    message: "empty expression".into(),
                }),
            });
        }

        let point = self.point_text();
        let bytes = function.as_bytes();
        let mut out = String::with_capacity(function.len() * 2 + 16);
        out.push('(');

        let mut i = 0;
        let mut copied = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
                i = scan_number(bytes, i);
                continue;
            }
            if c.is_ascii_alphabetic() || c == b'_' {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let ident = &function[start..i];
                if ident == self.variable {
                    out.push_str(&function[copied..start]);
                    out.push_str(&point);
                    copied = i;
                } else if ident == CONTOUR_PARAMETER {
                    return Err(ResiError::InvalidVariable {
                        name: self.variable.clone(),
                        reason: format!(
                            "`{CONTOUR_PARAMETER}` in the function would be read as the contour angle"
                        ),
                    });
                }
                continue;
            }
            i += 1;
        }
        out.push_str(&function[copied..]);
        out.push_str(")*exp(I*");
        out.push_str(CONTOUR_PARAMETER);
        out.push(')');
        Ok(out)
    }
}

fn validate_variable(name: &str) -> ResiResult<()> {
    let invalid = |reason: &str| ResiError::InvalidVariable {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return Err(invalid("must start with a letter or `_`")),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("must contain only letters, digits and `_`"));
    }
    if expr::is_reserved(name) {
        return Err(invalid("is a built-in function or constant"));
    }
    Ok(())
}
