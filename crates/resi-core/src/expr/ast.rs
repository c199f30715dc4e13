use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Ln,
    Arcsin,
    Arccos,
    Arctan,
    Exp,
    Sqrt,
}

impl Function {
    pub const NAMES: [&'static str; 9] = [
        "sin", "cos", "tan", "Ln", "Arcsin", "Arccos", "Arctan", "exp", "sqrt",
    ];

    /// Case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "Ln" => Some(Self::Ln),
            "Arcsin" => Some(Self::Arcsin),
            "Arccos" => Some(Self::Arccos),
            "Arctan" => Some(Self::Arctan),
            "exp" => Some(Self::Exp),
            "sqrt" => Some(Self::Sqrt),
            _ => None,
        }
    }

    fn apply(self, z: Complex64) -> Complex64 {
        match self {
            Self::Sin => z.sin(),
            Self::Cos => z.cos(),
            Self::Tan => z.tan(),
            Self::Ln => z.ln(),
            Self::Arcsin => z.asin(),
            Self::Arccos => z.acos(),
            Self::Arctan => z.atan(),
            Self::Exp => z.exp(),
            Self::Sqrt => z.sqrt(),
        }
    }
}

/// Names the parser resolves to constants.
pub const CONSTANT_NAMES: [&str; 3] = ["I", "pi", "e"];

pub fn constant(name: &str) -> Option<Complex64> {
    match name {
        "I" => Some(Complex64::i()),
        "pi" => Some(Complex64::new(std::f64::consts::PI, 0.0)),
        "e" => Some(Complex64::new(std::f64::consts::E, 0.0)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Const(Complex64),
    Variable,
    Neg(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Function, Box<Node>),
}

impl Node {
    pub fn uses_variable(&self) -> bool {
        match self {
            Node::Const(_) => false,
            Node::Variable => true,
            Node::Neg(inner) | Node::Call(_, inner) => inner.uses_variable(),
            Node::Binary(_, lhs, rhs) => lhs.uses_variable() || rhs.uses_variable(),
        }
    }

    /// Evaluate with the bound variable set to the real value `x`.
    ///
    /// Fails on division by an exact zero and on any non-finite intermediate.
    pub fn eval(&self, x: f64) -> Result<Complex64, String> {
        let value = match self {
            Node::Const(c) => *c,
            Node::Variable => Complex64::new(x, 0.0),
            Node::Neg(inner) => -inner.eval(x)?,
            Node::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x)?;
                let b = rhs.eval(x)?;
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => {
                        if b.re == 0.0 && b.im == 0.0 {
                            return Err("division by zero".into());
                        }
                        a.fdiv(b)
                    }
                    BinaryOp::Pow => pow(a, b)?,
                }
            }
            Node::Call(func, arg) => {
                let z = arg.eval(x)?;
                let out = func.apply(z);
                if !is_finite(out) {
                    return Err(format!("{func:?}({z}) is undefined"));
                }
                out
            }
        };
        if !is_finite(value) {
            return Err(format!("non-finite intermediate value {value}"));
        }
        Ok(value)
    }
}

fn is_finite(z: Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

fn pow(base: Complex64, exponent: Complex64) -> Result<Complex64, String> {
    if exponent.im == 0.0 && exponent.re.fract() == 0.0 && exponent.re.abs() <= i32::MAX as f64 {
        let n = exponent.re as i32;
        if n < 0 && base.re == 0.0 && base.im == 0.0 {
            return Err("division by zero".into());
        }
        return Ok(base.powi(n));
    }
    if base.re == 0.0 && base.im == 0.0 {
        if exponent.re > 0.0 {
            return Ok(Complex64::new(0.0, 0.0));
        }
        return Err("zero raised to a non-positive power".into());
    }
    Ok(base.powc(exponent))
}
