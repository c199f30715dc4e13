//! Complex value with lazily cached polar quantities.
//!
//! Magnitude and argument are computed on first access and kept until the
//! next mutation. Every `&mut self` operation clears both caches before it
//! returns, so a cached value can never describe an older state.

use std::cell::Cell;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ResiError, ResiResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplexValue {
    real: f64,
    imaginary: f64,

    #[serde(skip)]
    cached_argument: Cell<Option<f64>>,
    #[serde(skip)]
    cached_magnitude: Cell<Option<f64>>,
}

impl ComplexValue {
    pub fn new(real: f64, imaginary: f64) -> Self {
        Self {
            real,
            imaginary,
            cached_argument: Cell::new(None),
            cached_magnitude: Cell::new(None),
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// `e^(i*angle)`
    pub fn rotation(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn real(&self) -> f64 {
        self.real
    }

    pub fn imaginary(&self) -> f64 {
        self.imaginary
    }

    pub fn is_finite(&self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }

    fn invalidate(&mut self) {
        self.cached_argument.set(None);
        self.cached_magnitude.set(None);
    }

    // --- Mutating arithmetic ---

    pub fn add_assign_value(&mut self, other: &ComplexValue) -> &mut Self {
        self.add_parts(other.real, other.imaginary)
    }

    pub fn add_parts(&mut self, real: f64, imaginary: f64) -> &mut Self {
        self.real += real;
        self.imaginary += imaginary;
        self.invalidate();
        self
    }

    pub fn multiply_assign_value(&mut self, other: &ComplexValue) -> &mut Self {
        self.multiply_parts(other.real, other.imaginary)
    }

    pub fn multiply_parts(&mut self, real: f64, imaginary: f64) -> &mut Self {
        let re = self.real * real - self.imaginary * imaginary;
        self.imaginary = self.imaginary * real + self.real * imaginary;
        self.real = re;
        self.invalidate();
        self
    }

    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.real *= factor;
        self.imaginary *= factor;
        self.invalidate();
        self
    }

    /// Rotates in place by `angle` radians.
    pub fn turn(&mut self, angle: f64) -> &mut Self {
        let rotation = Self::rotation(angle);
        self.multiply_assign_value(&rotation)
    }

    /// Rescales in place so that `magnitude() == target`.
    ///
    /// A zero value has no direction to keep, so it fails with
    /// [`ResiError::DivideByZero`] and is left unchanged.
    pub fn scale_to_magnitude(&mut self, target: f64) -> ResiResult<()> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return Err(ResiError::DivideByZero);
        }
        self.scale(target / magnitude);
        Ok(())
    }

    // --- Non-mutating arithmetic ---

    pub fn added(&self, other: &ComplexValue) -> Self {
        Self::new(self.real + other.real, self.imaginary + other.imaginary)
    }

    pub fn multiplied(&self, other: &ComplexValue) -> Self {
        Self::new(
            self.real * other.real - self.imaginary * other.imaginary,
            self.imaginary * other.real + self.real * other.imaginary,
        )
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.real * factor, self.imaginary * factor)
    }

    pub fn turned(&self, angle: f64) -> Self {
        self.multiplied(&Self::rotation(angle))
    }

    // --- Derived quantities ---

    /// Angle in (-pi, pi]. The zero value has argument 0.
    pub fn argument(&self) -> f64 {
        if let Some(arg) = self.cached_argument.get() {
            return arg;
        }
        let arg = self.imaginary.atan2(self.real);
        self.cached_argument.set(Some(arg));
        arg
    }

    pub fn magnitude(&self) -> f64 {
        if let Some(abs) = self.cached_magnitude.get() {
            return abs;
        }
        let abs = self.real.hypot(self.imaginary);
        self.cached_magnitude.set(Some(abs));
        abs
    }

    pub fn rounded_real(&self) -> i64 {
        self.real.round() as i64
    }

    pub fn rounded_imaginary(&self) -> i64 {
        self.imaginary.round() as i64
    }

    /// Fixed four-decimal rendering, e.g. `1.0000+2.0000i` or `0.5000-3.1400i`.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

/// Formats `value` to four decimals, dropping the sign of anything that
/// rounds to zero so `-1e-17` prints as `0.0000`.
fn four_decimals(value: f64) -> (bool, String) {
    let digits = format!("{:.4}", value.abs());
    let negative = value.is_sign_negative() && !value.is_nan() && digits != "0.0000";
    (negative, digits)
}

impl fmt::Display for ComplexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (re_negative, re) = four_decimals(self.real);
        let (im_negative, im) = four_decimals(self.imaginary);
        let re_sign = if re_negative { "-" } else { "" };
        let im_sign = if im_negative { '-' } else { '+' };
        write!(f, "{re_sign}{re}{im_sign}{im}i")
    }
}

impl PartialEq for ComplexValue {
    fn eq(&self, other: &Self) -> bool {
        self.real == other.real && self.imaginary == other.imaginary
    }
}

impl From<Complex64> for ComplexValue {
    fn from(c: Complex64) -> Self {
        Self::new(c.re, c.im)
    }
}

impl From<&ComplexValue> for Complex64 {
    fn from(c: &ComplexValue) -> Self {
        Complex64::new(c.real, c.imaginary)
    }
}

impl From<f64> for ComplexValue {
    fn from(real: f64) -> Self {
        Self::new(real, 0.0)
    }
}

// --- Operators ---

impl Add<&ComplexValue> for &ComplexValue {
    type Output = ComplexValue;

    fn add(self, rhs: &ComplexValue) -> ComplexValue {
        self.added(rhs)
    }
}

impl AddAssign<&ComplexValue> for ComplexValue {
    fn add_assign(&mut self, rhs: &ComplexValue) {
        self.add_assign_value(rhs);
    }
}

impl Sub<&ComplexValue> for &ComplexValue {
    type Output = ComplexValue;

    fn sub(self, rhs: &ComplexValue) -> ComplexValue {
        self.added(&-rhs)
    }
}

impl SubAssign<&ComplexValue> for ComplexValue {
    fn sub_assign(&mut self, rhs: &ComplexValue) {
        self.add_parts(-rhs.real, -rhs.imaginary);
    }
}

impl Mul<&ComplexValue> for &ComplexValue {
    type Output = ComplexValue;

    fn mul(self, rhs: &ComplexValue) -> ComplexValue {
        self.multiplied(rhs)
    }
}

impl MulAssign<&ComplexValue> for ComplexValue {
    fn mul_assign(&mut self, rhs: &ComplexValue) {
        self.multiply_assign_value(rhs);
    }
}

impl MulAssign<f64> for ComplexValue {
    fn mul_assign(&mut self, rhs: f64) {
        self.scale(rhs);
    }
}

impl Neg for &ComplexValue {
    type Output = ComplexValue;

    fn neg(self) -> ComplexValue {
        self.scaled(-1.0)
    }
}
