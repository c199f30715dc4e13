//! Residue estimation by sampling a circular contour.
//!
//! With `z = z0 + r0*e^(i*t)` and `dz = i*r0*e^(i*t) dt`, the residue
//! `(1/2*pi*i) * integral f dz` over N uniform steps of `2*pi/N` reduces to
//! `(r0/N) * sum f(z0 + r0*e^(i*t_k)) * e^(i*t_k)`, which is what
//! [`estimate_residue`] accumulates.

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::complex::ComplexValue;
use crate::contour::{ContourTemplate, CONTOUR_PARAMETER, DEFAULT_VARIABLE};
use crate::error::{ResiError, ResiResult};
use crate::evaluator::Evaluator;

pub const DEFAULT_PRECISION_DIGITS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidueRequest {
    pub function: String,
    pub center: ComplexValue,
    pub radius: f64,
    pub precision_digits: u32,
    #[serde(default = "default_variable")]
    pub variable: String,
}

fn default_variable() -> String {
    DEFAULT_VARIABLE.to_string()
}

impl ResidueRequest {
    pub fn new(
        function: impl Into<String>,
        center: ComplexValue,
        radius: f64,
        precision_digits: u32,
    ) -> Self {
        Self {
            function: function.into(),
            center,
            radius,
            precision_digits,
            variable: default_variable(),
        }
    }

    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Number of contour samples, `10^precision_digits`.
    pub fn sample_count(&self) -> ResiResult<u64> {
        if self.precision_digits == 0 {
            return Err(ResiError::InvalidPrecision(self.precision_digits));
        }
        10u64
            .checked_pow(self.precision_digits)
            .ok_or(ResiError::InvalidPrecision(self.precision_digits))
    }

    /// Build the contour template for this request without sampling.
    pub fn template(&self) -> ResiResult<ContourTemplate> {
        ContourTemplate::new(self.center.clone(), self.radius, self.variable.as_str())
    }
}

/// Receives fractional completion values in `[0, 1]`.
pub trait ProgressSink {
    fn report(&self, fraction: f64);
}

impl<F: Fn(f64)> ProgressSink for F {
    fn report(&self, fraction: f64) {
        self(fraction)
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f64) {}
}

/// Send failures are ignored.
impl ProgressSink for Sender<f64> {
    fn report(&self, fraction: f64) {
        let _ = self.send(fraction);
    }
}

pub fn estimate_residue(
    request: &ResidueRequest,
    evaluator: &dyn Evaluator,
    progress: &dyn ProgressSink,
) -> ResiResult<ComplexValue> {
    run(request, evaluator, progress, None)
}

/// Like [`estimate_residue`], but stops between samples once `cancel` is set.
pub fn estimate_residue_with_cancel(
    request: &ResidueRequest,
    evaluator: &dyn Evaluator,
    progress: &dyn ProgressSink,
    cancel: &AtomicBool,
) -> ResiResult<ComplexValue> {
    run(request, evaluator, progress, Some(cancel))
}

fn run(
    request: &ResidueRequest,
    evaluator: &dyn Evaluator,
    progress: &dyn ProgressSink,
    cancel: Option<&AtomicBool>,
) -> ResiResult<ComplexValue> {
    if !(request.radius.is_finite() && request.radius > 0.0) {
        return Err(ResiError::InvalidRadius(request.radius));
    }
    let samples = request.sample_count()?;
    let template = request.template()?;

    let text = template.parametrize(&request.function)?;
    debug!(
        function = %request.function,
        variable = template.variable(),
        parametrized = %text,
        samples,
        "contour parametrized"
    );
    let expression = evaluator
        .parse(&text, CONTOUR_PARAMETER)
        .map_err(|source| ResiError::MalformedFunction {
            expression: request.function.clone(),
            source: Box::new(source),
        })?;

    let step = TAU / samples as f64;
    let mut sum = ComplexValue::zero();
    for i in 0..samples {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            warn!(completed = i, total = samples, "residue estimate cancelled");
            return Err(ResiError::Cancelled {
                completed: i,
                total: samples,
            });
        }
        let theta = i as f64 * step;
        let sample = expression.evaluate(theta)?;
        sum.add_parts(sample.real(), sample.imaginary());
        progress.report(i as f64 / samples as f64);
    }
    progress.report(1.0);

    sum.scale(request.radius / samples as f64);
    info!(function = %request.function, residue = %sum, "residue estimated");
    Ok(sum)
}
