pub mod complex;
pub mod contour;
pub mod error;
pub mod estimator;
pub mod evaluator;
pub mod expr;
pub mod worker;

pub use complex::ComplexValue;
pub use contour::{ContourTemplate, CONTOUR_PARAMETER, DEFAULT_VARIABLE};
pub use error::{ResiError, ResiResult};
pub use estimator::{
    estimate_residue, estimate_residue_with_cancel, NoProgress, ProgressSink, ResidueRequest,
    DEFAULT_PRECISION_DIGITS,
};
pub use evaluator::{resolve_constant, Evaluator, Expression};
pub use expr::BuiltinEvaluator;
pub use worker::EstimateWorker;
