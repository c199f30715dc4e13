use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResiError {
    #[error("invalid radius: {0} (must be positive and finite)")]
    InvalidRadius(f64),

    #[error("invalid precision: {0} digits")]
    InvalidPrecision(u32),

    #[error("invalid center: {0} (components must be finite)")]
    InvalidCenter(String),

    #[error("invalid variable name {name:?}: {reason}")]
    InvalidVariable { name: String, reason: String },

    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("malformed function, cannot parse `{expression}`")]
    MalformedFunction {
        expression: String,
        #[source]
        source: Box<ResiError>,
    },

    #[error("evaluation failed at theta = {theta}: {message}")]
    Evaluation { theta: f64, message: String },

    #[error("division by zero")]
    DivideByZero,

    #[error("cancelled after {completed} of {total} samples")]
    Cancelled { completed: u64, total: u64 },

    #[error("estimate worker panicked")]
    WorkerPanicked,

    #[error("failed to start estimate worker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl ResiError {
    /// Short message suitable for end users. The full error chain belongs in logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Syntax { .. } | Self::MalformedFunction { .. } => {
                "Please check your input syntax"
            }
            Self::InvalidRadius(_) => "The radius must be a positive number",
            Self::InvalidPrecision(_) => "The precision must be a positive number of digits",
            Self::InvalidCenter(_) => "The center must be a finite complex number",
            Self::InvalidVariable { .. } => "The variable name cannot be used in this function",
            Self::Evaluation { .. } => "The function could not be evaluated on the contour",
            Self::DivideByZero => "Cannot rescale a zero value",
            Self::Cancelled { .. } => "The calculation was cancelled",
            Self::WorkerPanicked | Self::Spawn(_) => "The calculation stopped unexpectedly",
        }
    }
}

pub type ResiResult<T> = Result<T, ResiError>;
