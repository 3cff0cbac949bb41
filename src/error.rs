use thiserror::Error;

/// Precondition violations in the scoring core. Missing or non-positive inputs
/// are not errors; they degrade to the insufficient-data sentinel instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("bankroll must be a positive finite amount, got {0}")]
    InvalidBankroll(f64),

    #[error("non-numeric value in {field}: {value}")]
    NonFiniteInput { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
