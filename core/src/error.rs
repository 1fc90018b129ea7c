use std::fmt;
use thiserror::Error;

/// Why an input field was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationReason {
    NotPositive,
    NotFinite,
    OutOfRange { min: f64, max: f64 },
    BelowMinimum { min: f64 },
    Empty,
    Duplicate,
    Unrecognized,
}

impl ValidationReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotPositive       => "not_positive",
            Self::NotFinite         => "not_finite",
            Self::OutOfRange { .. } => "out_of_range",
            Self::BelowMinimum { .. } => "below_minimum",
            Self::Empty             => "empty",
            Self::Duplicate         => "duplicate",
            Self::Unrecognized      => "unrecognized",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive => write!(f, "must be greater than zero"),
            Self::NotFinite => write!(f, "must be a finite number"),
            Self::OutOfRange { min, max } => write!(f, "must be within [{min}, {max}]"),
            Self::BelowMinimum { min } => write!(f, "must be at least {min}"),
            Self::Empty => write!(f, "must not be empty"),
            Self::Duplicate => write!(f, "is defined more than once"),
            Self::Unrecognized => write!(f, "is not a recognised value"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ImpactError {
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: String,
        reason: ValidationReason,
    },

    #[error("Unknown sector '{code}'")]
    UnknownSector { code: String },

    #[error("Division by zero computing {field}: degenerate multiplier profile")]
    DivisionByZero { field: String },

    #[error("Numeric overflow: {field} is not finite")]
    NumericOverflow { field: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImpactError {
    pub fn validation(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self::Validation { field: field.into(), reason }
    }

    /// Stable reason code for user-facing surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { reason, .. } => reason.code(),
            Self::UnknownSector { .. }      => "unknown_sector",
            Self::DivisionByZero { .. }     => "division_by_zero",
            Self::NumericOverflow { .. }    => "numeric_overflow",
            Self::Serialization(_)          => "serialization",
            Self::Other(_)                  => "other",
        }
    }

    /// Name of the offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. }
            | Self::DivisionByZero { field }
            | Self::NumericOverflow { field } => Some(field),
            Self::UnknownSector { .. } => Some("sector_code"),
            Self::Serialization(_) | Self::Other(_) => None,
        }
    }
}

pub type ImpactResult<T> = Result<T, ImpactError>;

/// Reject NaN and infinities in a computed value.
pub(crate) fn ensure_finite(field: &str, value: f64) -> ImpactResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ImpactError::NumericOverflow { field: field.to_string() })
    }
}
