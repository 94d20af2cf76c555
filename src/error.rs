//! # Column Errors
//!
//! Every fallible operation in this crate returns `eyre::Result`. Failures the
//! caller may want to tell apart are raised as a [`ColumnError`] through
//! `eyre::bail!`, so they can be recovered with
//! `report.downcast_ref::<ColumnError>()`.
//!
//! None of these errors is retried internally. A vector or writer that
//! returned one from `add`/`write` should be discarded.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    /// Malformed date, timestamp or decimal text.
    Parse { input: String, reason: String },
    /// A value, or a rescaled value, has more digits than the precision.
    PrecisionOverflow { digits: usize, precision: u8 },
    /// Requested decimal precision exceeds the largest physical width.
    UnsupportedWidth { precision: u8, max: u8 },
    /// Arena growth would exceed the largest representable chunk.
    BufferOverflow { current: usize, requested: usize },
    /// A vector was routed to a writer for a different logical type.
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    InvalidArgument(String),
    /// A view points into an arena generation or caller buffer that is gone.
    StaleReference { row: usize },
}

impl ColumnError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        ColumnError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::Parse { input, reason } => {
                write!(f, "failed to parse '{}': {}", input, reason)
            }
            ColumnError::PrecisionOverflow { digits, precision } => write!(
                f,
                "value with {} digits exceeds the allowed precision {}",
                digits, precision
            ),
            ColumnError::UnsupportedWidth { precision, max } => write!(
                f,
                "decimal precision {} is bigger than the maximum supported width {}",
                precision, max
            ),
            ColumnError::BufferOverflow { current, requested } => write!(
                f,
                "arena overflow: small buffer length {} cannot grow to hold {} bytes",
                current, requested
            ),
            ColumnError::TypeMismatch { expected, actual } => write!(
                f,
                "column vector type mismatch: writer expects {} but got {}",
                expected, actual
            ),
            ColumnError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ColumnError::StaleReference { row } => write!(
                f,
                "row {} refers to memory that was reset or released",
                row
            ),
        }
    }
}

impl std::error::Error for ColumnError {}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::bail;

    fn fails() -> eyre::Result<()> {
        bail!(ColumnError::PrecisionOverflow {
            digits: 4,
            precision: 3
        })
    }

    #[test]
    fn typed_error_survives_eyre_report() {
        let err = fails().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ColumnError>(),
            Some(&ColumnError::PrecisionOverflow {
                digits: 4,
                precision: 3
            })
        );
        assert!(err.to_string().contains("precision 3"));
    }
}
