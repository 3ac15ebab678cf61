//! Error type shared by every numerical entry point.
//!
//! Only argument validation can fail: out-of-range sample values are a normal
//! intermediate state and are never reported here.

/// Reasons why a restoration primitive rejects its input.
#[derive(Clone, Debug, PartialEq)]
pub enum RestoreError {
    /// A scalar parameter or image shape is outside the supported domain
    /// (zero-area image, zero patch/radius, non-positive eps, ...).
    InvalidArgument { what: &'static str, detail: String },
    /// Two buffers that must share a shape do not. Shapes are reported as
    /// `(width, height, channels)`.
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },
}

impl RestoreError {
    pub(crate) fn invalid(what: &'static str, detail: impl Into<String>) -> Self {
        RestoreError::InvalidArgument {
            what,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for RestoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreError::InvalidArgument { what, detail } => {
                write!(f, "invalid {what}: {detail}")
            }
            RestoreError::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "{what} mismatch (expected {}x{}x{}, found {}x{}x{})",
                expected.0, expected.1, expected.2, found.0, found.1, found.2
            ),
        }
    }
}

impl std::error::Error for RestoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = RestoreError::invalid("patch size", "must be > 0");
        assert_eq!(err.to_string(), "invalid patch size: must be > 0");
        let err = RestoreError::DimensionMismatch {
            what: "guidance/input size",
            expected: (4, 3, 1),
            found: (4, 2, 1),
        };
        assert_eq!(
            err.to_string(),
            "guidance/input size mismatch (expected 4x3x1, found 4x2x1)"
        );
    }
}
