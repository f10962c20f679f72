//! Error types for building flow rules.

use thiserror::Error;

use crate::field::FieldType;

/// Result type alias for flow model operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors raised while assembling a match or a flow mod.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The same field type was added to a match twice.
    #[error("match field {0} specified more than once")]
    DuplicateField(FieldType),

    /// A field value is out of range for its type.
    #[error("invalid value for match field {field}: {reason}")]
    InvalidFieldValue {
        /// The offending field type.
        field: FieldType,
        /// Why the value was rejected.
        reason: String,
    },

    /// Both bare actions and instructions were supplied to one flow.
    #[error("a flow carries either actions or instructions, not both")]
    MixedBody,
}
