//! Fatal error taxonomy for MLS conversion.
//!
//! Every variant aborts the whole conversion: the caller gets either a
//! complete, internally-consistent JSON-LD document or one of these errors
//! naming precisely which value or type defeated the conversion. Nothing is
//! logged-and-continued and no partial document is ever produced.

use thiserror::Error;

/// Errors raised while converting a model to an MLS record.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The top-level input does not expose a usable class identity and
    /// therefore cannot be attributed to any ML library family.
    #[error("unsupported model type: {0:?}")]
    UnsupportedModelType(String),

    /// A parameter value is neither a nested estimator nor representable as
    /// a JSON literal. Names the top-level model under conversion, not the
    /// nested value's owner.
    #[error("can't convert model of type {model_type} to mls: {cause}")]
    UnsupportedValue {
        /// Fully-qualified class name of the model handed to the converter.
        model_type: String,
        /// What defeated the conversion.
        cause: String,
    },

    /// The supplied scorer is outside the recognized evaluation-measure
    /// vocabulary, or carries no resolvable qualified name at all.
    #[error("unsupported evaluation measure: {0}")]
    UnsupportedEvaluationMeasure(String),
}
