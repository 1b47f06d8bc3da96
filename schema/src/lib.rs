//! ML Schema (MLS) provenance records as typed Rust data.
//!
//! The `mls-schema` crate converts trained machine-learning models into
//! provenance records conforming to the [ML Schema](http://www.w3.org/ns/mls)
//! vocabulary, serialized as JSON-LD. A model is anything exposing the
//! parameter-accessor capability ([`Estimator`]); nested sub-models are
//! detected structurally and flattened into tagged `{type, params}` nodes.
//!
//! # Entry Point
//!
//! ```
//! # fn main() -> Result<(), mls_schema::ConvertError> {
//! use std::collections::BTreeMap;
//! use mls_schema::{Estimator, ParamValue};
//!
//! struct Perceptron;
//!
//! impl Estimator for Perceptron {
//!     fn module(&self) -> String {
//!         "sklearn.linear_model".to_owned()
//!     }
//!     fn name(&self) -> String {
//!         "Perceptron".to_owned()
//!     }
//!     fn params(&self) -> BTreeMap<String, ParamValue> {
//!         BTreeMap::from([
//!             ("alpha".to_owned(), ParamValue::Float(0.0001)),
//!             ("penalty".to_owned(), ParamValue::Null),
//!         ])
//!     }
//!     fn library_version(&self) -> String {
//!         "1.3.0".to_owned()
//!     }
//! }
//!
//! let model = Perceptron;
//! let document = mls_schema::to_mls(&model, None)?;
//! assert!(document.contains("mls:Run"));
//! # Ok(())
//! # }
//! ```
//!
//! # Evaluation metrics
//!
//! An optional `(scorer, value)` pair lands in the Run's outputs, bound to
//! the canonical measure for the scorer's qualified name:
//!
//! ```
//! # fn main() -> Result<(), mls_schema::ConvertError> {
//! # use std::collections::BTreeMap;
//! # use mls_schema::{Estimator, ParamValue};
//! # struct Perceptron;
//! # impl Estimator for Perceptron {
//! #     fn module(&self) -> String { "sklearn.linear_model".to_owned() }
//! #     fn name(&self) -> String { "Perceptron".to_owned() }
//! #     fn params(&self) -> BTreeMap<String, ParamValue> { BTreeMap::new() }
//! #     fn library_version(&self) -> String { "1.3.0".to_owned() }
//! # }
//! use mls_schema::ScorerRef;
//!
//! let model = Perceptron;
//! let scorer = ScorerRef::named("accuracy_score");
//! let document = mls_schema::to_mls(&model, Some((&scorer, 0.87)))?;
//! assert!(document.contains("mls#accuracy"));
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod error;
pub mod estimator;
pub mod extract;
pub mod measures;
pub mod model;
pub mod serializer;
pub mod session;

pub use builder::{build_run, build_run_with, generate_unique_id};
pub use error::ConvertError;
pub use estimator::{identity_hash, qualified_class, Distribution, Estimator, ParamValue};
pub use extract::{deep_params, deep_params_with, standardize, CustomTypeHook};
pub use measures::{evaluation_measure, ScorerRef};
pub use model::{
    blank_node, Algorithm, EvaluationMeasure, HyperParameter, HyperParameterSetting,
    Implementation, ModelEvaluation, Run,
};
pub use session::Session;

/// Converts a trained model into an MLS JSON-LD document.
///
/// The whole conversion runs synchronously with no I/O; the returned string
/// is the complete document, ready for persistence.
///
/// # Errors
///
/// Any failure aborts the whole conversion — see [`ConvertError`] for the
/// taxonomy. No partial document is ever returned.
pub fn to_mls(
    model: &dyn Estimator,
    evaluation: Option<(&ScorerRef, f64)>,
) -> Result<String, ConvertError> {
    to_mls_with(model, evaluation, None)
}

/// Same as [`to_mls`] with a custom-type hook threaded through extraction.
///
/// The hook lets host bindings rewrite framework-specific values (random
/// states, component-choice objects, …) into plain structures before the
/// generic normalization rules apply.
///
/// # Errors
///
/// Same conditions as [`to_mls`].
pub fn to_mls_with(
    model: &dyn Estimator,
    evaluation: Option<(&ScorerRef, f64)>,
    hook: Option<CustomTypeHook<'_>>,
) -> Result<String, ConvertError> {
    let run = builder::build_run_with(model, evaluation, hook)?;
    serializer::jsonld::render(&run, &qualified_class(model))
}
