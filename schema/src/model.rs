//! MLS entity model types.
//!
//! These types represent one provenance record — a Run and the entities it
//! references — as typed Rust data. All instances are built bottom-up
//! (`HyperParameter`/`HyperParameterSetting` before `Implementation`,
//! `Implementation` before `Run`) during a single conversion call and are
//! immutable afterwards. The JSON-LD rendering lives in
//! [`crate::serializer::jsonld`]; the `Serialize` derives here give
//! consumers a plain-JSON debug view only.

use serde::Serialize;
use serde_json::Value;

/// An abstract ML method, identified by the fully-qualified class name of
/// the model type. Multiple Runs may re-declare the same Algorithm; records
/// are self-contained and never deduplicated across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Algorithm {
    /// Identifier (URI or blank-node reference).
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl Algorithm {
    /// Builds an Algorithm whose label equals its identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let label = id.clone();
        Algorithm { id, label }
    }
}

/// A named, typed hyperparameter slot. Owns no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HyperParameter {
    /// Identifier, derived from the parameter name and the owning model's
    /// identity scope so repeated settings for the same model collide to
    /// the same node.
    pub id: String,
    /// The parameter name.
    pub label: String,
}

impl HyperParameter {
    /// Builds a HyperParameter scoped to one model instance.
    #[must_use]
    pub fn new(label: impl Into<String>, scope: &str) -> Self {
        let label = label.into();
        let id = format!("{}.{label}.{scope}", iris::MLS_HYPER_PARAMETER);
        HyperParameter { id, label }
    }
}

/// A concrete value bound to a [`HyperParameter`] for one Run. Created only
/// for parameters whose value is non-null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperParameterSetting {
    /// Identifier, derived from the parameter label and the same identity
    /// scope as the HyperParameter it specifies.
    pub id: String,
    /// JSON-safe scalar or nested structure.
    pub value: Value,
    /// Identifier of the HyperParameter this setting specifies.
    pub specified_by: String,
}

impl HyperParameterSetting {
    /// Builds a setting pointing at `parameter` within the same scope.
    #[must_use]
    pub fn new(parameter: &HyperParameter, value: Value, scope: &str) -> Self {
        let id = format!(
            "{}.{}.{scope}",
            iris::MLS_HYPER_PARAMETER_SETTING,
            parameter.label
        );
        HyperParameterSetting {
            id,
            value,
            specified_by: parameter.id.clone(),
        }
    }
}

/// A named metric definition from the closed evaluation vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationMeasure {
    /// Fixed measure URI (e.g. `mls:accuracy`).
    pub id: String,
}

/// One scored result reported by a Run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEvaluation {
    /// Freshly generated unique identifier.
    pub id: String,
    /// Numeric or structured value.
    pub value: Value,
    /// The measure this evaluation reports.
    pub specified_by: EvaluationMeasure,
}

/// A concrete realization of an [`Algorithm`] by a specific library version.
/// Owns its hyperparameter list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Implementation {
    /// Freshly generated unique identifier.
    pub id: String,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// All hyperparameter slots, one per parameter name regardless of
    /// value nullity.
    pub parameters: Vec<HyperParameter>,
    /// The abstract method this implementation realizes.
    pub implements: Algorithm,
    /// Library version string.
    pub version: Option<String>,
}

/// The top-level provenance record for one conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// The model's runtime identity hash, or a freshly generated id for
    /// session-based usage.
    pub id: String,
    /// The implementation executed.
    pub executes: Implementation,
    /// One setting per non-null hyperparameter.
    pub input_values: Vec<HyperParameterSetting>,
    /// Evaluation results; empty when no evaluation tuple was supplied.
    pub output_values: Vec<ModelEvaluation>,
    /// The abstract method realized by this run.
    pub realizes: Algorithm,
    /// Optional version.
    pub version: Option<String>,
    /// Optional name.
    pub name: Option<String>,
}

/// Formats a locally-scoped blank-node reference (`_:<id>`).
///
/// Entity identifiers in a record may be URIs or blank-node references;
/// converters for libraries without a public class vocabulary use the
/// blank-node form for Algorithm/HyperParameter identifiers.
#[must_use]
pub fn blank_node(id: &str) -> String {
    format!("_:{id}")
}

/// Standard IRI constants of the vocabularies used in MLS documents.
pub mod iris {
    /// ML Schema namespace.
    pub const MLS: &str = "http://www.w3.org/ns/mls#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// Dublin Core terms namespace.
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// The `mls:accuracy` evaluation measure.
    pub const MLS_ACCURACY: &str = "http://www.w3.org/ns/mls#accuracy";
    /// The `mls:auROC` evaluation measure.
    pub const MLS_AUROC: &str = "http://www.w3.org/ns/mls#auROC";
    /// The `mls:F1` evaluation measure.
    pub const MLS_F1: &str = "http://www.w3.org/ns/mls#F1";

    /// Namespace prefix for generated Implementation identifiers.
    pub const MLS_IMPLEMENTATION: &str = "http://www.w3.org/ns/mls#Implementation";
    /// Namespace prefix for generated ModelEvaluation identifiers.
    pub const MLS_MODEL_EVALUATION: &str = "http://www.w3.org/ns/mls#ModelEvaluation";
    /// Namespace prefix for HyperParameter identifiers.
    pub const MLS_HYPER_PARAMETER: &str = "http://www.w3.org/ns/mls#HyperParameter";
    /// Namespace prefix for HyperParameterSetting identifiers.
    pub const MLS_HYPER_PARAMETER_SETTING: &str =
        "http://www.w3.org/ns/mls#HyperParameterSetting";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hyper_parameter_id_is_scoped() {
        let hp = HyperParameter::new("C", "12345");
        assert_eq!(hp.id, "http://www.w3.org/ns/mls#HyperParameter.C.12345");
        assert_eq!(hp.label, "C");
    }

    #[test]
    fn setting_references_its_parameter() {
        let hp = HyperParameter::new("kernel", "99");
        let setting = HyperParameterSetting::new(&hp, json!("linear"), "99");
        assert_eq!(
            setting.id,
            "http://www.w3.org/ns/mls#HyperParameterSetting.kernel.99"
        );
        assert_eq!(setting.specified_by, hp.id);
    }

    #[test]
    fn same_scope_and_name_collide_to_the_same_node() {
        let a = HyperParameter::new("alpha", "7");
        let b = HyperParameter::new("alpha", "7");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn algorithm_label_mirrors_id() {
        let algo = Algorithm::new("sklearn.svm.SVC");
        assert_eq!(algo.id, algo.label);
    }

    #[test]
    fn blank_nodes_are_locally_scoped_references() {
        assert_eq!(blank_node("automl"), "_:automl");
    }
}
