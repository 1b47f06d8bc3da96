//! Evaluation measure mapping.
//!
//! Dispatches a scoring function's qualified name against the closed MLS
//! measure vocabulary. The set is deliberately small: a scorer outside it
//! (or one with no resolvable name) aborts the conversion rather than
//! being recorded under a made-up measure.

use serde_json::Value;

use crate::builder::generate_unique_id;
use crate::error::ConvertError;
use crate::model::{iris, EvaluationMeasure, ModelEvaluation};

/// A reference to the scoring function that produced an evaluation value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerRef {
    qualified_name: Option<String>,
}

impl ScorerRef {
    /// A scorer known by its qualified name (e.g. `"accuracy_score"`).
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        ScorerRef {
            qualified_name: Some(name.into()),
        }
    }

    /// A scorer whose qualified name could not be resolved. Always rejected
    /// by the mapper; never silently mapped to a default measure.
    #[must_use]
    pub fn anonymous() -> Self {
        ScorerRef {
            qualified_name: None,
        }
    }

    /// The qualified name, if one was resolved.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }
}

/// Maps a scorer and its computed value to a [`ModelEvaluation`] bound to
/// the canonical [`EvaluationMeasure`].
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedEvaluationMeasure`] when the scorer's
/// qualified name is missing or outside the recognized set.
pub fn evaluation_measure(
    scorer: &ScorerRef,
    value: f64,
) -> Result<ModelEvaluation, ConvertError> {
    let name = scorer.qualified_name().ok_or_else(|| {
        ConvertError::UnsupportedEvaluationMeasure("<unresolved qualified name>".to_owned())
    })?;
    let measure = match name {
        "accuracy_score" => iris::MLS_ACCURACY,
        "roc_auc_score" => iris::MLS_AUROC,
        "f1_score" => iris::MLS_F1,
        other => {
            return Err(ConvertError::UnsupportedEvaluationMeasure(other.to_owned()));
        }
    };
    Ok(ModelEvaluation {
        id: generate_unique_id(iris::MLS_MODEL_EVALUATION),
        value: Value::from(value),
        specified_by: EvaluationMeasure {
            id: measure.to_owned(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_maps_to_the_accuracy_measure() {
        let eval = evaluation_measure(&ScorerRef::named("accuracy_score"), 0.87).unwrap();
        assert_eq!(eval.specified_by.id, iris::MLS_ACCURACY);
        assert_eq!(eval.value, serde_json::json!(0.87));
    }

    #[test]
    fn auroc_and_f1_map_to_their_measures() {
        let auroc = evaluation_measure(&ScorerRef::named("roc_auc_score"), 0.5).unwrap();
        assert_eq!(auroc.specified_by.id, iris::MLS_AUROC);
        let f1 = evaluation_measure(&ScorerRef::named("f1_score"), 0.5).unwrap();
        assert_eq!(f1.specified_by.id, iris::MLS_F1);
    }

    #[test]
    fn unknown_scorer_is_rejected() {
        let err = evaluation_measure(&ScorerRef::named("log_loss"), 0.1).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedEvaluationMeasure(name) if name == "log_loss"
        ));
    }

    #[test]
    fn anonymous_scorer_is_rejected_not_defaulted() {
        assert!(evaluation_measure(&ScorerRef::anonymous(), 0.9).is_err());
    }

    #[test]
    fn evaluations_get_fresh_identifiers() {
        let a = evaluation_measure(&ScorerRef::named("f1_score"), 0.1).unwrap();
        let b = evaluation_measure(&ScorerRef::named("f1_score"), 0.1).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with(iris::MLS_MODEL_EVALUATION));
    }
}
