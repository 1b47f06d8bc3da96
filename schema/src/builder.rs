//! Run graph assembly.
//!
//! Builds the Run → Implementation → Algorithm / HyperParameter /
//! HyperParameterSetting / ModelEvaluation entity graph from an extracted
//! parameter tree. Entities are constructed bottom-up within one call;
//! nothing is shared across conversions except the unique-id generator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ConvertError;
use crate::estimator::{identity_hash, qualified_class, Estimator};
use crate::extract::{deep_params_with, CustomTypeHook};
use crate::measures::{evaluation_measure, ScorerRef};
use crate::model::{
    iris, Algorithm, HyperParameter, HyperParameterSetting, Implementation, Run,
};

/// Returns the next process-wide unique numeric value.
///
/// Seeded once from the wall clock and advanced atomically, so values are
/// time-ordered within a process and unlikely to collide across processes.
/// Safe to call from any thread without further coordination.
pub(crate) fn next_uid() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let seed = *SEED.get_or_init(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    });
    seed.wrapping_add(COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Returns `<prefix>.<uid>` with a freshly generated unique value.
#[must_use]
pub fn generate_unique_id(prefix: &str) -> String {
    format!("{prefix}.{}", next_uid())
}

/// Assembles the Run entity for `model`, optionally reporting one
/// evaluation result.
///
/// # Errors
///
/// - [`ConvertError::UnsupportedModelType`] when the model exposes no
///   usable class identity (empty module path or type name).
/// - [`ConvertError::UnsupportedValue`] when parameter extraction fails.
/// - [`ConvertError::UnsupportedEvaluationMeasure`] when an evaluation
///   tuple was supplied but its scorer is unrecognized.
pub fn build_run(
    model: &dyn Estimator,
    evaluation: Option<(&ScorerRef, f64)>,
) -> Result<Run, ConvertError> {
    build_run_with(model, evaluation, None)
}

/// Same as [`build_run`] with a custom-type hook threaded through
/// extraction.
///
/// # Errors
///
/// Same conditions as [`build_run`].
pub fn build_run_with(
    model: &dyn Estimator,
    evaluation: Option<(&ScorerRef, f64)>,
    hook: Option<CustomTypeHook<'_>>,
) -> Result<Run, ConvertError> {
    let module = model.module();
    let name = model.name();
    if module.trim().is_empty() || name.trim().is_empty() {
        return Err(ConvertError::UnsupportedModelType(format!(
            "{module}.{name}"
        )));
    }

    let model_class = qualified_class(model);
    let scope = identity_hash(model).to_string();
    let params = deep_params_with(model, hook)?;

    let algorithm = Algorithm::new(&model_class);

    let parameters: Vec<HyperParameter> = params
        .keys()
        .map(|key| HyperParameter::new(key.as_str(), &scope))
        .collect();

    let input_values: Vec<HyperParameterSetting> = params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let parameter = HyperParameter::new(key.as_str(), &scope);
            HyperParameterSetting::new(&parameter, value.clone(), &scope)
        })
        .collect();

    let output_values = match evaluation {
        Some((scorer, value)) => vec![evaluation_measure(scorer, value)?],
        None => Vec::new(),
    };

    let version = model.library_version();
    let implementation = Implementation {
        id: generate_unique_id(iris::MLS_IMPLEMENTATION),
        name: Some(name),
        parameters,
        implements: algorithm.clone(),
        version: Some(version.clone()),
    };

    Ok(Run {
        id: scope,
        executes: implementation,
        input_values,
        output_values,
        realizes: algorithm,
        version: Some(version),
        name: None,
    })
}
