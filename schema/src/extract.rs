//! Deep parameter extraction.
//!
//! Walks a model's parameter mapping into a JSON-safe tree. Sequences and
//! mappings are recursed before any leaf handling; leaves pass through the
//! optional custom-type hook, then the value normalizer, then sub-model
//! detection. A nested estimator becomes a tagged
//! `{"@value": {"type": "<module>.<Type>", "params": {…}}}` node, one level
//! per nesting depth. A leaf that is neither a sub-model nor representable
//! as JSON defeats the whole conversion — there is no silent coercion and
//! no partial output.

use serde_json::{json, Map, Value};

use crate::error::ConvertError;
use crate::estimator::{qualified_class, Distribution, Estimator, ParamValue};

/// Hook applied to each leaf before the generic normalization rules.
///
/// Lets host bindings rewrite framework-specific values (random states,
/// component-choice objects, …) into plain structures. Must be idempotent
/// and must pass through values it does not recognize.
pub type CustomTypeHook<'a> = &'a dyn Fn(ParamValue) -> ParamValue;

/// Extracts the JSON-safe parameter tree of `model`.
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedValue`] if any reachable leaf is
/// neither a nested estimator nor representable as JSON. The error names
/// `model` itself, not the nested value's owner.
pub fn deep_params(model: &dyn Estimator) -> Result<Map<String, Value>, ConvertError> {
    deep_params_with(model, None)
}

/// Extracts the parameter tree of `model`, applying `hook` to every leaf.
///
/// # Errors
///
/// Same conditions as [`deep_params`].
pub fn deep_params_with(
    model: &dyn Estimator,
    hook: Option<CustomTypeHook<'_>>,
) -> Result<Map<String, Value>, ConvertError> {
    let owner = qualified_class(model);
    model_params(model, &owner, hook)
}

/// Converts one value into its JSON-safe form, in the context of the
/// top-level model named by `owner`.
///
/// # Errors
///
/// Returns [`ConvertError::UnsupportedValue`] for opaque leaves.
pub fn convert_value(
    value: ParamValue,
    owner: &str,
    hook: Option<CustomTypeHook<'_>>,
) -> Result<Value, ConvertError> {
    match value {
        // Sequences and mappings recurse before any leaf handling.
        ParamValue::List(items) => {
            let items = items
                .into_iter()
                .map(|v| convert_value(v, owner, hook))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(items))
        }
        ParamValue::Map(entries) => {
            let mut out = Map::new();
            for (key, v) in entries {
                out.insert(key, convert_value(v, owner, hook)?);
            }
            Ok(Value::Object(out))
        }
        leaf => {
            let leaf = match hook {
                Some(h) => h(leaf),
                None => leaf,
            };
            match standardize(leaf) {
                // Normalized arrays and distributions come back as plain
                // sequences or mappings; re-enter for their elements.
                v @ (ParamValue::List(_) | ParamValue::Map(_)) => convert_value(v, owner, hook),
                ParamValue::Estimator(inner) => {
                    let params = model_params(inner.as_ref(), owner, hook)?;
                    Ok(json!({
                        "@value": {
                            "type": qualified_class(inner.as_ref()),
                            "params": Value::Object(params),
                        }
                    }))
                }
                ParamValue::Null => Ok(Value::Null),
                ParamValue::Bool(b) => Ok(Value::Bool(b)),
                ParamValue::Int(i) => Ok(Value::from(i)),
                // standardize leaves only finite floats behind.
                ParamValue::Float(f) => Ok(Value::from(f)),
                ParamValue::Str(s) | ParamValue::Callable(s) => Ok(Value::String(s)),
                // standardize never returns these; the match stays total.
                ParamValue::Array(xs) => convert_value(normalized_array(xs), owner, hook),
                ParamValue::Distribution(d) => {
                    convert_value(distribution_record(d), owner, hook)
                }
                ParamValue::Opaque(type_name) => Err(ConvertError::UnsupportedValue {
                    model_type: owner.to_owned(),
                    cause: format!("value of type {type_name} is not JSON-serializable"),
                }),
            }
        }
    }
}

fn model_params(
    model: &dyn Estimator,
    owner: &str,
    hook: Option<CustomTypeHook<'_>>,
) -> Result<Map<String, Value>, ConvertError> {
    let mut out = Map::new();
    for (key, value) in model.params() {
        out.insert(key, convert_value(value, owner, hook)?);
    }
    Ok(out)
}

/// Normalizes a single value into a JSON-encodable form.
///
/// Rules, in order: numeric array-likes become ordered lists of normalized
/// scalars; NaN and ±infinity become their string representations (JSON has
/// no NaN/Infinity literal); frozen distributions become
/// `{dist_name, args, kwds}` records; callables keep only their display
/// form. Everything else passes through unchanged. Pure and idempotent.
#[must_use]
pub fn standardize(value: ParamValue) -> ParamValue {
    match value {
        ParamValue::Array(xs) => normalized_array(xs),
        ParamValue::Float(f) => normalize_float(f),
        ParamValue::Distribution(d) => distribution_record(d),
        ParamValue::Callable(repr) => ParamValue::Str(repr),
        other => other,
    }
}

fn normalize_float(f: f64) -> ParamValue {
    if f.is_nan() {
        ParamValue::Str("nan".to_owned())
    } else if f.is_infinite() {
        let repr = if f > 0.0 { "inf" } else { "-inf" };
        ParamValue::Str(repr.to_owned())
    } else {
        ParamValue::Float(f)
    }
}

fn normalized_array(xs: Vec<f64>) -> ParamValue {
    ParamValue::List(xs.into_iter().map(normalize_float).collect())
}

fn distribution_record(d: Distribution) -> ParamValue {
    let mut record = std::collections::BTreeMap::new();
    record.insert("dist_name".to_owned(), ParamValue::Str(d.name));
    record.insert("args".to_owned(), ParamValue::List(d.args));
    record.insert("kwds".to_owned(), ParamValue::Map(d.kwds));
    ParamValue::Map(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    struct Inner;

    impl Estimator for Inner {
        fn module(&self) -> String {
            "sklearn.feature_selection".to_owned()
        }
        fn name(&self) -> String {
            "SelectKBest".to_owned()
        }
        fn params(&self) -> BTreeMap<String, ParamValue> {
            BTreeMap::from([("k".to_owned(), ParamValue::Int(1))])
        }
        fn library_version(&self) -> String {
            "1.3.0".to_owned()
        }
    }

    struct Outer {
        leak: Option<ParamValue>,
    }

    impl Estimator for Outer {
        fn module(&self) -> String {
            "sklearn.pipeline".to_owned()
        }
        fn name(&self) -> String {
            "Pipeline".to_owned()
        }
        fn params(&self) -> BTreeMap<String, ParamValue> {
            let mut params = BTreeMap::from([
                ("estimator".to_owned(), ParamValue::Estimator(Arc::new(Inner))),
                ("memory".to_owned(), ParamValue::Null),
            ]);
            if let Some(leak) = &self.leak {
                params.insert("handle".to_owned(), leak.clone());
            }
            params
        }
        fn library_version(&self) -> String {
            "1.3.0".to_owned()
        }
    }

    #[test]
    fn nan_and_infinity_become_strings() {
        assert!(matches!(
            standardize(ParamValue::Float(f64::NAN)),
            ParamValue::Str(s) if s == "nan"
        ));
        assert!(matches!(
            standardize(ParamValue::Float(f64::INFINITY)),
            ParamValue::Str(s) if s == "inf"
        ));
        assert!(matches!(
            standardize(ParamValue::Float(f64::NEG_INFINITY)),
            ParamValue::Str(s) if s == "-inf"
        ));
        assert!(matches!(
            standardize(ParamValue::Float(0.5)),
            ParamValue::Float(f) if (f - 0.5).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn arrays_become_lists_of_normalized_scalars() {
        let out = convert_value(
            ParamValue::Array(vec![1.0, f64::NAN, f64::NEG_INFINITY]),
            "t",
            None,
        )
        .unwrap();
        assert_eq!(out, serde_json::json!([1.0, "nan", "-inf"]));
    }

    #[test]
    fn distributions_become_records() {
        let dist = Distribution {
            name: "uniform".to_owned(),
            args: vec![ParamValue::Float(0.0), ParamValue::Float(4.0)],
            kwds: BTreeMap::new(),
        };
        let out = convert_value(ParamValue::Distribution(dist), "t", None).unwrap();
        assert_eq!(
            out,
            serde_json::json!({"dist_name": "uniform", "args": [0.0, 4.0], "kwds": {}})
        );
    }

    #[test]
    fn callables_keep_their_display_form() {
        let out = convert_value(
            ParamValue::Callable("<function f_regression>".to_owned()),
            "t",
            None,
        )
        .unwrap();
        assert_eq!(out, serde_json::json!("<function f_regression>"));
    }

    #[test]
    fn nested_estimator_is_tagged_one_level_per_depth() {
        let model = Outer { leak: None };
        let params = deep_params(&model).unwrap();
        assert_eq!(
            params["estimator"],
            serde_json::json!({
                "@value": {
                    "type": "sklearn.feature_selection.SelectKBest",
                    "params": {"k": 1}
                }
            })
        );
        assert!(params["memory"].is_null());
    }

    #[test]
    fn opaque_leaf_fails_naming_the_top_level_model() {
        let model = Outer {
            leak: Some(ParamValue::Opaque("BufferedReader".to_owned())),
        };
        let err = deep_params(&model).unwrap_err();
        match err {
            ConvertError::UnsupportedValue { model_type, cause } => {
                assert_eq!(model_type, "sklearn.pipeline.Pipeline");
                assert!(cause.contains("BufferedReader"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn opaque_inside_nested_estimator_still_names_the_outer_model() {
        struct Leaky;
        impl Estimator for Leaky {
            fn module(&self) -> String {
                "sklearn.svm".to_owned()
            }
            fn name(&self) -> String {
                "SVC".to_owned()
            }
            fn params(&self) -> BTreeMap<String, ParamValue> {
                BTreeMap::from([(
                    "state".to_owned(),
                    ParamValue::Opaque("RandomState".to_owned()),
                )])
            }
            fn library_version(&self) -> String {
                "1.3.0".to_owned()
            }
        }

        let err = convert_value(
            ParamValue::Estimator(Arc::new(Leaky)),
            "sklearn.pipeline.Pipeline",
            None,
        )
        .unwrap_err();
        match err {
            ConvertError::UnsupportedValue { model_type, .. } => {
                assert_eq!(model_type, "sklearn.pipeline.Pipeline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_hook_rewrites_before_the_generic_rules() {
        let hook = |v: ParamValue| match v {
            ParamValue::Opaque(t) if t == "RandomState" => {
                ParamValue::Map(BTreeMap::from([("seed".to_owned(), ParamValue::Int(0))]))
            }
            other => other,
        };
        let out = convert_value(
            ParamValue::Opaque("RandomState".to_owned()),
            "t",
            Some(&hook),
        )
        .unwrap();
        assert_eq!(out, serde_json::json!({"seed": 0}));

        // Unrecognized values pass through unchanged and still fail.
        assert!(convert_value(
            ParamValue::Opaque("BufferedReader".to_owned()),
            "t",
            Some(&hook),
        )
        .is_err());
    }

    #[test]
    fn sequences_recurse_before_leaf_handling() {
        let value = ParamValue::List(vec![
            ParamValue::Estimator(Arc::new(Inner)),
            ParamValue::Int(3),
        ]);
        let out = convert_value(value, "t", None).unwrap();
        let arr = out.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert!(arr[0].get("@value").is_some());
        assert_eq!(arr[1], serde_json::json!(3));
    }
}
