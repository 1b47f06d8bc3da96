//! JSON-LD serializer for MLS Run graphs.
//!
//! Produces a single compact JSON-LD document: the `@context` with the
//! `mls`/`xsd`/`dcterms`/`rdfs` prefixes and the Run as root node. Each
//! entity type maps to one RDF type in the MLS namespace. Setting values —
//! and only setting values — carry an explicit XSD literal datatype.

use serde_json::{json, Map, Value};

use crate::model::{
    iris, Algorithm, HyperParameter, HyperParameterSetting, Implementation, ModelEvaluation, Run,
};

/// Serializes a Run to a compact JSON-LD `Value`.
///
/// The returned value can be pretty-printed with
/// [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(run: &Run) -> Value {
    let mut doc = Map::new();
    doc.insert("@context".to_owned(), build_context());
    if let Value::Object(node) = run_to_json(run) {
        doc.extend(node);
    }
    Value::Object(doc)
}

/// Renders `run` to the final UTF-8 document text. `owner` names the model
/// (or algorithm) under conversion for error attribution.
pub(crate) fn render(run: &Run, owner: &str) -> Result<String, crate::error::ConvertError> {
    serde_json::to_string_pretty(&to_json_ld(run)).map_err(|e| {
        crate::error::ConvertError::UnsupportedValue {
            model_type: owner.to_owned(),
            cause: e.to_string(),
        }
    })
}

fn build_context() -> Value {
    let mut ctx = Map::new();
    ctx.insert("mls".to_owned(), json!(iris::MLS));
    ctx.insert("xsd".to_owned(), json!(iris::XSD));
    ctx.insert("dcterms".to_owned(), json!(iris::DCTERMS));
    ctx.insert("rdfs".to_owned(), json!(iris::RDFS));
    Value::Object(ctx)
}

fn run_to_json(run: &Run) -> Value {
    // Input values are a flattened collection: every setting inlined as a
    // complete node. Outputs and the parameter list stay nested under
    // their owning entity.
    let input_values: Vec<Value> = run.input_values.iter().map(setting_to_json).collect();
    let output_values: Vec<Value> = run.output_values.iter().map(evaluation_to_json).collect();

    let mut node = json!({
        "@id": run.id,
        "@type": "mls:Run",
        "mls:executes": implementation_to_json(&run.executes),
        "mls:hasInput": input_values,
        "mls:hasOutput": output_values,
        "mls:realizes": algorithm_to_json(&run.realizes),
    });
    if let Some(version) = &run.version {
        node["dcterms:hasVersion"] = json!(version);
    }
    if let Some(name) = &run.name {
        node["dcterms:title"] = json!(name);
    }
    node
}

fn implementation_to_json(implementation: &Implementation) -> Value {
    let parameters: Vec<Value> = implementation
        .parameters
        .iter()
        .map(hyper_parameter_to_json)
        .collect();

    let mut node = json!({
        "@id": implementation.id,
        "@type": "mls:Implementation",
        "mls:hasHyperParameter": parameters,
        "mls:implements": algorithm_to_json(&implementation.implements),
    });
    if let Some(name) = &implementation.name {
        node["dcterms:title"] = json!(name);
    }
    if let Some(version) = &implementation.version {
        node["dcterms:hasVersion"] = json!(version);
    }
    node
}

fn algorithm_to_json(algorithm: &Algorithm) -> Value {
    json!({
        "@id": algorithm.id,
        "@type": "mls:Algorithm",
        "rdfs:label": algorithm.label,
    })
}

fn hyper_parameter_to_json(parameter: &HyperParameter) -> Value {
    json!({
        "@id": parameter.id,
        "@type": "mls:HyperParameter",
        "rdfs:label": parameter.label,
    })
}

fn setting_to_json(setting: &HyperParameterSetting) -> Value {
    json!({
        "@id": setting.id,
        "@type": "mls:HyperParameterSetting",
        "mls:hasValue": typed_value(&setting.value),
        // Reduced to a reference; the full node lives in the owning
        // Implementation's parameter list.
        "mls:specifiedBy": { "@id": setting.specified_by },
    })
}

fn evaluation_to_json(evaluation: &ModelEvaluation) -> Value {
    json!({
        "@id": evaluation.id,
        "@type": "mls:ModelEvaluation",
        "mls:hasValue": evaluation.value,
        "mls:specifiedBy": {
            "@id": evaluation.specified_by.id,
            "@type": "mls:EvaluationMeasure",
        },
    })
}

/// Wraps a setting value with its XSD literal datatype. Structured values
/// (nested `{"@value": {"type", "params"}}` tags included) are treated as
/// opaque references and pass through under `xsd:anyURI` verbatim.
fn typed_value(value: &Value) -> Value {
    let xsd_type = match value {
        Value::Bool(_) => "xsd:boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "xsd:int",
        Value::Number(_) => "xsd:float",
        Value::String(_) => "xsd:string",
        _ => "xsd:anyURI",
    };
    json!({ "@type": xsd_type, "@value": value })
}
