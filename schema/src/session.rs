//! Incremental run recording for host-framework callbacks.
//!
//! Deep-learning frameworks expose training lifecycle hooks (callback
//! interfaces); a hook only needs two operations — record a parameter,
//! record a metric — and a way to close the record. `Session` is that
//! surface: values accumulate during training and [`Session::finish`]
//! assembles and serializes the Run. The session itself performs no I/O;
//! the returned `(run_id, document)` pair is handed to the store.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::builder::{generate_unique_id, next_uid};
use crate::error::ConvertError;
use crate::estimator::ParamValue;
use crate::extract::convert_value;
use crate::model::{
    iris, Algorithm, EvaluationMeasure, HyperParameter, HyperParameterSetting, Implementation,
    ModelEvaluation, Run,
};
use crate::serializer::jsonld;

/// An incremental Run builder scoped to one training execution.
#[derive(Debug)]
pub struct Session {
    name: String,
    run_id: String,
    params: BTreeMap<String, Value>,
    metrics: Vec<ModelEvaluation>,
}

impl Session {
    /// Opens a session realizing the algorithm named `name`, with a
    /// freshly generated run id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Session::with_run_id(name, next_uid().to_string())
    }

    /// Opens a session with a caller-supplied run id.
    #[must_use]
    pub fn with_run_id(name: impl Into<String>, run_id: impl Into<String>) -> Self {
        Session {
            name: name.into(),
            run_id: run_id.into(),
            params: BTreeMap::new(),
            metrics: Vec::new(),
        }
    }

    /// The identifier of the Run this session assembles.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Records one hyperparameter. Recording the same name again replaces
    /// the earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedValue`] if the value cannot be
    /// made JSON-safe; the session is unchanged in that case.
    pub fn param(
        &mut self,
        name: impl Into<String>,
        value: ParamValue,
    ) -> Result<(), ConvertError> {
        let converted = convert_value(value, &self.name, None)?;
        self.params.insert(name.into(), converted);
        Ok(())
    }

    /// Records a batch of hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedValue`] on the first value that
    /// cannot be made JSON-safe; earlier values in the batch stay recorded.
    pub fn params(
        &mut self,
        values: impl IntoIterator<Item = (String, ParamValue)>,
    ) -> Result<(), ConvertError> {
        for (name, value) in values {
            self.param(name, value)?;
        }
        Ok(())
    }

    /// Records one metric value, specified by the measure `mls#<name>`.
    pub fn metric(&mut self, name: &str, value: f64) {
        self.metrics.push(ModelEvaluation {
            id: generate_unique_id(iris::MLS_MODEL_EVALUATION),
            value: Value::from(value),
            specified_by: EvaluationMeasure {
                id: format!("{}{name}", iris::MLS),
            },
        });
    }

    /// Assembles and serializes the Run, consuming the session.
    ///
    /// Returns the run id and the JSON-LD document, ready to hand to the
    /// metadata store.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedValue`] if the assembled graph
    /// fails to serialize.
    pub fn finish(self) -> Result<(String, String), ConvertError> {
        let algorithm = Algorithm::new(&self.name);

        let parameters: Vec<HyperParameter> = self
            .params
            .keys()
            .map(|key| HyperParameter::new(key.as_str(), &self.run_id))
            .collect();

        let input_values: Vec<HyperParameterSetting> = self
            .params
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| {
                let parameter = HyperParameter::new(key.as_str(), &self.run_id);
                HyperParameterSetting::new(&parameter, value.clone(), &self.run_id)
            })
            .collect();

        let run = Run {
            id: self.run_id.clone(),
            executes: Implementation {
                id: generate_unique_id(iris::MLS_IMPLEMENTATION),
                name: None,
                parameters,
                implements: algorithm.clone(),
                version: None,
            },
            input_values,
            output_values: self.metrics,
            realizes: algorithm,
            version: None,
            name: None,
        };

        let document = jsonld::render(&run, &self.name)?;
        Ok((self.run_id, document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_params_and_metrics_land_in_the_run() {
        let mut session = Session::new("NeuralNetwork");
        session.param("num_layers", ParamValue::Int(3)).unwrap();
        session
            .param("learning_rate", ParamValue::Float(0.001))
            .unwrap();
        session.metric("accuracy", 0.93);

        let (run_id, document) = session.finish().unwrap();
        let doc: Value = serde_json::from_str(&document).unwrap();
        assert_eq!(doc["@id"], Value::String(run_id));
        assert_eq!(doc["mls:hasInput"].as_array().unwrap().len(), 2);
        let outputs = doc["mls:hasOutput"].as_array().unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(
            outputs[0]["mls:specifiedBy"]["@id"],
            serde_json::json!("http://www.w3.org/ns/mls#accuracy")
        );
    }

    #[test]
    fn last_write_wins_per_parameter_name() {
        let mut session = Session::new("NeuralNetwork");
        session.param("epsilon", ParamValue::Float(1e-7)).unwrap();
        session.param("epsilon", ParamValue::Float(1e-8)).unwrap();
        let (_, document) = session.finish().unwrap();
        let doc: Value = serde_json::from_str(&document).unwrap();
        assert_eq!(doc["mls:hasInput"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn null_params_declare_a_slot_but_no_setting() {
        let mut session = Session::new("NeuralNetwork");
        session.param("baseline", ParamValue::Null).unwrap();
        session.param("patience", ParamValue::Int(5)).unwrap();
        let (_, document) = session.finish().unwrap();
        let doc: Value = serde_json::from_str(&document).unwrap();
        let declared = doc["mls:executes"]["mls:hasHyperParameter"]
            .as_array()
            .unwrap();
        assert_eq!(declared.len(), 2);
        assert_eq!(doc["mls:hasInput"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn unconvertible_value_is_rejected_up_front() {
        let mut session = Session::new("NeuralNetwork");
        assert!(session
            .param("writer", ParamValue::Opaque("SummaryWriter".to_owned()))
            .is_err());
    }

    #[test]
    fn generated_run_ids_differ_between_sessions() {
        let a = Session::new("x");
        let b = Session::new("x");
        assert_ne!(a.run_id(), b.run_id());
    }
}
