//! Demonstrates converting a model into an MLS JSON-LD record.
//!
//! Run with: `cargo run --example dump_record -p mls-schema`

use std::collections::BTreeMap;

use mls_schema::{Estimator, ParamValue, ScorerRef};

struct Svc;

impl Estimator for Svc {
    fn module(&self) -> String {
        "sklearn.svm".to_owned()
    }
    fn name(&self) -> String {
        "SVC".to_owned()
    }
    fn params(&self) -> BTreeMap<String, ParamValue> {
        BTreeMap::from([
            ("C".to_owned(), ParamValue::Float(0.025)),
            ("kernel".to_owned(), ParamValue::from("linear")),
            ("class_weight".to_owned(), ParamValue::Null),
            ("degree".to_owned(), ParamValue::Int(3)),
        ])
    }
    fn library_version(&self) -> String {
        "1.3.0".to_owned()
    }
}

fn main() {
    let model = Svc;
    let scorer = ScorerRef::named("accuracy_score");
    match mls_schema::to_mls(&model, Some((&scorer, 0.87))) {
        Ok(document) => println!("{document}"),
        Err(e) => eprintln!("conversion failed: {e}"),
    }
}
