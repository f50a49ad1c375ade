//! Hierarchical entity extraction decoder.
//!
//! The `extractors` payload is an object keyed by entity name whose values
//! are arrays of instances. An instance is either a nested object (a
//! composite entity, decoded recursively) or a string (the text of a leaf
//! entity). Span data travels separately under the reserved `$instance`
//! key, keyed by the same entity names and correlated by array index:
//!
//! ```json
//! {
//!     "name": ["Jane Doe"],
//!     "$instance": {
//!         "name": [{ "text": "Jane Doe", "startIndex": 14 }]
//!     }
//! }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::ExtractionInstance;

/// Key carrying verbose span data alongside the entity structure.
pub const VERBOSE_KEY: &str = "$instance";

/// Span record from the `$instance` side-channel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerboseRecord {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    start_index: Option<usize>,
}

/// Decodes an `extractors` payload into top-level extraction instances.
///
/// Entity names keep the order in which they appear in the payload and
/// instances keep their array order. Anything other than an object yields
/// no entities.
pub fn decode_entities(extractors: &Value) -> Vec<ExtractionInstance> {
    match extractors {
        Value::Object(entities) => decode_object(entities),
        _ => Vec::new(),
    }
}

fn decode_object(entities: &Map<String, Value>) -> Vec<ExtractionInstance> {
    // Nodes stay grouped per entity name until the span merge is done,
    // since `$instance` records are matched by index within a group.
    let mut groups: Vec<(&str, Vec<ExtractionInstance>)> = Vec::with_capacity(entities.len());

    for (name, value) in entities {
        if name == VERBOSE_KEY {
            continue;
        }

        let Value::Array(instances) = value else {
            continue;
        };

        let nodes = instances
            .iter()
            .filter_map(|instance| decode_instance(name, instance))
            .collect();
        groups.push((name.as_str(), nodes));
    }

    if let Some(Value::Object(verbose)) = entities.get(VERBOSE_KEY) {
        for (name, nodes) in &mut groups {
            if let Some(records) = verbose.get(*name) {
                merge_spans(nodes, records);
            }
        }
    }

    groups.into_iter().flat_map(|(_, nodes)| nodes).collect()
}

fn decode_instance(name: &str, instance: &Value) -> Option<ExtractionInstance> {
    match instance {
        Value::Object(nested) => Some(ExtractionInstance::composite(name, decode_object(nested))),
        Value::String(text) => Some(ExtractionInstance::leaf(name, text.as_str())),
        Value::Array(_) | Value::Number(_) | Value::Bool(_) | Value::Null => None,
    }
}

/// Overwrites each node's text and position with its span record.
///
/// The records are ignored unless they decode and pair up one-to-one with
/// the nodes.
fn merge_spans(nodes: &mut Vec<ExtractionInstance>, records: &Value) {
    let Ok(records) = Vec::<VerboseRecord>::deserialize(records) else {
        return;
    };

    if records.len() != nodes.len() {
        return;
    }

    *nodes = std::mem::take(nodes)
        .into_iter()
        .zip(records)
        .map(|(node, record)| {
            let text = record.text.or_else(|| node.text().map(str::to_owned));
            node.with_span(text, record.start_index)
        })
        .collect();
}
