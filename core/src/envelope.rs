//! Normalization of the two response envelopes the API produces.
//!
//! Older backends answer a collection query with a bare JSON array; newer
//! ones wrap it as `{"data": [...]}`. Anything else is `Unrecognized` and
//! normalizes to an empty result rather than an error.

use serde_json::Value;

use crate::types::Item;

/// The outer shape of a collection reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Sequence(Vec<Item>),
    Wrapped { data: Vec<Item> },
    Unrecognized,
}

impl Envelope {
    /// Classify a decoded response body.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(values) => Envelope::Sequence(collect_items(values)),
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(values)) => Envelope::Wrapped {
                    data: collect_items(values),
                },
                _ => Envelope::Unrecognized,
            },
            _ => Envelope::Unrecognized,
        }
    }

    /// Plain ordered sequence of items.
    pub fn into_items(self) -> Vec<Item> {
        match self {
            Envelope::Sequence(items) | Envelope::Wrapped { data: items } => items,
            Envelope::Unrecognized => {
                tracing::warn!("unrecognized response envelope, treating as empty");
                Vec::new()
            }
        }
    }

    /// First item, if any.
    pub fn into_first(self) -> Option<Item> {
        self.into_items().into_iter().next()
    }
}

impl From<Value> for Envelope {
    fn from(value: Value) -> Self {
        Envelope::from_value(value)
    }
}

fn collect_items(values: Vec<Value>) -> Vec<Item> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(fields) => Some(Item::new(fields)),
            other => {
                tracing::warn!(element = %other, "skipping non-object element in response");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(items: &[Item]) -> Vec<Option<i64>> {
        items.iter().map(Item::id).collect()
    }

    #[test]
    fn bare_array_is_sequence() {
        let envelope = Envelope::from_value(json!([{"id": 1, "slug": "a"}]));
        assert!(matches!(envelope, Envelope::Sequence(_)));
        let items = envelope.into_items();
        assert_eq!(serde_json::to_value(&items).unwrap(), json!([{"id": 1, "slug": "a"}]));
    }

    #[test]
    fn data_object_is_wrapped() {
        let envelope = Envelope::from_value(json!({"data": [{"id": 1}], "meta": {"pagination": {}}}));
        assert!(matches!(envelope, Envelope::Wrapped { .. }));
        assert_eq!(ids(&envelope.into_items()), vec![Some(1)]);
    }

    #[test]
    fn order_is_preserved() {
        let items = Envelope::from_value(json!({"data": [{"id": 3}, {"id": 1}, {"id": 2}]})).into_items();
        assert_eq!(ids(&items), vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn other_shapes_degrade_to_empty() {
        for body in [
            json!({"items": [{"id": 1}]}),
            json!({"data": {"id": 1}}),
            json!({"data": null}),
            json!("hello"),
            json!(12),
            Value::Null,
        ] {
            let envelope = Envelope::from_value(body.clone());
            assert_eq!(envelope, Envelope::Unrecognized, "{body}");
            assert!(envelope.into_items().is_empty(), "{body}");
        }
        assert!(Envelope::from_value(json!(true)).into_first().is_none());
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let items = Envelope::from_value(json!([{"id": 1}, 2, "x", null, {"id": 5}])).into_items();
        assert_eq!(ids(&items), vec![Some(1), Some(5)]);
    }

    #[test]
    fn first_of_empty_is_none() {
        assert!(Envelope::from_value(json!([])).into_first().is_none());
        assert!(Envelope::from_value(json!({"data": []})).into_first().is_none());
        let first = Envelope::from_value(json!({"data": [{"id": 9}, {"id": 10}]})).into_first();
        assert_eq!(first.and_then(|item| item.id()), Some(9));
    }
}
