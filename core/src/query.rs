//! Query parameters for content API requests.
//!
//! # Design
//! Parameters are an insertion-ordered list of `(name, ParamValue)` pairs.
//! The value kind is chosen at the call site: scalars convert through
//! `From`, structured values go through `ParamValue::json` and travel as
//! their JSON text. Setting a key again replaces the value in place, so a
//! default keeps its position when a caller overrides it. Setting a key to
//! `None` leaves an unset marker that is never sent; merged as an override
//! it masks the default underneath.

use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::{ApiError, Result};

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Number(Number),
    Bool(bool),
    /// A structured value, already encoded as JSON text.
    Json(String),
}

impl ParamValue {
    /// Encode any serializable value as a `Json` parameter.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_string(value)
            .map(ParamValue::Json)
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }

    /// Convert a decoded JSON value. `null` maps to `None` (the parameter is
    /// omitted); arrays and objects become `Json`.
    pub fn from_json_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(ParamValue::Bool(b)),
            Value::Number(n) => Some(ParamValue::Number(n)),
            Value::String(s) => Some(ParamValue::String(s)),
            structured @ (Value::Array(_) | Value::Object(_)) => {
                Some(ParamValue::Json(structured.to_string()))
            }
        }
    }
}

/// Renders the value exactly as it appears on the wire (before URL encoding).
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) | ParamValue::Json(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

/// Sort direction for `_sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A `_sort` value such as `date:DESC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        write!(f, "{}:{order}", self.field)
    }
}

impl From<Sort> for ParamValue {
    fn from(value: Sort) -> Self {
        ParamValue::String(value.to_string())
    }
}

pub const SORT: &str = "_sort";
pub const LIMIT: &str = "_limit";
pub const START: &str = "_start";

/// Ordered query parameters.
///
/// An entry holding `None` is an explicit "unset": it is never sent, but
/// when merged as an override it masks the value underneath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, Option<ParamValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `set`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder form of `set_opt`.
    pub fn with_opt<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.set_opt(key, value);
        self
    }

    /// Set `key`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.put(key.into(), Some(value.into()));
    }

    /// Set `key` when `value` is present; mark it unset when absent.
    pub fn set_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        self.put(key.into(), value.map(Into::into));
    }

    /// Mark `key` unset.
    pub fn unset(&mut self, key: impl Into<String>) {
        self.put(key.into(), None);
    }

    fn put(&mut self, key: String, value: Option<ParamValue>) {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Forget `key` entirely, returning its value if one was set.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        self.pairs.remove(index).1
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Apply `overrides` on top of `self`. On a key collision the override
    /// wins, including an unset override.
    pub fn merge(mut self, overrides: QueryParams) -> Self {
        for (key, value) in overrides.pairs {
            self.put(key, value);
        }
        self
    }

    /// Build parameters from a JSON object; `null` members become unset
    /// entries. Anything other than an object yields no parameters.
    pub fn from_json_object(value: Value) -> Self {
        let mut params = Self::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                params.set_opt(key, ParamValue::from_json_value(value));
            }
        }
        params
    }

    /// Present entries in insertion order. Unset entries are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.pairs
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Number of present entries.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_replaces_in_place() {
        let mut params = QueryParams::new().with("_sort", "date:DESC").with("_limit", 5);
        params.set("_sort", "title:ASC");
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["_sort", "_limit"]);
        assert_eq!(params.get("_sort"), Some(&ParamValue::from("title:ASC")));
    }

    #[test]
    fn absent_values_are_never_sent() {
        let params = QueryParams::new()
            .with_opt("slug", None::<&str>)
            .with("_limit", 1)
            .with_opt("category", Some("culture"));
        assert_eq!(params.len(), 2);
        assert!(params.get("slug").is_none());
    }

    #[test]
    fn absent_override_masks_default() {
        let defaults = QueryParams::new().with(SORT, Sort::desc("date")).with(LIMIT, 10);
        let overrides = QueryParams::new().with_opt(SORT, None::<Sort>);
        let merged = defaults.merge(overrides);
        assert!(merged.get(SORT).is_none());
        assert_eq!(merged.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![LIMIT]);
    }

    #[test]
    fn remove_forgets_the_key() {
        let mut params = QueryParams::new().with(START, 20);
        assert_eq!(params.remove(START), Some(ParamValue::from(20)));
        assert!(params.remove(START).is_none());
        params.unset(START);
        assert!(params.remove(START).is_none());
        assert!(params.is_empty());
    }

    #[test]
    fn merge_override_wins() {
        let defaults = QueryParams::new().with(SORT, Sort::desc("date"));
        let overrides = QueryParams::new().with(SORT, Sort::asc("title")).with("_limit", 10);
        let merged = defaults.merge(overrides);
        assert_eq!(merged.get(SORT).map(ToString::to_string).as_deref(), Some("title:ASC"));
        assert_eq!(merged.get("_limit"), Some(&ParamValue::from(10)));
    }

    #[test]
    fn structured_value_is_json_text() {
        let filter = json!({"category": {"name": "deportes"}, "tags": ["a", "b"]});
        let value = ParamValue::json(&filter).unwrap();
        let ParamValue::Json(text) = &value else {
            panic!("expected Json, got {value:?}");
        };
        let back: Value = serde_json::from_str(text).unwrap();
        assert_eq!(back, filter);
        assert_eq!(value.to_string(), filter.to_string());
    }

    #[test]
    fn scalar_display() {
        assert_eq!(ParamValue::from(true).to_string(), "true");
        assert_eq!(ParamValue::from(42u32).to_string(), "42");
        assert_eq!(ParamValue::from(-7i64).to_string(), "-7");
        assert_eq!(ParamValue::from("a b").to_string(), "a b");
        assert_eq!(Sort::desc("issue_date").to_string(), "issue_date:DESC");
    }

    #[test]
    fn from_json_object_skips_nulls() {
        let params = QueryParams::from_json_object(json!({
            "slug": "hola",
            "missing": null,
            "is_hero": true,
            "where": {"date_gt": "2024-01-01"}
        }));
        assert_eq!(params.len(), 3);
        assert!(params.get("missing").is_none());
        assert_eq!(params.get("is_hero"), Some(&ParamValue::Bool(true)));
        assert_eq!(
            params.get("where"),
            Some(&ParamValue::Json(r#"{"date_gt":"2024-01-01"}"#.to_string()))
        );
    }

    #[test]
    fn from_json_object_ignores_non_objects() {
        assert!(QueryParams::from_json_object(json!([1, 2])).is_empty());
        assert!(QueryParams::from_json_object(Value::Null).is_empty());
    }
}
