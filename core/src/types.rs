//! Resource items and the content types the API serves.
//!
//! # Design
//! No schema is enforced: an `Item` is the JSON object the server sent,
//! passed through untouched. Callers that want a typed view deserialize it
//! themselves with `Item::into_typed`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::query::Sort;

/// A single content entry returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Integer `id`, when present.
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn slug(&self) -> Option<&str> {
        self.0.get("slug").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Deserialize the item into a caller-defined type.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(Value::Object(self.0)).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl From<Map<String, Value>> for Item {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// The collections exposed by the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    News,
    Bulletins,
    Blogs,
    Activities,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::News,
        Resource::Bulletins,
        Resource::Blogs,
        Resource::Activities,
    ];

    /// Collection path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Resource::News => "/noticias",
            Resource::Bulletins => "/bulletins",
            Resource::Blogs => "/blogs",
            Resource::Activities => "/activities",
        }
    }

    /// Newest first. Bulletins are dated by issue, everything else by `date`.
    pub fn default_sort(self) -> Sort {
        match self {
            Resource::Bulletins => Sort::desc("issue_date"),
            Resource::News | Resource::Blogs | Resource::Activities => Sort::desc("date"),
        }
    }
}
