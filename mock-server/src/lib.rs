//! In-memory stand-in for the Strapi read API.
//!
//! Serves `GET /{collection}` for the collections in a `Content` map with
//! the Strapi v3 query conventions the client relies on: equality filters
//! on any field, `_sort=field:ASC|DESC`, `_start` and `_limit`. A `Behavior`
//! picks the reply envelope (bare array or `{"data": [...]}`) or scripts a
//! failure.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub use axum::http::StatusCode;

/// Collection name (without leading slash) to its entries.
pub type Content = HashMap<String, Vec<Value>>;

/// Read-only store shared by all handlers.
pub type Db = Arc<Content>;

/// Shape of a successful collection reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeStyle {
    /// Strapi v3: a bare JSON array.
    Bare,
    /// Strapi v4: `{"data": [...], "meta": {...}}`.
    Wrapped,
}

/// How the server answers every collection request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Serve(EnvelopeStyle),
    /// Reply with this status and a Strapi-style error body.
    Fail(StatusCode),
    /// 200 with a body that is not JSON.
    Garbage,
    /// 200 with JSON in neither envelope shape.
    Unrecognized,
}

#[derive(Clone)]
struct AppState {
    db: Db,
    behavior: Behavior,
}

pub fn app(content: Content, behavior: Behavior) -> Router {
    let state = AppState {
        db: Arc::new(content),
        behavior,
    };
    Router::new()
        .route("/{collection}", get(list_entries))
        .with_state(state)
}

pub async fn run(listener: TcpListener, content: Content, behavior: Behavior) -> Result<(), std::io::Error> {
    axum::serve(listener, app(content, behavior)).await
}

async fn list_entries(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    tracing::debug!(%collection, ?params, "list");

    match state.behavior {
        Behavior::Fail(status) => {
            let body = json!({
                "statusCode": status.as_u16(),
                "error": status.canonical_reason().unwrap_or("Error"),
            });
            return (status, Json(body)).into_response();
        }
        Behavior::Garbage => return (StatusCode::OK, "<html>maintenance</html>").into_response(),
        Behavior::Serve(_) | Behavior::Unrecognized => {}
    }

    let Some(entries) = state.db.get(&collection) else {
        let body = json!({"statusCode": 404, "error": "Not Found"});
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    };

    let (total, page) = match select(entries, &params) {
        Ok(selected) => selected,
        Err(message) => {
            let body = json!({"statusCode": 400, "error": "Bad Request", "message": message});
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let body = match state.behavior {
        Behavior::Serve(EnvelopeStyle::Bare) => Value::Array(page),
        Behavior::Serve(EnvelopeStyle::Wrapped) => json!({
            "data": page,
            "meta": {"pagination": {"total": total}},
        }),
        _ => json!({"results": page}),
    };
    Json(body).into_response()
}

/// Apply filters, sort and paging. Returns the filtered total and the page.
pub fn select(entries: &[Value], params: &[(String, String)]) -> Result<(usize, Vec<Value>), String> {
    let mut sort = None;
    let mut start = 0usize;
    let mut limit = None;
    let mut filters = Vec::new();

    for (key, value) in params {
        match key.as_str() {
            "_sort" => sort = Some(parse_sort(value)?),
            "_start" => start = value.parse().map_err(|_| format!("invalid _start: {value}"))?,
            "_limit" => {
                // Strapi treats -1 as "no limit".
                let n: i64 = value.parse().map_err(|_| format!("invalid _limit: {value}"))?;
                limit = usize::try_from(n).ok();
            }
            k if k.starts_with('_') => {}
            _ => filters.push((key.as_str(), value.as_str())),
        }
    }

    let mut matched: Vec<Value> = entries
        .iter()
        .filter(|entry| filters.iter().all(|(field, want)| field_text(entry, field).as_deref() == Some(*want)))
        .cloned()
        .collect();

    if let Some((field, descending)) = sort {
        matched.sort_by(|a, b| match (a.get(field), b.get(field)) {
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(x), Some(y)) if descending => compare(x, y).reverse(),
            (Some(x), Some(y)) => compare(x, y),
            (None, None) => Ordering::Equal,
        });
    }

    let total = matched.len();
    let page = matched
        .into_iter()
        .skip(start)
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    Ok((total, page))
}

fn parse_sort(value: &str) -> Result<(&str, bool), String> {
    match value.rsplit_once(':') {
        None => Ok((value, false)),
        Some((field, order)) if order.eq_ignore_ascii_case("asc") => Ok((field, false)),
        Some((field, order)) if order.eq_ignore_ascii_case("desc") => Ok((field, true)),
        Some(_) => Err(format!("invalid _sort: {value}")),
    }
}

/// A field rendered the way it appears in a query string.
fn field_text(entry: &Value, field: &str) -> Option<String> {
    match entry.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Numbers numerically, strings lexically; mixed kinds compare equal.
fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or_default(), y.as_f64().unwrap_or_default());
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Fixture content for the four collections the frontend reads.
pub fn sample_content() -> Content {
    let mut content = Content::new();
    content.insert(
        "noticias".to_string(),
        vec![
            json!({"id": 1, "slug": "inauguracion-biblioteca", "title": "Inauguración de la biblioteca", "date": "2024-03-02", "cover": {"url": "/uploads/biblioteca.jpg"}}),
            json!({"id": 2, "slug": "fiesta-patronal", "title": "Fiesta patronal", "date": "2024-08-15", "cover": {"url": "https://cdn.example.org/fiesta.jpg"}}),
            json!({"id": 3, "slug": "pleno-municipal", "title": "Pleno municipal de mayo", "date": "2024-05-28", "cover": null}),
        ],
    );
    content.insert(
        "bulletins".to_string(),
        vec![
            json!({"id": 10, "title": "Boletín nº 41", "issue_date": "2024-06-01", "is_hero": false}),
            json!({"id": 11, "title": "Boletín nº 42", "issue_date": "2024-09-01", "is_hero": true}),
            json!({"id": 12, "title": "Boletín nº 40", "issue_date": "2024-03-01", "is_hero": false}),
        ],
    );
    content.insert(
        "blogs".to_string(),
        vec![
            json!({"id": 20, "slug": "memoria-del-rio", "title": "Memoria del río", "date": "2023-11-20"}),
            json!({"id": 21, "slug": "huertos-urbanos", "title": "Huertos urbanos", "date": "2024-04-09"}),
        ],
    );
    content.insert(
        "activities".to_string(),
        vec![
            json!({"id": 30, "slug": "taller-ceramica", "title": "Taller de cerámica", "date": "2024-10-05", "category": "talleres"}),
            json!({"id": 31, "slug": "ruta-senderista", "title": "Ruta senderista", "date": "2024-09-21", "category": "deporte"}),
            json!({"id": 32, "slug": "cine-de-verano", "title": "Cine de verano", "date": "2024-07-12", "category": "cultura"}),
        ],
    );
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn ids(entries: &[Value]) -> Vec<i64> {
        entries.iter().map(|e| e["id"].as_i64().unwrap()).collect()
    }

    fn news() -> Vec<Value> {
        sample_content().remove("noticias").unwrap()
    }

    #[test]
    fn no_params_returns_everything_in_store_order() {
        let (total, page) = select(&news(), &[]).unwrap();
        assert_eq!(total, 3);
        assert_eq!(ids(&page), vec![1, 2, 3]);
    }

    #[test]
    fn sorts_descending_by_string_field() {
        let (_, page) = select(&news(), &params(&[("_sort", "date:DESC")])).unwrap();
        assert_eq!(ids(&page), vec![2, 3, 1]);
    }

    #[test]
    fn sorts_numbers_numerically() {
        let entries = vec![json!({"id": 10}), json!({"id": 9}), json!({"id": 100})];
        let (_, page) = select(&entries, &params(&[("_sort", "id:ASC")])).unwrap();
        assert_eq!(ids(&page), vec![9, 10, 100]);
    }

    #[test]
    fn missing_sort_field_goes_last() {
        let entries = vec![
            json!({"id": 1}),
            json!({"id": 2, "date": "2024-01-01"}),
            json!({"id": 3, "date": "2024-02-01"}),
        ];
        let (_, page) = select(&entries, &params(&[("_sort", "date:ASC")])).unwrap();
        assert_eq!(ids(&page), vec![2, 3, 1]);
        let (_, page) = select(&entries, &params(&[("_sort", "date:DESC")])).unwrap();
        assert_eq!(ids(&page), vec![3, 2, 1]);
    }

    #[test]
    fn equality_filters_match_rendered_values() {
        let bulletins = sample_content().remove("bulletins").unwrap();
        let (_, page) = select(&bulletins, &params(&[("is_hero", "true")])).unwrap();
        assert_eq!(ids(&page), vec![11]);

        let (_, page) = select(&news(), &params(&[("id", "3")])).unwrap();
        assert_eq!(ids(&page), vec![3]);

        let (_, page) = select(&news(), &params(&[("slug", "nope")])).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn start_and_limit_page_after_sorting() {
        let (total, page) =
            select(&news(), &params(&[("_sort", "id:DESC"), ("_start", "1"), ("_limit", "1")])).unwrap();
        assert_eq!(total, 3);
        assert_eq!(ids(&page), vec![2]);
    }

    #[test]
    fn negative_limit_means_unlimited() {
        let (_, page) = select(&news(), &params(&[("_limit", "-1")])).unwrap();
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn unknown_underscore_params_are_ignored() {
        let (_, page) = select(&news(), &params(&[("_publicationState", "live")])).unwrap();
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn bad_paging_values_are_rejected() {
        assert!(select(&news(), &params(&[("_limit", "many")])).is_err());
        assert!(select(&news(), &params(&[("_sort", "date:SIDEWAYS")])).is_err());
    }
}
