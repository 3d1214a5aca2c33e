//! Read-only client for a Strapi-style content API.
//!
//! # Overview
//! Fetches news, bulletins, blogs and activities from a content backend and
//! hands them back as plain `Item` sequences, regardless of whether the
//! backend wraps collections as a bare array (Strapi v3) or as
//! `{"data": [...]}` (Strapi v4).
//!
//! # Design
//! - `ContentClient` is stateless: a base URL plus a `Transport`. Clones are
//!   cheap and calls are independent, so it can be shared across tasks.
//! - Each round-trip is `build_request` -> `Transport::execute` ->
//!   `parse_response`; the first and last steps are pure and tested without
//!   a network.
//! - Envelope handling is one exhaustive match (`Envelope::from_value`).
//!   Unknown shapes degrade to an empty result and are logged, never raised.
//! - Nothing is retried. Every failure is an `ApiError`.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use client::{hero_query, id_query, list_query, media_url, slug_query, ContentClient};
pub use config::ClientConfig;
pub use envelope::Envelope;
pub use error::{ApiError, Result};
pub use http::{HttpRequest, HttpResponse, HttpTransport, Transport};
pub use query::{ParamValue, QueryParams, Sort, SortOrder};
pub use types::{Item, Resource};
