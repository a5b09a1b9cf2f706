//! Typed payloads and the decode step for every API resource.
//!
//! Each `decode_*` function is the single place where an untrusted payload is turned
//! into a strict type. Field-level problems are coerced (see [`coerce`]); only a
//! top-level structure that cannot be interpreted at all becomes a [`DecodeError`].

pub mod analysis;
pub mod article;
pub mod cluster;
pub mod coerce;
pub mod network;
pub mod problem;
pub mod sentiment;
pub mod stats;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::Resource;

pub use self::analysis::*;
pub use self::article::*;
pub use self::cluster::*;
pub use self::network::*;
pub use self::problem::*;
pub use self::sentiment::*;
pub use self::stats::*;

/// A payload whose overall structure cannot be rendered.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {resource} data: {reason}")]
pub struct DecodeError {
    pub resource: Resource,
    pub reason: String,
}

impl DecodeError {
    pub fn new(resource: Resource, reason: impl Into<String>) -> Self {
        Self {
            resource,
            reason: reason.into(),
        }
    }
}

/// Outcome for resources the server may legitimately not have computed yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Availability::Available(value) => Some(value),
            Availability::Unavailable => None,
        }
    }
}

/// Top-level object of a payload, or a [`DecodeError`] for `resource`.
pub(crate) fn top_level(value: &Value, resource: Resource) -> Result<&Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::new(resource, "expected a JSON object at the top level"))
}

/// A required object section of a payload.
pub(crate) fn required_section<'a>(
    root: &'a Map<String, Value>,
    field: &str,
    resource: Resource,
) -> Result<&'a Map<String, Value>, DecodeError> {
    match root.get(field) {
        Some(Value::Object(section)) => Ok(section),
        Some(_) => Err(DecodeError::new(resource, format!("`{}` is not an object", field))),
        None => Err(DecodeError::new(resource, format!("`{}` is missing", field))),
    }
}
