//! HTTP client for the news analytics API.
//!
//! Every resource is a plain GET returning JSON. The client hands back the raw
//! `serde_json::Value` so the query cache can hold one payload type; decoding into
//! typed models happens in [`crate::model`].

mod client;
mod types;
mod util;

pub use self::client::ApiClient;
pub use self::types::*;
pub use self::util::build_url;
