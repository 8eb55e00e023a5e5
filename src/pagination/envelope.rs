//! List envelope decoding
//!
//! The API wraps list results in one of two shapes:
//!
//! ```text
//! { "meta": { "key": "services", "next_page_url": "https://...", ... },
//!   "services": [ ... ] }
//!
//! { "messages": [ ... ], "next_page_uri": "/2010-04-01/...", "page": 0, ... }
//! ```
//!
//! The first names its record key and carries absolute URLs. The second has
//! exactly one non-metadata key and carries paths relative to the host.

use super::types::{Page, PageMeta};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use url::Url;

/// Top-level keys of a flat envelope that are never the record list
const FLAT_META_KEYS: &[&str] = &[
    "end",
    "first_page_uri",
    "next_page_uri",
    "last_page_uri",
    "page",
    "page_size",
    "previous_page_uri",
    "total",
    "num_pages",
    "start",
    "uri",
];

/// Decode a list response body into a page
///
/// `request_url` is the URL the page was fetched from; relative cursors are
/// resolved against it.
pub fn decode_page<T: DeserializeOwned>(body: &str, request_url: &str) -> Result<Page<T>> {
    decode_page_with_base(body, request_url, None)
}

/// Decode a list response body, resolving host-relative paths against a
/// domain base URL
///
/// `base_url` may carry a path prefix (a proxy mount, say); a cursor such as
/// `/2010-04-01/Calls.json?PageToken=PA2` is appended to it rather than
/// replacing its path. Without a base, paths resolve against `request_url`.
pub fn decode_page_with_base<T: DeserializeOwned>(
    body: &str,
    request_url: &str,
    base_url: Option<&str>,
) -> Result<Page<T>> {
    let payload: JsonValue = serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;

    let JsonValue::Object(mut payload) = payload else {
        return Err(Error::decode("List response is not a JSON object"));
    };

    let (key, meta, next_page_url) = match payload.get("meta") {
        Some(JsonValue::Object(meta)) if meta.contains_key("key") => {
            let key = string_field(meta, "key")
                .ok_or_else(|| Error::decode("Envelope meta.key is not a string"))?;
            let page_meta = PageMeta {
                key: Some(key.clone()),
                page: meta.get("page").and_then(JsonValue::as_u64),
                page_size: meta.get("page_size").and_then(JsonValue::as_u64),
                url: string_field(meta, "url"),
                first_page_url: string_field(meta, "first_page_url"),
                previous_page_url: string_field(meta, "previous_page_url"),
            };
            let next = string_field(meta, "next_page_url");
            (key, page_meta, next)
        }
        _ => {
            let key = flat_record_key(&payload)?;
            let page_meta = PageMeta {
                key: Some(key.clone()),
                page: payload.get("page").and_then(JsonValue::as_u64),
                page_size: payload.get("page_size").and_then(JsonValue::as_u64),
                url: resolve_optional(&payload, "uri", request_url, base_url)?,
                first_page_url: resolve_optional(&payload, "first_page_uri", request_url, base_url)?,
                previous_page_url: resolve_optional(&payload, "previous_page_uri", request_url, base_url)?,
            };
            let next = resolve_optional(&payload, "next_page_uri", request_url, base_url)?;
            (key, page_meta, next)
        }
    };

    let records = match payload.remove(&key) {
        Some(JsonValue::Array(items)) => items,
        Some(_) => {
            return Err(Error::decode(format!(
                "Envelope key '{key}' does not hold an array"
            )))
        }
        None => return Err(Error::decode(format!("Envelope key '{key}' is missing"))),
    };

    let records = records
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| Error::decode(format!("Failed to decode record under '{key}': {e}")))?;

    Ok(Page::new(records, next_page_url, meta))
}

/// The single top-level key that is not pagination metadata
fn flat_record_key(payload: &JsonObject) -> Result<String> {
    let mut candidates = payload
        .keys()
        .filter(|k| !FLAT_META_KEYS.contains(&k.as_str()));

    match (candidates.next(), candidates.next()) {
        (Some(key), None) => Ok(key.clone()),
        (None, _) => Err(Error::decode("List response has no record key")),
        (Some(first), Some(second)) => Err(Error::decode(format!(
            "List response has ambiguous record keys ('{first}', '{second}', ...)"
        ))),
    }
}

fn string_field(object: &JsonObject, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Resolve an optional host-relative path
///
/// With a base URL, `/...` paths keep the base's own path prefix. Anything
/// else is joined onto the request URL.
fn resolve_optional(
    object: &JsonObject,
    key: &str,
    request_url: &str,
    base_url: Option<&str>,
) -> Result<Option<String>> {
    let Some(path) = string_field(object, key) else {
        return Ok(None);
    };

    if let Some(base) = base_url.filter(|_| path.starts_with('/')) {
        return Ok(Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )));
    }

    let joined = Url::parse(request_url)?
        .join(&path)
        .map_err(|e| Error::decode(format!("Invalid '{key}' value '{path}': {e}")))?;
    Ok(Some(joined.into()))
}
