//! RFC 7807 problem body: construction, merge semantics, and wire encoding.

use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Content type for problem responses.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json; charset=utf-8";

/// Keys the system always writes itself; same-named extensions lose.
const RESERVED_KEYS: [&str; 4] = ["type", "title", "status", "detail"];

/// Serialize `StatusCode` as its numeric value.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// One caller-supplied key/value pair merged into a problem body.
///
/// The value is converted to JSON eagerly. A value whose `Serialize` impl
/// fails is dropped here, with a warning, so the final body always encodes
/// cleanly; the reserved fields are unaffected.
#[derive(Debug, Clone)]
pub struct Extension {
    key: String,
    value: Option<Value>,
}

impl Extension {
    pub fn new(key: impl Into<String>, value: impl Serialize) -> Self {
        let key = key.into();
        let value = match serde_json::to_value(value) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "dropping unserializable problem extension");
                None
            }
        };
        Self { key, value }
    }
}

/// Shorthand for [`Extension::new`].
pub fn ext(key: impl Into<String>, value: impl Serialize) -> Extension {
    Extension::new(key, value)
}

/// One problem occurrence, built per dispatch and serialized directly as the
/// response body.
///
/// `type_url` is `None` on the fallback path (the key is omitted from the
/// body) and `Some` for every registered handler, possibly with an empty
/// string when the title was registered without a documentation page.
#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct Problem {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_url: Option<String>,
    pub title: String,
    #[serde(serialize_with = "serialize_status_code")]
    pub status: StatusCode,
    pub detail: String,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Problem {
    /// Build a problem body from the system fields and caller extensions.
    ///
    /// Extensions merge in order (later duplicates overwrite earlier ones);
    /// reserved keys are then stripped so the system fields always win.
    pub fn new(
        status: StatusCode,
        title: impl Into<String>,
        detail: impl Into<String>,
        extensions: impl IntoIterator<Item = Extension>,
    ) -> Self {
        let mut merged = Map::new();
        for extension in extensions {
            if let Some(value) = extension.value {
                merged.insert(extension.key, value);
            }
        }
        for key in RESERVED_KEYS {
            merged.remove(key);
        }
        Self {
            type_url: None,
            title: title.into(),
            status,
            detail: detail.into(),
            extensions: merged,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = Some(type_url.into());
        self
    }

    /// Encode the wire body: 2-space-indented JSON.
    ///
    /// Extensions were validated at construction, so this cannot fail in
    /// practice; should it ever, the offending extensions are dropped and a
    /// minimal body is emitted instead of a truncated one.
    pub(crate) fn to_body(&self) -> Vec<u8> {
        match serde_json::to_vec_pretty(self) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(title = %self.title, error = %err, "problem body failed to encode, emitting minimal body");
                let minimal = Self {
                    type_url: self.type_url.clone(),
                    title: self.title.clone(),
                    status: self.status,
                    detail: self.detail.clone(),
                    extensions: Map::new(),
                };
                serde_json::to_vec_pretty(&minimal).unwrap_or_default()
            }
        }
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        (
            self.status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
            )],
            self.to_body(),
        )
            .into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn serializes_status_as_u16_and_indents() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Not Found", "no such resource", []);
        let body = String::from_utf8(p.to_body()).unwrap();
        assert!(body.contains("\"status\": 404"));
        assert!(body.contains("\n  \""));
    }

    #[test]
    fn fallback_body_has_no_type_key() {
        let p = Problem::new(StatusCode::NOT_FOUND, "NotFound", "no such user", []);
        let body: Value = serde_json::from_slice(&p.to_body()).unwrap();
        assert!(body.get("type").is_none());
        assert_eq!(body["title"], "NotFound");
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "no such user");
    }

    #[test]
    fn extensions_merge_with_later_duplicates_winning() {
        let p = Problem::new(
            StatusCode::BAD_REQUEST,
            "Bad Input",
            "field missing",
            [ext("field", "name"), ext("attempt", 1), ext("attempt", 2)],
        );
        let body: Value = serde_json::from_slice(&p.to_body()).unwrap();
        assert_eq!(body["field"], "name");
        assert_eq!(body["attempt"], 2);
    }

    #[test]
    fn reserved_keys_override_extensions() {
        let p = Problem::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            "real detail",
            [
                ext("type", "bogus"),
                ext("title", "bogus"),
                ext("status", 500),
                ext("detail", "bogus"),
            ],
        )
        .with_type("https://example.com/Not%20Found.html");
        let body: Value = serde_json::from_slice(&p.to_body()).unwrap();
        assert_eq!(body["type"], "https://example.com/Not%20Found.html");
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "real detail");
    }

    #[test]
    fn unserializable_extension_is_dropped() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("nope"))
            }
        }

        let p = Problem::new(
            StatusCode::BAD_REQUEST,
            "Bad Input",
            "d",
            [ext("broken", Broken), ext("ok", true)],
        );
        let body: Value = serde_json::from_slice(&p.to_body()).unwrap();
        assert!(body.get("broken").is_none());
        assert_eq!(body["ok"], true);
        assert_eq!(body["title"], "Bad Input");
    }

    #[test]
    fn into_response_sets_status_and_content_type() {
        let resp =
            Problem::new(StatusCode::CONFLICT, "Conflict", "already exists", []).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_PROBLEM_JSON
        );
    }
}
