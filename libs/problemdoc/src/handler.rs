//! Finalized per-title dispatch handles.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::problem::{Extension, Problem};

/// The finalized handler for one registered problem title.
///
/// Captures the title and the documentation URL computed at registration
/// time; immutable afterwards. Returned by every registration call so hot
/// paths can hold one directly instead of going through the registry lookup
/// on each dispatch.
#[derive(Debug, Clone)]
pub struct ProblemHandler {
    title: String,
    type_url: String,
}

impl ProblemHandler {
    pub(crate) fn new(title: impl Into<String>, type_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            type_url: type_url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The absolute documentation URL, or `""` when the title was registered
    /// without a documentation page.
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// Produce the problem response for one occurrence.
    ///
    /// The body carries the captured title and documentation URL; `status`,
    /// `detail` and `extensions` describe this occurrence. Reserved keys in
    /// `extensions` are overridden by the system fields.
    pub fn respond(
        &self,
        status: StatusCode,
        detail: impl Into<String>,
        extensions: impl IntoIterator<Item = Extension>,
    ) -> Response {
        Problem::new(status, self.title.clone(), detail, extensions)
            .with_type(self.type_url.clone())
            .into_response()
    }
}
