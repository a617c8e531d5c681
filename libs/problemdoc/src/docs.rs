//! Documentation-page store and the axum sub-router that serves it.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use dashmap::DashMap;
use http::{HeaderValue, Method, StatusCode, Uri, header};

/// Route table for published documentation pages, keyed by the
/// percent-encoded request path (`/Not%20Found.html`).
///
/// A plain concurrent map rather than per-page router routes so that
/// re-registering a title replaces its page in place.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocStore {
    pages: Arc<DashMap<String, Bytes>>,
}

impl DocStore {
    pub(crate) fn insert(&self, path: String, page: Bytes) {
        self.pages.insert(path, page);
    }

    /// Build the sub-router serving the stored pages. Pages registered after
    /// the router is built are still visible; the store is shared.
    pub(crate) fn router(&self) -> Router {
        Router::new().fallback(serve_page).with_state(self.clone())
    }
}

/// Exact-path, GET-only page lookup. Request paths stay percent-encoded, as
/// do the stored ones, so no decoding happens on either side.
async fn serve_page(State(store): State<DocStore>, method: Method, uri: Uri) -> Response {
    let Some(page) = store.pages.get(uri.path()).map(|p| p.value().clone()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )],
        page,
    )
        .into_response()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_page() {
        let store = DocStore::default();
        store.insert("/a.html".to_owned(), Bytes::from_static(b"old"));
        store.insert("/a.html".to_owned(), Bytes::from_static(b"new"));
        assert_eq!(store.pages.get("/a.html").unwrap().as_ref(), b"new");
    }
}
