//! The problem registry: registration entry points and dispatch.

use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use dashmap::DashMap;
use http::StatusCode;
use url::Url;

use crate::docs::DocStore;
use crate::error::Error;
use crate::handler::ProblemHandler;
use crate::problem::{Extension, Problem};
use crate::render;

/// Process-wide mapping from problem title to its finalized handler, plus the
/// documentation pages published for those titles.
///
/// Created once at service setup and shared with request handlers (it clones
/// cheaply). Registration is expected during setup, but the shared maps make
/// late registration during live traffic safe as well; for a given title, the
/// last registration wins.
#[derive(Debug, Clone)]
pub struct Registry {
    base_url: Url,
    docs: DocStore,
    handlers: Arc<DashMap<String, ProblemHandler>>,
}

impl Registry {
    /// Create a registry whose documentation links are rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            docs: DocStore::default(),
            handlers: Arc::new(DashMap::new()),
        }
    }

    /// Register `title` with a documentation page rendered from the built-in
    /// default template.
    ///
    /// # Errors
    /// Propagates template errors; see [`Registry::template_doc`].
    pub fn doc(&self, title: &str, description: &str) -> Result<ProblemHandler, Error> {
        self.template_doc(title, description, render::DEFAULT_TEMPLATE)
    }

    /// Register `title` with a documentation page rendered from a
    /// caller-supplied template (context variables: `title`, `description`).
    ///
    /// # Errors
    /// [`Error::TemplateParse`] or [`Error::TemplateRender`]; on error
    /// nothing is registered for `title`.
    pub fn template_doc(
        &self,
        title: &str,
        description: &str,
        template: &str,
    ) -> Result<ProblemHandler, Error> {
        let page = render::template(title, description, template)?;
        Ok(self.html_doc(title, page))
    }

    /// Register `title` with a documentation page rendered from Markdown.
    pub fn markdown_doc(&self, title: &str, markdown: &str) -> ProblemHandler {
        self.html_doc(title, render::markdown(title, markdown))
    }

    /// Register `title`, publishing `page` verbatim as its documentation.
    ///
    /// An empty `page` registers the title without a documentation page: no
    /// route is installed and the handler's `type` URL stays empty. Otherwise
    /// the page is served at `/{percent-escaped title}.html` under this
    /// registry's router, and the problem body's `type` field points there.
    pub fn html_doc(&self, title: &str, page: impl Into<Bytes>) -> ProblemHandler {
        let page = page.into();
        let type_url = if page.is_empty() {
            String::new()
        } else {
            let path = format!("/{}.html", urlencoding::encode(title));
            self.docs.insert(path.clone(), page);
            self.doc_url(&path)
        };

        tracing::debug!(title, type_url = %type_url, "registered problem handler");
        let handler = ProblemHandler::new(title, type_url);
        self.handlers.insert(title.to_owned(), handler.clone());
        handler
    }

    /// Look up the registered handler for `title`.
    #[must_use]
    pub fn handler(&self, title: &str) -> Option<ProblemHandler> {
        self.handlers.get(title).map(|h| h.value().clone())
    }

    /// Dispatch one problem occurrence.
    ///
    /// Registered titles respond through their handler (body carries the
    /// documentation URL as `type`). Anything else, including an empty title,
    /// takes the fallback path: no `type` field, and an empty title is
    /// replaced by the status code's canonical reason phrase. Always produces
    /// a complete `application/problem+json` response.
    pub fn respond(
        &self,
        title: &str,
        status: StatusCode,
        detail: impl Into<String>,
        extensions: impl IntoIterator<Item = Extension>,
    ) -> Response {
        match self.handler(title) {
            Some(handler) => handler.respond(status, detail, extensions),
            None => {
                tracing::debug!(title, status = status.as_u16(), "no registered problem handler, using fallback");
                let title = if title.is_empty() {
                    status.canonical_reason().unwrap_or_default()
                } else {
                    title
                };
                Problem::new(status, title, detail, extensions).into_response()
            }
        }
    }

    /// The sub-router serving this registry's documentation pages: GET-only,
    /// exact-path, `text/html; charset=utf-8`. Unmatched paths 404.
    #[must_use]
    pub fn router(&self) -> Router {
        self.docs.router()
    }

    /// Join the registry base URL with a page path, normalizing slashes and
    /// leaving the percent-escaped segment untouched.
    fn doc_url(&self, path: &str) -> String {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.to_string()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn registry(base: &str) -> Registry {
        Registry::new(Url::parse(base).unwrap())
    }

    #[test]
    fn html_doc_computes_an_escaped_doc_url() {
        let r = registry("https://api.example.com");
        let h = r.html_doc("Not Found", Bytes::from_static(b"<html></html>"));
        assert_eq!(h.type_url(), "https://api.example.com/Not%20Found.html");
    }

    #[test]
    fn base_url_path_is_joined_not_concatenated() {
        for base in ["https://api.example.com/errors", "https://api.example.com/errors/"] {
            let r = registry(base);
            let h = r.html_doc("Oops", Bytes::from_static(b"x"));
            assert_eq!(h.type_url(), "https://api.example.com/errors/Oops.html");
        }
    }

    #[test]
    fn empty_page_registers_without_a_doc_url() {
        let r = registry("https://api.example.com");
        let h = r.html_doc("NotFound", Bytes::new());
        assert_eq!(h.type_url(), "");
        assert!(r.handler("NotFound").is_some());
    }

    #[test]
    fn last_registration_wins() {
        let r = registry("https://api.example.com");
        r.html_doc("Oops", Bytes::new());
        assert_eq!(r.handler("Oops").unwrap().type_url(), "");
        r.html_doc("Oops", Bytes::from_static(b"page"));
        assert_eq!(
            r.handler("Oops").unwrap().type_url(),
            "https://api.example.com/Oops.html"
        );
    }

    #[test]
    fn template_failure_registers_nothing() {
        let r = registry("https://api.example.com");
        assert!(r.template_doc("Oops", "d", "{{ broken").is_err());
        assert!(r.handler("Oops").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let r = registry("https://api.example.com");
        r.html_doc("Oops", Bytes::new());
        assert!(r.handler("oops").is_none());
    }
}
