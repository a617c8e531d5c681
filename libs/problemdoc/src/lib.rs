//! RFC 7807 problem responses with self-served documentation pages.
//!
//! Register named error kinds once at setup time, then emit structurally
//! consistent `application/problem+json` bodies for them throughout request
//! handling. Each registration may publish a human-readable HTML page
//! (raw, templated, or rendered from Markdown) served by [`Registry::router`]
//! at a stable URL that the problem body references via its `type` field.
//!
//! ```no_run
//! use http::StatusCode;
//! use problemdoc::{Registry, ext};
//! use url::Url;
//!
//! # fn main() -> Result<(), problemdoc::Error> {
//! let registry = Registry::new(Url::parse("https://api.example.com").expect("static url"));
//! let not_found = registry.doc("Not Found", "The requested resource does not exist.")?;
//!
//! // In a request handler:
//! let response = not_found.respond(
//!     StatusCode::NOT_FOUND,
//!     "no such user",
//!     [ext("user_id", 42)],
//! );
//! # drop(response);
//!
//! // Or by title, with a fallback for unregistered kinds:
//! let response = registry.respond("Not Found", StatusCode::NOT_FOUND, "no such user", []);
//! # drop(response);
//!
//! // Mount the documentation pages:
//! let app = axum::Router::new().merge(registry.router());
//! # drop(app);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod docs;

pub mod error;
pub mod handler;
pub mod problem;
pub mod registry;
pub mod render;

// Re-export commonly used types
pub use error::Error;
pub use handler::ProblemHandler;
pub use problem::{APPLICATION_PROBLEM_JSON, Extension, Problem, ext};
pub use registry::Registry;
pub use render::DEFAULT_TEMPLATE;
