//! Error types for the problemdoc crate

use thiserror::Error;

/// Errors raised while registering a problem kind.
///
/// Only the template-based documentation path can fail; raw-HTML and Markdown
/// registration are total. When a registration fails, nothing is stored: no
/// handler, no documentation route.
#[derive(Debug, Error)]
pub enum Error {
    /// The documentation template source could not be compiled.
    #[error("documentation template failed to parse: {0}")]
    TemplateParse(#[source] minijinja::Error),

    /// The documentation template compiled but failed during rendering.
    #[error("documentation template failed to render: {0}")]
    TemplateRender(#[source] minijinja::Error),
}
