//! Documentation-page rendering: templated, Markdown, and raw HTML flavors.
//!
//! All three flavors produce a complete, self-contained HTML document. The
//! raw-HTML flavor is the identity and lives at the registration layer
//! (`Registry::html_doc`); this module provides the other two.

use bytes::Bytes;
use minijinja::{AutoEscape, Environment, context};
use pulldown_cmark::{Options, Parser, html};

use crate::error::Error;

/// Built-in template used by [`crate::Registry::doc`]: the title as a heading
/// and the description verbatim inside a preformatted block.
pub const DEFAULT_TEMPLATE: &str = r"<html>
  <head>
    <meta charset=utf-8>
    <title>Error {{ title }}</title>
  </head>
  <body>
    <h1>{{ title }}</h1>
    <pre>{{ description }}</pre>
  </body>
</html>
";

/// Render a documentation page from a template source.
///
/// The template sees two context variables, `title` and `description`, and is
/// rendered with HTML auto-escaping enabled.
///
/// # Errors
/// [`Error::TemplateParse`] if `source` is malformed,
/// [`Error::TemplateRender`] if rendering fails (e.g. a runtime expression
/// error inside the template).
pub fn template(title: &str, description: &str, source: &str) -> Result<Bytes, Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    let tmpl = env.template_from_str(source).map_err(Error::TemplateParse)?;
    let page = tmpl
        .render(context! { title, description })
        .map_err(Error::TemplateRender)?;
    Ok(Bytes::from(page))
}

/// Render a documentation page from Markdown source.
///
/// The Markdown body (common extensions: tables, footnotes, strikethrough,
/// task lists) is wrapped in a minimal HTML shell carrying the title. Total on
/// arbitrary input: malformed Markdown renders best-effort, never fails.
pub fn markdown(title: &str, source: &str) -> Bytes {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let mut body = String::with_capacity(source.len() * 2);
    html::push_html(&mut body, Parser::new_ext(source, options));

    let mut page = String::with_capacity(body.len() + 128);
    page.push_str("<html>\n<head>\n  <meta charset=utf-8>\n  <title>Error ");
    page.push_str(&html_escape(title));
    page.push_str("</title>\n</head>\n<body>\n");
    page.push_str(&body);
    page.push_str("</body>\n</html>\n");
    Bytes::from(page)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
