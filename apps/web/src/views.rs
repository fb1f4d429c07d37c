//! Askama views.
//!
//! The error view is part of the bootstrap's contract: `message` is always
//! shown, `error` carries structured detail only in development and renders
//! as `{}` everywhere else.

use askama::Template;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub message: String,
    /// JSON-encoded error detail, `{}` outside development
    pub error: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub title: String,
}
