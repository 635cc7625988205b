// ============================================================================
// Portal API - Views
// File: crates/portal-api/src/views.rs
// ============================================================================
//! Handlebars templates compiled into the binary.

use std::path::Path;

use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ApiError, ErrorPage};

const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.hbs")),
    ("signup", include_str!("../templates/signup.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("members", include_str!("../templates/members.hbs")),
    ("admin", include_str!("../templates/admin.hbs")),
    ("message", include_str!("../templates/message.hbs")),
    ("error", include_str!("../templates/error.hbs")),
];

const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpeg", "jpg", "png", "svg", "webp"];

pub struct Views {
    registry: Handlebars<'static>,
}

#[derive(Serialize)]
struct ErrorContext<'a> {
    title: &'a str,
    status: u16,
    message: &'a str,
    retry_link: &'a str,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry.register_partial(name, *source)?;
        }
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<Html<String>, ApiError> {
        self.registry
            .render(name, context)
            .map(Html)
            .map_err(|e| ApiError::InternalError(format!("rendering {}: {}", name, e)))
    }

    /// Render an error page. `retry_link` is where the "try again" link of
    /// the message view points.
    pub fn render_error(&self, page: &ErrorPage, retry_link: &str) -> Result<String, ApiError> {
        let context = ErrorContext {
            title: page.title,
            status: page.status.as_u16(),
            message: &page.message,
            retry_link,
        };
        self.render(page.template.name(), &context).map(|html| html.0)
    }
}

/// Image files directly under `dir`, sorted by name. A missing directory
/// yields an empty list.
pub fn discover_images(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read public directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut images: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    images.sort();

    debug!("Found {} member images in {}", images.len(), dir.display());
    images
}
