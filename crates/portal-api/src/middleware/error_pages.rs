//! Outer layer turning tagged error responses into HTML pages

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::error::ErrorPage;
use crate::state::AppState;

/// Where the "try again" link of a form error points.
fn retry_link(path: &str) -> &'static str {
    match path {
        "/signupSubmit" => "/signup",
        "/loginSubmit" => "/login",
        "/users" => "/admin",
        _ => "/",
    }
}

pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let retry = retry_link(request.uri().path());
    let response = next.run(request).await;

    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    match state.views.render_error(&page, retry) {
        Ok(html) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(CONTENT_LENGTH);
            parts.headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            Response::from_parts(parts, Body::from(html))
        }
        Err(e) => {
            // Keep the plain-text body already in the response.
            error!("Failed to render {} page: {}", page.template.name(), e);
            response
        }
    }
}
