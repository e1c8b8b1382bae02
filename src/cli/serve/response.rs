//! HTTP response handlers.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::mime::{HTML, PLAIN};

/// Respond with a static file.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

/// Respond with the freshly loaded page.
pub fn respond_page(request: Request, html: String) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, HTML);
    }
    send_body(request, 200, HTML, html.into_bytes())
}

pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, PLAIN);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 405 for anything but GET and HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN))
        .with_header(make_header("Allow", "GET, HEAD"));
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with the page load error (500).
pub fn respond_load_error(request: Request, error: &anyhow::Error) -> Result<()> {
    let error_str = format!("{error:#}");
    let msg = crate::utils::html::escape(&error_str);
    let body = format!("<html><body><h1>Page Error</h1><pre>{msg}</pre></body></html>");
    send_body(request, 500, HTML, body.into_bytes())
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

pub fn is_read_request(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-cache"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // Static ASCII names and values always parse.
    Header::from_bytes(key, value).unwrap()
}
