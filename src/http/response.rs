//! HTTP response building module
//!
//! Builders for every response the static file handler can produce.
//! None of them set cross-origin headers; that is left to the CORS stage.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Response, StatusCode};

pub type Body = Full<Bytes>;

/// Methods the handler answers; sent in `Allow`
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

const HTML: &str = "text/html; charset=utf-8";

/// Build 200 response for file contents
///
/// `Content-Length` always reflects the file size, even when `is_head`
/// drops the body.
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<Body> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);
    if let Some(date) = last_modified {
        builder = builder.header(LAST_MODIFIED, date);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Body> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(LAST_MODIFIED, last_modified)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect, used to add the trailing slash to directory URLs
pub fn build_301_response(location: &str) -> Response<Body> {
    let mut response = build_error_response(StatusCode::MOVED_PERMANENTLY, "Moved Permanently", false);
    match location.parse() {
        Ok(value) => {
            response.headers_mut().insert(LOCATION, value);
        }
        Err(e) => log_build_error("301", &e),
    }
    response
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(is_head: bool) -> Response<Body> {
    let mut response =
        build_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", is_head);
    response
        .headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    response
}

pub fn build_400_response(is_head: bool) -> Response<Body> {
    build_error_response(StatusCode::BAD_REQUEST, "Bad request path", is_head)
}

pub fn build_403_response(is_head: bool) -> Response<Body> {
    build_error_response(StatusCode::FORBIDDEN, "Forbidden", is_head)
}

pub fn build_404_response(is_head: bool) -> Response<Body> {
    build_error_response(StatusCode::NOT_FOUND, "File not found", is_head)
}

pub fn build_500_response(is_head: bool) -> Response<Body> {
    build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", is_head)
}

/// Small HTML error page
pub fn build_error_response(status: StatusCode, message: &str, is_head: bool) -> Response<Body> {
    let page = error_page(status, message);
    let content_length = page.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(page)
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HTML)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = status;
            fallback
        })
}

fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Error response</title>\n</head>\n<body>\n<h1>Error response</h1>\n<p>Error code: {}</p>\n<p>Message: {}.</p>\n</body>\n</html>\n",
        status.as_u16(),
        message
    )
}

/// Log response build error
fn log_build_error(status: &str, error: &impl std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
