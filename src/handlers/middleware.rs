use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use super::{error_response, ApiError};

/// Request validation middleware. The state is the maximum accepted body size in bytes.
pub async fn request_validation_middleware(
    State(max_request_size): State<usize>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    validate_content_type(&request)?;
    validate_request_size(&request, max_request_size)?;

    Ok(next.run(request).await)
}

/// Validate content type for requests with body
fn validate_content_type(request: &Request<Body>) -> Result<(), ApiError> {
    let method = request.method();

    if method == Method::POST || method == Method::PUT || method == Method::PATCH {
        match request.headers().get(header::CONTENT_TYPE) {
            Some(content_type) => {
                let content_type_str = content_type.to_str().unwrap_or("");

                if !content_type_str.starts_with("application/json") {
                    warn!("Invalid content type: {}", content_type_str);
                    return Err(error_response(
                        StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        "Content-Type must be application/json",
                    ));
                }
            }
            None => {
                warn!("Missing content type header");
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "Content-Type header is required for requests with body",
                ));
            }
        }
    }

    Ok(())
}

/// Validate request size against the declared Content-Length
fn validate_request_size(request: &Request<Body>, max_request_size: usize) -> Result<(), ApiError> {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());

    if let Some(length) = declared {
        if length > max_request_size {
            error!("Request too large: {} bytes", length);
            return Err(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "Request size {} bytes exceeds maximum of {} bytes",
                    length, max_request_size
                ),
            ));
        }
    }

    Ok(())
}

/// Security headers middleware
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'self'"),
    );

    response
}
