use super::AppState;
use axum::{
    extract::{Request, State},
    http::{header::HOST, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Protocol the client used, as reported by the fronting proxy. Only the
/// first hop of a comma-separated list counts.
fn forwarded_proto(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|proto| proto.trim().to_lowercase())
}

/// In production, send plain-HTTP requests to the same location over HTTPS.
pub async fn redirect_to_https(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.environment.is_production()
        && forwarded_proto(request.headers()).as_deref() == Some("http")
    {
        if let Some(host) = request.headers().get(HOST).and_then(|h| h.to_str().ok()) {
            let path = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            let location = format!("https://{}{}", host, path);
            debug!("Redirecting plain HTTP request to {}", location);
            return Redirect::permanent(&location).into_response();
        }
    }

    next.run(request).await
}
