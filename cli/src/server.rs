//! HTTP surface: a single `/` route dispatched by method, matching
//! `cmd/pass-schema-service/serve.go`'s handler wiring.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::Router;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::request::Request;
use crate::service::SchemaService;

const HELP_BODY: &str = r#"<html>
<body>
<p>
See the PASS schema service
<a href="https://docs.google.com/document/d/1sLWGZR4kCvQVGv-TA5x8ny-AxL3ChBYNeFYW1eACsDw/edit">documentation</a>
</p>
</body>
</html>
"#;

#[derive(Debug, Default, Deserialize)]
pub struct MergeParam {
    #[serde(default)]
    merge: bool,
}

pub fn router(service: Arc<SchemaService>) -> Router {
    let route: MethodRouter<Arc<SchemaService>> =
        get(handle_get).post(handle_post).head(handle_head);
    Router::new().route("/", route).with_state(service)
}

/// GET and HEAD get `Accept-Post`/`Server`, same as the Go original's
/// `commonHeaders`; a 405 fallback (any other method) does not.
fn common_headers(headers: &mut HeaderMap) {
    headers.insert(
        "Accept-Post",
        HeaderValue::from_static("application/json, text/plain"),
    );
    headers.insert("Server", HeaderValue::from_static("PASS schema service"));
}

async fn handle_get() -> Response {
    let mut headers = HeaderMap::new();
    common_headers(&mut headers);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    (headers, HELP_BODY).into_response()
}

async fn handle_head() -> Response {
    let mut headers = HeaderMap::new();
    common_headers(&mut headers);
    (StatusCode::OK, headers).into_response()
}

async fn handle_post(
    State(service): State<Arc<SchemaService>>,
    Query(merge): Query<MergeParam>,
    method: Method,
    request_headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    let _ = &method;

    let mut headers = HeaderMap::new();
    common_headers(&mut headers);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let content_type = request_headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let parsed = if content_type.starts_with("text/plain") {
        std::str::from_utf8(&body)
            .map_err(|e| ServiceError::BadRequest(format!("request body is not UTF-8: {e}")))
            .and_then(Request::read_text)
    } else {
        Request::read_json(&body)
    };

    let request = match parsed {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(%err, "malformed request body");
            return error_response(headers, err);
        }
    };

    match service.schemas(&request, merge.merge).await {
        Ok(schemas) => match serde_json::to_vec_pretty(&schemas) {
            Ok(body) => (StatusCode::OK, headers, body).into_response(),
            Err(err) => {
                tracing::error!(%err, "could not encode response");
                (StatusCode::INTERNAL_SERVER_ERROR, headers, "server error!").into_response()
            }
        },
        Err(err) => {
            tracing::error!(%err, "could not process schemas");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                headers,
                "server error!",
            )
                .into_response()
        }
    }
}

fn error_response(headers: HeaderMap, err: ServiceError) -> Response {
    let status = err.status_code();
    (status, headers, format!("Malformed request: {err}")).into_response()
}
