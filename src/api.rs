use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// Identifiers the legacy emergency server reported. Clients key off these
/// fields, so they are kept verbatim.
pub const SERVER_ID: &str = "emergency-python-server";
const SOURCE_ID: &str = "python-emergency-server";

/// Reported under the legacy `python_version` key.
pub const RUNTIME_VERSION: &str = concat!("lifeboat/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Stock {
    pub symbol: &'static str,
    pub price: f64,
    pub change: &'static str,
}

pub const MOCK_STOCKS: [Stock; 4] = [
    Stock { symbol: "AAPL", price: 150.25, change: "+2.15" },
    Stock { symbol: "GOOGL", price: 2800.50, change: "-5.75" },
    Stock { symbol: "MSFT", price: 300.75, change: "+1.25" },
    Stock { symbol: "TSLA", price: 800.90, change: "+12.45" },
];

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn with_cors(mut res: Response) -> Response {
    let headers = res.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    res
}

pub async fn health() -> Response {
    let body = json!({
        "status": "healthy",
        "server": SERVER_ID,
        "timestamp": timestamp(),
        "python_version": RUNTIME_VERSION,
        "platform": std::env::consts::OS,
    });
    with_cors(Json(body).into_response())
}

pub async fn stocks() -> Response {
    let body = json!({
        "message": "Emergency Python server active",
        "data": MOCK_STOCKS,
        "timestamp": timestamp(),
        "source": SOURCE_ID,
    });
    with_cors(Json(body).into_response())
}

/// Catch-all for unmatched paths under `/api/`. The legacy server sent a 200
/// header block and then a second 404 status line here; a single 404 with the
/// usual headers is sent instead.
pub async fn not_found(uri: Uri) -> Response {
    info!("Unknown API path: {}", uri.path());
    let body = json!({
        "error": "API endpoint not found",
        "path": uri.path(),
        "server": SERVER_ID,
    });
    with_cors((StatusCode::NOT_FOUND, Json(body)).into_response())
}

/// Answers browser preflight on any path before routing happens.
pub async fn preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return with_cors(StatusCode::OK.into_response());
    }
    next.run(req).await
}
