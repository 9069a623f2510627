use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_ASSET_MAX_AGE_SECONDS: u64 = 86_400;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const RESUME_MAX_AGE_SECONDS: u64 = 3_600;

const PORT_BOUNDS: (u64, u64) = (1, 65_535);
const ASSET_MAX_AGE_SECONDS_BOUNDS: (u64, u64) = (0, 365 * 24 * 60 * 60);
const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_ID_MAX_LEN: usize = 64;

static REQUESTS_SERVED: AtomicU64 = AtomicU64::new(0);

/// Declaration order is severity order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }
}

/// How the static host answered a request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ServeOutcome {
    /// A file that exists under the dist directory.
    File,
    /// `index.html` for a client-side route.
    AppShell,
    /// A path naming a non-document file that does not exist.
    MissingAsset,
    NotModified,
}

impl ServeOutcome {
    fn classify(path: &str, status: StatusCode, content_type: &str) -> Self {
        if status == StatusCode::NOT_MODIFIED {
            return Self::NotModified;
        }
        if !content_type.starts_with("text/html") || path.ends_with('/') {
            return Self::File;
        }
        match path_extension(path) {
            None => Self::AppShell,
            Some(ext) if is_html_extension(ext) => Self::File,
            Some(_) => Self::MissingAsset,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::AppShell => "app_shell",
            Self::MissingAsset => "missing_asset",
            Self::NotModified => "not_modified",
        }
    }
}

#[derive(Clone, Debug)]
struct HostConfig {
    port: u16,
    dist_dir: PathBuf,
    asset_max_age_seconds: u64,
    log_level: LogLevel,
}

impl HostConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_u64_with_bounds(&lookup, "PORT", u64::from(DEFAULT_PORT), PORT_BOUNDS);
        let asset_max_age_seconds = parse_u64_with_bounds(
            &lookup,
            "ASSET_MAX_AGE_SECONDS",
            DEFAULT_ASSET_MAX_AGE_SECONDS,
            ASSET_MAX_AGE_SECONDS_BOUNDS,
        );
        let dist_dir = parse_non_empty_string(&lookup, "DIST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let log_level = parse_log_level(&lookup, "LOG_LEVEL", DEFAULT_LOG_LEVEL);

        Self {
            port: u16::try_from(port).unwrap_or(DEFAULT_PORT),
            dist_dir,
            asset_max_age_seconds,
            log_level,
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env();
    let bind_address = format!("0.0.0.0:{}", config.port);

    log_event(
        config.log_level,
        LogLevel::Debug,
        "config_loaded",
        serde_json::json!({
            "port": config.port,
            "distDir": config.dist_dir.display().to_string(),
            "assetMaxAgeSeconds": config.asset_max_age_seconds,
        }),
    );

    let app = build_router(config.clone());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        config.log_level,
        LogLevel::Info,
        "server_started",
        serde_json::json!({ "address": format!("http://127.0.0.1:{}", config.port) }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(config: HostConfig) -> Router {
    let index = config.dist_dir.join("index.html");
    // deep links resolve client-side, so unknown paths get the app shell with 200
    let static_service = ServeDir::new(&config.dist_dir).fallback(ServeFile::new(index));

    Router::new()
        .fallback_service(static_service)
        .layer(middleware::from_fn_with_state(Arc::new(config), serve_with_headers))
}

async fn serve_with_headers(
    State(config): State<Arc<HostConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = resolve_request_id(request.headers());
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let outcome = ServeOutcome::classify(&path, response.status(), &content_type);

    // the shell must not stand in for a missing file, e.g. inside the résumé iframe
    if outcome == ServeOutcome::MissingAsset {
        response = (StatusCode::NOT_FOUND, "not found").into_response();
    }

    let status = response.status();
    if status.is_success() || status == StatusCode::NOT_MODIFIED {
        let policy = cache_policy(&path, &content_type, config.asset_max_age_seconds);
        if let Ok(value) = HeaderValue::from_str(&policy) {
            response.headers_mut().insert(header::CACHE_CONTROL, value);
        }
    }

    if let Ok(request_id_header) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, request_id_header);
    }

    let level = match outcome {
        ServeOutcome::MissingAsset => LogLevel::Warn,
        _ => LogLevel::Info,
    };
    log_event(
        config.log_level,
        level,
        "http_request",
        serde_json::json!({
            "requestId": request_id,
            "method": method,
            "path": path,
            "status": status.as_u16(),
            "outcome": outcome.as_str(),
            "durationMs": started.elapsed().as_millis() as u64,
        }),
    );

    response
}

/// `no-cache` for documents, a short max-age for the résumé, the configured
/// age for everything else. A 304 carries no content type, so documents are
/// then recognised by path.
fn cache_policy(path: &str, content_type: &str, asset_max_age_seconds: u64) -> String {
    let is_document = if content_type.is_empty() {
        path_extension(path).map_or(true, is_html_extension)
    } else {
        content_type.starts_with("text/html")
    };

    if is_document {
        "no-cache".to_string()
    } else if path_extension(path) == Some("pdf") {
        format!("public, max-age={RESUME_MAX_AGE_SECONDS}")
    } else {
        format!("public, max-age={asset_max_age_seconds}")
    }
}

fn path_extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

fn is_html_extension(ext: &str) -> bool {
    ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm")
}

fn parse_u64_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
    bounds: (u64, u64),
) -> u64 {
    lookup(name)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_non_empty_string(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_log_level(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: LogLevel,
) -> LogLevel {
    match parse_non_empty_string(lookup, name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" => LogLevel::Warn,
        _ => default,
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis() as u64)
        .unwrap_or(0)
}

/// Reuses the caller's id when it is short printable ASCII, so it can be
/// echoed back and logged verbatim; otherwise mints `site-<ms>-<n>`.
fn resolve_request_id(headers: &HeaderMap) -> String {
    let sequence = REQUESTS_SERVED.fetch_add(1, Ordering::Relaxed) + 1;

    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| {
            !value.is_empty()
                && value.len() <= REQUEST_ID_MAX_LEN
                && value.bytes().all(|byte| byte.is_ascii_graphic())
        })
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("site-{}-{sequence}", unix_millis()))
}

fn log_event(threshold: LogLevel, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < threshold {
        return;
    }

    let mut line = serde_json::json!({
        "tsMs": unix_millis(),
        "level": level.as_str(),
        "event": event,
    });
    if let (Some(line), serde_json::Value::Object(fields)) = (line.as_object_mut(), fields) {
        line.extend(fields);
    }

    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    fn test_dist_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "portfolio-site-{label}-{}-{}",
            std::process::id(),
            unix_millis()
        ));
        fs::create_dir_all(&dir).expect("create dist dir");
        fs::write(dir.join("index.html"), "<!doctype html><div id=\"app\"></div>")
            .expect("write index");
        fs::write(dir.join("resume.pdf"), b"%PDF-1.4 test").expect("write resume");
        fs::write(dir.join("rome.jpg"), b"jpeg").expect("write photo");
        dir
    }

    async fn get(app: Router, path: &str, extra_headers: &str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let address = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let mut stream = tokio::net::TcpStream::connect(address)
            .await
            .expect("connect to test server");
        let request = format!(
            "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n{extra_headers}\r\n"
        );
        stream
            .write_all(request.as_bytes())
            .await
            .expect("write request");

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.expect("read response");
        String::from_utf8_lossy(&raw).to_ascii_lowercase()
    }

    fn test_config(dist_dir: PathBuf) -> HostConfig {
        HostConfig {
            port: DEFAULT_PORT,
            dist_dir,
            asset_max_age_seconds: DEFAULT_ASSET_MAX_AGE_SECONDS,
            log_level: LogLevel::Info,
        }
    }

    #[test]
    fn config_defaults_apply_when_unset() {
        let config = HostConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.dist_dir, PathBuf::from(DEFAULT_DIST_DIR));
        assert_eq!(config.asset_max_age_seconds, DEFAULT_ASSET_MAX_AGE_SECONDS);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn config_rejects_out_of_bounds_values() {
        let config = HostConfig::from_lookup(lookup_from(&[
            ("PORT", "70000"),
            ("ASSET_MAX_AGE_SECONDS", "not-a-number"),
            ("DIST_DIR", "   "),
            ("LOG_LEVEL", "verbose"),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.asset_max_age_seconds, DEFAULT_ASSET_MAX_AGE_SECONDS);
        assert_eq!(config.dist_dir, PathBuf::from(DEFAULT_DIST_DIR));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn config_accepts_valid_overrides() {
        let config = HostConfig::from_lookup(lookup_from(&[
            ("PORT", " 3000 "),
            ("ASSET_MAX_AGE_SECONDS", "0"),
            ("DIST_DIR", "public"),
            ("LOG_LEVEL", "DEBUG"),
        ]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.asset_max_age_seconds, 0);
        assert_eq!(config.dist_dir, PathBuf::from("public"));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn log_levels_order_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
    }

    #[test]
    fn cache_policy_distinguishes_html_resume_and_assets() {
        assert_eq!(cache_policy("/about_me", "text/html; charset=utf-8", 60), "no-cache");
        assert_eq!(
            cache_policy("/resume.pdf", "application/pdf", 60),
            "public, max-age=3600"
        );
        assert_eq!(cache_policy("/rome.jpg", "image/jpeg", 60), "public, max-age=60");
    }

    #[test]
    fn cache_policy_without_content_type_goes_by_path() {
        assert_eq!(cache_policy("/experience", "", 60), "no-cache");
        assert_eq!(cache_policy("/index.html", "", 60), "no-cache");
        assert_eq!(cache_policy("/resume.pdf", "", 60), "public, max-age=3600");
        assert_eq!(cache_policy("/un1.jpeg", "", 60), "public, max-age=60");
    }

    #[test]
    fn outcome_separates_routes_from_missing_files() {
        let html = "text/html";
        assert_eq!(
            ServeOutcome::classify("/about_me", StatusCode::OK, html),
            ServeOutcome::AppShell
        );
        assert_eq!(
            ServeOutcome::classify("/missing.pdf", StatusCode::OK, html),
            ServeOutcome::MissingAsset
        );
        assert_eq!(ServeOutcome::classify("/", StatusCode::OK, html), ServeOutcome::File);
        assert_eq!(
            ServeOutcome::classify("/index.html", StatusCode::OK, html),
            ServeOutcome::File
        );
        assert_eq!(
            ServeOutcome::classify("/resume.pdf", StatusCode::OK, "application/pdf"),
            ServeOutcome::File
        );
        assert_eq!(
            ServeOutcome::classify("/rome.jpg", StatusCode::NOT_MODIFIED, ""),
            ServeOutcome::NotModified
        );
    }

    #[test]
    fn incoming_request_id_is_reused_when_printable() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  abc-123 "));
        assert_eq!(resolve_request_id(&headers), "abc-123");

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("two words"));
        assert!(resolve_request_id(&headers).starts_with("site-"));

        let oversized = "x".repeat(REQUEST_ID_MAX_LEN + 1);
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(&oversized).expect("header value"),
        );
        assert!(resolve_request_id(&headers).starts_with("site-"));
    }

    #[test]
    fn generated_request_ids_are_distinct() {
        let first = resolve_request_id(&HeaderMap::new());
        let second = resolve_request_id(&HeaderMap::new());
        assert!(first.starts_with("site-"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn deep_link_falls_back_to_index_html() {
        let dist_dir = test_dist_dir("fallback");
        let response = get(build_router(test_config(dist_dir.clone())), "/about_me", "").await;

        assert!(response.starts_with("http/1.1 200"));
        assert!(response.contains("cache-control: no-cache"));
        assert!(response.contains("<div id=\"app\"></div>"));
        let _ = fs::remove_dir_all(dist_dir);
    }

    #[tokio::test]
    async fn resume_is_served_with_short_cache_and_request_id() {
        let dist_dir = test_dist_dir("resume");
        let response = get(
            build_router(test_config(dist_dir.clone())),
            "/resume.pdf",
            "x-request-id: trace-7\r\n",
        )
        .await;

        assert!(response.starts_with("http/1.1 200"));
        assert!(response.contains("content-type: application/pdf"));
        assert!(response.contains("cache-control: public, max-age=3600"));
        assert!(response.contains("x-request-id: trace-7"));
        assert!(response.contains("%pdf-1.4 test"));
        let _ = fs::remove_dir_all(dist_dir);
    }

    #[tokio::test]
    async fn missing_asset_is_not_answered_with_app_shell() {
        let dist_dir = test_dist_dir("missing");
        let response = get(build_router(test_config(dist_dir.clone())), "/cv.pdf", "").await;

        assert!(response.starts_with("http/1.1 404"));
        assert!(!response.contains("<div id=\"app\"></div>"));
        assert!(!response.contains("cache-control"));
        assert!(response.contains("x-request-id: site-"));
        let _ = fs::remove_dir_all(dist_dir);
    }

    #[tokio::test]
    async fn not_modified_asset_keeps_cache_policy() {
        let dist_dir = test_dist_dir("conditional");
        let response = get(
            build_router(test_config(dist_dir.clone())),
            "/rome.jpg",
            "if-modified-since: Fri, 01 Jan 2100 00:00:00 GMT\r\n",
        )
        .await;

        assert!(response.starts_with("http/1.1 304"));
        assert!(response.contains("cache-control: public, max-age=86400"));
        let _ = fs::remove_dir_all(dist_dir);
    }
}
