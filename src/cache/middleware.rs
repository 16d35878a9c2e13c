use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CacheBackend, CacheError, InMemoryCache};

pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// A buffered response as stored in the page cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: &HeaderMap, body: Vec<u8>) -> Self {
        let headers = headers
            .iter()
            .filter(|(name, _)| *name != header::CONTENT_LENGTH)
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        Self {
            status: status.as_u16(),
            headers,
            body,
        }
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);

        let headers = response.headers_mut();
        for (key, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.append(name, value);
            }
        }
        response
    }
}

#[derive(Debug, Clone)]
pub struct PageCacheOptions {
    pub ttl: Duration,
    pub session_cookie: String,
    pub max_body_size: usize,
    pub enabled: bool,
}

impl Default for PageCacheOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            session_cookie: "sessionid".to_string(),
            max_body_size: 1024 * 1024,
            enabled: true,
        }
    }
}

/// Whole-response cache for anonymous-safe GET pages.
///
/// Entries are keyed by method, full URL and the visitor's session cookie, and
/// are never invalidated by writes: a cached page may be stale for up to `ttl`.
#[derive(Clone)]
pub struct PageCache {
    cache: Arc<InMemoryCache>,
    options: PageCacheOptions,
}

impl PageCache {
    pub fn new(cache: Arc<InMemoryCache>, options: PageCacheOptions) -> Self {
        Self { cache, options }
    }

    pub fn cache_key(&self, method: &Method, uri: &str, headers: &HeaderMap) -> String {
        let session = session_cookie(headers, &self.options.session_cookie).unwrap_or_default();
        format!("page:{}:{}:{}", method, uri, session)
    }

    async fn lookup(&self, key: &str) -> Option<CachedResponse> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CachedResponse>(&raw) {
                Ok(cached) => Some(cached),
                Err(e) => {
                    warn!("Failed to deserialize cached page: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Cache error: {}", e);
                None
            }
        }
    }

    async fn store(&self, key: &str, cached: &CachedResponse) -> Result<(), CacheError> {
        if cached.body.len() > self.options.max_body_size {
            debug!("Response body too large to cache: {} bytes", cached.body.len());
            return Ok(());
        }
        let serialized = serde_json::to_string(cached)?;
        self.cache.set(key, &serialized, Some(self.options.ttl)).await
    }
}

/// Extracts the named cookie's value from the `Cookie` header(s).
pub fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn mark(mut response: Response, status: &'static str) -> Response {
    response.headers_mut().insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static(status),
    );
    response
}

/// Serves GET requests from the page cache, storing fresh 200 responses.
pub async fn page_cache_middleware(
    State(page_cache): State<PageCache>,
    request: Request,
    next: Next,
) -> Response {
    if !page_cache.options.enabled || request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = page_cache.cache_key(request.method(), &request.uri().to_string(), request.headers());

    if let Some(cached) = page_cache.lookup(&key).await {
        debug!(key = %key, "page cache hit");
        metrics::counter!("auroom.page_cache.hit", 1);
        return mark(cached.into_response(), "HIT");
    }
    metrics::counter!("auroom.page_cache.miss", 1);

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            let err = CacheError::OperationFailed(err.to_string());
            warn!(error = %err, "failed to buffer response for page cache");
            return (StatusCode::INTERNAL_SERVER_ERROR, "response body error").into_response();
        }
    };

    let cached = CachedResponse::new(parts.status, &parts.headers, bytes.to_vec());
    if let Err(err) = page_cache.store(&key, &cached).await {
        warn!(error = %err, "failed to store page in cache");
    }

    mark(Response::from_parts(parts, Body::from(bytes)), "MISS")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn counting_app(page_cache: PageCache, hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/catalog",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                        format!("render #{n}")
                    }
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                page_cache,
                page_cache_middleware,
            ))
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sessionid=abc123; csrftoken=x"),
        );
        assert_eq!(
            session_cookie(&headers, "sessionid").as_deref(),
            Some("abc123")
        );
        assert_eq!(session_cookie(&headers, "missing"), None);
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cache = PageCache::new(Arc::new(InMemoryCache::new()), PageCacheOptions::default());
        let app = counting_app(cache, hits.clone());

        let first = app
            .clone()
            .oneshot(get_request("/catalog?page=2", None))
            .await
            .unwrap();
        assert_eq!(first.headers()[CACHE_STATUS_HEADER], "MISS");
        assert_eq!(body_text(first).await, "render #1");

        let second = app
            .oneshot(get_request("/catalog?page=2", None))
            .await
            .unwrap();
        assert_eq!(second.headers()[CACHE_STATUS_HEADER], "HIT");
        assert_eq!(body_text(second).await, "render #1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sessions_and_query_strings_get_separate_entries() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cache = PageCache::new(Arc::new(InMemoryCache::new()), PageCacheOptions::default());
        let app = counting_app(cache, hits.clone());

        for (uri, cookie) in [
            ("/catalog", Some("sessionid=a")),
            ("/catalog", Some("sessionid=b")),
            ("/catalog?sort=name", Some("sessionid=a")),
            ("/catalog", Some("sessionid=a")),
        ] {
            app.clone().oneshot(get_request(uri, cookie)).await.unwrap();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn disabled_cache_passes_through() {
        let hits = Arc::new(AtomicUsize::new(0));
        let options = PageCacheOptions {
            enabled: false,
            ..PageCacheOptions::default()
        };
        let app = counting_app(
            PageCache::new(Arc::new(InMemoryCache::new()), options),
            hits.clone(),
        );
        app.clone().oneshot(get_request("/catalog", None)).await.unwrap();
        app.oneshot(get_request("/catalog", None)).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
