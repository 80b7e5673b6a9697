//! Request-scoped logging context.
//!
//! # Responsibilities
//! - Seed a `Context` from the incoming request (ID, peer, method, URL, referer, start)
//! - Hold per-request values that logging calls read and write back
//! - Expose response headers once the handler has produced a response
//!
//! # Design Decisions
//! - Request ID taken from `x-request-id` when present, UUID v4 otherwise
//! - Per-request values live in a concurrent map; one task per request is
//!   expected to log, concurrent writers race on `segmentStart`
//! - Response headers are swapped in atomically after the handler returns

use arc_swap::ArcSwap;
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, HeaderName, Request, Response};
use chrono::Utc;
use dashmap::DashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::context::{Context, ContextKey, ContextValue, LogContext, ResponseMetadata};

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Header carrying the original client address behind proxies.
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Logging context bound to one HTTP request.
pub struct RequestContext {
    base: Context,
    values: DashMap<String, ContextValue>,
    response_headers: ArcSwap<HeaderMap>,
}

impl RequestContext {
    /// Wrap an existing context.
    pub fn new(base: Context) -> Self {
        Self {
            base,
            values: DashMap::new(),
            response_headers: ArcSwap::from_pointee(HeaderMap::new()),
        }
    }

    /// Build a context from request metadata.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let headers = request.headers();
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let request_id = header_str(X_REQUEST_ID.as_str())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let request_ip = header_str(X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .or_else(|| {
                request
                    .extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        let mut base = Context::background()
            .with_value(ContextKey::RequestStart, Utc::now())
            .with_value(ContextKey::RequestId, request_id)
            .with_value(ContextKey::RequestMethod, request.method().as_str())
            .with_value(ContextKey::RequestUrl, request.uri().to_string());
        if let Some(ip) = request_ip {
            base = base.with_value(ContextKey::RequestIp, ip);
        }
        if let Some(referer) = header_str(header::REFERER.as_str()) {
            base = base.with_value(ContextKey::Referer, referer);
        }
        Self::new(base)
    }

    /// The immutable context this request started with.
    pub fn base(&self) -> &Context {
        &self.base
    }

    /// Correlation ID of this request.
    pub fn request_id(&self) -> Option<String> {
        self.get(ContextKey::RequestId.name())
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Record status, length and headers of the produced response.
    pub fn record_response<B>(&self, response: &Response<B>) {
        self.set(
            ContextKey::ResponseCode.name(),
            ContextValue::Uint(response.status().as_u16().into()),
        );
        if let Some(length) = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.set(ContextKey::ResponseLength.name(), ContextValue::Uint(length));
        }
        self.response_headers.store(Arc::new(response.headers().clone()));
    }
}

impl ResponseMetadata for RequestContext {
    fn get(&self, name: &str) -> Option<ContextValue> {
        self.values
            .get(name)
            .map(|entry| entry.value().clone())
            .or_else(|| ContextKey::from_name(name).and_then(|key| self.base.get(key).cloned()))
    }

    fn set(&self, name: &str, value: ContextValue) {
        self.values.insert(name.to_string(), value);
    }

    fn response_header(&self, name: &str) -> Option<String> {
        self.response_headers
            .load()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

impl LogContext for RequestContext {
    fn value(&self, key: ContextKey) -> Option<ContextValue> {
        self.get(key.name())
    }

    fn response_metadata(&self) -> Option<&dyn ResponseMetadata> {
        Some(self)
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("base", &self.base)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}
