//! Request context middleware.
//! Binds a `RequestContext` to every request and logs its start and completion.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::http::request::{RequestContext, X_REQUEST_ID};
use crate::observability::Logger;

/// Middleware function; install with `axum::middleware::from_fn_with_state`.
///
/// Handlers reach the context through `Extension<Arc<RequestContext>>`.
pub async fn request_context_middleware(
    State(logger): State<Arc<Logger>>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = Arc::new(RequestContext::from_request(&request));
    request.extensions_mut().insert(Arc::clone(&ctx));

    logger.verbose(Some(&*ctx), "Request started");

    let mut response = next.run(request).await;
    ctx.record_response(&response);

    if !response.headers().contains_key(X_REQUEST_ID) {
        if let Some(value) = ctx
            .request_id()
            .and_then(|id| HeaderValue::from_str(&id).ok())
        {
            response.headers_mut().insert(X_REQUEST_ID, value);
        }
    }

    logger.info(Some(&*ctx), "Request completed");
    response
}
