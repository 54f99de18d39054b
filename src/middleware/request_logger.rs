//! Per-request access logging.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::API_KEY_HEADER;

/// Number of API key characters kept in logs.
const KEY_PREFIX_LEN: usize = 4;

/// Masks an API key down to a short prefix.
pub fn mask_api_key(key: Option<&str>) -> String {
    match key {
        None => "none".to_string(),
        Some(k) if k.chars().count() <= KEY_PREFIX_LEN * 2 => "***".to_string(),
        Some(k) => {
            let prefix: String = k.chars().take(KEY_PREFIX_LEN).collect();
            format!("{}***", prefix)
        }
    }
}

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

/// Request logger middleware service.
pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let api_key = mask_api_key(
            req.headers()
                .get(API_KEY_HEADER)
                .and_then(|v| v.to_str().ok()),
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status().as_u16();
            let duration_ms = start.elapsed().as_millis() as u64;

            if res.status().is_server_error() {
                error!(target: "api", %method, %path, status, duration_ms, %api_key, "Request failed");
            } else if res.status().is_client_error() {
                warn!(target: "api", %method, %path, status, duration_ms, %api_key, "Request rejected");
            } else {
                info!(target: "api", %method, %path, status, duration_ms, %api_key, "Request completed");
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key(None), "none");
        assert_eq!(mask_api_key(Some("short")), "***");
        assert_eq!(mask_api_key(Some("abcd1234efgh5678")), "abcd***");
    }
}
