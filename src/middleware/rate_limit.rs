use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use governor::{DefaultKeyedRateLimiter, Quota};
use std::future::{ready, Ready};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::AppError;

/// Health checks are never limited
const UNLIMITED_PATHS: [&str; 2] = ["/health", "/ready"];

/// Per-caller rate limiting keyed by peer IP. Clones share the same buckets.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
    requests_per_hour: u32,
}

impl RateLimiter {
    /// Allow each caller `requests_per_hour`, replenished continuously
    pub fn per_hour(requests_per_hour: u32) -> crate::core::Result<Self> {
        let quota = NonZeroU32::new(requests_per_hour).ok_or_else(|| {
            AppError::Configuration("Rate limit must be greater than 0".to_string())
        })?;

        Ok(Self {
            limiter: Arc::new(DefaultKeyedRateLimiter::keyed(Quota::per_hour(quota))),
            requests_per_hour,
        })
    }

    /// Drop callers whose bucket has fully refilled
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Callers currently holding a bucket
    pub fn tracked_callers(&self) -> usize {
        self.limiter.len()
    }

    /// Prune on a fixed interval for the lifetime of the process
    pub fn spawn_pruner(&self, every: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let before = limiter.tracked_callers();
                limiter.prune();
                tracing::debug!(
                    before,
                    after = limiter.tracked_callers(),
                    "Rate limit buckets pruned"
                );
            }
        })
    }
}

fn caller_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            requests_per_hour: self.requests_per_hour,
        }))
    }
}

pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
    requests_per_hour: u32,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let limiter = self.limiter.clone();
        let requests_per_hour = self.requests_per_hour;

        Box::pin(async move {
            if UNLIMITED_PATHS.contains(&req.path()) {
                return svc.call(req).await.map(|res| res.map_into_right_body());
            }

            let key = caller_key(&req);
            match limiter.check_key(&key) {
                Ok(_) => svc.call(req).await.map(|res| res.map_into_right_body()),
                Err(_) => {
                    tracing::warn!(caller = %key, path = %req.path(), "Rate limit exceeded");
                    let error = AppError::RateLimitExceeded(format!(
                        "Maximum {} requests per hour",
                        requests_per_hour
                    ));
                    Ok(req
                        .into_response(error.error_response())
                        .map_into_left_body())
                }
            }
        })
    }
}
