//! Per-call-site invocation handle with stale-response suppression.
//!
//! A [`RemoteCall`] wraps one logical call-site. Invoking it while an
//! earlier invocation is still in flight supersedes that invocation: the
//! newest result is the one published, an older result arriving late is
//! dropped. Suppression is bookkeeping only; the transport request itself
//! is allowed to complete and its response is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::request::ApiRequest;
use crate::service::ApiService;

/// Optional response-shaping step, applied exactly once before a result is
/// published. An error here rejects the call like a transport failure.
pub type ResponseInterceptor = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// What became of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// The response was the newest for this call-site and is published.
    Published(Value),
    /// A newer invocation was issued while this one was in flight; the
    /// response is dropped.
    Superseded,
}

impl CallOutcome {
    /// The published response, if this outcome carries one.
    #[must_use]
    pub fn into_published(self) -> Option<Value> {
        match self {
            Self::Published(value) => Some(value),
            Self::Superseded => None,
        }
    }

    /// Whether this invocation was superseded by a newer one.
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// One logical call-site.
///
/// Stateless between calls except for in-flight tracking: a generation
/// counter records the newest invocation, and only the resolution matching
/// it may publish. Failures of superseded invocations are suppressed the
/// same way as their successes.
pub struct RemoteCall {
    service: Arc<dyn ApiService>,
    generation: AtomicU64,
}

impl RemoteCall {
    /// Create a call-site handle over the given transport.
    pub fn new(service: Arc<dyn ApiService>) -> Self {
        Self {
            service,
            generation: AtomicU64::new(0),
        }
    }

    /// Issue the request, optionally shaping the response before it is
    /// published.
    ///
    /// Pre-flight validation failures short-circuit without issuing a
    /// network call and without superseding an in-flight invocation.
    pub async fn invoke(
        &self,
        request: &ApiRequest,
        interceptor: Option<&ResponseInterceptor>,
    ) -> Result<CallOutcome> {
        request.validate()?;

        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.service.call(request).await;

        if self.generation.load(Ordering::SeqCst) != issued {
            debug!(endpoint = %request.endpoint, "dropping superseded response");
            return Ok(CallOutcome::Superseded);
        }

        let response = result?;
        let shaped = match interceptor {
            Some(shape) => shape(response).map_err(|e| ApiError::Interceptor(e.to_string()))?,
            None => response,
        };

        Ok(CallOutcome::Published(shaped))
    }

    /// Invalidate any in-flight invocation without issuing a new one.
    ///
    /// Used on teardown: results arriving after this are dropped.
    pub fn supersede(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
