//! Resource bindings: one endpoint, one phase machine, one owner.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use apo_api::{ApiError, ApiRequest, ApiService, CallOutcome, Method, RemoteCall, ResponseInterceptor};

use crate::phase::LoadPhase;

/// Configuration of one resource binding.
pub struct BindingConfig<T> {
    /// HTTP method of the bound operation.
    pub method: Method,
    /// Endpoint path of the bound operation.
    pub endpoint: String,
    /// Request payload; replaced through [`ResourceSync::set_params`].
    pub params: Value,
    /// Optional response-shaping step, applied before typed decoding.
    pub interceptor: Option<ResponseInterceptor>,
    /// Value exposed as `data` until the first publication.
    pub initial_data: T,
    /// Whether the binding starts in `Loading` (the default) or waits in
    /// `Idle` for an explicit first trigger.
    pub auto_load: bool,
}

impl<T> BindingConfig<T> {
    /// Create a config with no payload and auto-load enabled.
    pub fn new(method: Method, endpoint: impl Into<String>, initial_data: T) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: Value::Null,
            interceptor: None,
            initial_data,
            auto_load: true,
        }
    }

    /// Attach a request payload.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Attach a response-shaping interceptor.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: ResponseInterceptor) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Opt out of the initial `Loading` phase; the binding stays `Idle`
    /// until the first explicit trigger.
    #[must_use]
    pub fn manual_start(mut self) -> Self {
        self.auto_load = false;
        self
    }
}

/// The view a screen renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSnapshot<T> {
    /// Last published payload, or the initial value before first
    /// publication.
    pub data: T,
    /// Current loading phase.
    pub phase: LoadPhase,
    /// True once the first fetch has settled, successfully or not.
    pub initialized: bool,
}

struct BindingState<T> {
    data: T,
    phase: LoadPhase,
    initialized: bool,
    params: Value,
    last_refresh_error: Option<ApiError>,
}

/// Tri-phase state machine around one [`RemoteCall`].
///
/// The mutex guards only short synchronous sections; it is never held
/// across an await, so overlapping triggers interleave at the transport
/// and are ordered by the call's supersession bookkeeping.
pub struct ResourceSync<T> {
    call: RemoteCall,
    method: Method,
    endpoint: String,
    interceptor: Option<ResponseInterceptor>,
    state: Mutex<BindingState<T>>,
}

impl<T> ResourceSync<T>
where
    T: DeserializeOwned + Clone,
{
    /// Bind an endpoint. The phase starts at `Loading` unless the config
    /// opted out; no request is issued until the first [`trigger`].
    ///
    /// [`trigger`]: Self::trigger
    pub fn bind(service: Arc<dyn ApiService>, config: BindingConfig<T>) -> Self {
        let phase = if config.auto_load {
            LoadPhase::Loading
        } else {
            LoadPhase::Idle
        };

        Self {
            call: RemoteCall::new(service),
            method: config.method,
            endpoint: config.endpoint,
            interceptor: config.interceptor,
            state: Mutex::new(BindingState {
                data: config.initial_data,
                phase,
                initialized: false,
                params: config.params,
                last_refresh_error: None,
            }),
        }
    }

    /// Issue the bound call.
    ///
    /// Triggers are never deduplicated by content; a trigger issued while
    /// another is in flight supersedes it, and the visible phase never
    /// regresses from `Ready`/`Updating` back to `Loading`.
    pub async fn trigger(&self) {
        let (request, refreshing) = {
            let mut state = self.state.lock().unwrap();
            // Loading is reserved for fetches with nothing to show yet;
            // once data is on screen, refreshes run as Updating.
            let refreshing = matches!(state.phase, LoadPhase::Ready | LoadPhase::Updating);
            state.phase = if refreshing {
                LoadPhase::Updating
            } else {
                LoadPhase::Loading
            };
            let request = ApiRequest::new(self.method, self.endpoint.clone())
                .with_params(state.params.clone());
            (request, refreshing)
        };

        let outcome = self.call.invoke(&request, self.interceptor.as_ref()).await;

        let mut state = self.state.lock().unwrap();
        match outcome {
            Ok(CallOutcome::Superseded) => {
                // A newer trigger owns the phase now.
            }
            Ok(CallOutcome::Published(value)) => match serde_json::from_value::<T>(value) {
                Ok(data) => {
                    state.data = data;
                    state.phase = LoadPhase::Ready;
                    state.initialized = true;
                }
                Err(err) => {
                    self.record_failure(&mut state, refreshing, ApiError::Decode(err.to_string()));
                }
            },
            Err(err) => self.record_failure(&mut state, refreshing, err),
        }
    }

    /// Replace the request payload, re-fetching when it actually changed.
    ///
    /// Params are compared structurally; setting an equal payload is a
    /// no-op and does not issue a request.
    pub async fn set_params(&self, params: Value) {
        let changed = {
            let mut state = self.state.lock().unwrap();
            if state.params == params {
                false
            } else {
                state.params = params;
                true
            }
        };

        if changed {
            debug!(endpoint = %self.endpoint, "params changed; re-fetching");
            self.trigger().await;
        }
    }

    /// Current view of the binding.
    pub fn snapshot(&self) -> SyncSnapshot<T> {
        let state = self.state.lock().unwrap();
        SyncSnapshot {
            data: state.data.clone(),
            phase: state.phase,
            initialized: state.initialized,
        }
    }

    /// Take the failure of the most recent background refresh, if any.
    ///
    /// Background-refresh failures keep the last-good data and the `Ready`
    /// phase; this side channel is how they stay observable.
    pub fn last_refresh_error(&self) -> Option<ApiError> {
        self.state.lock().unwrap().last_refresh_error.take()
    }

    /// Tear the binding down: any in-flight resolution is dropped.
    ///
    /// Idempotent; also run on `Drop`.
    pub fn detach(&self) {
        self.call.supersede();
    }

    fn record_failure(&self, state: &mut BindingState<T>, refreshing: bool, err: ApiError) {
        state.initialized = true;
        if refreshing {
            // A failed background refresh keeps the last-good data.
            warn!(endpoint = %self.endpoint, error = %err, "background refresh failed; keeping last-good data");
            state.phase = LoadPhase::Ready;
        } else {
            state.phase = LoadPhase::Error;
        }
        state.last_refresh_error = Some(err);
    }
}

impl<T> Drop for ResourceSync<T> {
    fn drop(&mut self) {
        self.call.supersede();
    }
}
