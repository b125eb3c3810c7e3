//! The quantity debouncer: many local edits, at most one remote mutation
//! per quiet window.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use apo_api::{ApiError, ApiRequest, ApiService, Method};

use crate::config::CartSyncConfig;
use crate::mutation::{CART_ENDPOINT, CartMutation};

struct DebounceState {
    /// Latest locally-set quantity, not yet known to be remote.
    pending: Option<u32>,
    /// Last quantity known to be persisted remotely.
    last_synced: Option<u32>,
    /// Bumped on every edit and on cancel; a timer that wakes up under a
    /// stale generation fires nothing.
    generation: u64,
    /// Failure of the most recent fired mutation, until taken.
    last_failure: Option<ApiError>,
}

/// Collapses rapid quantity edits on one cart line into a single delayed
/// remote mutation.
///
/// Every [`set_quantity`](Self::set_quantity) re-arms the timer; only the
/// last value of a quiet window is sent, and only when it differs from the
/// last value known synced. A mutation that is already in flight when a
/// newer edit arrives is not aborted — its result simply no longer clears
/// the pending value. Failures are never retried; they are surfaced through
/// [`flush`](Self::flush) or [`last_failure`](Self::last_failure) for UI
/// notification only.
///
/// Must be used inside a tokio runtime: the timer is a spawned task, owned
/// by the debouncer and aborted on re-arm, [`cancel`](Self::cancel) and
/// drop.
pub struct QuantityDebouncer {
    service: Arc<dyn ApiService>,
    config: CartSyncConfig,
    item_id: u64,
    item_name: String,
    shared: Arc<Mutex<DebounceState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl QuantityDebouncer {
    /// Create a debouncer for one cart line.
    pub fn new(
        service: Arc<dyn ApiService>,
        config: CartSyncConfig,
        item_id: u64,
        item_name: impl Into<String>,
    ) -> Self {
        Self {
            service,
            config,
            item_id,
            item_name: item_name.into(),
            shared: Arc::new(Mutex::new(DebounceState {
                pending: None,
                last_synced: None,
                generation: 0,
                last_failure: None,
            })),
            timer: Mutex::new(None),
        }
    }

    /// Seed the quantity currently persisted remotely, so an edit back to
    /// it sends nothing.
    pub fn mark_synced(&self, quantity: u32) {
        self.shared.lock().unwrap().last_synced = Some(quantity);
    }

    /// Record a local edit and (re-)arm the debounce timer.
    pub fn set_quantity(&self, quantity: u32) {
        let generation = {
            let mut state = self.shared.lock().unwrap();
            state.pending = Some(quantity);
            state.generation += 1;
            state.generation
        };
        self.abort_timer();

        let shared = Arc::clone(&self.shared);
        let service = Arc::clone(&self.service);
        let mutation =
            CartMutation::set(self.item_id, self.item_name.clone(), 0, self.config.show_snack);
        let delay = Duration::from_millis(self.config.delay_ms);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let quantity = {
                let mut state = shared.lock().unwrap();
                if state.generation != generation {
                    return;
                }
                match state.pending {
                    Some(value) if state.last_synced != Some(value) => value,
                    _ => {
                        // Nothing new to say to the server.
                        state.pending = None;
                        return;
                    }
                }
            };

            // The send itself is detached: a newer edit aborts the quiet
            // window, never a mutation already on the wire.
            let mutation = CartMutation { quantity, ..mutation };
            tokio::spawn(async move {
                match send_mutation(service.as_ref(), &mutation).await {
                    Ok(_) => {
                        debug!(id = mutation.id, quantity, "cart quantity synced");
                        let mut state = shared.lock().unwrap();
                        state.last_synced = Some(quantity);
                        if state.generation == generation {
                            state.pending = None;
                        }
                    }
                    Err(err) => {
                        warn!(id = mutation.id, error = %err, "cart mutation failed");
                        shared.lock().unwrap().last_failure = Some(err);
                    }
                }
            });
        });
        *self.timer.lock().unwrap() = Some(handle);
    }

    /// Cancel the timer and send any pending quantity immediately.
    ///
    /// Returns the transport result so callers can notify the user; a
    /// pending value equal to the last-synced one sends nothing.
    pub async fn flush(&self) -> apo_api::Result<()> {
        self.cancel();

        let quantity = {
            let mut state = self.shared.lock().unwrap();
            match state.pending.take() {
                Some(value) if state.last_synced != Some(value) => value,
                _ => return Ok(()),
            }
        };

        let mutation = CartMutation::set(
            self.item_id,
            self.item_name.clone(),
            quantity,
            self.config.show_snack,
        );
        send_mutation(self.service.as_ref(), &mutation).await?;
        self.shared.lock().unwrap().last_synced = Some(quantity);
        Ok(())
    }

    /// Clear the timer without firing. Permanent until the next edit; also
    /// run on drop.
    pub fn cancel(&self) {
        self.abort_timer();
        // Fence against a timer that already woke but has not read state.
        self.shared.lock().unwrap().generation += 1;
    }

    /// Take the failure of the most recent fired mutation, if any.
    pub fn last_failure(&self) -> Option<ApiError> {
        self.shared.lock().unwrap().last_failure.take()
    }

    fn abort_timer(&self) {
        if let Some(handle) = self.timer.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for QuantityDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn send_mutation(service: &dyn ApiService, mutation: &CartMutation) -> apo_api::Result<Value> {
    let params = serde_json::to_value(mutation)?;
    let request = ApiRequest::new(Method::Post, CART_ENDPOINT).with_params(params);
    service.call(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Records every issued mutation; optionally fails them all.
    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<Value>>,
        fail: bool,
    }

    impl RecordingService {
        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn quantities(&self) -> Vec<u64> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|params| params["quantity"].as_u64().unwrap())
                .collect()
        }
    }

    #[async_trait]
    impl ApiService for RecordingService {
        async fn call(&self, request: &ApiRequest) -> apo_api::Result<Value> {
            self.calls.lock().unwrap().push(request.params.clone());
            if self.fail {
                return Err(ApiError::Network("connection reset".to_string()));
            }
            Ok(json!({"ok": true}))
        }
    }

    fn debouncer(service: Arc<RecordingService>) -> QuantityDebouncer {
        QuantityDebouncer::new(service, CartSyncConfig::default(), 42, "Aspirin 500mg")
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_to_last_value() {
        let service = Arc::new(RecordingService::default());
        let sync = debouncer(Arc::clone(&service));

        // 3, then 5, then 4, all within 100ms of a 250ms window.
        sync.set_quantity(3);
        tokio::time::advance(Duration::from_millis(50)).await;
        sync.set_quantity(5);
        tokio::time::advance(Duration::from_millis(50)).await;
        sync.set_quantity(4);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(service.quantities(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_windows_fire_separately() {
        let service = Arc::new(RecordingService::default());
        let sync = debouncer(Arc::clone(&service));

        sync.set_quantity(2);
        tokio::time::sleep(Duration::from_millis(600)).await;

        sync.set_quantity(7);
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(service.quantities(), vec![2, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_synced_value_sends_nothing() {
        let service = Arc::new(RecordingService::default());
        let sync = debouncer(Arc::clone(&service));
        sync.mark_synced(4);

        sync.set_quantity(4);
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(service.quantities().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_clears_the_timer() {
        let service = Arc::new(RecordingService::default());
        let sync = debouncer(Arc::clone(&service));

        sync.set_quantity(9);
        sync.cancel();
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(service.quantities().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_the_timer() {
        let service = Arc::new(RecordingService::default());
        {
            let sync = debouncer(Arc::clone(&service));
            sync.set_quantity(9);
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(service.quantities().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_sends_immediately() {
        let service = Arc::new(RecordingService::default());
        let sync = debouncer(Arc::clone(&service));

        sync.set_quantity(6);
        sync.flush().await.unwrap();
        assert_eq!(service.quantities(), vec![6]);

        // The timer is gone: nothing fires again later.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(service.quantities(), vec![6]);

        // Nothing pending: flushing again is a no-op.
        sync.flush().await.unwrap();
        assert_eq!(service.quantities(), vec![6]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_failure_is_recorded_not_retried() {
        let service = Arc::new(RecordingService::failing());
        let sync = debouncer(Arc::clone(&service));

        sync.set_quantity(3);
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(service.quantities(), vec![3]);
        assert!(matches!(sync.last_failure(), Some(ApiError::Network(_))));
        assert!(sync.last_failure().is_none());

        // No retry happened.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(service.quantities(), vec![3]);
    }

    #[tokio::test]
    async fn test_flush_surfaces_failure_to_caller() {
        let service = Arc::new(RecordingService::failing());
        let sync = debouncer(Arc::clone(&service));

        sync.set_quantity(3);
        let err = sync.flush().await.unwrap_err();
        assert!(!err.is_external());
    }

    #[tokio::test(start_paused = true)]
    async fn test_payload_carries_item_identity() {
        let service = Arc::new(RecordingService::default());
        let sync = debouncer(Arc::clone(&service));

        sync.set_quantity(2);
        tokio::time::sleep(Duration::from_millis(600)).await;

        let calls = service.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![json!({
                "id": 42,
                "name": "Aspirin 500mg",
                "quantity": 2,
                "quantityAction": "set",
                "showSnack": false,
            })]
        );
    }
}
