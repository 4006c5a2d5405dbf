//! Analysis orchestrator
//!
//! The one component with real state-transition logic. Owns the pending
//! address/network input, the lifecycle of the single in-flight analysis
//! request, and the current published result. Consumers subscribe for
//! snapshots and never write back.
//!
//! Request supersession is last-request-wins: every `submit` allocates a
//! monotonically increasing token, and a response is only applied if its
//! token still matches the latest issued one. Stale responses are discarded
//! without any state change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::client::AnalysisApi;
use crate::models::{AnalysisError, ApiResult, Network, WalletAnalysisResult};

/// Lifecycle states of the analysis request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    /// No submission yet
    Idle,
    /// Checking the pending input
    Validating,
    /// Exactly one request in flight
    Requesting,
    /// Last submission produced a result
    Success,
    /// Last submission failed; a prior result may still be published
    Failed,
}

/// What consumers see after every transition
#[derive(Debug, Clone)]
pub struct AnalysisSnapshot {
    pub state: AnalysisState,
    /// Last successful result; survives failed re-submissions
    pub result: Option<Arc<WalletAnalysisResult>>,
    /// Current error message, if the last submission failed
    pub error: Option<String>,
    pub is_loading: bool,
}

type Subscriber = Box<dyn Fn(&AnalysisSnapshot) + Send + Sync>;

struct Inner {
    address: String,
    network: Network,
    state: AnalysisState,
    result: Option<Arc<WalletAnalysisResult>>,
    error: Option<String>,
}

impl Inner {
    fn snapshot(&self) -> AnalysisSnapshot {
        AnalysisSnapshot {
            state: self.state,
            result: self.result.clone(),
            error: self.error.clone(),
            is_loading: self.state == AnalysisState::Requesting,
        }
    }
}

/// State machine owning address/network selection and the in-flight request
pub struct AnalysisOrchestrator {
    api: Arc<dyn AnalysisApi>,
    inner: RwLock<Inner>,
    /// Latest issued request token; compared at resolution time
    seq: AtomicU64,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl AnalysisOrchestrator {
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        Self {
            api,
            inner: RwLock::new(Inner {
                address: String::new(),
                network: Network::default(),
                state: AnalysisState::Idle,
                result: None,
                error: None,
            }),
            seq: AtomicU64::new(0),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Update the pending address. Legal in any state; does not touch an
    /// in-flight request.
    pub fn set_address(&self, address: impl Into<String>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.address = address.into();
        }
    }

    /// Update the pending network. Legal in any state.
    pub fn set_network(&self, network: Network) {
        if let Ok(mut inner) = self.inner.write() {
            inner.network = network;
        }
    }

    pub fn address(&self) -> String {
        self.inner
            .read()
            .map(|inner| inner.address.clone())
            .unwrap_or_default()
    }

    pub fn network(&self) -> Network {
        self.inner
            .read()
            .map(|inner| inner.network)
            .unwrap_or_default()
    }

    /// Current published state, result and error
    pub fn snapshot(&self) -> AnalysisSnapshot {
        self.inner
            .read()
            .map(|inner| inner.snapshot())
            .unwrap_or(AnalysisSnapshot {
                state: AnalysisState::Idle,
                result: None,
                error: None,
                is_loading: false,
            })
    }

    /// Register a consumer. It is invoked synchronously with a snapshot on
    /// every transition. Callbacks must not register further subscribers.
    pub fn subscribe(&self, consumer: impl Fn(&AnalysisSnapshot) + Send + Sync + 'static) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.push(Box::new(consumer));
        }
    }

    /// Apply a mutation and notify every subscriber with the new snapshot
    fn transition<F: FnOnce(&mut Inner)>(&self, mutate: F) {
        let snapshot = match self.inner.write() {
            Ok(mut inner) => {
                mutate(&mut inner);
                inner.snapshot()
            }
            Err(_) => return,
        };

        if let Ok(subscribers) = self.subscribers.read() {
            for subscriber in subscribers.iter() {
                subscriber(&snapshot);
            }
        }
    }

    /// Submit the pending (address, network) for analysis.
    ///
    /// An empty trimmed address fails validation and issues no network call.
    /// Otherwise exactly one client call is made; overlapping submissions
    /// supersede it and its response is discarded on arrival.
    pub async fn submit(&self) {
        // Superseding happens here: allocating the token up front means any
        // in-flight response resolves against a newer value and is dropped,
        // even when this submission fails validation.
        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        let (address, network) = {
            match self.inner.read() {
                Ok(inner) => (inner.address.trim().to_string(), inner.network),
                Err(_) => return,
            }
        };

        self.transition(|inner| inner.state = AnalysisState::Validating);

        if address.is_empty() {
            let err = AnalysisError::validation("Please enter a wallet address");
            warn!("Submission rejected: {}", err);
            self.transition(|inner| {
                inner.state = AnalysisState::Failed;
                inner.error = Some(err.message().to_string());
            });
            return;
        }

        self.transition(|inner| {
            inner.state = AnalysisState::Requesting;
            inner.error = None;
        });

        let outcome = self.api.fetch_analysis(&address, network).await;
        self.apply_outcome(token, outcome);
    }

    /// Apply a resolved outcome if its token is still the latest one.
    ///
    /// The token comparison happens inside the `inner` write lock, in the
    /// same critical section as the mutation: a concurrent submit that
    /// publishes first cannot be overwritten by a superseded response that
    /// had already passed a lock-free check.
    fn apply_outcome(&self, token: u64, outcome: ApiResult<WalletAnalysisResult>) {
        let snapshot = match self.inner.write() {
            Ok(mut inner) => {
                if self.seq.load(Ordering::SeqCst) != token {
                    debug!("Discarding stale analysis response (token {})", token);
                    return;
                }

                match outcome {
                    Ok(result) => {
                        info!(
                            "✅ Analysis complete for {} on {}: score {} ({})",
                            result.address, result.network, result.score, result.risk_level
                        );
                        inner.state = AnalysisState::Success;
                        inner.result = Some(Arc::new(result));
                        inner.error = None;
                    }
                    Err(err) => {
                        warn!("Analysis failed: {}", err);
                        // The prior result stays published so consumers keep
                        // rendering stale-but-valid data next to the error.
                        inner.state = AnalysisState::Failed;
                        inner.error = Some(err.message().to_string());
                    }
                }

                inner.snapshot()
            }
            Err(_) => return,
        };

        if let Ok(subscribers) = self.subscribers.read() {
            for subscriber in subscribers.iter() {
                subscriber(&snapshot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiResult, RiskLevel};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    fn sample_result(score: u8) -> WalletAnalysisResult {
        WalletAnalysisResult {
            address: "0xABC".to_string(),
            network: Network::Ethereum,
            score,
            risk_level: RiskLevel::for_score(score),
            total_value: "1 ETH".to_string(),
            transaction_count: 1,
            avg_transaction: "1 ETH".to_string(),
            active_since: "2022-01-01".to_string(),
            metrics: vec![],
            recent_transactions: vec![],
            activities: vec![],
            last_updated: "2025-03-14T10:00:00Z".to_string(),
        }
    }

    struct CountingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisApi for CountingApi {
        async fn fetch_analysis(
            &self,
            _address: &str,
            _network: Network,
        ) -> ApiResult<WalletAnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_result(84))
        }

        async fn fetch_assistant_reply(&self, _query: &str) -> ApiResult<String> {
            Ok("ok".to_string())
        }
    }

    #[tokio::test]
    async fn test_empty_address_is_validation_failure_without_network_call() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = AnalysisOrchestrator::new(api.clone());

        for address in ["", "   ", "\t\n"] {
            orchestrator.set_address(address);
            orchestrator.submit().await;

            let snapshot = orchestrator.snapshot();
            assert_eq!(snapshot.state, AnalysisState::Failed);
            assert!(snapshot.error.is_some());
            assert!(snapshot.result.is_none());
        }

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_superseded_outcome_is_not_applied_even_after_resolution() {
        // A response that resolved before a newer submission published, but
        // whose token is no longer the latest when the lock is taken, must
        // leave the published state untouched.
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = AnalysisOrchestrator::new(api);

        orchestrator.set_address("0xABC...123");
        orchestrator.submit().await;
        let published = orchestrator.snapshot();
        assert_eq!(published.state, AnalysisState::Success);
        assert_eq!(published.result.as_ref().unwrap().score, 84);

        // A newer submission has been issued in the meantime
        let stale_token = orchestrator.seq.load(Ordering::SeqCst);
        orchestrator.seq.fetch_add(1, Ordering::SeqCst);

        orchestrator.apply_outcome(stale_token, Ok(sample_result(12)));
        let after_stale_ok = orchestrator.snapshot();
        assert_eq!(after_stale_ok.state, AnalysisState::Success);
        assert_eq!(after_stale_ok.result.as_ref().unwrap().score, 84);

        orchestrator.apply_outcome(stale_token, Err(AnalysisError::transport("late failure")));
        let after_stale_err = orchestrator.snapshot();
        assert_eq!(after_stale_err.state, AnalysisState::Success);
        assert!(after_stale_err.error.is_none());

        // The latest token still applies
        let current_token = orchestrator.seq.load(Ordering::SeqCst);
        orchestrator.apply_outcome(current_token, Ok(sample_result(55)));
        let after_current = orchestrator.snapshot();
        assert_eq!(after_current.state, AnalysisState::Success);
        assert_eq!(after_current.result.as_ref().unwrap().score, 55);
    }

    #[tokio::test]
    async fn test_stale_outcome_does_not_notify_subscribers() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = AnalysisOrchestrator::new(api);

        orchestrator.set_address("0xABC...123");
        orchestrator.submit().await;

        let notifications = Arc::new(AtomicUsize::new(0));
        let sink = notifications.clone();
        orchestrator.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let stale_token = orchestrator.seq.load(Ordering::SeqCst);
        orchestrator.seq.fetch_add(1, Ordering::SeqCst);
        orchestrator.apply_outcome(stale_token, Ok(sample_result(12)));

        assert_eq!(notifications.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_submit_publishes_result() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = AnalysisOrchestrator::new(api.clone());

        orchestrator.set_address("  0xABC...123  ");
        orchestrator.submit().await;

        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.state, AnalysisState::Success);
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());

        let result = snapshot.result.expect("result published");
        assert_eq!(result.score, 84);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified_on_every_transition() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = AnalysisOrchestrator::new(api);

        let seen = Arc::new(RwLock::new(Vec::new()));
        let sink = seen.clone();
        orchestrator.subscribe(move |snapshot| {
            if let Ok(mut states) = sink.write() {
                states.push(snapshot.state);
            }
        });

        orchestrator.set_address("0xABC");
        orchestrator.submit().await;

        let states = seen.read().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(
            states,
            vec![
                AnalysisState::Validating,
                AnalysisState::Requesting,
                AnalysisState::Success
            ]
        );
    }

    #[tokio::test]
    async fn test_loading_flag_during_request() {
        let api = Arc::new(CountingApi {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = AnalysisOrchestrator::new(api);

        let saw_loading = Arc::new(RwLock::new(false));
        let sink = saw_loading.clone();
        orchestrator.subscribe(move |snapshot| {
            if snapshot.state == AnalysisState::Requesting {
                if let Ok(mut flag) = sink.write() {
                    *flag = snapshot.is_loading;
                }
            }
        });

        orchestrator.set_address("0xABC");
        orchestrator.submit().await;

        assert!(saw_loading.read().map(|f| *f).unwrap_or(false));
    }
}
