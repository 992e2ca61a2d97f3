//! Session recovery behaviour of the authenticated transport.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use purse_application::{
    ApplicationError, AuthenticatedTransport, CredentialStore, HttpTransport, LoginRedirect,
    MemoryCredentialStore, RefreshPhase, TokenRefresher, TransportError,
};
use purse_domain::{
    ApiRequest, ApiResponse, AuthError, CredentialKey, RefreshResponse, TokenPair,
};
use serde_json::json;
use tokio::sync::Semaphore;

/// Accepts only `valid_token`; answers 401 to anything else.
struct FakeBackend {
    valid_token: String,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    fn accepting(token: &str) -> Arc<Self> {
        Arc::new(Self {
            valid_token: token.to_string(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests_with(&self, token: &str) -> Vec<String> {
        let mut paths: Vec<String> = self
            .requests
            .lock()
            .iter()
            .filter(|r| r.bearer_token() == Some(token))
            .map(|r| r.path.clone())
            .collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().push(request.clone());
        tokio::task::yield_now().await;

        if request.path == "/boom" {
            return Ok(ApiResponse::json(500, &json!({ "message": "boom" })));
        }
        if request.bearer_token() == Some(self.valid_token.as_str()) {
            Ok(ApiResponse::json(200, &json!({ "path": request.path })))
        } else {
            Ok(ApiResponse::empty(401))
        }
    }
}

/// Refresher that blocks until the test opens its gate.
struct GatedRefresher {
    calls: AtomicUsize,
    gate: Semaphore,
    outcome: Result<RefreshResponse, AuthError>,
}

impl GatedRefresher {
    fn closed(outcome: Result<RefreshResponse, AuthError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(0),
            outcome,
        })
    }

    fn open(outcome: Result<RefreshResponse, AuthError>) -> Arc<Self> {
        let refresher = Self::closed(outcome);
        refresher.gate.add_permits(Semaphore::MAX_PERMITS / 2);
        refresher
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for GatedRefresher {
    async fn refresh(&self, _refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.acquire().await.unwrap().forget();
        self.outcome.clone()
    }
}

fn issued(access_token: &str) -> Result<RefreshResponse, AuthError> {
    Ok(RefreshResponse {
        access_token: access_token.to_string(),
        refresh_token: None,
    })
}

struct Harness {
    transport: AuthenticatedTransport,
    store: MemoryCredentialStore,
    redirects: Arc<AtomicUsize>,
}

impl Harness {
    async fn new(
        backend: Arc<FakeBackend>,
        refresher: Arc<GatedRefresher>,
        tokens: Option<TokenPair>,
    ) -> Self {
        let store = MemoryCredentialStore::new();
        if let Some(tokens) = tokens {
            store.save_tokens(&tokens).await.unwrap();
        }

        let redirects = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&redirects);
        let redirect: Arc<dyn LoginRedirect> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let transport =
            AuthenticatedTransport::new(backend, Arc::new(store.clone()), refresher, redirect);
        Self {
            transport,
            store,
            redirects,
        }
    }

    fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    async fn access_token(&self) -> Option<String> {
        self.store.get(CredentialKey::AccessToken).await.unwrap()
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn spawn_get(
    transport: &AuthenticatedTransport,
    path: &str,
) -> tokio::task::JoinHandle<Result<ApiResponse, ApplicationError>> {
    let transport = transport.clone();
    let request = ApiRequest::get(path);
    tokio::spawn(async move { transport.send(request).await })
}

fn auth_error(result: Result<ApiResponse, ApplicationError>) -> AuthError {
    match result {
        Err(ApplicationError::Auth(err)) => err,
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn burst_of_expired_requests_shares_one_refresh() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let refresher = GatedRefresher::closed(issued("T2"));
    let harness = Harness::new(
        Arc::clone(&backend),
        Arc::clone(&refresher),
        Some(TokenPair::new("T1", "R1")),
    )
    .await;

    //* When
    let handles = ["/a", "/b", "/c"].map(|path| spawn_get(&harness.transport, path));
    let coordinator = Arc::clone(harness.transport.coordinator());
    wait_until(|| coordinator.queued() == 2).await;
    refresher.gate.add_permits(1);

    //* Then
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.status.as_u16(), 200);
    }
    assert_eq!(refresher.calls(), 1);
    assert_eq!(backend.requests_with("T2"), vec!["/a", "/b", "/c"]);
    assert_eq!(harness.access_token().await.as_deref(), Some("T2"));
    assert_eq!(harness.redirects(), 0);
    assert_eq!(coordinator.phase(), RefreshPhase::Idle);
    assert_eq!(coordinator.cycles(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failed_refresh_rejects_every_queued_request() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let rejection = AuthError::RefreshRejected {
        status: 401,
        message: "Refresh token expired".to_string(),
    };
    let refresher = GatedRefresher::closed(Err(rejection.clone()));
    let harness = Harness::new(
        Arc::clone(&backend),
        Arc::clone(&refresher),
        Some(TokenPair::new("T1", "R1")),
    )
    .await;

    //* When
    let handles = ["/a", "/b", "/c"].map(|path| spawn_get(&harness.transport, path));
    let coordinator = Arc::clone(harness.transport.coordinator());
    wait_until(|| coordinator.queued() == 2).await;
    refresher.gate.add_permits(1);

    //* Then
    for handle in handles {
        assert_eq!(auth_error(handle.await.unwrap()), rejection);
    }
    assert_eq!(refresher.calls(), 1);
    assert_eq!(harness.store.count().await, 0);
    assert_eq!(harness.redirects(), 1);
    assert_eq!(coordinator.phase(), RefreshPhase::Idle);
}

#[tokio::test]
async fn second_unauthorized_response_is_returned_to_caller() {
    //* Given
    let backend = FakeBackend::accepting("never-issued");
    let refresher = GatedRefresher::open(issued("T2"));
    let harness = Harness::new(
        Arc::clone(&backend),
        Arc::clone(&refresher),
        Some(TokenPair::new("T1", "R1")),
    )
    .await;

    //* When
    let response = harness
        .transport
        .send(ApiRequest::get("/a"))
        .await
        .unwrap();

    //* Then
    assert_eq!(response.status.as_u16(), 401);
    assert_eq!(refresher.calls(), 1);
    assert_eq!(backend.requests.lock().len(), 2);
    assert_eq!(harness.redirects(), 0);
}

#[tokio::test]
async fn missing_refresh_token_ends_session_without_refresh_call() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let refresher = GatedRefresher::open(issued("T2"));
    let harness = Harness::new(Arc::clone(&backend), Arc::clone(&refresher), None).await;
    harness
        .store
        .set(CredentialKey::AccessToken, "T1")
        .await
        .unwrap();

    //* When
    let result = harness.transport.send(ApiRequest::get("/a")).await;

    //* Then
    assert_eq!(auth_error(result), AuthError::Unauthenticated);
    assert_eq!(refresher.calls(), 0);
    assert_eq!(harness.store.count().await, 0);
    assert_eq!(harness.redirects(), 1);
    assert_eq!(harness.transport.coordinator().phase(), RefreshPhase::Idle);
}

#[tokio::test]
async fn rotated_refresh_token_is_persisted() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let refresher = GatedRefresher::open(Ok(RefreshResponse {
        access_token: "T2".to_string(),
        refresh_token: Some("R2".to_string()),
    }));
    let harness = Harness::new(backend, refresher, Some(TokenPair::new("T1", "R1"))).await;

    //* When
    let response = harness
        .transport
        .send(ApiRequest::get("/a"))
        .await
        .unwrap();

    //* Then
    assert!(response.is_success());
    assert_eq!(
        harness
            .store
            .get(CredentialKey::RefreshToken)
            .await
            .unwrap()
            .as_deref(),
        Some("R2")
    );
}

#[tokio::test]
async fn slow_refresh_times_out_and_ends_session() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let refresher = GatedRefresher::closed(issued("T2"));
    let mut harness = Harness::new(backend, refresher, Some(TokenPair::new("T1", "R1"))).await;
    harness.transport = harness
        .transport
        .clone()
        .with_refresh_timeout(Some(Duration::from_millis(50)));

    //* When
    let result = harness.transport.send(ApiRequest::get("/a")).await;

    //* Then
    assert_eq!(
        auth_error(result),
        AuthError::RefreshTimedOut { timeout_ms: 50 }
    );
    assert_eq!(harness.store.count().await, 0);
    assert_eq!(harness.redirects(), 1);
}

#[tokio::test]
async fn non_unauthorized_errors_pass_through() {
    //* Given
    let backend = FakeBackend::accepting("T1");
    let refresher = GatedRefresher::open(issued("T2"));
    let harness = Harness::new(
        backend,
        Arc::clone(&refresher),
        Some(TokenPair::new("T1", "R1")),
    )
    .await;

    //* When
    let response = harness
        .transport
        .send(ApiRequest::get("/boom"))
        .await
        .unwrap();

    //* Then
    assert_eq!(response.status.as_u16(), 500);
    assert_eq!(refresher.calls(), 0);
    assert_eq!(harness.access_token().await.as_deref(), Some("T1"));
}

#[tokio::test]
async fn request_without_stored_token_has_no_authorization_header() {
    //* Given
    let backend = FakeBackend::accepting("T1");
    let refresher = GatedRefresher::open(issued("T2"));
    let harness = Harness::new(Arc::clone(&backend), refresher, None).await;

    //* When
    let _ = harness.transport.send(ApiRequest::get("/a")).await;

    //* Then
    let requests = backend.requests.lock();
    assert_eq!(requests[0].bearer_token(), None);
}

#[tokio::test]
async fn stored_token_replaces_existing_authorization_header() {
    //* Given
    let backend = FakeBackend::accepting("T1");
    let refresher = GatedRefresher::open(issued("T2"));
    let harness = Harness::new(
        Arc::clone(&backend),
        refresher,
        Some(TokenPair::new("T1", "R1")),
    )
    .await;

    //* When
    let request = ApiRequest::get("/a").with_header("Authorization", "Bearer stale");
    let response = harness.transport.send(request).await.unwrap();

    //* Then
    assert!(response.is_success());
    assert_eq!(backend.requests_with("T1"), vec!["/a"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn aborted_leader_does_not_cancel_refresh() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let refresher = GatedRefresher::closed(issued("T2"));
    let harness = Harness::new(
        backend,
        Arc::clone(&refresher),
        Some(TokenPair::new("T1", "R1")),
    )
    .await;
    let coordinator = Arc::clone(harness.transport.coordinator());

    let leader = spawn_get(&harness.transport, "/a");
    wait_until(|| coordinator.phase() == RefreshPhase::Refreshing).await;
    let follower = spawn_get(&harness.transport, "/b");
    wait_until(|| coordinator.queued() == 1).await;

    //* When
    leader.abort();
    refresher.gate.add_permits(1);

    //* Then
    assert!(follower.await.unwrap().unwrap().is_success());
    assert_eq!(refresher.calls(), 1);
    assert_eq!(harness.access_token().await.as_deref(), Some("T2"));
    assert_eq!(harness.redirects(), 0);
    assert_eq!(coordinator.phase(), RefreshPhase::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn timed_out_leader_still_settles_refresh_for_followers() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let refresher = GatedRefresher::closed(issued("T2"));
    let harness = Harness::new(
        Arc::clone(&backend),
        Arc::clone(&refresher),
        Some(TokenPair::new("T1", "R1")),
    )
    .await;
    let coordinator = Arc::clone(harness.transport.coordinator());

    let transport = harness.transport.clone();
    let leader = tokio::spawn(async move {
        tokio::time::timeout(
            Duration::from_millis(100),
            transport.send(ApiRequest::get("/a")),
        )
        .await
    });
    wait_until(|| coordinator.phase() == RefreshPhase::Refreshing).await;
    let follower = spawn_get(&harness.transport, "/b");
    wait_until(|| coordinator.queued() == 1).await;

    //* When
    assert!(leader.await.unwrap().is_err(), "leader should time out");
    refresher.gate.add_permits(1);

    //* Then
    let response = follower.await.unwrap().unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(backend.requests_with("T2"), vec!["/b"]);
    assert_eq!(refresher.calls(), 1);
    assert_eq!(harness.access_token().await.as_deref(), Some("T2"));
    assert_eq!(harness.redirects(), 0);
    assert_eq!(coordinator.cycles(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn explicit_refresh_joins_in_flight_refresh() {
    //* Given
    let backend = FakeBackend::accepting("T2");
    let refresher = GatedRefresher::closed(issued("T2"));
    let harness = Harness::new(
        backend,
        Arc::clone(&refresher),
        Some(TokenPair::new("T1", "R1")),
    )
    .await;
    let coordinator = Arc::clone(harness.transport.coordinator());

    let request = spawn_get(&harness.transport, "/a");
    wait_until(|| coordinator.phase() == RefreshPhase::Refreshing).await;

    //* When
    let transport = harness.transport.clone();
    let explicit = tokio::spawn(async move { transport.refresh_now().await });
    wait_until(|| coordinator.queued() == 1).await;
    refresher.gate.add_permits(1);

    //* Then
    assert_eq!(explicit.await.unwrap().unwrap(), "T2");
    assert!(request.await.unwrap().unwrap().is_success());
    assert_eq!(refresher.calls(), 1);
}
