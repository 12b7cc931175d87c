//! Session state and the remote sign-in/sign-up/sign-out flows.
//!
//! # State machine
//!
//! ```text
//! LoggedOut --sign in / sign up--> Authenticating --session--> LoggedIn
//!                                        |
//!                                        +--error / no session--> LoggedOut
//! LoggedIn  --sign out--> Authenticating --ok--> LoggedOut
//!                                        +--error--> LoggedIn (session kept)
//! ```
//!
//! Only one auth operation runs at a time; a second one started while the
//! first is in flight fails immediately with [`FitfeedError::Busy`]. Every
//! remote call is bounded by a timeout so the store cannot stay in
//! `Authenticating`.
//!
//! Each operation records its failure in its own error slot on the state,
//! and also returns it, so callers can either render the state or branch on
//! the result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fitfeed_core::auth::{
    AuthOperation, AuthService, AuthState, OAuthProvider, Session, email_confirmation_required,
};
use fitfeed_core::error::{FitfeedError, Result};
use fitfeed_core::relative_date::Locale;
use fitfeed_core::storage::{AUTH_STORE_KEY, KeyValueStore};
use tokio::sync::{Mutex, MutexGuard, watch};

use crate::persisted_store::PersistedStore;

/// Authentication state container.
pub struct AuthStore {
    store: PersistedStore<AuthState>,
    service: Arc<dyn AuthService>,
    in_flight: Mutex<()>,
    timeout: Duration,
    locale: Locale,
}

impl AuthStore {
    /// Loads the persisted auth slot and binds the store to `service`.
    pub async fn load(
        backend: Arc<dyn KeyValueStore>,
        service: Arc<dyn AuthService>,
        timeout: Duration,
        locale: Locale,
    ) -> Self {
        let store = PersistedStore::<AuthState>::load(AUTH_STORE_KEY, backend).await;
        let state = store.get_state();
        tracing::info!(
            "[AuthStore] Loaded (logged_in: {}, onboarded: {})",
            state.is_logged_in(),
            state.has_completed_onboarding
        );
        Self {
            store,
            service,
            in_flight: Mutex::new(()),
            timeout,
            locale,
        }
    }

    pub fn state(&self) -> AuthState {
        self.store.get_state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.store.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get_state().is_logged_in()
    }

    pub fn session(&self) -> Option<Session> {
        self.store.get_state().session
    }

    /// Signs in with email and password.
    pub async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<()> {
        self.run_sign_in(
            AuthOperation::SignIn,
            self.service.sign_in_with_password(email, password),
        )
        .await
    }

    /// Registers a new account.
    ///
    /// When the service creates the account but returns no session (the
    /// address must be confirmed first), the store stays logged out and the
    /// confirmation notice is recorded as the sign-up error.
    pub async fn sign_up_with_email(&self, email: &str, password: &str) -> Result<()> {
        self.run_sign_in(AuthOperation::SignUp, self.service.sign_up(email, password))
            .await
    }

    /// Signs in with an identity token issued by a social provider.
    pub async fn sign_in_with_provider(&self, provider: OAuthProvider, id_token: &str) -> Result<()> {
        self.run_sign_in(
            AuthOperation::SignIn,
            self.service.sign_in_with_id_token(provider, id_token),
        )
        .await
    }

    /// Ends the current session.
    ///
    /// The session is only cleared once the service confirms; on failure it
    /// is kept and the error is recorded. Signing out while logged out is a
    /// no-op.
    pub async fn sign_out(&self) -> Result<()> {
        let _guard = self.acquire(AuthOperation::SignOut.as_ref())?;

        let Some(session) = self.session() else {
            tracing::debug!("[AuthStore] sign_out ignored: no session");
            return Ok(());
        };

        self.begin(AuthOperation::SignOut);
        match self.with_timeout(self.service.sign_out(&session)).await {
            Ok(()) => {
                tracing::info!("[AuthStore] Signed out user {}", session.user_id());
                self.store
                    .mutate(|state| {
                        state.session = None;
                        state.auth_loading = false;
                    })
                    .await?;
                Ok(())
            }
            Err(e) => Err(self.fail(AuthOperation::SignOut, e)),
        }
    }

    /// Marks onboarding as finished for this install.
    pub async fn complete_onboarding(&self) -> Result<()> {
        self.store
            .mutate(|state| state.has_completed_onboarding = true)
            .await?;
        Ok(())
    }

    pub async fn reset_onboarding(&self) -> Result<()> {
        self.store
            .mutate(|state| state.has_completed_onboarding = false)
            .await?;
        Ok(())
    }

    /// Deletes the persisted auth slot and resets the in-memory state.
    ///
    /// Rejected with [`FitfeedError::Busy`] while another auth operation is
    /// in flight, so a pending sign-in cannot restore the cleared session.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.acquire("clear")?;
        self.store.reset().await?;
        tracing::info!("[AuthStore] Auth store cleared");
        Ok(())
    }

    fn acquire(&self, operation: &str) -> Result<MutexGuard<'_, ()>> {
        self.in_flight.try_lock().map_err(|_| {
            tracing::warn!(
                "[AuthStore] Rejected {}: another auth operation is in flight",
                operation
            );
            FitfeedError::busy(operation)
        })
    }

    fn begin(&self, operation: AuthOperation) {
        self.store.update_transient(|state| {
            state.auth_loading = true;
            *state.error_slot(operation) = None;
        });
    }

    /// Records `err` in the operation's slot and ends the loading state.
    fn fail(&self, operation: AuthOperation, err: FitfeedError) -> FitfeedError {
        let message = err.user_message();
        tracing::warn!("[AuthStore] {} failed: {}", operation, message);
        self.store.update_transient(|state| {
            state.auth_loading = false;
            *state.error_slot(operation) = Some(message);
        });
        err
    }

    async fn with_timeout<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(FitfeedError::remote_auth(format!(
                "auth request timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn run_sign_in<F>(&self, operation: AuthOperation, call: F) -> Result<()>
    where
        F: Future<Output = Result<Option<Session>>>,
    {
        let _guard = self.acquire(operation.as_ref())?;
        self.begin(operation);

        match self.with_timeout(call).await {
            Ok(Some(session)) => {
                tracing::info!("[AuthStore] {} succeeded for user {}", operation, session.user_id());
                self.store
                    .mutate(|state| {
                        state.session = Some(session);
                        state.auth_loading = false;
                    })
                    .await?;
                Ok(())
            }
            Ok(None) if operation == AuthOperation::SignUp => {
                let notice = email_confirmation_required(self.locale);
                Err(self.fail(operation, FitfeedError::remote_auth(notice)))
            }
            Ok(None) => {
                tracing::debug!("[AuthStore] {} returned no session", operation);
                self.store.update_transient(|state| state.auth_loading = false);
                Ok(())
            }
            Err(e) => Err(self.fail(operation, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fitfeed_core::auth::{AuthPhase, SessionUser};
    use fitfeed_infrastructure::MemoryKeyValueStore;
    use std::sync::Mutex as StdMutex;

    fn session(user: &str) -> Session {
        Session {
            access_token: format!("token-{}", user),
            refresh_token: None,
            token_type: Some("bearer".to_string()),
            expires_at: None,
            user: SessionUser {
                id: user.to_string(),
                email: None,
            },
        }
    }

    /// Scripted auth service; each call pops the next canned reply.
    #[derive(Default)]
    struct FakeAuthService {
        sign_in: StdMutex<Vec<Result<Option<Session>>>>,
        sign_out: StdMutex<Vec<Result<()>>>,
        delay: Option<Duration>,
    }

    impl FakeAuthService {
        fn signing_in(reply: Result<Option<Session>>) -> Self {
            Self {
                sign_in: StdMutex::new(vec![reply]),
                ..Default::default()
            }
        }

        fn next_sign_in(&self) -> Result<Option<Session>> {
            self.sign_in
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(FitfeedError::remote_auth("unexpected call")))
        }

        async fn pause(&self) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl AuthService for FakeAuthService {
        async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<Option<Session>> {
            self.pause().await;
            self.next_sign_in()
        }

        async fn sign_up(&self, _email: &str, _password: &str) -> Result<Option<Session>> {
            self.pause().await;
            self.next_sign_in()
        }

        async fn sign_in_with_id_token(
            &self,
            _provider: OAuthProvider,
            _id_token: &str,
        ) -> Result<Option<Session>> {
            self.pause().await;
            self.next_sign_in()
        }

        async fn sign_out(&self, _session: &Session) -> Result<()> {
            self.pause().await;
            self.sign_out.lock().unwrap().pop().unwrap_or(Ok(()))
        }
    }

    async fn store_with(service: FakeAuthService) -> (AuthStore, Arc<MemoryKeyValueStore>) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = AuthStore::load(
            backend.clone(),
            Arc::new(service),
            Duration::from_secs(15),
            Locale::En,
        )
        .await;
        (store, backend)
    }

    #[tokio::test]
    async fn test_sign_in_persists_session() {
        let (store, backend) =
            store_with(FakeAuthService::signing_in(Ok(Some(session("user-1"))))).await;

        store.sign_in_with_email("a@b.c", "pw").await.unwrap();

        let state = store.state();
        assert_eq!(state.phase(), AuthPhase::LoggedIn);
        assert_eq!(state.user_id(), Some("user-1"));
        assert!(state.sign_in_error.is_none());
        let raw = backend.get(AUTH_STORE_KEY).await.unwrap().unwrap();
        assert!(raw.contains("token-user-1"));
    }

    #[tokio::test]
    async fn test_sign_in_error_is_recorded_and_not_persisted() {
        let (store, backend) = store_with(FakeAuthService::signing_in(Err(
            FitfeedError::remote_auth("Invalid login credentials"),
        )))
        .await;

        let err = store.sign_in_with_email("a@b.c", "bad").await.unwrap_err();
        assert!(err.is_remote_auth());

        let state = store.state();
        assert_eq!(state.phase(), AuthPhase::LoggedOut);
        assert_eq!(state.sign_in_error.as_deref(), Some("Invalid login credentials"));
        assert!(state.sign_up_error.is_none());
        assert!(backend.get(AUTH_STORE_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_without_session_asks_for_confirmation() {
        let (store, _) = store_with(FakeAuthService::signing_in(Ok(None))).await;

        store.sign_up_with_email("new@b.c", "pw").await.unwrap_err();

        let state = store.state();
        assert!(!state.is_logged_in());
        assert!(!state.auth_loading);
        assert_eq!(
            state.error_for(AuthOperation::SignUp),
            Some("Please verify your email, then sign in.")
        );
    }

    #[tokio::test]
    async fn test_provider_sign_in_uses_sign_in_slot() {
        let (store, _) = store_with(FakeAuthService::signing_in(Err(FitfeedError::remote_auth(
            "provider rejected token",
        ))))
        .await;

        store
            .sign_in_with_provider(OAuthProvider::Kakao, "jwt")
            .await
            .unwrap_err();
        assert_eq!(
            store.state().error_for(AuthOperation::SignIn),
            Some("provider rejected token")
        );
    }

    #[tokio::test]
    async fn test_sign_out_failure_keeps_session() {
        let service = FakeAuthService {
            sign_in: StdMutex::new(vec![Ok(Some(session("user-1")))]),
            sign_out: StdMutex::new(vec![Err(FitfeedError::remote_auth("network down"))]),
            delay: None,
        };
        let (store, _) = store_with(service).await;
        store.sign_in_with_email("a@b.c", "pw").await.unwrap();

        store.sign_out().await.unwrap_err();

        let state = store.state();
        assert!(state.is_logged_in());
        assert_eq!(state.sign_out_error.as_deref(), Some("network down"));
        assert!(!state.auth_loading);
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let (store, backend) =
            store_with(FakeAuthService::signing_in(Ok(Some(session("user-1"))))).await;
        store.sign_in_with_email("a@b.c", "pw").await.unwrap();
        store.complete_onboarding().await.unwrap();

        store.sign_out().await.unwrap();

        let state = store.state();
        assert!(!state.is_logged_in());
        assert!(state.has_completed_onboarding);
        let raw = backend.get(AUTH_STORE_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("token-user-1"));
    }

    #[tokio::test]
    async fn test_sign_out_when_logged_out_is_noop() {
        let (store, _) = store_with(FakeAuthService::default()).await;
        store.sign_out().await.unwrap();
        assert!(store.state().sign_out_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_operation_is_rejected() {
        let service = FakeAuthService {
            sign_in: StdMutex::new(vec![Ok(Some(session("user-1")))]),
            delay: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        let (store, _) = store_with(service).await;

        let (first, second) = tokio::join!(
            store.sign_in_with_email("a@b.c", "pw"),
            async {
                tokio::task::yield_now().await;
                store.sign_in_with_email("a@b.c", "pw").await
            }
        );

        first.unwrap();
        assert!(second.unwrap_err().is_busy());
        assert!(store.is_logged_in());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_during_sign_in_is_rejected() {
        let service = FakeAuthService {
            sign_in: StdMutex::new(vec![Ok(Some(session("user-1")))]),
            delay: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        let (store, backend) = store_with(service).await;

        let (sign_in, clear) = tokio::join!(store.sign_in_with_email("a@b.c", "pw"), async {
            tokio::task::yield_now().await;
            store.clear().await
        });

        sign_in.unwrap();
        assert_eq!(clear.unwrap_err(), FitfeedError::busy("clear"));
        assert!(store.is_logged_in());
        assert!(backend.get(AUTH_STORE_KEY).await.unwrap().is_some());

        store.clear().await.unwrap();
        assert!(!store.is_logged_in());
        assert!(backend.get(AUTH_STORE_KEY).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_service_times_out() {
        let service = FakeAuthService {
            sign_in: StdMutex::new(vec![Ok(Some(session("user-1")))]),
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = AuthStore::load(backend, Arc::new(service), Duration::from_secs(15), Locale::En).await;

        let err = store.sign_in_with_email("a@b.c", "pw").await.unwrap_err();
        assert_eq!(err, FitfeedError::remote_auth("auth request timed out after 15s"));

        let state = store.state();
        assert_eq!(state.phase(), AuthPhase::LoggedOut);
        assert_eq!(state.sign_in_error.as_deref(), Some("auth request timed out after 15s"));
    }

    #[tokio::test]
    async fn test_clear_removes_slot() {
        let (store, backend) =
            store_with(FakeAuthService::signing_in(Ok(Some(session("user-1"))))).await;
        store.sign_in_with_email("a@b.c", "pw").await.unwrap();

        store.clear().await.unwrap();
        assert!(!store.is_logged_in());
        assert!(backend.get(AUTH_STORE_KEY).await.unwrap().is_none());
    }
}
