//! Authentication domain models.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::relative_date::Locale;

/// Identity carried inside a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Credential bundle issued by the remote auth service.
///
/// Treated as opaque by the stores apart from the user identifier and the
/// access token needed to sign out. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expiry as a Unix timestamp in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    /// Returns the signed-in user's identifier.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Coarse auth lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    LoggedOut,
    Authenticating,
    LoggedIn,
}

/// Top-level screen group the app should show for a given auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRoute {
    /// Main tabs (logged in, onboarding done).
    Tabs,
    /// Onboarding flow (logged in, onboarding pending).
    Onboarding,
    /// Sign-in screen (logged out).
    SignIn,
}

/// Remote auth operations, each with its own error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AuthOperation {
    SignIn,
    SignUp,
    SignOut,
}

/// Social identity providers accepted for token sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OAuthProvider {
    Kakao,
}

/// State owned by the auth store.
///
/// Only `session` and `has_completed_onboarding` are persisted; the loading
/// flag and the per-operation error messages live for the process only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    pub session: Option<Session>,

    #[serde(default)]
    pub has_completed_onboarding: bool,

    #[serde(skip)]
    pub auth_loading: bool,

    #[serde(skip)]
    pub sign_in_error: Option<String>,

    #[serde(skip)]
    pub sign_up_error: Option<String>,

    #[serde(skip)]
    pub sign_out_error: Option<String>,
}

impl AuthState {
    /// Whether a session is present.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Signed-in user's identifier, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(Session::user_id)
    }

    pub fn phase(&self) -> AuthPhase {
        if self.auth_loading {
            AuthPhase::Authenticating
        } else if self.is_logged_in() {
            AuthPhase::LoggedIn
        } else {
            AuthPhase::LoggedOut
        }
    }

    /// Which screen group the navigation root should expose.
    pub fn entry_route(&self) -> EntryRoute {
        match (self.is_logged_in(), self.has_completed_onboarding) {
            (true, true) => EntryRoute::Tabs,
            (true, false) => EntryRoute::Onboarding,
            (false, _) => EntryRoute::SignIn,
        }
    }

    /// The last error recorded for `operation`.
    pub fn error_for(&self, operation: AuthOperation) -> Option<&str> {
        match operation {
            AuthOperation::SignIn => self.sign_in_error.as_deref(),
            AuthOperation::SignUp => self.sign_up_error.as_deref(),
            AuthOperation::SignOut => self.sign_out_error.as_deref(),
        }
    }

    /// Mutable access to the error slot of `operation`.
    pub fn error_slot(&mut self, operation: AuthOperation) -> &mut Option<String> {
        match operation {
            AuthOperation::SignIn => &mut self.sign_in_error,
            AuthOperation::SignUp => &mut self.sign_up_error,
            AuthOperation::SignOut => &mut self.sign_out_error,
        }
    }
}

/// Message shown when sign-up succeeded but the account still needs email
/// confirmation before a session is issued.
pub fn email_confirmation_required(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Please verify your email, then sign in.",
        Locale::Ko => "이메일 인증 후 로그인해주세요.",
    }
}
