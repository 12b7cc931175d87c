//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: session and auth-state models
//! - `service`: remote auth service trait
//!
//! # Usage
//!
//! ```ignore
//! use fitfeed_core::auth::{AuthService, AuthState, Session};
//! ```

mod model;
mod service;

// Re-export public API
pub use model::{
    AuthOperation, AuthPhase, AuthState, EntryRoute, OAuthProvider, Session, SessionUser,
    email_confirmation_required,
};
pub use service::AuthService;
