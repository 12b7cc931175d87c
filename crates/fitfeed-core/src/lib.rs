//! Domain layer for fitfeed.
//!
//! Models, the shared error type, the relative-date formatter and the
//! collaborator traits the application layer is written against. Nothing in
//! this crate performs I/O.

pub mod auth;
pub mod community;
pub mod config;
pub mod error;
pub mod mode;
pub mod profile;
pub mod relative_date;
pub mod secret;
pub mod storage;

// Re-export common error type
pub use error::{FitfeedError, Result};
pub use relative_date::{Locale, format_relative_date, format_relative_date_at};
