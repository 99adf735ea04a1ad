//! Shared utilities.
//!
//! - [`email`]: SMTP dispatch for exchange-request emails

pub mod email;
