//! Request middleware and extractors.
//!
//! - [`actor`]: identifies the calling user from gateway-supplied headers

pub mod actor;
