//! Configuration modules for the Slateboard API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables:
//!
//! - [`cors`]: allowed origins for CORS
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP settings for approver/requester emails

pub mod cors;
pub mod database;
pub mod email;
