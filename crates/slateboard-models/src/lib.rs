//! # Slateboard Models
//!
//! Domain models shared across the Slateboard API:
//!
//! - [`ids`]: strongly-typed UUID newtypes for every entity
//! - [`lessons`]: lesson slots, their kind/status enums, time slots
//! - [`exchange`]: exchange requests and their type/status enums
//! - [`users`]: user roles and the minimal user row the core consumes
//! - [`dependents`]: entities that hold lesson pointers (tests, notes)

pub mod dependents;
pub mod exchange;
pub mod ids;
pub mod lessons;
pub mod users;
