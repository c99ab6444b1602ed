//! Collection of general utility modules.
//!
//! Holds helpers that do not belong to a specific domain module, currently
//! the session token utilities.

pub mod jwt;
