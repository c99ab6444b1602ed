//! Authentication module for managing user accounts and sessions.
//!
//! This module provides the public interface for user authentication-related
//! functionality: registration, login, logout, password hashing, session
//! cookies and the session gate middleware.

pub mod cookie;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
