//! Module for user profile and management API endpoints.
//!
//! This module handles functionalities related to user information that is
//! distinct from the core authentication process: the persisted profile and
//! the administrator role.

pub mod handlers;
pub mod routes;
