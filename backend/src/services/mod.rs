//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate interactions between different parts of the
//! application: profile bootstrap, role resolution, and the authenticated
//! session store.

pub mod profile;
pub mod roles;
pub mod session;
