//! # itdoc Shared Library
//!
//! This crate contains the identity and tenancy core shared by the itdoc
//! API server: persistence, password hashing, session tokens, and the
//! access-control rules that sit in front of every request.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and embedded migrations
//! - `models`: Row types and SQL for users, organizations and memberships
//! - `auth`: Password hashing, session tokens, route and action gates
//! - `stores`: Credential and organization stores (validation + persistence)
//! - `error`: Field-level validation issues

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod stores;

/// Current version of the itdoc shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
