/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Service banner and health check
/// - `auth`: Registration, login, logout and current session
/// - `organizations`: Organizations and their members

pub mod auth;
pub mod health;
pub mod organizations;
