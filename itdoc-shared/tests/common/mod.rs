//! Shared fixtures for itdoc-shared integration tests
//!
//! Every test gets its own in-memory database with migrations applied, so
//! tests are independent and need no external server.

#![allow(dead_code)]

use itdoc_shared::auth::password::HashParams;
use itdoc_shared::db::migrations::run_migrations;
use itdoc_shared::db::pool::{create_pool, DatabaseConfig};
use itdoc_shared::models::user::PublicUser;
use itdoc_shared::stores::{CredentialStore, NewUser, OrganizationStore};
use sqlx::SqlitePool;

/// Argon2 parameters cheap enough for tests
pub fn fast_hash_params() -> HashParams {
    HashParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

/// Fresh in-memory database with the schema applied
pub async fn setup_pool() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create in-memory pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

pub fn credential_store(pool: &SqlitePool) -> CredentialStore {
    CredentialStore::with_hash_params(pool.clone(), fast_hash_params())
}

pub fn organization_store(pool: &SqlitePool) -> OrganizationStore {
    OrganizationStore::new(pool.clone())
}

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "password1".to_string(),
    }
}

/// Registers a user with password `password1`
pub async fn register(pool: &SqlitePool, name: &str, email: &str) -> PublicUser {
    credential_store(pool)
        .create_user(new_user(name, email))
        .await
        .expect("Failed to register user")
}
