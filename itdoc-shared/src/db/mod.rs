/// Database layer for itdoc
///
/// This module provides the SQLite connection pool and embedded migrations.
///
/// # Modules
///
/// - `pool`: Connection pool management with health checks
/// - `migrations`: Schema migrations embedded at compile time
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use itdoc_shared::db::pool::{create_pool, DatabaseConfig};
/// use itdoc_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite://itdoc.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
