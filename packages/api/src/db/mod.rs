//! PostgreSQL connection pool, server-only.
//!
//! A lazy process-wide singleton behind [`tokio::sync::OnceCell`]: the
//! first [`get_pool`] call reads `DATABASE_URL` (via `dotenvy`) and opens
//! the pool; every later caller gets the cached `&'static PgPool`.

#[cfg(feature = "server")]
mod pool;

#[cfg(feature = "server")]
pub use pool::get_pool;
