pub mod repositories;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open the SQLite pool behind `database_url`.
///
/// File databases are created on first use. An in-memory database lives in
/// a single connection that is never recycled, since every new connection
/// would see an empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    if database_url.contains(":memory:") {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(sqlx::Error::Io)?;
        }
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}
