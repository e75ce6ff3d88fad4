//! Relational store access
//!
//! Every query and update opens its own connection and closes it when done.
//! Nothing is pooled or held between notifications.
//!
//! Connections go through sqlx's `Any` driver: MySQL in production, SQLite
//! in tests. Statements use `?` placeholders, which both backends accept.

use crate::{Error, Result};
use sqlx::{AnyConnection, Connection};
use std::fmt;

pub mod models;
pub mod orders;
pub mod results;

pub use models::*;
pub use orders::fetch_order_context;
pub use results::apply_update;

/// Handle on the relational store
///
/// Holds only the connection URL; connections are opened per operation.
#[derive(Clone)]
pub struct Store {
    database_url: String,
}

impl Store {
    /// Create a store handle for a `mysql://` or `sqlite://` URL
    pub fn new(database_url: impl Into<String>) -> Self {
        sqlx::any::install_default_drivers();
        Self {
            database_url: database_url.into(),
        }
    }

    /// Open a fresh connection
    ///
    /// Connect and authentication failures map to `Error::StoreUnavailable`.
    pub async fn connect(&self) -> Result<AnyConnection> {
        AnyConnection::connect(&self.database_url)
            .await
            .map_err(Error::StoreUnavailable)
    }

    /// Open and immediately close a connection to verify credentials
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        conn.ping().await?;
        conn.close().await?;
        Ok(())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("database_url", &redact_password(&self.database_url))
            .finish()
    }
}

fn redact_password(database_url: &str) -> String {
    match url::Url::parse(database_url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => database_url.to_string(),
    }
}
