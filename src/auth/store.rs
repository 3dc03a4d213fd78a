// Access token storage
// The one shared mutable resource of the client: a single token, last write wins

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const TOKEN_KEY: &str = "access_token";

/// Storage abstraction for the current access token.
///
/// Readers take a snapshot at dispatch time; writers overwrite the single
/// value atomically. Absence of a token means "unauthenticated".
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn put(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token store backed by a small SQLite key-value table.
///
/// Survives process restarts, so a signed-in session carries across
/// console invocations.
pub struct SqliteTokenStore {
    path: PathBuf,
}

impl SqliteTokenStore {
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!(
                    "Failed to create token store directory: {}",
                    parent.display()
                )
            })?;
        }

        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open token store: {}", path.display()))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS client_kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            (),
        )
        .context("Failed to initialize token store schema")?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn open(&self) -> Result<rusqlite::Connection> {
        rusqlite::Connection::open(&self.path)
            .with_context(|| format!("Failed to open token store: {}", self.path.display()))
    }
}

impl TokenStore for SqliteTokenStore {
    fn get(&self) -> Result<Option<String>> {
        let conn = self.open()?;
        let token = conn
            .query_row(
                "SELECT value FROM client_kv WHERE key = ?",
                [TOKEN_KEY],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .context("Failed to read access token")?;
        Ok(token)
    }

    fn put(&self, token: &str) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "INSERT OR REPLACE INTO client_kv (key, value) VALUES (?, ?)",
            [TOKEN_KEY, token],
        )
        .context("Failed to persist access token")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM client_kv WHERE key = ?", [TOKEN_KEY])
            .context("Failed to clear access token")?;
        Ok(())
    }
}

/// In-memory token store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn put(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
