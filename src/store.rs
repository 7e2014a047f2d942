//! Claim persistence.
//!
//! The engine never touches storage; callers load the partial claim through a
//! [`ClaimStore`] before reconciling and hand each submitted snapshot back to
//! it afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::claim::Claim;

/// Storage failures; never retried by the engine
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("claimant id '{0}' is not a valid storage key")]
    InvalidClaimant(String),
    #[error("failed to {action} claim for '{claimant}': {source}")]
    Io {
        action: &'static str,
        claimant: String,
        #[source]
        source: std::io::Error,
    },
    #[error("stored claim for '{claimant}' is not valid JSON: {source}")]
    Serialization {
        claimant: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Backend holding partial and completed claims
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// The saved partial claim, or `None` when nothing was saved
    async fn load_partial(&self, claimant: &str) -> Result<Option<Value>, PersistenceError>;

    /// Save a claim; `completed` moves it to the completed store and clears
    /// the partial one
    async fn save(
        &self,
        claimant: &str,
        claim: &Claim,
        completed: bool,
    ) -> Result<(), PersistenceError>;

    /// The accepted claim, if one was completed
    async fn load_completed(&self, claimant: &str) -> Result<Option<Value>, PersistenceError>;
}

/// Claimant ids become file names, so only a safe alphabet is accepted
fn check_claimant(claimant: &str) -> Result<(), PersistenceError> {
    let valid = !claimant.is_empty()
        && claimant.len() <= 128
        && claimant
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidClaimant(claimant.to_string()))
    }
}

/// JSON files under `<root>/partial/` and `<root>/completed/`
#[derive(Debug, Clone)]
pub struct FileClaimStore {
    root: PathBuf,
}

impl FileClaimStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn partial_path(&self, claimant: &str) -> PathBuf {
        self.root.join("partial").join(format!("{}.json", claimant))
    }

    fn completed_path(&self, claimant: &str) -> PathBuf {
        self.root.join("completed").join(format!("{}.json", claimant))
    }

    async fn read(&self, path: &Path, claimant: &str) -> Result<Option<Value>, PersistenceError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Io {
                    action: "read",
                    claimant: claimant.to_string(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| PersistenceError::Serialization {
                claimant: claimant.to_string(),
                source,
            })
    }

    async fn write(&self, path: &Path, claimant: &str, claim: &Claim) -> Result<(), PersistenceError> {
        let io_error = |source| PersistenceError::Io {
            action: "write",
            claimant: claimant.to_string(),
            source,
        };
        let body =
            serde_json::to_vec_pretty(claim).map_err(|source| PersistenceError::Serialization {
                claimant: claimant.to_string(),
                source,
            })?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(path, body).await.map_err(io_error)
    }
}

#[async_trait]
impl ClaimStore for FileClaimStore {
    async fn load_partial(&self, claimant: &str) -> Result<Option<Value>, PersistenceError> {
        check_claimant(claimant)?;
        self.read(&self.partial_path(claimant), claimant).await
    }

    async fn save(
        &self,
        claimant: &str,
        claim: &Claim,
        completed: bool,
    ) -> Result<(), PersistenceError> {
        check_claimant(claimant)?;
        if !completed {
            self.write(&self.partial_path(claimant), claimant, claim).await?;
            tracing::debug!(claimant, "Saved partial claim");
            return Ok(());
        }

        self.write(&self.completed_path(claimant), claimant, claim)
            .await?;
        match tokio::fs::remove_file(self.partial_path(claimant)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(PersistenceError::Io {
                    action: "clear",
                    claimant: claimant.to_string(),
                    source,
                })
            }
        }
        tracing::info!(claimant, "Claim completed");
        Ok(())
    }

    async fn load_completed(&self, claimant: &str) -> Result<Option<Value>, PersistenceError> {
        check_claimant(claimant)?;
        self.read(&self.completed_path(claimant), claimant).await
    }
}

/// In-process store for tests and throwaway servers
#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    partial: RwLock<HashMap<String, Value>>,
    completed: RwLock<HashMap<String, Value>>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a partial claim
    pub async fn insert_partial(&self, claimant: &str, claim: Value) {
        self.partial.write().await.insert(claimant.to_string(), claim);
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn load_partial(&self, claimant: &str) -> Result<Option<Value>, PersistenceError> {
        check_claimant(claimant)?;
        Ok(self.partial.read().await.get(claimant).cloned())
    }

    async fn save(
        &self,
        claimant: &str,
        claim: &Claim,
        completed: bool,
    ) -> Result<(), PersistenceError> {
        check_claimant(claimant)?;
        if completed {
            self.partial.write().await.remove(claimant);
            self.completed
                .write()
                .await
                .insert(claimant.to_string(), claim.to_value());
        } else {
            self.partial
                .write()
                .await
                .insert(claimant.to_string(), claim.to_value());
        }
        Ok(())
    }

    async fn load_completed(&self, claimant: &str) -> Result<Option<Value>, PersistenceError> {
        check_claimant(claimant)?;
        Ok(self.completed.read().await.get(claimant).cloned())
    }
}
