//! API state management for the REST server.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Config;
use crate::occupation::OccupationCatalog;
use crate::pages::PageRegistry;
use crate::store::{ClaimStore, FileClaimStore};
use crate::validation::SchemaContext;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    pub registry: PageRegistry,
    pub catalog: &'static OccupationCatalog,
    /// Where partial and completed claims are kept
    pub store: Arc<dyn ClaimStore>,
    pub config: Arc<Config>,
    /// Fixed reference date; the local calendar day when unset
    today: Option<NaiveDate>,
}

impl ApiState {
    /// State backed by JSON files under the configured data directory
    pub fn new(config: Config) -> Self {
        let store = FileClaimStore::new(config.data_path());
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: Config, store: Arc<dyn ClaimStore>) -> Self {
        Self {
            registry: PageRegistry::standard(),
            catalog: OccupationCatalog::load(),
            store,
            config: Arc::new(config),
            today: None,
        }
    }

    /// Pin date rules to a fixed day
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Schema inputs for one request
    pub fn schema_context(&self) -> SchemaContext {
        match self.today {
            Some(today) => SchemaContext::english(today),
            None => SchemaContext::current(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.config.wizard.base_path
    }
}
