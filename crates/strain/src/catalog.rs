use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{Discovery, DiscoveryOptions, StrainError, StrainStore};

/// Shared handle to the current strain store. Queries fail with
/// [`StrainError::NotReady`] until a store has been installed; a reload
/// swaps the whole store at once.
pub struct StrainCatalog {
    store: RwLock<Option<Arc<StrainStore>>>,
    options: DiscoveryOptions,
}

impl StrainCatalog {
    pub fn new(options: DiscoveryOptions) -> Self {
        Self {
            store: RwLock::new(None),
            options,
        }
    }

    pub fn with_store(store: StrainStore, options: DiscoveryOptions) -> Self {
        let catalog = Self::new(options);
        catalog.install(store);
        catalog
    }

    pub fn install(&self, store: StrainStore) {
        let store = Arc::new(store);
        let mut current = self.store.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(store);
    }

    /// Loads `path` and swaps it in. On failure the current store stays.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<usize, StrainError> {
        let path = path.as_ref();
        let store = match StrainStore::load(path) {
            Ok(store) => store,
            Err(err) => {
                tracing::error!(path = %path.display(), err = %err, "strain dataset reload failed");
                return Err(err.into());
            }
        };

        let len = store.len();
        self.install(store);

        Ok(len)
    }

    pub fn is_ready(&self) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn store(&self) -> Result<Arc<StrainStore>, StrainError> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(StrainError::NotReady)
    }

    pub fn discovery(&self) -> Result<Discovery, StrainError> {
        Ok(Discovery::new(self.store()?, self.options))
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }
}
