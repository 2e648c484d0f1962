//! Shared API registry
//!
//! Components publish versioned function tables under a name and other
//! components look them up by name and type. A name is taken once; a
//! lookup with the wrong type finds nothing, so revisions with different
//! table layouts can be published side by side.

use crate::v1::{JSON_API_V1, JSON_API_V1_NAME};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use tracing::{info, warn};

type SharedApi = &'static (dyn Any + Send + Sync);

/// Name-keyed registry of published API tables
#[derive(Default)]
pub struct ApiRegistry {
    apis: RwLock<HashMap<String, SharedApi>>,
}

/// Process-wide registry
static GLOBAL_REGISTRY: Lazy<ApiRegistry> = Lazy::new(ApiRegistry::new);

impl ApiRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static ApiRegistry {
        &GLOBAL_REGISTRY
    }

    /// Publish `api` under `name`
    ///
    /// Returns `false`, leaving the existing entry in place, if the name is
    /// already taken.
    pub fn export(&self, name: &str, api: SharedApi) -> bool {
        let mut apis = self.apis.write();
        if apis.contains_key(name) {
            warn!(target: "jsonkv::api", name, "Shared API name already taken");
            return false;
        }
        apis.insert(name.to_string(), api);
        true
    }

    /// Look up the table published under `name` as a `T`
    ///
    /// `None` if nothing is published under `name` or it is not a `T`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&'static T> {
        let api: SharedApi = *self.apis.read().get(name)?;
        api.downcast_ref::<T>()
    }

    /// Check if `name` is taken
    pub fn contains(&self, name: &str) -> bool {
        self.apis.read().contains_key(name)
    }

    /// Published names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.apis.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for ApiRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Publish the V1 JSON access API in `registry`
///
/// Returns `false` if the name was already taken.
pub fn export_shared_api(registry: &ApiRegistry) -> bool {
    let exported = registry.export(JSON_API_V1_NAME, &JSON_API_V1);
    if exported {
        info!(target: "jsonkv::api", name = JSON_API_V1_NAME, "Exported JSON access API");
    }
    exported
}
