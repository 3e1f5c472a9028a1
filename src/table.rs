//! Field-descriptor tables for supported host versions.
//!
//! The host side ships one table listing, for each host version, the layouts of
//! the external types it declares. A process negotiates its version once at
//! startup and keeps the resulting [`NegotiatedLayouts`].
//!
//! ```json
//! {
//!   "versions": {
//!     "1.4.6": [
//!       { "name": "net.minecraft.server.ChunkPosition",
//!         "fields": [ { "name": "x", "kind": "int" },
//!                     { "name": "y", "kind": "int" },
//!                     { "name": "z", "kind": "int" } ] }
//!     ]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::reflect::TypeLayout;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutTable {
    versions: BTreeMap<String, Vec<TypeLayout>>,
}

impl LayoutTable {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Registers the layouts of one host version, replacing any previous entry.
    pub fn insert(&mut self, version: impl Into<String>, layouts: Vec<TypeLayout>) {
        self.versions.insert(version.into(), layouts);
    }

    /// Known versions in ascending lexical order.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Selects the layouts declared for `version`.
    pub fn negotiate(&self, version: &str) -> Result<NegotiatedLayouts> {
        let layouts = self.versions.get(version).ok_or_else(|| {
            Error::InvalidArgument(format!("no layout table for host version {}", version))
        })?;

        let layouts: HashMap<_, _> = layouts
            .iter()
            .map(|layout| (layout.name.clone(), Arc::new(layout.clone())))
            .collect();

        info!(version, types = layouts.len(), "negotiated external type layouts");

        Ok(NegotiatedLayouts {
            version: version.to_string(),
            layouts,
        })
    }
}

/// Layouts selected for the running host version.
#[derive(Debug, Clone)]
pub struct NegotiatedLayouts {
    version: String,
    layouts: HashMap<String, Arc<TypeLayout>>,
}

impl NegotiatedLayouts {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, type_name: &str) -> Option<&Arc<TypeLayout>> {
        self.layouts.get(type_name)
    }

    /// Layout of `type_name`, failing when this version does not declare it.
    pub fn require(&self, type_name: &str) -> Result<&Arc<TypeLayout>> {
        self.get(type_name).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "host version {} does not declare {}",
                self.version, type_name
            ))
        })
    }
}
