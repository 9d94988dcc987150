// Caller-supplied dimension overrides, keyed by metric namespace
use crate::domain::dimension::DimensionSet;
use serde::Deserialize;
use std::collections::BTreeMap;

/// An override replaces the auto-discovered set wholesale; no field-level merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DimensionOverrides(BTreeMap<String, DimensionSet>);

impl DimensionOverrides {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn resolve(&self, namespace: &str, auto_discovered: DimensionSet) -> DimensionSet {
        match self.0.get(namespace) {
            Some(explicit) => {
                tracing::debug!("Using configured dimensions for namespace {}", namespace);
                explicit.clone()
            }
            None => auto_discovered,
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
