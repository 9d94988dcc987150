// Tag-based resource discovery and classification
use crate::application::error::EngineError;
use crate::application::resource_inventory::ResourceInventory;
use crate::domain::service::{GLOBAL_REGION, ResourceDescriptor, ServiceKind, ServiceRegistry};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    /// Classified resources of enabled services, sorted by ARN
    pub resources: Vec<ResourceDescriptor>,
    /// ARNs no registry entry accepted
    pub unmatched: Vec<String>,
}

#[derive(Clone)]
pub struct DiscoveryService {
    inventory: Arc<dyn ResourceInventory>,
    registry: Arc<ServiceRegistry>,
}

impl DiscoveryService {
    pub fn new(inventory: Arc<dyn ResourceInventory>, registry: Arc<ServiceRegistry>) -> Self {
        Self { inventory, registry }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Query the run region for regional services and us-east-1 for global ones,
    /// then classify every ARN against the full registry.
    pub async fn discover(
        &self,
        run_region: &str,
        tag_key: &str,
        tag_value: &str,
        enabled: &[ServiceKind],
    ) -> Result<Discovery, EngineError> {
        let regional = self.registry.filters_for(enabled, false);
        let global = self.registry.filters_for(enabled, true);
        let queries = if run_region == GLOBAL_REGION {
            let mut filters: Vec<&str> = regional.into_iter().chain(global).collect();
            filters.sort_unstable();
            filters.dedup();
            vec![(run_region, filters)]
        } else {
            vec![(run_region, regional), (GLOBAL_REGION, global)]
        };

        let mut arns = BTreeSet::new();
        for (region, filters) in queries {
            if filters.is_empty() {
                continue;
            }

            tracing::debug!("Listing {}={} resources in {} ({} filters)", tag_key, tag_value, region, filters.len());
            let found = self
                .inventory
                .list_resources(region, tag_key, tag_value, &filters)
                .await
                .map_err(|e| {
                    tracing::error!("Resource discovery failed in {}: {:#}", region, e);
                    EngineError::Discovery(e)
                })?;
            arns.extend(found);
        }

        let mut discovery = Discovery::default();
        for arn in arns {
            match self.registry.classify(&arn) {
                Some(kind) if enabled.contains(&kind) => {
                    discovery.resources.push(ResourceDescriptor::new(arn, kind, run_region));
                }
                Some(kind) => {
                    tracing::debug!("Ignoring {} ({} is not enabled)", arn, kind.key());
                }
                None => {
                    tracing::warn!("No widget builder for resource {}", arn);
                    discovery.unmatched.push(arn);
                }
            }
        }

        tracing::info!(
            "Discovered {} resources tagged {}={} ({} unmatched)",
            discovery.resources.len(),
            tag_key,
            tag_value,
            discovery.unmatched.len()
        );
        Ok(discovery)
    }
}
