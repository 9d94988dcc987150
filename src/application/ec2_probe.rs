// Hybrid EC2 prober - detects an active CloudWatch agent per instance
use crate::application::metrics_repository::{MetricQuery, MetricsRepository};
use crate::domain::dimension::{Dimension, DimensionSet};
use std::sync::Arc;

pub const AGENT_NAMESPACE: &str = "CWAgent";
pub const MEMORY_METRIC: &str = "mem_used_percent";
pub const DISK_METRIC_PREFIX: &str = "disk_used_percent";

#[derive(Clone)]
pub struct HybridEc2Prober {
    metrics: Arc<dyn MetricsRepository>,
}

impl HybridEc2Prober {
    pub fn new(metrics: Arc<dyn MetricsRepository>) -> Self {
        Self { metrics }
    }

    /// An agent memory series stands in for "agent installed". Probe errors mean no.
    pub async fn has_extended_metrics(&self, region: &str, instance_id: &str) -> bool {
        let query = MetricQuery::new(
            region,
            AGENT_NAMESPACE,
            MEMORY_METRIC,
            DimensionSet::single("InstanceId", instance_id),
        );

        match self.metrics.metric_has_data(&query).await {
            Ok(found) => {
                tracing::debug!("Agent memory metric for {}: {}", instance_id, found);
                found
            }
            Err(e) => {
                tracing::warn!(
                    "Agent probe failed for {}, treating as agentless: {:#}",
                    instance_id,
                    e
                );
                false
            }
        }
    }

    /// Every disk usage series the agent reports for the instance. Mount points
    /// differ per host, so nothing here is hardcoded.
    pub async fn disk_series(&self, region: &str, instance_id: &str) -> Vec<DimensionSet> {
        let instance = Dimension::new("InstanceId", instance_id);
        match self
            .metrics
            .list_metrics(region, AGENT_NAMESPACE, DISK_METRIC_PREFIX, &instance)
            .await
        {
            Ok(found) => found.into_iter().map(|m| m.dimensions).collect(),
            Err(e) => {
                tracing::warn!("Could not list disk metrics for {}: {:#}", instance_id, e);
                Vec::new()
            }
        }
    }
}
