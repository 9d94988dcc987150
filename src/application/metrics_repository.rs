// Repository trait for CloudWatch metric metadata
use crate::domain::dimension::{Dimension, DimensionSet};
use async_trait::async_trait;

/// One metric stream to probe for existence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricQuery {
    pub region: String,
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: DimensionSet,
}

impl MetricQuery {
    pub fn new(region: &str, namespace: &str, metric_name: &str, dimensions: DimensionSet) -> Self {
        Self {
            region: region.to_string(),
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions,
        }
    }
}

/// A metric returned by a listing, with its full dimension set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredMetric {
    pub metric_name: String,
    pub dimensions: DimensionSet,
}

#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Whether any series with these dimensions has recorded data
    async fn metric_has_data(&self, query: &MetricQuery) -> anyhow::Result<bool>;

    /// Metrics in `namespace` whose name starts with `name_prefix` and which carry `dimension`
    async fn list_metrics(
        &self,
        region: &str,
        namespace: &str,
        name_prefix: &str,
        dimension: &Dimension,
    ) -> anyhow::Result<Vec<DiscoveredMetric>>;
}
