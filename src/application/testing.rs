// In-memory collaborators for tests
use crate::application::dashboard_publisher::{DashboardPublisher, PublishAck};
use crate::application::metrics_repository::{DiscoveredMetric, MetricQuery, MetricsRepository};
use crate::application::resource_inventory::ResourceInventory;
use crate::domain::dimension::{Dimension, DimensionSet};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns a fixed ARN list per region
#[derive(Default)]
pub struct FakeInventory {
    arns: Vec<(String, String)>,
    fail: bool,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeInventory {
    pub fn new(region: &str, arns: &[&str]) -> Self {
        Self {
            arns: arns.iter().map(|a| (region.to_string(), a.to_string())).collect(),
            ..Default::default()
        }
    }

    pub fn with(mut self, region: &str, arn: &str) -> Self {
        self.arns.push((region.to_string(), arn.to_string()));
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ResourceInventory for FakeInventory {
    async fn list_resources(
        &self,
        region: &str,
        _tag_key: &str,
        _tag_value: &str,
        resource_type_filters: &[&str],
    ) -> anyhow::Result<Vec<String>> {
        self.calls.lock().unwrap().push((
            region.to_string(),
            resource_type_filters.iter().map(|f| f.to_string()).collect(),
        ));

        if self.fail {
            anyhow::bail!("ThrottlingException: rate exceeded");
        }

        Ok(self
            .arns
            .iter()
            .filter(|(r, _)| r == region)
            .map(|(_, arn)| arn.clone())
            .collect())
    }
}

#[derive(Debug, Clone)]
struct StoredMetric {
    namespace: String,
    metric_name: String,
    dimensions: DimensionSet,
}

/// Metrics "exist" once registered; probes match when every queried dimension is present
#[derive(Default)]
pub struct FakeMetrics {
    metrics: Vec<StoredMetric>,
    fail: bool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    pub probes: AtomicUsize,
}

impl FakeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, namespace: &str, metric_name: &str, dimensions: DimensionSet) -> Self {
        self.metrics.push(StoredMetric {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions,
        });
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Most `metric_has_data` calls seen running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn carries(stored: &DimensionSet, wanted: &Dimension) -> bool {
        stored.iter().any(|d| d == wanted)
    }
}

#[async_trait]
impl MetricsRepository for FakeMetrics {
    async fn metric_has_data(&self, query: &MetricQuery) -> anyhow::Result<bool> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            anyhow::bail!("InternalServiceFault");
        }

        Ok(self.metrics.iter().any(|m| {
            m.namespace == query.namespace
                && m.metric_name == query.metric_name
                && query.dimensions.iter().all(|d| Self::carries(&m.dimensions, d))
        }))
    }

    async fn list_metrics(
        &self,
        _region: &str,
        namespace: &str,
        name_prefix: &str,
        dimension: &Dimension,
    ) -> anyhow::Result<Vec<DiscoveredMetric>> {
        if self.fail {
            anyhow::bail!("InternalServiceFault");
        }

        Ok(self
            .metrics
            .iter()
            .filter(|m| {
                m.namespace == namespace
                    && m.metric_name.starts_with(name_prefix)
                    && Self::carries(&m.dimensions, dimension)
            })
            .map(|m| DiscoveredMetric {
                metric_name: m.metric_name.clone(),
                dimensions: m.dimensions.clone(),
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FakePublisher {
    fail: bool,
    pub published: Mutex<Vec<(String, String)>>,
}

impl FakePublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn bodies(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl DashboardPublisher for FakePublisher {
    async fn put_dashboard(&self, name: &str, body: &str) -> anyhow::Result<PublishAck> {
        if self.fail {
            anyhow::bail!("AccessDenied: cloudwatch:PutDashboard");
        }

        self.published
            .lock()
            .unwrap()
            .push((name.to_string(), body.to_string()));
        Ok(PublishAck::default())
    }
}
