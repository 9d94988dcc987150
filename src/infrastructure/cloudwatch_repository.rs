// CloudWatch adapter - metric probes and dashboard publishing
use crate::application::dashboard_publisher::{DashboardPublisher, PublishAck};
use crate::application::metrics_repository::{DiscoveredMetric, MetricQuery, MetricsRepository};
use crate::domain::dimension::{Dimension, DimensionSet};
use crate::infrastructure::aws_clients::RegionalClients;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::types::{DashboardValidationMessage, DimensionFilter};

pub struct CloudWatchRepository {
    clients: RegionalClients<Client>,
    /// Region dashboards are published in
    home_region: String,
}

impl CloudWatchRepository {
    pub fn new(clients: RegionalClients<Client>, home_region: impl Into<String>) -> Self {
        Self {
            clients,
            home_region: home_region.into(),
        }
    }
}

fn dimension_filter(dimension: &Dimension) -> DimensionFilter {
    DimensionFilter::builder()
        .name(&dimension.name)
        .value(&dimension.value)
        .build()
}

fn validation_message(message: &DashboardValidationMessage) -> String {
    match message.data_path() {
        Some(path) => format!("{}: {}", path, message.message().unwrap_or_default()),
        None => message.message().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl MetricsRepository for CloudWatchRepository {
    async fn metric_has_data(&self, query: &MetricQuery) -> anyhow::Result<bool> {
        let client = self.clients.get(&query.region)?;
        let filters: Vec<DimensionFilter> = query.dimensions.iter().map(dimension_filter).collect();

        let output = client
            .list_metrics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .set_dimensions(Some(filters))
            .send()
            .await
            .map_err(|e| e.into_service_error())
            .with_context(|| format!("ListMetrics {}/{} failed", query.namespace, query.metric_name))?;

        let found = !output.metrics().is_empty();
        tracing::debug!(
            "{}/{} in {}: {}",
            query.namespace,
            query.metric_name,
            query.region,
            if found { "present" } else { "absent" }
        );
        Ok(found)
    }

    async fn list_metrics(
        &self,
        region: &str,
        namespace: &str,
        name_prefix: &str,
        dimension: &Dimension,
    ) -> anyhow::Result<Vec<DiscoveredMetric>> {
        let client = self.clients.get(region)?;
        let filter = dimension_filter(dimension);
        let mut discovered = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = client
                .list_metrics()
                .namespace(namespace)
                .dimensions(filter.clone())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| e.into_service_error())
                .with_context(|| format!("ListMetrics {} for {}={} failed", namespace, dimension.name, dimension.value))?;

            for metric in output.metrics() {
                let Some(name) = metric.metric_name() else {
                    continue;
                };
                if !name.starts_with(name_prefix) {
                    continue;
                }
                let dimensions: Vec<Dimension> = metric
                    .dimensions()
                    .iter()
                    .filter_map(|d| Some(Dimension::new(d.name()?, d.value()?)))
                    .collect();
                discovered.push(DiscoveredMetric {
                    metric_name: name.to_string(),
                    dimensions: DimensionSet::from(dimensions),
                });
            }

            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        Ok(discovered)
    }
}

#[async_trait]
impl DashboardPublisher for CloudWatchRepository {
    async fn put_dashboard(&self, name: &str, body: &str) -> anyhow::Result<PublishAck> {
        let client = self.clients.get(&self.home_region)?;
        let output = client
            .put_dashboard()
            .dashboard_name(name)
            .dashboard_body(body)
            .send()
            .await
            .map_err(|e| e.into_service_error())
            .with_context(|| format!("PutDashboard {} failed", name))?;

        let validation_messages: Vec<String> = output
            .dashboard_validation_messages()
            .iter()
            .map(validation_message)
            .collect();
        for message in &validation_messages {
            tracing::warn!("Dashboard {} validation: {}", name, message);
        }

        tracing::info!("Published dashboard {} ({} bytes)", name, body.len());
        Ok(PublishAck { validation_messages })
    }
}
