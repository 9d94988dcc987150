// Dashboard service - discovers tagged resources and publishes their dashboard
use crate::application::dashboard_publisher::DashboardPublisher;
use crate::application::dimension_resolver::DimensionOverrides;
use crate::application::discovery::DiscoveryService;
use crate::application::ec2_probe::HybridEc2Prober;
use crate::application::error::{BuildError, EngineError};
use crate::application::layout::{LayoutInput, assemble, no_resources_placeholder};
use crate::application::metrics_repository::MetricsRepository;
use crate::application::resource_inventory::ResourceInventory;
use crate::application::slo_builder::SloWidgetBuilder;
use crate::application::widget_builders::WidgetFactory;
use crate::domain::service::{ResourceDescriptor, ServiceKind, ServiceRegistry};
use crate::domain::slo::{SloKind, SloOutcome, SloState, SloTargets};
use crate::domain::widget::{CustomWidgetDef, DashboardDocument, Widget};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;

/// Everything one run needs, resolved from settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub dashboard_name: String,
    pub tag_key: String,
    pub tag_value: String,
    pub region: String,
    pub enabled: Vec<ServiceKind>,
    pub custom_widgets: Vec<CustomWidgetDef>,
    pub dimension_overrides: DimensionOverrides,
    pub slo_targets: SloTargets,
    pub probe_concurrency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedResource {
    pub arn: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SloStatus {
    pub kind: SloKind,
    pub status: SloState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl SloStatus {
    fn from_outcome(kind: SloKind, outcome: &SloOutcome) -> Self {
        let missing = match outcome {
            SloOutcome::Suppressed { missing } => missing.clone(),
            _ => Vec::new(),
        };
        Self {
            kind,
            status: outcome.state(),
            missing,
        }
    }
}

/// A synthesized document plus what was left out of it
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub document: DashboardDocument,
    pub resource_count: usize,
    pub slo: Vec<SloStatus>,
    pub skipped: Vec<SkippedResource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub dashboard: String,
    pub widget_count: usize,
    pub resource_count: usize,
    pub slo: Vec<SloStatus>,
    pub skipped: Vec<SkippedResource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validation_messages: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DashboardService {
    config: EngineConfig,
    discovery: DiscoveryService,
    widgets: WidgetFactory,
    slo: SloWidgetBuilder,
    publisher: Arc<dyn DashboardPublisher>,
}

impl DashboardService {
    pub fn new(
        config: EngineConfig,
        registry: Arc<ServiceRegistry>,
        inventory: Arc<dyn ResourceInventory>,
        metrics: Arc<dyn MetricsRepository>,
        publisher: Arc<dyn DashboardPublisher>,
    ) -> Self {
        let prober = HybridEc2Prober::new(metrics.clone());
        Self {
            discovery: DiscoveryService::new(inventory, registry),
            widgets: WidgetFactory::new(config.dimension_overrides.clone(), prober),
            slo: SloWidgetBuilder::new(metrics, config.slo_targets, config.probe_concurrency),
            publisher,
            config,
        }
    }

    /// Build the dashboard document without publishing it
    pub async fn synthesize(&self) -> Result<Synthesis, EngineError> {
        let config = &self.config;
        let discovery = self
            .discovery
            .discover(&config.region, &config.tag_key, &config.tag_value, &config.enabled)
            .await?;

        let mut skipped: Vec<SkippedResource> = discovery
            .unmatched
            .iter()
            .map(|arn| SkippedResource {
                arn: arn.clone(),
                reason: "no matching service".to_string(),
            })
            .collect();

        if discovery.resources.is_empty() {
            tracing::warn!("No resources found with tag {}:{}", config.tag_key, config.tag_value);
            let document = assemble(
                LayoutInput {
                    service_groups: vec![vec![no_resources_placeholder(&config.tag_key, &config.tag_value)]],
                    custom: config.custom_widgets.clone(),
                    ..Default::default()
                },
                &config.region,
            );
            return Ok(Synthesis {
                document,
                resource_count: 0,
                slo: Vec::new(),
                skipped,
            });
        }

        let mut resources = discovery.resources;
        let registry = self.discovery.registry();
        // ARN order within a group is already established by discovery
        resources.sort_by_key(|r| registry.position(r.service).unwrap_or(usize::MAX));

        let (built, slo_outcomes) = tokio::join!(self.build_resources(&resources), self.evaluate_slos(&resources));

        let mut service_groups: Vec<Vec<Widget>> = Vec::new();
        let mut current: Option<ServiceKind> = None;
        for (resource, result) in resources.iter().zip(built) {
            match result {
                Ok(widgets) => {
                    if current != Some(resource.service) {
                        service_groups.push(Vec::new());
                        current = Some(resource.service);
                    }
                    if let Some(group) = service_groups.last_mut() {
                        group.extend(widgets);
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", resource.arn, e);
                    skipped.push(SkippedResource {
                        arn: resource.arn.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let slo = slo_outcomes
            .iter()
            .map(|(kind, outcome)| SloStatus::from_outcome(*kind, outcome))
            .collect();
        let slo_rows = slo_outcomes
            .into_iter()
            .filter_map(|(_, outcome)| match outcome {
                SloOutcome::Built(widgets) => Some(widgets),
                _ => None,
            })
            .collect();

        let document = assemble(
            LayoutInput {
                slo_rows,
                service_groups,
                custom: config.custom_widgets.clone(),
            },
            &config.region,
        );

        Ok(Synthesis {
            document,
            resource_count: resources.len(),
            slo,
            skipped,
        })
    }

    /// Synthesize and publish, replacing the whole dashboard
    pub async fn refresh(&self) -> Result<RunSummary, EngineError> {
        let synthesis = self.synthesize().await?;
        let body = synthesis.document.to_json()?;
        let name = &self.config.dashboard_name;

        tracing::info!("Publishing dashboard {} with {} widgets", name, synthesis.document.widgets.len());
        let ack = self.publisher.put_dashboard(name, &body).await.map_err(|source| {
            tracing::error!("Failed to publish dashboard {}: {:#}", name, source);
            EngineError::Publish {
                dashboard: name.clone(),
                source,
            }
        })?;

        Ok(RunSummary {
            dashboard: name.clone(),
            widget_count: synthesis.document.widgets.len(),
            resource_count: synthesis.resource_count,
            slo: synthesis.slo,
            skipped: synthesis.skipped,
            validation_messages: ack.validation_messages,
            generated_at: Utc::now(),
        })
    }

    /// Per-resource widgets, bounded fan-out, results in input order
    async fn build_resources(&self, resources: &[ResourceDescriptor]) -> Vec<Result<Vec<Widget>, BuildError>> {
        let builds: Vec<_> = resources.iter().map(|resource| self.widgets.build(resource)).collect();
        futures::stream::iter(builds)
            .buffered(self.config.probe_concurrency.max(1))
            .collect()
            .await
    }

    /// One candidate at a time so SLO probes stay within `probe_concurrency`
    async fn evaluate_slos(&self, resources: &[ResourceDescriptor]) -> Vec<(SloKind, SloOutcome)> {
        let refs: Vec<&ResourceDescriptor> = resources.iter().collect();
        let mut outcomes = Vec::with_capacity(SloKind::ALL.len());
        for kind in SloKind::ALL {
            outcomes.push((kind, self.slo.evaluate(kind, &refs).await));
        }
        outcomes
    }
}
