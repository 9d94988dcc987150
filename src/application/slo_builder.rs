// Aggregate SLO widgets, gated on their input metrics having data
use crate::application::ec2_probe::{AGENT_NAMESPACE, MEMORY_METRIC};
use crate::application::metrics_repository::{MetricQuery, MetricsRepository};
use crate::application::widget_builders::{ResourceIdentity, identify};
use crate::domain::metric::{MetricEntry, MetricExpression, MetricWidgetProperties, View};
use crate::domain::service::ResourceDescriptor;
use crate::domain::slo::{MetricRef, SloKind, SloOutcome, SloTargets};
use crate::domain::widget::Widget;
use futures::{StreamExt, stream};
use std::sync::Arc;

pub const SLO_GRAPH_WIDTH: u32 = 18;
pub const SLO_VALUE_WIDTH: u32 = 6;
pub const SLO_HEIGHT: u32 = 6;

/// Small constant keeping the ratio defined when there is no traffic
const EPSILON: &str = "0.000001";

/// Agent memory series; joins the EC2 formula only when some instance reports it
const AGENT_MEMORY: MetricRef = MetricRef {
    namespace: AGENT_NAMESPACE,
    metric_name: MEMORY_METRIC,
};

#[derive(Clone)]
pub struct SloWidgetBuilder {
    metrics: Arc<dyn MetricsRepository>,
    targets: SloTargets,
    /// Upper bound on in-flight existence probes
    concurrency: usize,
}

impl SloWidgetBuilder {
    pub fn new(metrics: Arc<dyn MetricsRepository>, targets: SloTargets, concurrency: usize) -> Self {
        Self {
            metrics,
            targets,
            concurrency: concurrency.max(1),
        }
    }

    /// Probe the required metrics of `kind` across `resources` and build the widgets
    /// if all of them have data somewhere in the aggregate.
    pub async fn evaluate(&self, kind: SloKind, resources: &[&ResourceDescriptor]) -> SloOutcome {
        let members: Vec<(&ResourceDescriptor, ResourceIdentity)> = resources
            .iter()
            .filter(|r| r.service == kind.service())
            .filter_map(|r| match identify(r) {
                Ok(identity) => Some((*r, identity)),
                Err(e) => {
                    tracing::debug!("Leaving {} out of {:?}: {}", r.arn, kind, e);
                    None
                }
            })
            .collect();

        if members.is_empty() {
            return SloOutcome::NotApplicable;
        }

        let mut missing = Vec::new();
        for metric_ref in kind.metric_refs() {
            if !self.any_has_data(metric_ref, &members).await {
                missing.push(format!("{}/{}", metric_ref.namespace, metric_ref.metric_name));
            }
        }

        if !missing.is_empty() {
            tracing::info!("Skipping {:?} SLO widget, no data for {}", kind, missing.join(", "));
            return SloOutcome::Suppressed { missing };
        }

        let with_memory = kind == SloKind::Ec2Performance && self.any_has_data(&AGENT_MEMORY, &members).await;

        tracing::info!("Building {:?} SLO widget over {} resources", kind, members.len());
        SloOutcome::Built(self.build(kind, &members, with_memory))
    }

    /// True once any member reports the metric; remaining probes are dropped
    async fn any_has_data(&self, metric_ref: &MetricRef, members: &[(&ResourceDescriptor, ResourceIdentity)]) -> bool {
        let probes: Vec<_> = members
            .iter()
            .map(|(resource, identity)| self.probe(metric_ref, resource, identity))
            .collect();

        let mut results = stream::iter(probes).buffer_unordered(self.concurrency);
        while let Some(found) = results.next().await {
            if found {
                return true;
            }
        }
        false
    }

    async fn probe(&self, metric_ref: &MetricRef, resource: &ResourceDescriptor, identity: &ResourceIdentity) -> bool {
        let query = MetricQuery::new(
            &resource.region,
            metric_ref.namespace,
            metric_ref.metric_name,
            identity.dimensions.clone(),
        );
        match self.metrics.metric_has_data(&query).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    "Probe for {} on {} failed, treating as absent: {:#}",
                    metric_ref.metric_name,
                    resource.arn,
                    e
                );
                false
            }
        }
    }

    /// Graph plus current-value pair for one SLO, positioned at x=0 / x=18 of a row
    fn build(
        &self,
        kind: SloKind,
        members: &[(&ResourceDescriptor, ResourceIdentity)],
        with_memory: bool,
    ) -> Vec<Widget> {
        let region = members
            .first()
            .map(|(resource, _)| resource.region.as_str())
            .unwrap_or_default();
        let names: Vec<&str> = members
            .iter()
            .map(|(_, identity)| search_term(kind, identity))
            .collect();
        let targets = &self.targets;

        let (title, value_title, metrics, y_range, annotated) = match kind {
            SloKind::AlbAvailability => {
                let mut metrics: Vec<MetricEntry> = Vec::new();
                for (i, name) in names.iter().enumerate() {
                    metrics.push(
                        MetricExpression::hidden(&format!("r{}", i), alb_search("RequestCount", name)).into(),
                    );
                    metrics.push(
                        MetricExpression::hidden(&format!("e{}", i), alb_search("HTTPCode_Target_5XX_Count", name))
                            .into(),
                    );
                }
                let ids = |prefix: &str| {
                    (0..names.len())
                        .map(|i| format!("{}{}", prefix, i))
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                metrics.push(
                    MetricExpression::shown(
                        "slo",
                        format!("100*(1-SUM([{}])/(SUM([{}])+{}))", ids("e"), ids("r"), EPSILON),
                        "Availability %",
                    )
                    .into(),
                );
                ("ALB Availability SLO".to_string(), "Current Availability", metrics, (95.0, 100.0), true)
            }
            SloKind::LambdaSuccessRate => {
                let terms = any_of(&names);
                let metrics: Vec<MetricEntry> = vec![
                    MetricExpression::hidden(
                        "invocations",
                        format!("SEARCH('{{AWS/Lambda,FunctionName}} MetricName=\"Invocations\" ({})', 'Sum', 300)", terms),
                    )
                    .into(),
                    MetricExpression::hidden(
                        "errors",
                        format!("SEARCH('{{AWS/Lambda,FunctionName}} MetricName=\"Errors\" ({})', 'Sum', 300)", terms),
                    )
                    .into(),
                    MetricExpression::shown(
                        "slo",
                        format!("100*(SUM(invocations)-SUM(errors))/(SUM(invocations)+{})", EPSILON),
                        "Success Rate %",
                    )
                    .into(),
                ];
                ("Lambda Success Rate SLO".to_string(), "Current Success Rate", metrics, (95.0, 100.0), true)
            }
            SloKind::CloudFrontSuccessRate => {
                let terms = any_of(&names);
                let metrics: Vec<MetricEntry> = vec![
                    MetricExpression::hidden(
                        "error_rate",
                        format!(
                            "SEARCH('{{AWS/CloudFront,DistributionId,Region}} MetricName=\"5xxErrorRate\" Region=\"Global\" ({})', 'Average', 300)",
                            terms
                        ),
                    )
                    .into(),
                    MetricExpression::shown("slo", "100-AVG(error_rate)".to_string(), "Success Rate %").into(),
                ];
                ("CloudFront Success Rate SLO".to_string(), "Current Success Rate", metrics, (95.0, 100.0), true)
            }
            SloKind::Ec2Performance => {
                let terms = any_of(&names);
                let cpu = targets.ec2_cpu_percent;
                let mut metrics: Vec<MetricEntry> = vec![
                    MetricExpression::hidden(
                        "avg_cpu",
                        format!("AVG(SEARCH('{{AWS/EC2,InstanceId}} MetricName=\"CPUUtilization\" ({})', 'Average', 300))", terms),
                    )
                    .into(),
                ];
                let (title, condition) = if with_memory {
                    metrics.push(
                        MetricExpression::hidden(
                            "avg_mem",
                            format!(
                                "FILL(AVG(SEARCH('{{{},InstanceId}} MetricName=\"{}\" ({})', 'Average', 300)), 0)",
                                AGENT_NAMESPACE, MEMORY_METRIC, terms
                            ),
                        )
                        .into(),
                    );
                    (
                        format!("EC2 Perf. SLO (CPU & Mem < {}%)", cpu),
                        format!("avg_cpu < {} AND avg_mem < {}", cpu, cpu),
                    )
                } else {
                    (format!("EC2 Perf. SLO (CPU < {}%)", cpu), format!("avg_cpu < {}", cpu))
                };
                metrics.push(
                    MetricExpression::shown("slo", format!("IF({}, 100, 0)", condition), "Performance SLO Met %").into(),
                );
                (title, "Current Performance", metrics, (0.0, 105.0), false)
            }
            SloKind::RdsPerformance => {
                let terms = any_of(&names);
                let rds_search = |metric: &str| {
                    format!("AVG(SEARCH('{{AWS/RDS,DBInstanceIdentifier}} MetricName=\"{}\" ({})', 'Average', 300))", metric, terms)
                };
                let latency_s = targets.latency_target_ms / 1000.0;
                let cpu = targets.rds_cpu_percent;
                let metrics: Vec<MetricEntry> = vec![
                    MetricExpression::hidden(
                        "avg_latency",
                        format!("({} + {}) / 2", rds_search("ReadLatency"), rds_search("WriteLatency")),
                    )
                    .into(),
                    MetricExpression::hidden("avg_cpu", rds_search("CPUUtilization")).into(),
                    MetricExpression::shown(
                        "slo",
                        format!("IF(avg_latency < {} AND avg_cpu < {}, 100, 0)", latency_s, cpu),
                        "Performance SLO Met %",
                    )
                    .into(),
                ];
                (
                    format!("RDS Perf. SLO (Latency < {}ms & CPU < {}%)", targets.latency_target_ms, cpu),
                    "Current Performance",
                    metrics,
                    (0.0, 105.0),
                    false,
                )
            }
        };

        let mut graph = MetricWidgetProperties::new(title, region, metrics.clone()).y_axis(y_range.0, y_range.1);
        if annotated {
            graph = graph.annotate(
                format!("SLO Target ({}%)", targets.availability_percent),
                targets.availability_percent,
            );
        }
        let value = MetricWidgetProperties::new(value_title, region, metrics).view(View::SingleValue);

        let mut value_widget = Widget::metric(SLO_VALUE_WIDTH, SLO_HEIGHT, value);
        value_widget.x = SLO_GRAPH_WIDTH;
        vec![Widget::metric(SLO_GRAPH_WIDTH, SLO_HEIGHT, graph), value_widget]
    }
}

/// The token a SEARCH expression matches a resource on
fn search_term(kind: SloKind, identity: &ResourceIdentity) -> &str {
    match kind {
        // ALB searches match the full app/name/id dimension value
        SloKind::AlbAvailability => identity.dimensions.get("LoadBalancer").unwrap_or(&identity.name),
        _ => &identity.name,
    }
}

fn any_of(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("\"{}\"", n))
        .collect::<Vec<_>>()
        .join(" OR ")
}

fn alb_search(metric: &str, load_balancer: &str) -> String {
    format!(
        "SEARCH('{{AWS/ApplicationELB,LoadBalancer}} MetricName=\"{}\" \"{}\"', 'Sum', 300)",
        metric, load_balancer
    )
}
