// Per-service widget builders
use crate::application::dimension_resolver::DimensionOverrides;
use crate::application::ec2_probe::{AGENT_NAMESPACE, HybridEc2Prober, MEMORY_METRIC};
use crate::application::error::BuildError;
use crate::domain::dimension::DimensionSet;
use crate::domain::metric::{MetricEntry, MetricLine, MetricWidgetProperties, Statistic, View};
use crate::domain::service::{ResourceDescriptor, ServiceKind};
use crate::domain::widget::{GRID_WIDTH, Widget};

pub const RESOURCE_WIDGET_HEIGHT: u32 = 7;
const HALF_WIDTH: u32 = GRID_WIDTH / 2;

/// Identifiers pulled out of a resource ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    /// Default dimensions, before overrides
    pub dimensions: DimensionSet,
    /// Short name used in widget titles and search expressions
    pub name: String,
}

impl ResourceIdentity {
    fn new(name: &str, dimensions: DimensionSet) -> Self {
        Self {
            dimensions,
            name: name.to_string(),
        }
    }
}

fn required<'a>(value: Option<&'a str>, arn: &str, reason: &'static str) -> Result<&'a str, BuildError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BuildError::malformed(arn, reason))
}

/// Extract the identifying dimensions of a resource from its ARN
pub fn identify(resource: &ResourceDescriptor) -> Result<ResourceIdentity, BuildError> {
    let arn_str = resource.arn.as_str();
    let arn = resource
        .parsed_arn()
        .ok_or_else(|| BuildError::malformed(arn_str, "not an ARN"))?;
    let leaf = || required(Some(arn.resource_leaf()), arn_str, "missing resource id");

    let identity = match resource.service {
        ServiceKind::Ec2Instance => {
            let id = leaf()?;
            ResourceIdentity::new(id, DimensionSet::single("InstanceId", id))
        }
        ServiceKind::RdsInstance => {
            let db = required(arn.segment_after("db:"), arn_str, "missing DB identifier")?;
            ResourceIdentity::new(db, DimensionSet::single("DBInstanceIdentifier", db))
        }
        ServiceKind::LambdaFunction => {
            let function = required(arn.segment_after("function:"), arn_str, "missing function name")?;
            ResourceIdentity::new(function, DimensionSet::single("FunctionName", function))
        }
        ServiceKind::Alb | ServiceKind::Nlb => {
            // loadbalancer/{app|net}/name/id
            let segments = arn.path_segments();
            if segments.len() != 4 || segments[1..].iter().any(|s| s.is_empty()) {
                return Err(BuildError::malformed(arn_str, "expected loadbalancer/<type>/<name>/<id>"));
            }
            let value = segments[1..].join("/");
            ResourceIdentity::new(segments[2], DimensionSet::single("LoadBalancer", value))
        }
        ServiceKind::ClassicElb => {
            let name = leaf()?;
            ResourceIdentity::new(name, DimensionSet::single("LoadBalancerName", name))
        }
        ServiceKind::EcsService => {
            // service/cluster/name; the legacy service/name form carries no cluster
            let segments = arn.path_segments();
            if segments.len() != 3 || segments[1].is_empty() || segments[2].is_empty() {
                return Err(BuildError::malformed(arn_str, "expected service/<cluster>/<service>"));
            }
            ResourceIdentity::new(
                &format!("{}/{}", segments[1], segments[2]),
                DimensionSet::single("ClusterName", segments[1]).with("ServiceName", segments[2]),
            )
        }
        ServiceKind::EksCluster => {
            let cluster = leaf()?;
            ResourceIdentity::new(cluster, DimensionSet::single("ClusterName", cluster))
        }
        ServiceKind::DynamoDbTable => {
            let table = leaf()?;
            ResourceIdentity::new(table, DimensionSet::single("TableName", table))
        }
        ServiceKind::RedshiftCluster => {
            let cluster = required(arn.segment_after("cluster:"), arn_str, "missing cluster identifier")?;
            ResourceIdentity::new(cluster, DimensionSet::single("ClusterIdentifier", cluster))
        }
        ServiceKind::SqsQueue => ResourceIdentity::new(arn.resource, DimensionSet::single("QueueName", arn.resource)),
        ServiceKind::SnsTopic => ResourceIdentity::new(arn.resource, DimensionSet::single("TopicName", arn.resource)),
        ServiceKind::CloudFrontDistribution => {
            let distribution = leaf()?;
            ResourceIdentity::new(
                distribution,
                DimensionSet::single("Region", "Global").with("DistributionId", distribution),
            )
        }
        ServiceKind::Route53HealthCheck => {
            let check = leaf()?;
            ResourceIdentity::new(check, DimensionSet::single("HealthCheckId", check))
        }
        ServiceKind::AcmCertificate => {
            let certificate = leaf()?;
            ResourceIdentity::new(certificate, DimensionSet::single("CertificateArn", arn_str))
        }
        ServiceKind::ElastiCacheCluster => {
            let cluster = required(arn.segment_after("cluster:"), arn_str, "missing cache cluster id")?;
            ResourceIdentity::new(cluster, DimensionSet::single("CacheClusterId", cluster))
        }
        ServiceKind::FsxFileSystem => {
            let fs = leaf()?;
            ResourceIdentity::new(fs, DimensionSet::single("FileSystemId", fs))
        }
        ServiceKind::StorageGateway => {
            let gateway = leaf()?;
            ResourceIdentity::new(gateway, DimensionSet::single("GatewayId", gateway))
        }
        ServiceKind::DxConnection => {
            let connection = leaf()?;
            ResourceIdentity::new(connection, DimensionSet::single("ConnectionId", connection))
        }
        ServiceKind::VpnConnection => {
            let vpn = leaf()?;
            ResourceIdentity::new(vpn, DimensionSet::single("VpnId", vpn))
        }
        ServiceKind::ApiGatewayStage => {
            // /restapis/{api}/stages/{stage}
            let segments = arn.path_segments();
            if segments.len() != 5 || segments[3] != "stages" || segments[2].is_empty() || segments[4].is_empty() {
                return Err(BuildError::malformed(arn_str, "expected /restapis/<api>/stages/<stage>"));
            }
            ResourceIdentity::new(
                &format!("{}/{}", segments[2], segments[4]),
                DimensionSet::single("ApiName", segments[2]).with("Stage", segments[4]),
            )
        }
        ServiceKind::StepFunctionsStateMachine => {
            let machine = required(arn.segment_after("stateMachine:"), arn_str, "missing state machine name")?;
            ResourceIdentity::new(machine, DimensionSet::single("StateMachineArn", arn_str))
        }
        ServiceKind::MqBroker => {
            let broker = required(arn.segment_after("broker:"), arn_str, "missing broker name")?;
            ResourceIdentity::new(broker, DimensionSet::single("Broker", broker))
        }
    };

    Ok(identity)
}

/// Default graph of a service: namespace, metric set and title
struct DefaultGraph {
    namespace: &'static str,
    title: &'static str,
    metrics: &'static [(&'static str, Option<Statistic>)],
    view: View,
}

const fn graph(
    namespace: &'static str,
    title: &'static str,
    metrics: &'static [(&'static str, Option<Statistic>)],
) -> DefaultGraph {
    DefaultGraph {
        namespace,
        title,
        metrics,
        view: View::TimeSeries,
    }
}

fn default_graph(kind: ServiceKind) -> DefaultGraph {
    use Statistic::{Average, Maximum, Minimum, Sum};

    match kind {
        ServiceKind::Ec2Instance => graph(
            "AWS/EC2",
            "EC2 Standard",
            &[
                ("CPUUtilization", None),
                ("NetworkIn", None),
                ("NetworkOut", None),
                ("StatusCheckFailed", Some(Maximum)),
            ],
        ),
        ServiceKind::RdsInstance => graph(
            "AWS/RDS",
            "RDS Detailed",
            &[
                ("CPUUtilization", None),
                ("DatabaseConnections", None),
                ("FreeableMemory", None),
                ("ReadLatency", None),
                ("WriteLatency", None),
            ],
        ),
        ServiceKind::LambdaFunction => graph(
            "AWS/Lambda",
            "Lambda",
            &[("Invocations", Some(Sum)), ("Errors", Some(Sum)), ("Throttles", Some(Sum))],
        ),
        ServiceKind::Alb => graph(
            "AWS/ApplicationELB",
            "ALB",
            &[("HTTPCode_Target_5XX_Count", Some(Sum)), ("TargetResponseTime", Some(Average))],
        ),
        ServiceKind::Nlb => graph(
            "AWS/NetworkELB",
            "NLB",
            &[("UnHealthyHostCount", None), ("TCP_Target_Reset_Count", Some(Sum))],
        ),
        ServiceKind::ClassicElb => graph(
            "AWS/ELB",
            "Classic ELB",
            &[("HTTPCode_Backend_5XX", Some(Sum)), ("UnHealthyHostCount", None)],
        ),
        ServiceKind::EcsService => graph(
            "AWS/ECS",
            "ECS",
            &[("CPUUtilization", None), ("MemoryUtilization", None)],
        ),
        ServiceKind::EksCluster => graph(
            "ContainerInsights",
            "EKS Cluster",
            &[("node_cpu_utilization", None), ("node_memory_utilization", None)],
        ),
        ServiceKind::DynamoDbTable => graph(
            "AWS/DynamoDB",
            "DynamoDB",
            &[("ThrottledRequests", Some(Sum)), ("SuccessfulRequestLatency", None)],
        ),
        ServiceKind::RedshiftCluster => graph(
            "AWS/Redshift",
            "Redshift",
            &[("CPUUtilization", None), ("PercentageDiskSpaceUsed", None)],
        ),
        ServiceKind::SqsQueue => graph(
            "AWS/SQS",
            "SQS Queue",
            &[("ApproximateAgeOfOldestMessage", None), ("ApproximateNumberOfMessagesVisible", None)],
        ),
        ServiceKind::SnsTopic => graph(
            "AWS/SNS",
            "SNS Topic",
            &[("NumberOfNotificationsFailed", Some(Sum))],
        ),
        ServiceKind::CloudFrontDistribution => graph(
            "AWS/CloudFront",
            "CloudFront 5xx",
            &[("5xxErrorRate", None)],
        ),
        ServiceKind::Route53HealthCheck => graph(
            "AWS/Route53",
            "Route53 Health Check",
            &[("HealthCheckStatus", Some(Minimum))],
        ),
        ServiceKind::AcmCertificate => DefaultGraph {
            view: View::SingleValue,
            ..graph("AWS/CertificateManager", "ACM Cert Expiry", &[("DaysToExpiry", Some(Minimum))])
        },
        ServiceKind::ElastiCacheCluster => graph(
            "AWS/ElastiCache",
            "ElastiCache",
            &[("CPUUtilization", None), ("FreeableMemory", None), ("NetworkBytesIn", None)],
        ),
        ServiceKind::FsxFileSystem => graph(
            "AWS/FSx",
            "FSx Free Storage",
            &[("FreeStorageCapacity", Some(Minimum))],
        ),
        ServiceKind::StorageGateway => graph(
            "AWS/StorageGateway",
            "Storage Gateway",
            &[("CachePercentDirty", Some(Maximum))],
        ),
        ServiceKind::DxConnection => graph(
            "AWS/DX",
            "Direct Connect",
            &[("ConnectionState", Some(Minimum))],
        ),
        ServiceKind::VpnConnection => graph(
            "AWS/VPN",
            "VPN Tunnels",
            &[("TunnelState", Some(Minimum))],
        ),
        ServiceKind::ApiGatewayStage => graph(
            "AWS/ApiGateway",
            "API Gateway",
            &[
                ("5XXError", Some(Sum)),
                ("4XXError", Some(Sum)),
                ("Latency", Some(Average)),
                ("Count", Some(Sum)),
            ],
        ),
        ServiceKind::StepFunctionsStateMachine => graph(
            "AWS/States",
            "Step Functions",
            &[("ExecutionsFailed", Some(Sum)), ("ExecutionTime", Some(Average))],
        ),
        ServiceKind::MqBroker => graph(
            "AWS/AmazonMQ",
            "Amazon MQ",
            &[("CpuUtilization", None), ("TotalMessageCount", None)],
        ),
    }
}

fn lines(namespace: &str, dimensions: &DimensionSet, metrics: &[(&str, Option<Statistic>)]) -> Vec<MetricEntry> {
    metrics
        .iter()
        .map(|(name, stat)| {
            let line = MetricLine::new(namespace, name, dimensions.clone());
            MetricEntry::from(match stat {
                Some(stat) => line.stat(*stat),
                None => line,
            })
        })
        .collect()
}

/// Builds resource widgets; dispatch is by `ServiceKind`
#[derive(Clone)]
pub struct WidgetFactory {
    overrides: DimensionOverrides,
    prober: HybridEc2Prober,
}

impl WidgetFactory {
    pub fn new(overrides: DimensionOverrides, prober: HybridEc2Prober) -> Self {
        Self { overrides, prober }
    }

    pub async fn build(&self, resource: &ResourceDescriptor) -> Result<Vec<Widget>, BuildError> {
        let identity = identify(resource)?;
        match resource.service {
            ServiceKind::Ec2Instance => Ok(self.ec2_hybrid(resource, &identity).await),
            kind => Ok(vec![self.standard(kind, resource, &identity)]),
        }
    }

    fn standard(&self, kind: ServiceKind, resource: &ResourceDescriptor, identity: &ResourceIdentity) -> Widget {
        let defaults = default_graph(kind);
        let dimensions = self.overrides.resolve(defaults.namespace, identity.dimensions.clone());
        let title = match kind {
            ServiceKind::AcmCertificate => {
                let tail = identity.name.len().saturating_sub(12);
                format!("{}: ...{}", defaults.title, identity.name.get(tail..).unwrap_or(&identity.name))
            }
            _ => format!("{}: {}", defaults.title, identity.name),
        };

        let properties = MetricWidgetProperties::new(
            title,
            &resource.region,
            lines(defaults.namespace, &dimensions, defaults.metrics),
        )
        .view(defaults.view);

        Widget::metric(GRID_WIDTH, RESOURCE_WIDGET_HEIGHT, properties)
    }

    /// Agent present: detailed + disk widgets. Otherwise the hypervisor baseline.
    async fn ec2_hybrid(&self, resource: &ResourceDescriptor, identity: &ResourceIdentity) -> Vec<Widget> {
        let instance_id = identity.name.as_str();
        if !self.prober.has_extended_metrics(&resource.region, instance_id).await {
            tracing::info!("No agent metrics for {}, using standard EC2 widget", instance_id);
            return vec![self.standard(ServiceKind::Ec2Instance, resource, identity)];
        }

        tracing::info!("Agent metrics found for {}, building detailed EC2 widgets", instance_id);
        let ec2_dimensions = self.overrides.resolve("AWS/EC2", identity.dimensions.clone());
        let agent_dimensions = self
            .overrides
            .resolve(AGENT_NAMESPACE, DimensionSet::single("InstanceId", instance_id));

        let mut disks: Vec<DimensionSet> = Vec::new();
        for series in self.prober.disk_series(&resource.region, instance_id).await {
            let resolved = self.overrides.resolve(AGENT_NAMESPACE, series);
            if !disks.contains(&resolved) {
                disks.push(resolved);
            }
        }

        let detailed = MetricWidgetProperties::new(
            format!("EC2 Detailed: {}", instance_id),
            &resource.region,
            vec![
                MetricLine::new("AWS/EC2", "CPUUtilization", ec2_dimensions.clone()).into(),
                MetricLine::new(AGENT_NAMESPACE, MEMORY_METRIC, agent_dimensions).into(),
                MetricLine::new("AWS/EC2", "StatusCheckFailed", ec2_dimensions)
                    .stat(Statistic::Maximum)
                    .into(),
            ],
        );

        let mut widgets = vec![Widget::metric(HALF_WIDTH, RESOURCE_WIDGET_HEIGHT, detailed)];
        if disks.is_empty() {
            return widgets;
        }

        let disk_lines = disks
            .into_iter()
            .map(|dimensions| {
                let label = dimensions.get("path").map(|p| format!("disk {}", p));
                let line = MetricLine::new(AGENT_NAMESPACE, "disk_used_percent", dimensions);
                MetricEntry::from(match label {
                    Some(label) => line.label(label),
                    None => line,
                })
            })
            .collect();
        let disk_usage = MetricWidgetProperties::new(
            format!("EC2 Disk Usage: {}", instance_id),
            &resource.region,
            disk_lines,
        )
        .y_axis(0.0, 100.0);

        widgets.push(Widget::metric(HALF_WIDTH, RESOURCE_WIDGET_HEIGHT, disk_usage));
        widgets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeMetrics;
    use crate::domain::service::ServiceRegistry;
    use serde_json::json;
    use std::sync::Arc;

    fn resource(arn: &str) -> ResourceDescriptor {
        let kind = ServiceRegistry::standard().classify(arn).expect("classified");
        ResourceDescriptor::new(arn.to_string(), kind, "us-east-1")
    }

    fn factory(metrics: FakeMetrics, overrides: DimensionOverrides) -> WidgetFactory {
        WidgetFactory::new(overrides, HybridEc2Prober::new(Arc::new(metrics)))
    }

    fn props(widget: &Widget) -> &MetricWidgetProperties {
        widget.metric_properties().expect("metric widget")
    }

    #[tokio::test]
    async fn test_lambda_widget() {
        let widgets = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource("arn:aws:lambda:us-east-1:123456789012:function:my-test-function"))
            .await
            .unwrap();

        assert_eq!(widgets.len(), 1);
        let value = serde_json::to_value(&widgets[0]).unwrap();
        assert_eq!(value["properties"]["title"], "Lambda: my-test-function");
        assert_eq!(
            value["properties"]["metrics"][1],
            json!(["AWS/Lambda", "Errors", "FunctionName", "my-test-function", {"stat": "Sum"}])
        );
        assert_eq!((widgets[0].width, widgets[0].height), (24, 7));
    }

    #[tokio::test]
    async fn test_alb_widget_uses_arn_suffix() {
        let widgets = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource(
                "arn:aws:elasticloadbalancing:us-east-1:123456789012:loadbalancer/app/test-alb/50dc6c495c0c9188",
            ))
            .await
            .unwrap();

        let value = serde_json::to_value(&widgets[0]).unwrap();
        assert_eq!(value["properties"]["title"], "ALB: test-alb");
        assert_eq!(
            value["properties"]["metrics"][0],
            json!([
                "AWS/ApplicationELB",
                "HTTPCode_Target_5XX_Count",
                "LoadBalancer",
                "app/test-alb/50dc6c495c0c9188",
                {"stat": "Sum"}
            ])
        );
    }

    #[tokio::test]
    async fn test_rds_widget() {
        let widgets = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource("arn:aws:rds:us-east-1:123456789012:db:test-db-instance"))
            .await
            .unwrap();

        let props = props(&widgets[0]);
        assert_eq!(props.title, "RDS Detailed: test-db-instance");
        assert_eq!(props.metric_lines().count(), 5);
        assert!(props
            .metric_lines()
            .all(|l| l.dimensions == DimensionSet::single("DBInstanceIdentifier", "test-db-instance")));
    }

    #[tokio::test]
    async fn test_ecs_widget_needs_cluster() {
        let built = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource("arn:aws:ecs:us-east-1:123456789012:service/web/api"))
            .await
            .unwrap();
        assert_eq!(props(&built[0]).title, "ECS: web/api");

        let legacy = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource("arn:aws:ecs:us-east-1:123456789012:service/api"))
            .await;
        assert!(matches!(legacy, Err(BuildError::MalformedArn { .. })));
    }

    #[tokio::test]
    async fn test_malformed_api_gateway_arn_is_skipped() {
        let result = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource("arn:aws:apigateway:us-east-1::/restapis/a1b2"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_global_service_renders_in_us_east_1() {
        let resource = ResourceDescriptor::new(
            "arn:aws:cloudfront::123456789012:distribution/E2QWRUHAPOMQZL".to_string(),
            ServiceKind::CloudFrontDistribution,
            "eu-west-1",
        );
        let widgets = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource)
            .await
            .unwrap();

        let props = props(&widgets[0]);
        assert_eq!(props.region, "us-east-1");
        assert_eq!(
            props.metric_lines().next().unwrap().dimensions,
            DimensionSet::single("Region", "Global").with("DistributionId", "E2QWRUHAPOMQZL")
        );
    }

    #[tokio::test]
    async fn test_dimension_override_is_exact() {
        let overrides = DimensionOverrides::from_json(
            r#"{"AWS/ApiGateway": [{"Name": "ApiName", "Value": "orders-api"}]}"#,
        )
        .unwrap();
        let widgets = factory(FakeMetrics::new(), overrides)
            .build(&resource("arn:aws:apigateway:us-east-1::/restapis/a1b2c3/stages/prod"))
            .await
            .unwrap();

        let props = props(&widgets[0]);
        assert_eq!(props.metric_lines().count(), 4);
        for line in props.metric_lines() {
            assert_eq!(line.dimensions, DimensionSet::single("ApiName", "orders-api"));
        }
    }

    #[tokio::test]
    async fn test_ec2_without_agent_gets_baseline() {
        let widgets = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource("arn:aws:ec2:us-east-1:123456789012:instance/i-0abc"))
            .await
            .unwrap();

        assert_eq!(widgets.len(), 1);
        let props = props(&widgets[0]);
        assert_eq!(props.title, "EC2 Standard: i-0abc");
        let names: Vec<&str> = props.metric_lines().map(|l| l.metric_name.as_str()).collect();
        assert_eq!(names, vec!["CPUUtilization", "NetworkIn", "NetworkOut", "StatusCheckFailed"]);
        assert!(props.metric_lines().all(|l| l.namespace == "AWS/EC2"));
    }

    #[tokio::test]
    async fn test_ec2_with_agent_gets_memory_and_disks() {
        let disk = |path: &str| {
            DimensionSet::single("InstanceId", "i-0abc")
                .with("path", path)
                .with("device", "xvda1")
                .with("fstype", "ext4")
        };
        let metrics = FakeMetrics::new()
            .with(AGENT_NAMESPACE, MEMORY_METRIC, DimensionSet::single("InstanceId", "i-0abc"))
            .with(AGENT_NAMESPACE, "disk_used_percent", disk("/"))
            .with(AGENT_NAMESPACE, "disk_used_percent", disk("/var/lib/docker"));

        let widgets = factory(metrics, DimensionOverrides::default())
            .build(&resource("arn:aws:ec2:us-east-1:123456789012:instance/i-0abc"))
            .await
            .unwrap();

        assert_eq!(widgets.len(), 2);
        let detailed = props(&widgets[0]);
        assert_eq!(detailed.title, "EC2 Detailed: i-0abc");
        assert!(detailed.metric_lines().any(|l| l.metric_name == MEMORY_METRIC));

        let disks = props(&widgets[1]);
        assert_eq!(disks.metric_lines().count(), 2);
        assert_eq!(
            disks.metric_lines().nth(1).unwrap().options.label.as_deref(),
            Some("disk /var/lib/docker")
        );
        assert_eq!(widgets[0].width + widgets[1].width, GRID_WIDTH);
    }

    #[tokio::test]
    async fn test_agent_override_collapses_disks() {
        let metrics = FakeMetrics::new()
            .with(AGENT_NAMESPACE, MEMORY_METRIC, DimensionSet::single("InstanceId", "i-0abc"))
            .with(
                AGENT_NAMESPACE,
                "disk_used_percent",
                DimensionSet::single("InstanceId", "i-0abc").with("path", "/"),
            )
            .with(
                AGENT_NAMESPACE,
                "disk_used_percent",
                DimensionSet::single("InstanceId", "i-0abc").with("path", "/data"),
            );
        let overrides =
            DimensionOverrides::from_json(r#"{"CWAgent": [{"Name": "AutoScalingGroupName", "Value": "web-asg"}]}"#)
                .unwrap();

        let widgets = factory(metrics, overrides)
            .build(&resource("arn:aws:ec2:us-east-1:123456789012:instance/i-0abc"))
            .await
            .unwrap();

        let expected = DimensionSet::single("AutoScalingGroupName", "web-asg");
        let disks = props(&widgets[1]);
        assert_eq!(disks.metric_lines().count(), 1);
        assert_eq!(disks.metric_lines().next().unwrap().dimensions, expected);
        assert!(props(&widgets[0])
            .metric_lines()
            .filter(|l| l.namespace == AGENT_NAMESPACE)
            .all(|l| l.dimensions == expected));
    }

    #[tokio::test]
    async fn test_acm_widget_title_and_view() {
        let widgets = factory(FakeMetrics::new(), DimensionOverrides::default())
            .build(&resource(
                "arn:aws:acm:us-east-1:123456789012:certificate/12345678-1234-1234-1234-123456789012",
            ))
            .await
            .unwrap();

        let props = props(&widgets[0]);
        assert_eq!(props.view, View::SingleValue);
        assert_eq!(props.title, "ACM Cert Expiry: ...123456789012");
    }

    #[test]
    fn test_every_service_identifies_a_sample_arn() {
        let samples = [
            "arn:aws:ec2:us-east-1:1:instance/i-1",
            "arn:aws:rds:us-east-1:1:db:orders",
            "arn:aws:lambda:us-east-1:1:function:f:live",
            "arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/a/1",
            "arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/net/n/2",
            "arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/classic",
            "arn:aws:ecs:us-east-1:1:service/c/s",
            "arn:aws:eks:us-east-1:1:cluster/k",
            "arn:aws:dynamodb:us-east-1:1:table/t",
            "arn:aws:redshift:us-east-1:1:cluster:w",
            "arn:aws:sqs:us-east-1:1:q",
            "arn:aws:sns:us-east-1:1:t",
            "arn:aws:cloudfront::1:distribution/E1",
            "arn:aws:route53:::healthcheck/h",
            "arn:aws:acm:us-east-1:1:certificate/c",
            "arn:aws:elasticache:us-east-1:1:cluster:e",
            "arn:aws:fsx:us-east-1:1:file-system/fs-1",
            "arn:aws:storagegateway:us-east-1:1:gateway/sgw-1",
            "arn:aws:directconnect:us-east-1:1:dxcon/dx-1",
            "arn:aws:ec2:us-east-1:1:vpn-connection/vpn-1",
            "arn:aws:apigateway:us-east-1::/restapis/a/stages/p",
            "arn:aws:states:us-east-1:1:stateMachine:m",
            "arn:aws:mq:us-east-1:1:broker:b:b-1",
        ];

        assert_eq!(samples.len(), ServiceKind::ALL.len());
        for arn in samples {
            let identity = identify(&resource(arn)).unwrap();
            assert!(!identity.dimensions.is_empty(), "{}", arn);
            assert!(!identity.name.is_empty(), "{}", arn);
        }
    }
}
