// Service registry - supported services and ARN classification
use super::arn::Arn;

/// Region CloudWatch uses for global services
pub const GLOBAL_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Ec2Instance,
    RdsInstance,
    LambdaFunction,
    Alb,
    Nlb,
    ClassicElb,
    EcsService,
    EksCluster,
    DynamoDbTable,
    RedshiftCluster,
    SqsQueue,
    SnsTopic,
    CloudFrontDistribution,
    Route53HealthCheck,
    AcmCertificate,
    ElastiCacheCluster,
    FsxFileSystem,
    StorageGateway,
    DxConnection,
    VpnConnection,
    ApiGatewayStage,
    StepFunctionsStateMachine,
    MqBroker,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 23] = [
        ServiceKind::Ec2Instance,
        ServiceKind::RdsInstance,
        ServiceKind::LambdaFunction,
        ServiceKind::Alb,
        ServiceKind::Nlb,
        ServiceKind::ClassicElb,
        ServiceKind::EcsService,
        ServiceKind::EksCluster,
        ServiceKind::DynamoDbTable,
        ServiceKind::RedshiftCluster,
        ServiceKind::SqsQueue,
        ServiceKind::SnsTopic,
        ServiceKind::CloudFrontDistribution,
        ServiceKind::Route53HealthCheck,
        ServiceKind::AcmCertificate,
        ServiceKind::ElastiCacheCluster,
        ServiceKind::FsxFileSystem,
        ServiceKind::StorageGateway,
        ServiceKind::DxConnection,
        ServiceKind::VpnConnection,
        ServiceKind::ApiGatewayStage,
        ServiceKind::StepFunctionsStateMachine,
        ServiceKind::MqBroker,
    ];

    /// Key used in the `enabled_widgets` list
    pub fn key(self) -> &'static str {
        match self {
            ServiceKind::Ec2Instance => "ec2_instance",
            ServiceKind::RdsInstance => "rds_instance",
            ServiceKind::LambdaFunction => "lambda_function",
            ServiceKind::Alb => "alb",
            ServiceKind::Nlb => "nlb",
            ServiceKind::ClassicElb => "classic_elb",
            ServiceKind::EcsService => "ecs_service",
            ServiceKind::EksCluster => "eks_cluster",
            ServiceKind::DynamoDbTable => "dynamodb_table",
            ServiceKind::RedshiftCluster => "redshift_cluster",
            ServiceKind::SqsQueue => "sqs_queue",
            ServiceKind::SnsTopic => "sns_topic",
            ServiceKind::CloudFrontDistribution => "cloudfront_distribution",
            ServiceKind::Route53HealthCheck => "route53_healthcheck",
            ServiceKind::AcmCertificate => "acm_certificate",
            ServiceKind::ElastiCacheCluster => "elasticache_cluster",
            ServiceKind::FsxFileSystem => "fsx_filesystem",
            ServiceKind::StorageGateway => "storage_gateway",
            ServiceKind::DxConnection => "dx_connection",
            ServiceKind::VpnConnection => "vpn_connection",
            ServiceKind::ApiGatewayStage => "apigateway_stage",
            ServiceKind::StepFunctionsStateMachine => "stepfunctions_statemachine",
            ServiceKind::MqBroker => "mq_broker",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Services discovered and rendered in us-east-1. ACM certificates are
    /// regional and report DaysToExpiry in their own region.
    pub fn is_global(self) -> bool {
        matches!(
            self,
            ServiceKind::CloudFrontDistribution | ServiceKind::Route53HealthCheck
        )
    }
}

/// How the resource part of an ARN identifies a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMatcher {
    /// Resource part starts with the marker
    Prefix(&'static str),
    /// Marker followed by exactly one path segment (e.g. `loadbalancer/name`)
    SingleSegment(&'static str),
    /// Any resource of the ARN service (queues and topics carry only a name)
    Any,
}

impl ResourceMatcher {
    pub fn matches(&self, resource: &str) -> bool {
        match self {
            ResourceMatcher::Prefix(marker) => resource.starts_with(marker),
            ResourceMatcher::SingleSegment(marker) => resource
                .strip_prefix(marker)
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
            ResourceMatcher::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfigEntry {
    pub kind: ServiceKind,
    /// Resource Groups Tagging API resource-type filter
    pub filter: &'static str,
    /// Service segment of the ARN
    pub arn_service: &'static str,
    pub matcher: ResourceMatcher,
}

impl ServiceConfigEntry {
    pub fn new(
        kind: ServiceKind,
        filter: &'static str,
        arn_service: &'static str,
        matcher: ResourceMatcher,
    ) -> Self {
        Self {
            kind,
            filter,
            arn_service,
            matcher,
        }
    }

    pub fn matches(&self, arn: &Arn<'_>) -> bool {
        arn.service == self.arn_service && self.matcher.matches(arn.resource)
    }
}

/// Read-only service table. Entry order is both the classification priority and
/// the layout order of service groups.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    entries: Vec<ServiceConfigEntry>,
}

impl ServiceRegistry {
    pub fn new(entries: Vec<ServiceConfigEntry>) -> Self {
        Self { entries }
    }

    pub fn standard() -> Self {
        use ResourceMatcher::{Any, Prefix, SingleSegment};
        use ServiceKind::*;

        Self::new(vec![
            ServiceConfigEntry::new(Ec2Instance, "ec2:instance", "ec2", Prefix("instance/")),
            ServiceConfigEntry::new(RdsInstance, "rds:db", "rds", Prefix("db:")),
            ServiceConfigEntry::new(LambdaFunction, "lambda:function", "lambda", Prefix("function:")),
            ServiceConfigEntry::new(
                Alb,
                "elasticloadbalancing:loadbalancer",
                "elasticloadbalancing",
                Prefix("loadbalancer/app/"),
            ),
            ServiceConfigEntry::new(
                Nlb,
                "elasticloadbalancing:loadbalancer",
                "elasticloadbalancing",
                Prefix("loadbalancer/net/"),
            ),
            ServiceConfigEntry::new(
                ClassicElb,
                "elasticloadbalancing:loadbalancer",
                "elasticloadbalancing",
                SingleSegment("loadbalancer/"),
            ),
            ServiceConfigEntry::new(EcsService, "ecs:service", "ecs", Prefix("service/")),
            ServiceConfigEntry::new(EksCluster, "eks:cluster", "eks", Prefix("cluster/")),
            ServiceConfigEntry::new(DynamoDbTable, "dynamodb:table", "dynamodb", SingleSegment("table/")),
            ServiceConfigEntry::new(RedshiftCluster, "redshift:cluster", "redshift", Prefix("cluster:")),
            ServiceConfigEntry::new(SqsQueue, "sqs", "sqs", Any),
            ServiceConfigEntry::new(SnsTopic, "sns", "sns", Any),
            ServiceConfigEntry::new(
                CloudFrontDistribution,
                "cloudfront:distribution",
                "cloudfront",
                Prefix("distribution/"),
            ),
            ServiceConfigEntry::new(
                Route53HealthCheck,
                "route53:healthcheck",
                "route53",
                Prefix("healthcheck/"),
            ),
            ServiceConfigEntry::new(AcmCertificate, "acm:certificate", "acm", Prefix("certificate/")),
            ServiceConfigEntry::new(
                ElastiCacheCluster,
                "elasticache:cluster",
                "elasticache",
                Prefix("cluster:"),
            ),
            ServiceConfigEntry::new(FsxFileSystem, "fsx:file-system", "fsx", Prefix("file-system/")),
            ServiceConfigEntry::new(
                StorageGateway,
                "storagegateway:gateway",
                "storagegateway",
                SingleSegment("gateway/"),
            ),
            ServiceConfigEntry::new(DxConnection, "directconnect:dxcon", "directconnect", Prefix("dxcon/")),
            ServiceConfigEntry::new(VpnConnection, "ec2:vpn-connection", "ec2", Prefix("vpn-connection/")),
            ServiceConfigEntry::new(
                ApiGatewayStage,
                "apigateway:restapis/stages",
                "apigateway",
                Prefix("/restapis/"),
            ),
            ServiceConfigEntry::new(
                StepFunctionsStateMachine,
                "states:stateMachine",
                "states",
                Prefix("stateMachine:"),
            ),
            ServiceConfigEntry::new(MqBroker, "mq:broker", "mq", Prefix("broker:")),
        ])
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ServiceConfigEntry] {
        &self.entries
    }

    /// Registry position of a service, used to order service groups
    pub fn position(&self, kind: ServiceKind) -> Option<usize> {
        self.entries.iter().position(|e| e.kind == kind)
    }

    /// First entry, in priority order, that accepts the ARN
    pub fn classify(&self, arn: &str) -> Option<ServiceKind> {
        let parsed = Arn::parse(arn)?;
        self.entries
            .iter()
            .find(|entry| entry.matches(&parsed))
            .map(|entry| entry.kind)
    }

    /// Deduplicated, sorted resource-type filters of the enabled services,
    /// restricted to global or regional services
    pub fn filters_for(&self, enabled: &[ServiceKind], global: bool) -> Vec<&'static str> {
        let mut filters: Vec<&'static str> = self
            .entries
            .iter()
            .filter(|e| enabled.contains(&e.kind) && e.kind.is_global() == global)
            .map(|e| e.filter)
            .collect();
        filters.sort_unstable();
        filters.dedup();
        filters
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// A discovered resource resolved to its service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub arn: String,
    pub region: String,
    pub service: ServiceKind,
}

impl ResourceDescriptor {
    /// Global services always resolve to us-east-1; otherwise the ARN region,
    /// falling back to the run region when the ARN carries none
    pub fn new(arn: String, service: ServiceKind, run_region: &str) -> Self {
        let region = if service.is_global() {
            GLOBAL_REGION.to_string()
        } else {
            Arn::parse(&arn)
                .map(|a| a.region)
                .filter(|r| !r.is_empty())
                .unwrap_or(run_region)
                .to_string()
        };

        Self {
            arn,
            region,
            service,
        }
    }

    pub fn parsed_arn(&self) -> Option<Arn<'_>> {
        Arn::parse(&self.arn)
    }
}
