// SLO candidates, targets and gating outcomes
use super::service::ServiceKind;
use super::widget::Widget;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SloKind {
    AlbAvailability,
    LambdaSuccessRate,
    CloudFrontSuccessRate,
    Ec2Performance,
    RdsPerformance,
}

/// A metric a SLO formula cannot do without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricRef {
    pub namespace: &'static str,
    pub metric_name: &'static str,
}

impl SloKind {
    /// Band order, top to bottom
    pub const ALL: [SloKind; 5] = [
        SloKind::AlbAvailability,
        SloKind::LambdaSuccessRate,
        SloKind::CloudFrontSuccessRate,
        SloKind::Ec2Performance,
        SloKind::RdsPerformance,
    ];

    pub fn service(self) -> ServiceKind {
        match self {
            SloKind::AlbAvailability => ServiceKind::Alb,
            SloKind::LambdaSuccessRate => ServiceKind::LambdaFunction,
            SloKind::CloudFrontSuccessRate => ServiceKind::CloudFrontDistribution,
            SloKind::Ec2Performance => ServiceKind::Ec2Instance,
            SloKind::RdsPerformance => ServiceKind::RdsInstance,
        }
    }

    /// Metrics every one of which must have data before the widget is built.
    /// The EC2 agent memory term is added only when some instance reports it.
    pub fn metric_refs(self) -> &'static [MetricRef] {
        match self {
            SloKind::AlbAvailability => ALB_REFS,
            SloKind::LambdaSuccessRate => LAMBDA_REFS,
            SloKind::CloudFrontSuccessRate => CLOUDFRONT_REFS,
            SloKind::Ec2Performance => EC2_REFS,
            SloKind::RdsPerformance => RDS_REFS,
        }
    }
}

const fn metric(namespace: &'static str, metric_name: &'static str) -> MetricRef {
    MetricRef {
        namespace,
        metric_name,
    }
}

const ALB_REFS: &[MetricRef] = &[
    metric("AWS/ApplicationELB", "RequestCount"),
    metric("AWS/ApplicationELB", "HTTPCode_Target_5XX_Count"),
];
const LAMBDA_REFS: &[MetricRef] = &[metric("AWS/Lambda", "Invocations"), metric("AWS/Lambda", "Errors")];
const CLOUDFRONT_REFS: &[MetricRef] = &[metric("AWS/CloudFront", "5xxErrorRate")];
const EC2_REFS: &[MetricRef] = &[metric("AWS/EC2", "CPUUtilization")];
const RDS_REFS: &[MetricRef] = &[
    metric("AWS/RDS", "ReadLatency"),
    metric("AWS/RDS", "WriteLatency"),
    metric("AWS/RDS", "CPUUtilization"),
];

/// Thresholds drawn on SLO widgets; never evaluated by the engine
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SloTargets {
    /// Availability / success-rate target, percent
    #[serde(rename = "target")]
    pub availability_percent: f64,
    #[serde(rename = "cpu_target")]
    pub ec2_cpu_percent: f64,
    #[serde(rename = "rds_cpu_target")]
    pub rds_cpu_percent: f64,
    pub latency_target_ms: f64,
}

impl Default for SloTargets {
    fn default() -> Self {
        Self {
            availability_percent: 99.9,
            ec2_cpu_percent: 80.0,
            rds_cpu_percent: 80.0,
            latency_target_ms: 10.0,
        }
    }
}

/// Serialized form of an outcome, without its widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SloState {
    Built,
    Suppressed,
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SloOutcome {
    Built(Vec<Widget>),
    /// Some required metric has no data; the widget is omitted
    Suppressed { missing: Vec<String> },
    /// No enabled resource feeds this SLO
    NotApplicable,
}

impl SloOutcome {
    pub fn state(&self) -> SloState {
        match self {
            SloOutcome::Built(_) => SloState::Built,
            SloOutcome::Suppressed { .. } => SloState::Suppressed,
            SloOutcome::NotApplicable => SloState::NotApplicable,
        }
    }
}
