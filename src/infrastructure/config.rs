use crate::application::dashboard_service::EngineConfig;
use crate::application::dimension_resolver::DimensionOverrides;
use crate::domain::service::ServiceKind;
use crate::domain::slo::SloTargets;
use crate::domain::widget::CustomWidgetDef;
use anyhow::Context;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub dashboard: DashboardSettings,
    pub slo: SloTargets,
    pub aws: AwsSettings,
    pub engine: EngineSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub name: String,
    pub tag_key: String,
    pub tag_value: String,
    /// Comma-separated service keys
    pub enabled_widgets: String,
    /// JSON array of widget objects
    pub custom_widgets: String,
    /// JSON object, namespace -> [{Name, Value}]
    pub dimension_config: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AwsSettings {
    pub region: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    pub probe_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub run_once: bool,
}

/// Flat variable names the engine accepted before sectioned settings existed
const LEGACY_ENV: [(&str, &str); 11] = [
    ("DASHBOARD_NAME", "dashboard.name"),
    ("TAG_KEY", "dashboard.tag_key"),
    ("TAG_VALUE", "dashboard.tag_value"),
    ("ENABLED_WIDGETS", "dashboard.enabled_widgets"),
    ("CUSTOM_WIDGETS_CONFIG", "dashboard.custom_widgets"),
    ("DIMENSION_CONFIG", "dashboard.dimension_config"),
    ("SLO_TARGET", "slo.target"),
    ("CPU_SLO_TARGET", "slo.cpu_target"),
    ("RDS_CPU_SLO_TARGET", "slo.rds_cpu_target"),
    ("LATENCY_SLO_TARGET", "slo.latency_target_ms"),
    ("AWS_REGION", "aws.region"),
];

/// Defaults, then `config/dashboard.*`, then `DASHBOARD__SECTION__KEY`, then legacy names
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut builder = config::Config::builder()
        .set_default("dashboard.name", "Tagged-Resources-Dashboard")?
        .set_default("dashboard.tag_key", "")?
        .set_default("dashboard.tag_value", "")?
        .set_default("dashboard.enabled_widgets", "")?
        .set_default("dashboard.custom_widgets", "[]")?
        .set_default("dashboard.dimension_config", "{}")?
        .set_default("slo.target", 99.9)?
        .set_default("slo.cpu_target", 80.0)?
        .set_default("slo.rds_cpu_target", 80.0)?
        .set_default("slo.latency_target_ms", 10.0)?
        .set_default("engine.probe_concurrency", 8)?
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("server.run_once", false)?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

    for (var, key) in LEGACY_ENV {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    let settings: Settings = builder.build()?.try_deserialize()?;
    Ok(settings)
}

impl Settings {
    /// Resolve the raw settings into what a run needs. Bad JSON degrades to empty
    /// with a warning; a missing tag or region is an error.
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let dashboard = &self.dashboard;
        if dashboard.tag_key.is_empty() || dashboard.tag_value.is_empty() {
            anyhow::bail!("dashboard.tag_key and dashboard.tag_value must be set");
        }
        let region = self
            .aws
            .region
            .clone()
            .filter(|r| !r.is_empty())
            .context("aws.region (or AWS_REGION) must be set")?;

        Ok(EngineConfig {
            dashboard_name: dashboard.name.clone(),
            tag_key: dashboard.tag_key.clone(),
            tag_value: dashboard.tag_value.clone(),
            region,
            enabled: parse_enabled_widgets(&dashboard.enabled_widgets),
            custom_widgets: parse_custom_widgets(&dashboard.custom_widgets),
            dimension_overrides: parse_dimension_config(&dashboard.dimension_config),
            slo_targets: self.slo,
            probe_concurrency: self.engine.probe_concurrency.max(1),
        })
    }
}

/// Known keys in first-seen order; unknown keys are warned about and dropped
pub fn parse_enabled_widgets(raw: &str) -> Vec<ServiceKind> {
    let mut enabled = Vec::new();
    for key in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        match ServiceKind::from_key(key) {
            Some(kind) if !enabled.contains(&kind) => enabled.push(kind),
            Some(_) => {}
            None => tracing::warn!("Ignoring unknown widget key '{}'", key),
        }
    }
    if enabled.is_empty() {
        tracing::warn!("No widget types enabled; only custom widgets will be published");
    }
    enabled
}

pub fn parse_custom_widgets(raw: &str) -> Vec<CustomWidgetDef> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Invalid custom widget JSON, ignoring it: {}", e);
        Vec::new()
    })
}

pub fn parse_dimension_config(raw: &str) -> DimensionOverrides {
    if raw.trim().is_empty() {
        return DimensionOverrides::default();
    }
    DimensionOverrides::from_json(raw).unwrap_or_else(|e| {
        tracing::warn!("Invalid dimension config JSON, ignoring it: {}", e);
        DimensionOverrides::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dimension::DimensionSet;

    fn settings(enabled: &str) -> Settings {
        Settings {
            dashboard: DashboardSettings {
                name: "ops".to_string(),
                tag_key: "ManagedBy".to_string(),
                tag_value: "esbpcs".to_string(),
                enabled_widgets: enabled.to_string(),
                custom_widgets: "[]".to_string(),
                dimension_config: "{}".to_string(),
            },
            slo: SloTargets::default(),
            aws: AwsSettings {
                region: Some("eu-west-1".to_string()),
            },
            engine: EngineSettings { probe_concurrency: 0 },
            server: ServerSettings {
                bind_addr: "127.0.0.1:0".to_string(),
                run_once: true,
            },
        }
    }

    #[test]
    fn test_parse_enabled_widgets() {
        let enabled = parse_enabled_widgets(" lambda_function,ec2_instance, bogus ,lambda_function,");
        assert_eq!(enabled, vec![ServiceKind::LambdaFunction, ServiceKind::Ec2Instance]);
        assert!(parse_enabled_widgets("").is_empty());
    }

    #[test]
    fn test_invalid_json_falls_back_to_empty() {
        assert!(parse_custom_widgets("[{").is_empty());
        assert!(parse_dimension_config("not json").is_empty());
    }

    #[test]
    fn test_dimension_config_parses() {
        let overrides = parse_dimension_config(r#"{"AWS/EC2": [{"Name": "AutoScalingGroupName", "Value": "web"}]}"#);
        assert_eq!(
            overrides.resolve("AWS/EC2", DimensionSet::single("InstanceId", "i-1")),
            DimensionSet::single("AutoScalingGroupName", "web")
        );
    }

    #[test]
    fn test_engine_config() {
        let config = settings("sqs_queue").engine_config().unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.enabled, vec![ServiceKind::SqsQueue]);
        assert_eq!(config.probe_concurrency, 1);
        assert_eq!(config.slo_targets.availability_percent, 99.9);
    }

    #[test]
    fn test_engine_config_requires_tag_and_region() {
        let mut missing_tag = settings("sqs_queue");
        missing_tag.dashboard.tag_value.clear();
        assert!(missing_tag.engine_config().is_err());

        let mut missing_region = settings("sqs_queue");
        missing_region.aws.region = None;
        assert!(missing_region.engine_config().is_err());
    }
}
