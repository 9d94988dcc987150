// Metric graph definitions rendered into CloudWatch widget properties
use super::dimension::DimensionSet;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

pub const DEFAULT_PERIOD: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Statistic {
    Average,
    Sum,
    Minimum,
    Maximum,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<Statistic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RenderOptions {
    fn is_empty(&self) -> bool {
        self.stat.is_none() && self.label.is_none()
    }
}

/// One plotted series: `[namespace, name, dim, value, ..., {options}]`
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: DimensionSet,
    pub options: RenderOptions,
}

impl MetricLine {
    pub fn new(namespace: &str, metric_name: &str, dimensions: DimensionSet) -> Self {
        Self {
            namespace: namespace.to_string(),
            metric_name: metric_name.to_string(),
            dimensions,
            options: RenderOptions::default(),
        }
    }

    pub fn stat(mut self, stat: Statistic) -> Self {
        self.options.stat = Some(stat);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }
}

impl Serialize for MetricLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let options = usize::from(!self.options.is_empty());
        let mut seq = serializer.serialize_seq(Some(2 + self.dimensions.len() * 2 + options))?;
        seq.serialize_element(&self.namespace)?;
        seq.serialize_element(&self.metric_name)?;
        for dimension in self.dimensions.iter() {
            seq.serialize_element(&dimension.name)?;
            seq.serialize_element(&dimension.value)?;
        }
        if !self.options.is_empty() {
            seq.serialize_element(&self.options)?;
        }
        seq.end()
    }
}

/// Metric math entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricExpression {
    pub expression: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub visible: bool,
}

impl MetricExpression {
    pub fn hidden(id: &str, expression: String) -> Self {
        Self {
            expression,
            id: id.to_string(),
            label: None,
            visible: false,
        }
    }

    pub fn shown(id: &str, expression: String, label: &str) -> Self {
        Self {
            expression,
            id: id.to_string(),
            label: Some(label.to_string()),
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricEntry {
    Metric(MetricLine),
    Expression(MetricExpression),
}

impl Serialize for MetricEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricEntry::Metric(line) => line.serialize(serializer),
            // CloudWatch expects math entries wrapped in their own array
            MetricEntry::Expression(expression) => [expression].serialize(serializer),
        }
    }
}

impl From<MetricLine> for MetricEntry {
    fn from(line: MetricLine) -> Self {
        MetricEntry::Metric(line)
    }
}

impl From<MetricExpression> for MetricEntry {
    fn from(expression: MetricExpression) -> Self {
        MetricEntry::Expression(expression)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    TimeSeries,
    SingleValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub left: AxisRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizontalAnnotation {
    pub color: String,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Annotations {
    pub horizontal: Vec<HorizontalAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWidgetProperties {
    pub metrics: Vec<MetricEntry>,
    pub view: View,
    pub region: String,
    pub title: String,
    pub stat: Statistic,
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<YAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl MetricWidgetProperties {
    pub fn new(title: impl Into<String>, region: &str, metrics: Vec<MetricEntry>) -> Self {
        Self {
            metrics,
            view: View::TimeSeries,
            region: region.to_string(),
            title: title.into(),
            stat: Statistic::Average,
            period: DEFAULT_PERIOD,
            y_axis: None,
            annotations: None,
        }
    }

    pub fn view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn y_axis(mut self, min: f64, max: f64) -> Self {
        self.y_axis = Some(YAxis {
            left: AxisRange { min, max },
        });
        self
    }

    pub fn annotate(mut self, label: String, value: f64) -> Self {
        self.annotations
            .get_or_insert_with(Annotations::default)
            .horizontal
            .push(HorizontalAnnotation {
                color: "#ff0000".to_string(),
                label,
                value,
            });
        self
    }

    #[cfg(test)]
    /// Plain metric lines, skipping math expressions
    pub fn metric_lines(&self) -> impl Iterator<Item = &MetricLine> {
        self.metrics.iter().filter_map(|entry| match entry {
            MetricEntry::Metric(line) => Some(line),
            MetricEntry::Expression(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_line_renders_as_array() {
        let line = MetricLine::new(
            "AWS/ECS",
            "CPUUtilization",
            DimensionSet::single("ClusterName", "web").with("ServiceName", "api"),
        )
        .stat(Statistic::Maximum);

        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            json!(["AWS/ECS", "CPUUtilization", "ClusterName", "web", "ServiceName", "api", {"stat": "Maximum"}])
        );
    }

    #[test]
    fn test_line_without_options_has_no_trailing_object() {
        let line = MetricLine::new("AWS/SQS", "ApproximateAgeOfOldestMessage", DimensionSet::single("QueueName", "jobs"));
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            json!(["AWS/SQS", "ApproximateAgeOfOldestMessage", "QueueName", "jobs"])
        );
    }

    #[test]
    fn test_expression_wrapped_in_array() {
        let entry = MetricEntry::from(MetricExpression::shown("slo", "100-error_rate".to_string(), "Success Rate %"));
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!([{"expression": "100-error_rate", "id": "slo", "label": "Success Rate %", "visible": true}])
        );
    }

    #[test]
    fn test_properties_camel_case() {
        let props = MetricWidgetProperties::new("t", "us-east-1", vec![])
            .y_axis(95.0, 100.0)
            .annotate("SLO Target (99.9%)".to_string(), 99.9);
        let value = serde_json::to_value(&props).unwrap();

        assert_eq!(value["view"], "timeSeries");
        assert_eq!(value["yAxis"]["left"]["min"], 95.0);
        assert_eq!(value["annotations"]["horizontal"][0]["value"], 99.9);
        assert_eq!(value["period"], 300);
    }
}
