// Dashboard widget and document models
use super::metric::MetricWidgetProperties;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Width of the CloudWatch dashboard grid
pub const GRID_WIDTH: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    Metric,
    Text,
    /// Any other type carried through from custom widgets (`log`, `alarm`, ...)
    Other(String),
}

impl WidgetKind {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetKind::Metric => "metric",
            WidgetKind::Text => "text",
            WidgetKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for WidgetKind {
    fn from(kind: &str) -> Self {
        match kind {
            "metric" => WidgetKind::Metric,
            "text" => WidgetKind::Text,
            other => WidgetKind::Other(other.to_string()),
        }
    }
}

impl Serialize for WidgetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextProperties {
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WidgetProperties {
    Metric(MetricWidgetProperties),
    Text(TextProperties),
    Raw(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub properties: WidgetProperties,
}

impl Widget {
    pub fn metric(width: u32, height: u32, properties: MetricWidgetProperties) -> Self {
        Self {
            kind: WidgetKind::Metric,
            x: 0,
            y: 0,
            width,
            height,
            properties: WidgetProperties::Metric(properties),
        }
    }

    pub fn text(width: u32, height: u32, markdown: impl Into<String>) -> Self {
        Self {
            kind: WidgetKind::Text,
            x: 0,
            y: 0,
            width,
            height,
            properties: WidgetProperties::Text(TextProperties {
                markdown: markdown.into(),
            }),
        }
    }

    #[cfg(test)]
    pub fn metric_properties(&self) -> Option<&MetricWidgetProperties> {
        match &self.properties {
            WidgetProperties::Metric(props) => Some(props),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn title(&self) -> Option<&str> {
        match &self.properties {
            WidgetProperties::Metric(props) => Some(&props.title),
            WidgetProperties::Raw(value) => value.get("title").and_then(|t| t.as_str()),
            WidgetProperties::Text(_) => None,
        }
    }

    pub fn overlaps(&self, other: &Widget) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// A caller-supplied widget appended after the generated ones
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomWidgetDef {
    #[serde(rename = "type", default = "default_custom_kind")]
    pub kind: String,
    #[serde(default)]
    pub x: u32,
    #[serde(default = "default_custom_width")]
    pub width: u32,
    #[serde(default = "default_custom_height")]
    pub height: u32,
    #[serde(default = "empty_properties")]
    pub properties: serde_json::Value,
}

fn default_custom_kind() -> String {
    "metric".to_string()
}

fn default_custom_width() -> u32 {
    GRID_WIDTH
}

fn default_custom_height() -> u32 {
    6
}

fn empty_properties() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl CustomWidgetDef {
    /// Non-text widgets without a region render in the run region
    pub fn into_widget(self, region: &str) -> Widget {
        let kind = WidgetKind::from(self.kind.as_str());
        let mut properties = self.properties;
        if kind != WidgetKind::Text {
            if let Some(map) = properties.as_object_mut() {
                map.entry("region")
                    .or_insert_with(|| serde_json::Value::String(region.to_string()));
            }
        }

        let width = self.width.clamp(1, GRID_WIDTH);
        if width != self.width {
            tracing::warn!("Custom widget width {} does not fit the grid, using {}", self.width, width);
        }
        let x = if self.x.saturating_add(width) > GRID_WIDTH { 0 } else { self.x };
        if x != self.x {
            tracing::warn!("Custom widget at x={} overflows the grid, moving it to x=0", self.x);
        }

        Widget {
            kind,
            x,
            y: 0,
            width,
            height: self.height.max(1),
            properties: WidgetProperties::Raw(properties),
        }
    }
}

/// The document handed to `PutDashboard`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardDocument {
    pub widgets: Vec<Widget>,
}

impl DashboardDocument {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self { widgets }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn has_overlaps(&self) -> bool {
        self.widgets.iter().enumerate().any(|(i, a)| {
            self.widgets[i + 1..].iter().any(|b| a.overlaps(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_widget_shape() {
        let mut widget = Widget::text(GRID_WIDTH, 1, "### Resources");
        widget.y = 12;

        assert_eq!(
            serde_json::to_value(&widget).unwrap(),
            json!({
                "type": "text",
                "x": 0,
                "y": 12,
                "width": 24,
                "height": 1,
                "properties": {"markdown": "### Resources"}
            })
        );
    }

    #[test]
    fn test_raw_kind_round_trip() {
        let widget = Widget {
            kind: WidgetKind::from("log"),
            x: 0,
            y: 0,
            width: 12,
            height: 6,
            properties: WidgetProperties::Raw(json!({"query": "fields @message", "title": "Logs"})),
        };

        let value = serde_json::to_value(&widget).unwrap();
        assert_eq!(value["type"], "log");
        assert_eq!(widget.title(), Some("Logs"));
    }

    #[test]
    fn test_overlap_detection() {
        let mut a = Widget::text(12, 6, "a");
        let mut b = Widget::text(12, 6, "b");
        b.x = 12;
        assert!(!a.overlaps(&b));

        a.width = 13;
        assert!(a.overlaps(&b));

        a.width = 12;
        b.x = 0;
        b.y = 6;
        assert!(!a.overlaps(&b));
        assert!(!DashboardDocument::new(vec![a, b]).has_overlaps());
    }

    #[test]
    fn test_custom_widget_defaults_and_region() {
        let def: CustomWidgetDef = serde_json::from_value(json!({
            "properties": {"metrics": [["AWS/S3", "BucketSizeBytes"]], "title": "Buckets"}
        }))
        .unwrap();
        let widget = def.into_widget("eu-central-1");

        assert_eq!(widget.kind, WidgetKind::Metric);
        assert_eq!((widget.width, widget.height), (24, 6));
        match &widget.properties {
            WidgetProperties::Raw(value) => assert_eq!(value["region"], "eu-central-1"),
            other => panic!("unexpected properties {:?}", other),
        }
    }

    #[test]
    fn test_custom_widget_keeps_own_region_and_clamps_x() {
        let def: CustomWidgetDef = serde_json::from_value(json!({
            "type": "metric",
            "x": 18,
            "width": 12,
            "height": 3,
            "properties": {"region": "ap-southeast-2"}
        }))
        .unwrap();
        let widget = def.into_widget("us-east-1");

        assert_eq!(widget.x, 0);
        match &widget.properties {
            WidgetProperties::Raw(value) => assert_eq!(value["region"], "ap-southeast-2"),
            other => panic!("unexpected properties {:?}", other),
        }
    }

    #[test]
    fn test_custom_widget_geometry_verbatim_when_it_fits() {
        let def: CustomWidgetDef = serde_json::from_value(json!({"x": 6, "width": 18, "height": 4})).unwrap();
        let widget = def.into_widget("us-east-1");
        assert_eq!((widget.x, widget.width, widget.height), (6, 18, 4));
    }

    #[test]
    fn test_custom_widget_too_wide_is_clamped() {
        let def: CustomWidgetDef = serde_json::from_value(json!({"x": 4, "width": 40})).unwrap();
        let widget = def.into_widget("us-east-1");
        assert_eq!((widget.x, widget.width), (0, GRID_WIDTH));
    }

    #[test]
    fn test_custom_text_widget_gets_no_region() {
        let def: CustomWidgetDef = serde_json::from_value(json!({
            "type": "text",
            "properties": {"markdown": "runbook"}
        }))
        .unwrap();
        let widget = def.into_widget("us-east-1");

        assert_eq!(widget.kind, WidgetKind::Text);
        match &widget.properties {
            WidgetProperties::Raw(value) => assert!(value.get("region").is_none()),
            other => panic!("unexpected properties {:?}", other),
        }
    }

    #[test]
    fn test_document_json() {
        let doc = DashboardDocument::new(vec![Widget::text(GRID_WIDTH, 2, "# hi")]);
        let body = doc.to_json().unwrap();
        assert!(body.starts_with("{\"widgets\":[{\"type\":\"text\""));
    }
}
