// Grid placement of the dashboard widgets
use crate::domain::widget::{CustomWidgetDef, DashboardDocument, GRID_WIDTH, Widget};

pub const SECTION_HEADER: &str = "--- \n ### **Individual Resource Metrics**";

/// Row cursor over the 24-column grid
#[derive(Debug, Default)]
struct Grid {
    widgets: Vec<Widget>,
    x: u32,
    y: u32,
    row_height: u32,
}

impl Grid {
    /// Place left to right, wrapping when the widget would cross the right edge
    fn flow(&mut self, mut widget: Widget) {
        if self.x > 0 && self.x + widget.width > GRID_WIDTH {
            self.break_row();
        }
        widget.x = self.x;
        widget.y = self.y;
        self.x += widget.width;
        self.row_height = self.row_height.max(widget.height);
        self.widgets.push(widget);
    }

    /// A row of widgets whose x offsets are already fixed
    fn fixed_row(&mut self, widgets: Vec<Widget>) {
        self.break_row();
        for mut widget in widgets {
            widget.y = self.y;
            self.row_height = self.row_height.max(widget.height);
            self.widgets.push(widget);
        }
        self.break_row();
    }

    fn break_row(&mut self) {
        self.y += self.row_height;
        self.x = 0;
        self.row_height = 0;
    }

    fn finish(self) -> DashboardDocument {
        DashboardDocument::new(self.widgets)
    }
}

/// Sections that make up a dashboard, each already in display order
#[derive(Debug, Default)]
pub struct LayoutInput {
    /// One entry per built SLO: graph and current value
    pub slo_rows: Vec<Vec<Widget>>,
    /// Resource widgets grouped per service, groups in registry order
    pub service_groups: Vec<Vec<Widget>>,
    pub custom: Vec<CustomWidgetDef>,
}

pub fn assemble(input: LayoutInput, region: &str) -> DashboardDocument {
    let mut grid = Grid::default();

    let has_slo_band = !input.slo_rows.is_empty();
    for row in input.slo_rows {
        grid.fixed_row(row);
    }
    if has_slo_band {
        grid.fixed_row(vec![Widget::text(GRID_WIDTH, 1, SECTION_HEADER)]);
    }

    for group in input.service_groups {
        for widget in group {
            grid.flow(widget);
        }
        grid.break_row();
    }

    for custom in input.custom {
        grid.fixed_row(vec![custom.into_widget(region)]);
    }

    let document = grid.finish();
    debug_assert!(!document.has_overlaps(), "layout produced overlapping widgets");
    document
}

/// Shown instead of resource widgets when the tag matched nothing
pub fn no_resources_placeholder(tag_key: &str, tag_value: &str) -> Widget {
    Widget::text(
        GRID_WIDTH,
        2,
        format!("# No resources found with tag: `{}:{}`", tag_key, tag_value),
    )
}
