use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::model::ModelRecord;

/// Marker unit for layout-space coordinates (diagram points, not screen
/// pixels — pan/zoom live entirely in the viewer).
pub struct LayoutSpace;

pub type Point = euclid::Point2D<f64, LayoutSpace>;
pub type Vector = euclid::Vector2D<f64, LayoutSpace>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Every layout constant in one place. Swap this out wholesale for a
/// different visual scale; nothing downstream hardcodes a number that
/// belongs here.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
    pub visible_field_max: usize,
    pub header_height: f64,
    pub body_pad: f64,
    pub row_height: f64,
    pub more_indicator_height: f64,
    pub corner_radius: f64,
    pub fan_step: f64,
    pub outer_margin: f64,
    pub short_jog: f64,
    pub min_direct_half_width: f64,
    pub default_row_height: f64,
    pub score_length_weight: f64,
    pub score_turn_weight: f64,
    pub score_crossing_weight: f64,
    pub score_node_touch_weight: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_width: 220.0,
            horizontal_gap: 150.0,
            vertical_gap: 100.0,
            visible_field_max: 5,
            header_height: 50.0,
            body_pad: 16.0,
            row_height: 28.0,
            more_indicator_height: 24.0,
            corner_radius: 8.0,
            fan_step: 12.0,
            outer_margin: 40.0,
            short_jog: 30.0,
            min_direct_half_width: 20.0,
            default_row_height: 180.0,
            score_length_weight: 1.0,
            score_turn_weight: 50.0,
            score_crossing_weight: 200.0,
            score_node_touch_weight: 500.0,
        }
    }
}

impl LayoutConfig {
    /// Card height: header, body padding, one row per visible field, and an
    /// overflow indicator once the field count exceeds what's shown.
    pub fn node_height(&self, field_count: usize) -> f64 {
        let visible = field_count.min(self.visible_field_max);
        let mut height = self.header_height + self.body_pad + (visible as f64) * self.row_height;
        if field_count > self.visible_field_max {
            height += self.more_indicator_height;
        }
        height
    }

    /// Vertical offset (from the node's top) of the row a relationship's
    /// anchor should leave from. Falls back to the card's vertical midpoint
    /// when no field matches.
    pub fn field_y_offset(&self, model: &ModelRecord, rel_name: &str) -> f64 {
        let candidates = [
            rel_name.to_string(),
            format!("{rel_name}_id"),
            rel_name.strip_suffix("_id").unwrap_or(rel_name).to_string(),
        ];
        for (i, field) in model.fields.iter().take(self.visible_field_max).enumerate() {
            if candidates.iter().any(|c| c == &field.name) {
                return self.row_center(i);
            }
        }
        self.vertical_midpoint()
    }

    /// Vertical offset of the primary key row, used as the arrival anchor on
    /// the target side of a relationship. Falls back to the midpoint if the
    /// model declares no primary key among its visible fields.
    pub fn pk_y_offset(&self, model: &ModelRecord) -> f64 {
        for (i, field) in model.fields.iter().take(self.visible_field_max).enumerate() {
            if field.primary_key {
                return self.row_center(i);
            }
        }
        self.vertical_midpoint()
    }

    fn row_center(&self, index: usize) -> f64 {
        self.header_height + self.body_pad / 2.0 + (index as f64) * self.row_height + self.row_height / 2.0
    }

    fn vertical_midpoint(&self) -> f64 {
        self.header_height + self.body_pad / 2.0 + self.row_height / 2.0
    }
}

/// Derives each node's bounding box from its top-left position, its field
/// count driven height, and the config's fixed node width.
pub fn compute_bounds(
    positions: &HashMap<NodeIndex, Point>,
    heights: &HashMap<NodeIndex, f64>,
    config: &LayoutConfig,
) -> HashMap<NodeIndex, Bounds> {
    positions
        .iter()
        .filter_map(|(&idx, &p)| {
            let h = *heights.get(&idx)?;
            Some((
                idx,
                Bounds {
                    left: p.x,
                    right: p.x + config.node_width,
                    top: p.y,
                    bottom: p.y + h,
                },
            ))
        })
        .collect()
}
