use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::collision::{CollisionStack, VerticalBand};
use super::geometry::resolve_sector_geometry;
use super::leader::{LeaderLine, LeaderStyle, build_leader_line};
use super::threshold::is_suppressed;
use crate::config::LabelConfig;
use crate::ir::{ChartFrame, Point, Sector, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    /// Text always grows away from the chart.
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Right => TextAnchor::Start,
            Side::Left => TextAnchor::End,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}

/// Everything the host needs to draw one outside label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    pub index: usize,
    pub name: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub text_x: f64,
    pub anchor: TextAnchor,
    pub side: Side,
    pub fill: String,
    pub leader: LeaderLine,
}

pub fn format_value(value: f64) -> String {
    let mut rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        rounded = 0.0;
    }
    if (rounded - rounded.round()).abs() < 0.001 {
        format!("{:.0}", rounded)
    } else {
        format!("{}", rounded)
    }
}

pub fn format_label_text(name: &str, percent: f64, value: f64, show_value: bool) -> String {
    // f64::round is half away from zero; `{:.0}` would round half to even.
    let mut percent = if percent.is_finite() { percent.round() } else { 0.0 };
    // -0.0 prints as "-0".
    if percent == 0.0 {
        percent = 0.0;
    }
    if show_value {
        format!("{name} {percent}% ({})", format_value(value))
    } else {
        format!("{name} {percent}%")
    }
}

/// Places outside labels for one chart instance.
///
/// Create one per mounted chart. Each render pass starts with
/// [`LabelPlacer::begin_pass`] followed by one [`LabelPlacer::place_sector`]
/// call per visible sector in angular order, or a single
/// [`LabelPlacer::place_all`].
#[derive(Debug, Clone)]
pub struct LabelPlacer {
    config: LabelConfig,
    stacks: CollisionStack,
}

impl LabelPlacer {
    pub fn new(config: LabelConfig) -> Self {
        let stacks = CollisionStack::with_max_steps(config.max_steps);
        Self { config, stacks }
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn begin_pass(&mut self) {
        self.stacks.reset();
    }

    pub fn place_sector(&mut self, sector: &Sector) -> Option<LabelDescriptor> {
        let cfg = &self.config;
        let geometry = match resolve_sector_geometry(sector, cfg.extra_radius) {
            Ok(geometry) => geometry,
            Err(err) => {
                debug!(
                    index = sector.index,
                    name = %sector.name,
                    reason = err.reason(),
                    "skipping unplaceable sector"
                );
                return None;
            }
        };

        if is_suppressed(
            sector.percent,
            &sector.name,
            &cfg.always_show_names,
            cfg.min_percent,
        ) {
            trace!(
                index = sector.index,
                name = %sector.name,
                percent = sector.percent,
                "label suppressed"
            );
            return None;
        }

        let frame = ChartFrame::new(sector.cx, sector.cy, sector.outer_radius, cfg.extra_radius);
        let band = VerticalBand::new(sector.cy, frame.y_limit(cfg.vertical_margin));
        let placement = self
            .stacks
            .place(geometry.outside.y, geometry.side, cfg.min_gap, band);
        if !placement.converged {
            debug!(
                index = sector.index,
                name = %sector.name,
                steps = placement.steps,
                y = placement.y,
                "collision search hit the step cap, keeping overlapping label"
            );
        }

        let label = Point::new(geometry.outside.x, placement.y);
        let style = LeaderStyle {
            length: cfg.leader_len,
            horizontal_margin: cfg.horizontal_margin,
            text_offset: cfg.text_offset,
        };
        let leader = build_leader_line(geometry.anchor, label, geometry.side, &frame, &style);

        Some(LabelDescriptor {
            index: sector.index,
            name: sector.name.clone(),
            text: format_label_text(&sector.name, sector.percent, sector.value, cfg.show_value),
            x: label.x,
            y: label.y,
            text_x: leader.text_x,
            anchor: TextAnchor::for_side(geometry.side),
            side: geometry.side,
            fill: sector.fill.clone(),
            leader: leader.line,
        })
    }

    /// Run one full render pass over `sectors`.
    pub fn place_all(&mut self, sectors: &[Sector]) -> Vec<LabelDescriptor> {
        self.begin_pass();
        sectors
            .iter()
            .filter_map(|sector| self.place_sector(sector))
            .collect()
    }
}
