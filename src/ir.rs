use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// +1 for labels that grow rightwards, -1 for the left half.
    pub fn sign(self) -> f64 {
        match self {
            Side::Right => 1.0,
            Side::Left => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// One wedge of a donut as handed over by the chart host, already in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    #[serde(default)]
    pub index: usize,
    pub name: String,
    #[serde(default)]
    pub value: f64,
    pub percent: f64,
    #[serde(default)]
    pub fill: String,
    #[serde(alias = "midAngleDeg")]
    pub mid_angle: f64,
    pub outer_radius: f64,
    pub cx: f64,
    pub cy: f64,
}

/// Chart center and radii shared by every sector of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFrame {
    pub cx: f64,
    pub cy: f64,
    pub outer_radius: f64,
    pub extra_radius: f64,
}

impl ChartFrame {
    pub fn new(cx: f64, cy: f64, outer_radius: f64, extra_radius: f64) -> Self {
        Self {
            cx,
            cy,
            outer_radius,
            extra_radius,
        }
    }

    pub fn label_radius(&self) -> f64 {
        self.outer_radius + self.extra_radius
    }

    pub fn y_limit(&self, vertical_margin: f64) -> f64 {
        self.label_radius() + vertical_margin
    }

    pub fn x_limit(&self, horizontal_margin: f64) -> f64 {
        self.label_radius() + horizontal_margin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountEntry {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub fill: Option<String>,
}

/// A full render pass worth of sectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartInput {
    pub title: Option<String>,
    pub sectors: Vec<Sector>,
}

impl ChartInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Center and outer radius taken from the first sector, if any.
    pub fn frame(&self, extra_radius: f64) -> Option<ChartFrame> {
        self.sectors
            .first()
            .map(|s| ChartFrame::new(s.cx, s.cy, s.outer_radius, extra_radius))
    }
}

/// Turn raw counts into sectors the way a donut host would: shares of the
/// positive total, angles accumulated from 0 degrees.
pub fn sectors_from_counts(
    frame: &ChartFrame,
    entries: &[CountEntry],
    palette: &[String],
) -> Vec<Sector> {
    let total: f64 = entries
        .iter()
        .map(|entry| sanitize_count(entry.value))
        .sum();
    let fallback_span = 360.0 / entries.len().max(1) as f64;

    let mut start = 0.0_f64;
    let mut sectors = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let value = sanitize_count(entry.value);
        let (percent, span) = if total > 0.0 {
            (value / total * 100.0, value / total * 360.0)
        } else {
            (0.0, fallback_span)
        };
        let fill = entry.fill.clone().unwrap_or_else(|| {
            if palette.is_empty() {
                String::new()
            } else {
                palette[idx % palette.len()].clone()
            }
        });
        sectors.push(Sector {
            index: idx,
            name: entry.name.clone(),
            value: entry.value,
            percent,
            fill,
            mid_angle: start + span / 2.0,
            outer_radius: frame.outer_radius,
            cx: frame.cx,
            cy: frame.cy,
        });
        start += span;
    }
    sectors
}

fn sanitize_count(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
