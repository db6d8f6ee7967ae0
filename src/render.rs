use crate::config::{LabelConfig, RenderConfig};
use crate::ir::{ChartFrame, ChartInput, Point};
use crate::labels::{LabelDescriptor, TextAnchor};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const TEXT_WIDTH_FACTOR: f64 = 0.6;
const VIEW_PADDING: f64 = 8.0;

#[derive(Debug, Clone, Copy)]
struct ViewBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl ViewBox {
    fn around(frame: &ChartFrame, config: &LabelConfig) -> Self {
        let x_limit = frame.x_limit(config.horizontal_margin);
        let y_limit = frame.y_limit(config.vertical_margin);
        Self {
            min_x: frame.cx - x_limit,
            min_y: frame.cy - y_limit,
            max_x: frame.cx + x_limit,
            max_y: frame.cy + y_limit,
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn padded(self, pad: f64) -> Self {
        Self {
            min_x: self.min_x - pad,
            min_y: self.min_y - pad,
            max_x: self.max_x + pad,
            max_y: self.max_y + pad,
        }
    }
}

/// Debug view of the placement result: guide circle, leader lines and text.
/// Wedges are left to the real chart host.
pub fn render_preview_svg(
    chart: &ChartInput,
    labels: &[LabelDescriptor],
    theme: &Theme,
    config: &LabelConfig,
) -> String {
    let frame = chart
        .frame(config.extra_radius)
        .unwrap_or_else(|| ChartFrame::new(150.0, 150.0, 100.0, config.extra_radius));
    let font_size = theme.font_size as f64;

    let mut view = ViewBox::around(&frame, config);
    for label in labels {
        let text_width = label.text.chars().count() as f64 * font_size * TEXT_WIDTH_FACTOR;
        let far_x = match label.anchor {
            TextAnchor::Start => label.text_x + text_width,
            TextAnchor::End => label.text_x - text_width,
        };
        view.include(far_x, label.y - font_size);
        view.include(far_x, label.y + font_size);
    }
    if chart.title.is_some() {
        view.include(frame.cx, view.min_y - font_size * 2.0);
    }
    let view = view.padded(VIEW_PADDING);
    let width = view.max_x - view.min_x;
    let height = view.max_y - view.min_y;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{:.2} {:.2} {width:.2} {height:.2}\">",
        view.min_x, view.min_y
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        view.min_x, view.min_y, theme.background
    ));

    if let Some(title) = &chart.title {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
            frame.cx,
            view.min_y + VIEW_PADDING + font_size,
            escape_xml(&theme.font_family),
            theme.font_size * 1.2,
            theme.text_color,
            escape_xml(title)
        ));
    }

    svg.push_str(&format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-dasharray=\"4 3\" stroke-width=\"1\"/>",
        frame.cx, frame.cy, frame.outer_radius, theme.guide_color
    ));

    for label in labels {
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            points_attr(&label.leader.points()),
            theme.line_color
        ));
        let fill = if label.fill.is_empty() {
            theme.line_color.as_str()
        } else {
            label.fill.as_str()
        };
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2\" fill=\"{}\"/>",
            label.leader.p0.x, label.leader.p0.y, fill
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            label.text_x,
            label.y,
            label.anchor.as_str(),
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.text_color,
            escape_xml(&label.text)
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    let channel = |idx: usize| u8::from_str_radix(hex.get(idx..idx + 2)?, 16).ok();
    match hex.len() {
        6 => Some(resvg::tiny_skia::Color::from_rgba8(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            255,
        )),
        _ => None,
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Sector;
    use crate::labels::place_labels;

    fn chart() -> ChartInput {
        let sector = |index: usize, name: &str, mid_angle: f64, percent: f64| Sector {
            index,
            name: name.to_string(),
            value: percent,
            percent,
            fill: "#8884d8".to_string(),
            mid_angle,
            outer_radius: 100.0,
            cx: 150.0,
            cy: 150.0,
        };
        ChartInput {
            title: Some("Queue <load>".to_string()),
            sectors: vec![
                sector(0, "Queued & waiting", 60.0, 33.0),
                sector(1, "Offered", 200.0, 67.0),
            ],
        }
    }

    #[test]
    fn render_preview_basic() {
        let chart = chart();
        let config = LabelConfig::default();
        let labels = place_labels(&chart.sectors, &config);
        let svg = render_preview_svg(&chart, &labels, &Theme::modern(), &config);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Queued &amp; waiting 33%"));
        assert!(svg.contains("Queue &lt;load&gt;"));
        assert!(svg.contains("text-anchor=\"start\""));
        assert!(svg.contains("text-anchor=\"end\""));
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn empty_label_list_still_renders_guide() {
        let chart = ChartInput::new();
        let config = LabelConfig::default();
        let svg = render_preview_svg(&chart, &[], &Theme::classic(), &config);
        assert!(svg.contains("<circle cx=\"150.00\" cy=\"150.00\" r=\"100.00\""));
        assert!(!svg.contains("<polyline"));
    }
}
