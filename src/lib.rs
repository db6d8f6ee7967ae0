#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod label_dump;
pub mod labels;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LabelConfig, load_config};
pub use ir::{ChartFrame, ChartInput, Point, Sector, Side};
pub use labels::{LabelDescriptor, LabelPlacer, TextAnchor, place_labels};
pub use parser::{ParseOutput, parse_chart_input};
pub use render::render_preview_svg;
pub use theme::Theme;

/// Label settings for one parsed chart: `base`, then the chart's inline
/// configuration, then its `showData`/`showValue` flag.
pub fn resolve_label_config(
    parsed: &ParseOutput,
    base: &LabelConfig,
) -> anyhow::Result<LabelConfig> {
    let mut resolved = base.clone();
    if let Some(init) = &parsed.init_config {
        config::apply_config_value(&mut resolved, init)?;
    }
    if let Some(show_value) = parsed.show_value {
        resolved.show_value = show_value;
    }
    resolved.validate()?;
    Ok(resolved)
}

/// Parse `input` and run one placement pass with `config`.
pub fn place_chart_labels(
    input: &str,
    config: &Config,
) -> anyhow::Result<(ChartInput, LabelConfig, Vec<LabelDescriptor>)> {
    let parsed = parse_chart_input(input, &config.theme.pie_colors)?;
    let label_config = resolve_label_config(&parsed, &config.labels)?;
    let labels = place_labels(&parsed.chart.sectors, &label_config);
    Ok((parsed.chart, label_config, labels))
}
