use crate::config::{LabelConfig, load_config};
use crate::label_dump::write_label_dump;
use crate::labels::LabelPlacer;
use crate::parser::parse_chart_input;
use crate::render::{render_preview_svg, write_output_png, write_output_svg};
use crate::resolve_label_config;
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rlabel", version, about = "Outside label placement for donut charts")]
pub struct Args {
    /// Input file (chart JSON/JSON5 or pie text) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for JSON and SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Append the raw value to every label
    #[arg(long = "show-value")]
    pub show_value: bool,

    /// Category that is labelled even below the percentage threshold
    #[arg(long = "always-show", value_name = "NAME")]
    pub always_show: Vec<String>,

    /// Minimum vertical gap between labels on the same side
    #[arg(long = "min-gap")]
    pub min_gap: Option<f64>,

    /// Distance from the outer radius to the label point
    #[arg(long = "extra-radius")]
    pub extra_radius: Option<f64>,

    /// More logging (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let parsed = parse_chart_input(&input, &config.theme.pie_colors)?;
    let mut label_config = resolve_label_config(&parsed, &config.labels)?;
    apply_overrides(&mut label_config, &args);
    label_config.validate()?;

    let mut placer = LabelPlacer::new(label_config);
    let labels = placer.place_all(&parsed.chart.sectors);
    info!(
        sectors = parsed.chart.sectors.len(),
        labels = labels.len(),
        "placed labels"
    );

    let chart = &parsed.chart;
    match args.output_format {
        OutputFormat::Json => {
            let frame = chart.frame(placer.config().extra_radius);
            write_label_dump(args.output.as_deref(), chart, frame, &labels)?;
        }
        OutputFormat::Svg => {
            let svg = render_preview_svg(chart, &labels, &config.theme, placer.config());
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_preview_svg(chart, &labels, &config.theme, placer.config());
            write_output_png(&svg, &output, &config.render)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_overrides(config: &mut LabelConfig, args: &Args) {
    if args.show_value {
        config.show_value = true;
    }
    config
        .always_show_names
        .extend(args.always_show.iter().cloned());
    if let Some(v) = args.min_gap {
        config.min_gap = v;
    }
    if let Some(v) = args.extra_radius {
        config.extra_radius = v;
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "rlabel",
            "--show-value",
            "--always-show",
            "failed",
            "--always-show",
            "stalled",
            "--min-gap",
            "20",
            "-vv",
        ]);
        assert_eq!(args.verbose, 2);
        let mut config = LabelConfig::default();
        apply_overrides(&mut config, &args);
        assert!(config.show_value);
        assert_eq!(config.min_gap, 20.0);
        assert_eq!(config.extra_radius, 22.0);
        assert_eq!(config.always_show_names.len(), 2);
    }

    #[test]
    fn png_needs_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("out.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }
}
