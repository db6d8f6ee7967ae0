use crate::error::InputError;
use crate::ir::{ChartFrame, ChartInput, CountEntry, Sector, sectors_from_counts};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

pub const DEFAULT_CX: f64 = 150.0;
pub const DEFAULT_CY: f64 = 150.0;
pub const DEFAULT_OUTER_RADIUS: f64 = 100.0;

static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());
static PIE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^pie\b(?P<show>\s+showdata\b)?(?:\s+title\s+(?P<title>.*))?").unwrap()
});

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub chart: ChartInput,
    /// `showData` in pie text, `showValue` in a chart document.
    pub show_value: Option<bool>,
    /// Inline configuration (`%%{init: ...}%%` or a document's `labels`).
    pub init_config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameOverrides {
    cx: Option<f64>,
    cy: Option<f64>,
    outer_radius: Option<f64>,
}

impl FrameOverrides {
    fn resolve(&self) -> ChartFrame {
        ChartFrame::new(
            self.cx.unwrap_or(DEFAULT_CX),
            self.cy.unwrap_or(DEFAULT_CY),
            self.outer_radius.unwrap_or(DEFAULT_OUTER_RADIUS),
            0.0,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectorRecord {
    index: Option<usize>,
    name: String,
    #[serde(default)]
    value: f64,
    percent: f64,
    #[serde(default)]
    fill: Option<String>,
    #[serde(alias = "midAngleDeg")]
    mid_angle: f64,
    outer_radius: Option<f64>,
    cx: Option<f64>,
    cy: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartDocument {
    title: Option<String>,
    #[serde(flatten)]
    frame: FrameOverrides,
    sectors: Option<Vec<SectorRecord>>,
    counts: Option<Vec<CountEntry>>,
    #[serde(alias = "showData")]
    show_value: Option<bool>,
    labels: Option<serde_json::Value>,
}

/// Parse either a JSON/JSON5 chart document or pie text.
///
/// `palette` colors sectors that arrive as counts without their own fill.
pub fn parse_chart_input(input: &str, palette: &[String]) -> Result<ParseOutput> {
    let output = if input.trim_start().starts_with('{') {
        parse_chart_document(input, palette)?
    } else {
        parse_pie_text(input, palette)?
    };
    if output.chart.sectors.is_empty() {
        return Err(InputError::Empty.into());
    }
    Ok(output)
}

fn parse_chart_document(input: &str, palette: &[String]) -> Result<ParseOutput> {
    let doc: ChartDocument = json5::from_str(input).map_err(InputError::Document)?;
    let frame = doc.frame.resolve();

    let sectors = match (doc.sectors, doc.counts) {
        (Some(records), _) => records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| sector_from_record(idx, record, &frame, palette))
            .collect(),
        (None, Some(counts)) => {
            if !frame.outer_radius.is_finite() || frame.outer_radius <= 0.0 {
                return Err(InputError::OuterRadius(frame.outer_radius).into());
            }
            sectors_from_counts(&frame, &counts, palette)
        }
        (None, None) => return Err(InputError::MissingSectors.into()),
    };

    Ok(ParseOutput {
        chart: ChartInput {
            title: doc.title,
            sectors,
        },
        show_value: doc.show_value,
        init_config: doc
            .labels
            .map(|labels| serde_json::json!({ "labels": labels })),
    })
}

fn sector_from_record(
    idx: usize,
    record: SectorRecord,
    frame: &ChartFrame,
    palette: &[String],
) -> Sector {
    let fill = record.fill.unwrap_or_else(|| {
        if palette.is_empty() {
            String::new()
        } else {
            palette[idx % palette.len()].clone()
        }
    });
    Sector {
        index: record.index.unwrap_or(idx),
        name: record.name,
        value: record.value,
        percent: record.percent,
        fill,
        mid_angle: record.mid_angle,
        outer_radius: record.outer_radius.unwrap_or(frame.outer_radius),
        cx: record.cx.unwrap_or(frame.cx),
        cy: record.cy.unwrap_or(frame.cy),
    }
}

fn parse_pie_text(input: &str, palette: &[String]) -> Result<ParseOutput> {
    let (lines, init_config) = preprocess_input(input)?;
    let mut title = None;
    let mut show_value = None;
    let mut entries = Vec::new();

    for line in lines {
        if let Some(caps) = PIE_HEADER_RE.captures(&line) {
            if caps.name("show").is_some() {
                show_value = Some(true);
            }
            if let Some(t) = caps.name("title").map(|m| m.as_str().trim()) {
                if !t.is_empty() {
                    title = Some(t.to_string());
                }
            }
            continue;
        }
        let lower = line.to_ascii_lowercase();
        if lower.starts_with("showdata") {
            show_value = Some(true);
            continue;
        }
        if lower.starts_with("title") {
            let t = line.get(5..).unwrap_or("").trim();
            if !t.is_empty() {
                title = Some(t.to_string());
            }
            continue;
        }
        if let Some((name, value)) = parse_slice_line(&line) {
            entries.push(CountEntry {
                name,
                value,
                fill: None,
            });
        }
    }

    let frame = init_config
        .as_ref()
        .and_then(|value| value.get("chart"))
        .and_then(|chart| serde_json::from_value::<FrameOverrides>(chart.clone()).ok())
        .map(|overrides| overrides.resolve())
        .unwrap_or_else(|| ChartFrame::new(DEFAULT_CX, DEFAULT_CY, DEFAULT_OUTER_RADIUS, 0.0));

    Ok(ParseOutput {
        chart: ChartInput {
            title,
            sectors: sectors_from_counts(&frame, &entries, palette),
        },
        show_value,
        init_config,
    })
}

fn preprocess_input(input: &str) -> Result<(Vec<String>, Option<serde_json::Value>)> {
    let mut init_config: Option<serde_json::Value> = None;
    let mut lines = Vec::new();

    for raw_line in input.lines() {
        let trimmed_line = raw_line.trim();
        if trimmed_line.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(trimmed_line) {
            if let Some(json_str) = caps.get(1).map(|m| m.as_str()) {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(json_str) {
                    init_config = Some(value);
                } else if let Ok(value) = json5::from_str::<serde_json::Value>(json_str) {
                    init_config = Some(value);
                }
            }
            continue;
        }
        if trimmed_line.starts_with("%%") {
            continue;
        }
        let without_comment = strip_trailing_comment(trimmed_line);
        if without_comment.is_empty() {
            continue;
        }
        lines.push(without_comment);
    }

    Ok((lines, init_config))
}

fn strip_trailing_comment(line: &str) -> String {
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();
    let mut out = String::new();
    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            out.push(ch);
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            out.push(ch);
            continue;
        }
        if ch == '%'
            && let Some('%') = chars.peek().copied()
        {
            break;
        }
        out.push(ch);
    }
    out.trim().to_string()
}

fn parse_slice_line(line: &str) -> Option<(String, f64)> {
    let (name_part, value_part) = line.rsplit_once(':')?;
    let name = strip_quotes(name_part);
    if name.is_empty() {
        return None;
    }
    let value = value_part.trim().parse::<f64>().ok()?;
    Some((name, value))
}

fn strip_quotes(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<String> {
        vec!["#8884d8".to_string(), "#82ca9d".to_string()]
    }

    #[test]
    fn parse_pie_text_basic() {
        let input = "pie showData title Station load\n  \"Queued\" : 30\n  Offered : 10 %% trailing\n";
        let parsed = parse_chart_input(input, &palette()).unwrap();
        assert_eq!(parsed.show_value, Some(true));
        assert_eq!(parsed.chart.title.as_deref(), Some("Station load"));
        let sectors = &parsed.chart.sectors;
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].name, "Queued");
        assert_eq!(sectors[0].percent, 75.0);
        assert_eq!(sectors[1].fill, "#82ca9d");
        assert_eq!(sectors[0].cx, DEFAULT_CX);
        assert_eq!(sectors[0].outer_radius, DEFAULT_OUTER_RADIUS);
    }

    #[test]
    fn parse_pie_text_init_directive() {
        let input = "%%{init: {\"chart\": {\"cx\": 200, \"outerRadius\": 80}, \"labels\": {\"minGap\": 12}}}%%\npie\n\"A: left\" : 1\n";
        let parsed = parse_chart_input(input, &[]).unwrap();
        let sectors = &parsed.chart.sectors;
        assert_eq!(sectors[0].name, "A: left");
        assert_eq!(sectors[0].cx, 200.0);
        assert_eq!(sectors[0].cy, DEFAULT_CY);
        assert_eq!(sectors[0].outer_radius, 80.0);
        let init = parsed.init_config.unwrap();
        assert_eq!(init["labels"]["minGap"], 12);
    }

    #[test]
    fn parse_sector_document() {
        let input = r##"{
  // screen-space sectors straight from the host
  cx: 150, cy: 150, outerRadius: 100,
  sectors: [
    { name: "A", value: 40, percent: 40, midAngle: 10, fill: "#f00" },
    { index: 7, name: "B", percent: 35, midAngleDeg: 15, cx: 160 },
  ],
  showValue: true,
  labels: { alwaysShow: ["B"] },
}"##;
        let parsed = parse_chart_input(input, &palette()).unwrap();
        let sectors = &parsed.chart.sectors;
        assert_eq!(sectors[0].index, 0);
        assert_eq!(sectors[0].fill, "#f00");
        assert_eq!(sectors[1].index, 7);
        assert_eq!(sectors[1].mid_angle, 15.0);
        assert_eq!(sectors[1].cx, 160.0);
        assert_eq!(sectors[1].fill, "#82ca9d");
        assert_eq!(parsed.show_value, Some(true));
        assert!(parsed.init_config.unwrap()["labels"]["alwaysShow"].is_array());
    }

    #[test]
    fn parse_counts_document() {
        let input = r#"{ "outerRadius": 90, "counts": [{ "name": "queued", "value": 3 }, { "name": "done", "value": 1 }] }"#;
        let parsed = parse_chart_input(input, &palette()).unwrap();
        let sectors = &parsed.chart.sectors;
        assert_eq!(sectors[0].percent, 75.0);
        assert_eq!(sectors[0].outer_radius, 90.0);
        assert_eq!(sectors[1].mid_angle, 315.0);
    }

    #[test]
    fn rejects_empty_and_shapeless_documents() {
        assert!(parse_chart_input("pie title Nothing\n", &[]).is_err());
        let err = parse_chart_input("{ cx: 1 }", &[]).unwrap_err();
        assert!(err.to_string().contains("sectors"));
        assert!(parse_chart_input("{ outerRadius: 0, counts: [] }", &[]).is_err());
    }
}
