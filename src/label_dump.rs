use crate::ir::{ChartFrame, ChartInput};
use crate::labels::LabelDescriptor;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDump {
    pub title: Option<String>,
    pub frame: Option<ChartFrame>,
    pub sector_count: usize,
    pub labels: Vec<LabelRecord>,
}

/// One label, flattened for consumers that draw with plain coordinates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRecord {
    pub index: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub text_x: f64,
    pub text_anchor: String,
    pub side: String,
    pub fill: String,
    pub leader: Vec<[f64; 2]>,
}

impl LabelDump {
    pub fn from_labels(
        chart: &ChartInput,
        frame: Option<ChartFrame>,
        labels: &[LabelDescriptor],
    ) -> Self {
        let labels = labels
            .iter()
            .map(|label| LabelRecord {
                index: label.index,
                text: label.text.clone(),
                x: label.x,
                y: label.y,
                text_x: label.text_x,
                text_anchor: label.anchor.as_str().to_string(),
                side: label.side.as_str().to_string(),
                fill: label.fill.clone(),
                leader: label.leader.points().iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();

        LabelDump {
            title: chart.title.clone(),
            frame,
            sector_count: chart.sectors.len(),
            labels,
        }
    }
}

pub fn write_label_dump(
    output: Option<&Path>,
    chart: &ChartInput,
    frame: Option<ChartFrame>,
    labels: &[LabelDescriptor],
) -> anyhow::Result<()> {
    let dump = LabelDump::from_labels(chart, frame, labels);
    match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &dump)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelConfig;
    use crate::ir::Sector;
    use crate::labels::place_labels;

    #[test]
    fn dump_flattens_leader_points() {
        let chart = ChartInput {
            title: Some("Load".to_string()),
            sectors: vec![Sector {
                index: 0,
                name: "queued".to_string(),
                value: 4.0,
                percent: 100.0,
                fill: "#8884d8".to_string(),
                mid_angle: 180.0,
                outer_radius: 100.0,
                cx: 150.0,
                cy: 150.0,
            }],
        };
        let labels = place_labels(&chart.sectors, &LabelConfig::default());
        let dump = LabelDump::from_labels(&chart, chart.frame(22.0), &labels);
        assert_eq!(dump.sector_count, 1);
        assert_eq!(dump.labels[0].text_anchor, "end");
        assert_eq!(dump.labels[0].side, "left");
        assert_eq!(dump.labels[0].leader.len(), 3);
        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"textAnchor\":\"end\""));
        assert!(json.contains("\"outerRadius\":100.0"));
    }
}
