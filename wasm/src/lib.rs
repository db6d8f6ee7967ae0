use radial_labels::{LabelConfig, LabelPlacer, Sector};
use serde::Deserialize;
use std::collections::BTreeSet;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelOptions {
    min_gap: Option<f64>,
    extra_radius: Option<f64>,
    show_value: Option<bool>,
    always_show: Option<Vec<String>>,
    leader_length: Option<f64>,
}

fn build_label_config(options: LabelOptions) -> Result<LabelConfig, String> {
    let mut config = LabelConfig::default();
    if let Some(v) = options.min_gap {
        config.min_gap = v;
    }
    if let Some(v) = options.extra_radius {
        config.extra_radius = v;
    }
    if let Some(v) = options.show_value {
        config.show_value = v;
    }
    if let Some(names) = options.always_show {
        config.always_show_names = names.into_iter().collect::<BTreeSet<_>>();
    }
    if let Some(v) = options.leader_length {
        config.leader_len = v;
    }
    config.validate().map_err(|error| error.to_string())?;
    Ok(config)
}

fn parse_options(options_json: Option<String>) -> Result<LabelOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(LabelOptions::default()),
    }
}

fn place_json(placer: &mut LabelPlacer, sectors_json: &str) -> Result<String, String> {
    let sectors: Vec<Sector> =
        serde_json::from_str(sectors_json).map_err(|error| error.to_string())?;
    let labels = placer.place_all(&sectors);
    serde_json::to_string(&labels).map_err(|error| error.to_string())
}

/// Label placer owned by one mounted chart panel.
#[wasm_bindgen]
pub struct ChartLabeler {
    placer: LabelPlacer,
}

#[wasm_bindgen]
impl ChartLabeler {
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<ChartLabeler, JsValue> {
        let config = parse_options(options_json)
            .and_then(build_label_config)
            .map_err(|error| JsValue::from_str(&error))?;
        Ok(ChartLabeler {
            placer: LabelPlacer::new(config),
        })
    }

    /// One render pass: takes the visible sectors in angular order.
    pub fn place(&mut self, sectors_json: &str) -> Result<String, JsValue> {
        place_json(&mut self.placer, sectors_json).map_err(|error| JsValue::from_str(&error))
    }
}

#[wasm_bindgen]
pub fn place_donut_labels(
    sectors_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let config = parse_options(options_json)
        .and_then(build_label_config)
        .map_err(|error| JsValue::from_str(&error))?;
    place_json(&mut LabelPlacer::new(config), sectors_json)
        .map_err(|error| JsValue::from_str(&error))
}
