use crate::error::ConfigError;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Per-chart label placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub min_gap: f64,
    pub extra_radius: f64,
    pub show_value: bool,
    pub always_show_names: BTreeSet<String>,
    pub leader_len: f64,
    pub min_percent: f64,
    pub max_steps: usize,
    pub vertical_margin: f64,
    pub horizontal_margin: f64,
    pub text_offset: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            min_gap: 16.0,
            extra_radius: 22.0,
            show_value: false,
            always_show_names: BTreeSet::new(),
            leader_len: 12.0,
            min_percent: 3.0,
            max_steps: 60,
            vertical_margin: 40.0,
            horizontal_margin: 20.0,
            text_offset: 6.0,
        }
    }
}

impl LabelConfig {
    pub fn with_always_show<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.always_show_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_gap.is_finite() || self.min_gap <= 0.0 {
            return Err(ConfigError::MinGap(self.min_gap));
        }
        if !self.extra_radius.is_finite() || self.extra_radius < 0.0 {
            return Err(ConfigError::ExtraRadius(self.extra_radius));
        }
        if !self.leader_len.is_finite() || self.leader_len < 0.0 {
            return Err(ConfigError::LeaderLength(self.leader_len));
        }
        if !self.min_percent.is_finite() {
            return Err(ConfigError::MinPercent(self.min_percent));
        }
        if !self.vertical_margin.is_finite() || self.vertical_margin < 0.0 {
            return Err(ConfigError::Margin(self.vertical_margin));
        }
        if !self.horizontal_margin.is_finite() || self.horizontal_margin < 0.0 {
            return Err(ConfigError::Margin(self.horizontal_margin));
        }
        if !self.text_offset.is_finite() {
            return Err(ConfigError::TextOffset(self.text_offset));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub labels: LabelConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            labels: LabelConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    text_color: Option<String>,
    line_color: Option<String>,
    guide_color: Option<String>,
    background: Option<String>,
    pie1: Option<String>,
    pie2: Option<String>,
    pie3: Option<String>,
    pie4: Option<String>,
    pie5: Option<String>,
    pie6: Option<String>,
    pie7: Option<String>,
    pie8: Option<String>,
    pie9: Option<String>,
    pie10: Option<String>,
    pie11: Option<String>,
    pie12: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => {
                val.trim().trim_end_matches("px").parse::<f32>().ok()
            }
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    min_gap: Option<f64>,
    extra_radius: Option<f64>,
    show_value: Option<bool>,
    #[serde(alias = "alwaysShowNames")]
    always_show: Option<Vec<String>>,
    #[serde(alias = "leaderLen")]
    leader_length: Option<f64>,
    min_percent: Option<f64>,
    max_steps: Option<usize>,
    vertical_margin: Option<f64>,
    horizontal_margin: Option<f64>,
    text_offset: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    labels: Option<LabelConfigFile>,
    render: Option<RenderConfigFile>,
}

fn merge_label_config(config: &mut LabelConfig, file: LabelConfigFile) {
    if let Some(v) = file.min_gap {
        config.min_gap = v;
    }
    if let Some(v) = file.extra_radius {
        config.extra_radius = v;
    }
    if let Some(v) = file.show_value {
        config.show_value = v;
    }
    if let Some(names) = file.always_show {
        config.always_show_names = names.into_iter().collect();
    }
    if let Some(v) = file.leader_length {
        config.leader_len = v;
    }
    if let Some(v) = file.min_percent {
        config.min_percent = v;
    }
    if let Some(v) = file.max_steps {
        config.max_steps = v;
    }
    if let Some(v) = file.vertical_margin {
        config.vertical_margin = v;
    }
    if let Some(v) = file.horizontal_margin {
        config.horizontal_margin = v;
    }
    if let Some(v) = file.text_offset {
        config.text_offset = v;
    }
}

fn merge_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
        theme.font_size = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
    if let Some(v) = vars.line_color {
        theme.line_color = v;
    }
    if let Some(v) = vars.guide_color {
        theme.guide_color = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
    let pies = [
        vars.pie1, vars.pie2, vars.pie3, vars.pie4, vars.pie5, vars.pie6, vars.pie7, vars.pie8,
        vars.pie9, vars.pie10, vars.pie11, vars.pie12,
    ];
    for (idx, color) in pies.into_iter().enumerate() {
        let Some(color) = color else {
            continue;
        };
        if idx < theme.pie_colors.len() {
            theme.pie_colors[idx] = color;
        } else {
            theme.pie_colors.push(color);
        }
    }
}

/// Merge the `labels` object of an inline init directive onto `config`.
pub fn apply_config_value(
    config: &mut LabelConfig,
    value: &serde_json::Value,
) -> anyhow::Result<()> {
    let Some(labels) = value.get("labels") else {
        return Ok(());
    };
    let file: LabelConfigFile = serde_json::from_value(labels.clone())?;
    merge_label_config(config, file);
    config.validate()?;
    Ok(())
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(&contents)?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| ConfigError::UnknownTheme(theme_name.to_string()))?;
        config.render.background = config.theme.background.clone();
    }
    if let Some(vars) = parsed.theme_variables {
        merge_theme_variables(&mut config.theme, vars);
        config.render.background = config.theme.background.clone();
    }
    if let Some(labels) = parsed.labels {
        merge_label_config(&mut config.labels, labels);
    }
    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    config.labels.validate()?;
    Ok(config)
}
