use serde::{Deserialize, Serialize};

const DEFAULT_PIE_COLORS: [&str; 12] = [
    "#ECECFF",
    "#ffffde",
    "hsl(80, 100%, 56.2745098039%)",
    "hsl(240, 100%, 86.2745098039%)",
    "hsl(60, 100%, 63.5294117647%)",
    "hsl(80, 100%, 76.2745098039%)",
    "hsl(300, 100%, 76.2745098039%)",
    "hsl(180, 100%, 56.2745098039%)",
    "hsl(0, 100%, 56.2745098039%)",
    "hsl(300, 100%, 56.2745098039%)",
    "hsl(150, 100%, 56.2745098039%)",
    "hsl(0, 100%, 66.2745098039%)",
];

const MODERN_PIE_COLORS: [&str; 12] = [
    "#8884d8", "#82ca9d", "#ffc658", "#ff8042", "#0088fe", "#00c49f", "#ffbb28", "#a4de6c",
    "#d0ed57", "#8dd1e1", "#83a6ed", "#d88884",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub line_color: String,
    pub guide_color: String,
    pub background: String,
    pub pie_colors: Vec<String>,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#333333".to_string(),
            line_color: "#333333".to_string(),
            guide_color: "#9370DB".to_string(),
            background: "#FFFFFF".to_string(),
            pie_colors: DEFAULT_PIE_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            guide_color: "#D7E0F0".to_string(),
            background: "#FFFFFF".to_string(),
            pie_colors: MODERN_PIE_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "base" | "default" | "classic" => Some(Self::classic()),
            _ => None,
        }
    }
}
