use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("minGap must be a positive finite number, got {0}")]
    MinGap(f64),
    #[error("extraRadius must be a non-negative finite number, got {0}")]
    ExtraRadius(f64),
    #[error("leaderLength must be a non-negative finite number, got {0}")]
    LeaderLength(f64),
    #[error("minPercent must be a finite number, got {0}")]
    MinPercent(f64),
    #[error("label margins must be non-negative finite numbers, got {0}")]
    Margin(f64),
    #[error("textOffset must be a finite number, got {0}")]
    TextOffset(f64),
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no sectors found in input")]
    Empty,
    #[error("chart document must contain either `sectors` or `counts`")]
    MissingSectors,
    #[error("outerRadius must be positive when building sectors from counts, got {0}")]
    OuterRadius(f64),
    #[error("invalid chart document: {0}")]
    Document(#[from] json5::Error),
}
