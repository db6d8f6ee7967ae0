//! Outside label placement for donut and pie charts.
//!
//! All functions here work with pure geometry: the host hands over sectors in
//! screen space and gets back text, coordinates and leader lines to draw.

pub mod collision;
pub mod geometry;
pub mod leader;
pub mod placer;
pub mod threshold;

pub use collision::{CollisionStack, Placement, VerticalBand};
pub use geometry::{RADIAN, SectorGeometry, Unplaceable, resolve_sector_geometry};
pub use leader::{LeaderGeometry, LeaderLine, LeaderStyle, build_leader_line};
pub use placer::{LabelDescriptor, LabelPlacer, TextAnchor, format_label_text, format_value};
pub use threshold::is_suppressed;

use crate::config::LabelConfig;
use crate::ir::Sector;

/// One-off render pass with a fresh placer.
pub fn place_labels(sectors: &[Sector], config: &LabelConfig) -> Vec<LabelDescriptor> {
    LabelPlacer::new(config.clone()).place_all(sectors)
}
